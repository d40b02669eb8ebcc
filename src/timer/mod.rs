//! Task timers.
//!
//! - [`ledger`]: pure elapsed-time computation and formatting
//! - [`controller`]: start / pause / finish and task edits
//! - [`clock`]: the time source the controller reads
//! - [`validate`]: input normalization shared by task and profile edits

pub mod clock;
pub mod controller;
pub mod ledger;
pub mod validate;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{NoChange, TimerController, TimerOutcome};
pub use ledger::{elapsed_ms, format_clock, format_elapsed, format_human, is_running};
