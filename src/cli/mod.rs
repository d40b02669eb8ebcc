//! CLI module for worktrack.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `app`: Command execution against the data file
//! - `display`: Output formatting and display logic

pub mod app;
pub mod commands;
pub mod display;

pub use app::{App, TimerAction};
pub use commands::{Cli, Commands, EmployeesCommand};
pub use display::Display;
