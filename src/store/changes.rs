//! Change feed for "table changed" signals.
//!
//! Subscribers never interpret a payload: any change means the cached view
//! is stale and must be refetched.

use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 64;

/// Which table a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableChange {
    Tasks,
    Profiles,
}

/// Broadcast channel stores publish to after every mutation.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<TableChange>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed {
    /// Creates a feed with the default buffer size.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(DEFAULT_CAPACITY);
        Self { tx }
    }

    /// Subscribes to future changes.
    pub fn subscribe(&self) -> ChangeSubscription {
        ChangeSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Publishes a change. Having no subscribers is not an error.
    pub fn publish(&self, change: TableChange) {
        let _ = self.tx.send(change);
    }
}

/// Receiving end of a [`ChangeFeed`].
#[derive(Debug)]
pub struct ChangeSubscription {
    rx: broadcast::Receiver<TableChange>,
}

impl ChangeSubscription {
    /// Waits for the next invalidation.
    ///
    /// A lagged subscriber missed some signals, so it is told the task table
    /// changed. Returns `None` once every publisher is gone.
    pub async fn invalidated(&mut self) -> Option<TableChange> {
        match self.rx.recv().await {
            Ok(change) => Some(change),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "change feed lagged, forcing refetch");
                Some(TableChange::Tasks)
            }
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}
