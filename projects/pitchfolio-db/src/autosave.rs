//! Debounced autosave. Mutations arrive as snapshots through a channel;
//! a write only fires once a quiet period has elapsed with no further
//! snapshots, so a drag or a burst of edits collapses into one upsert.
//! The background task is aborted on shutdown or drop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use pitchfolio_engine::Holding;

use crate::database::Database;
use crate::types::AUTOSAVE_NAME;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(2);

/// One pending autosave: the full working-state snapshot to persist.
#[derive(Debug, Clone)]
pub struct AutosaveRequest {
    pub user_id: i64,
    pub formation: String,
    pub holdings: Vec<Holding>,
}

pub struct Autosaver {
    tx: mpsc::UnboundedSender<AutosaveRequest>,
    handle: JoinHandle<()>,
}

impl Autosaver {
    /// Spawn the debounce task against a shared database handle.
    pub fn spawn(db: Arc<Database>, debounce: Duration) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<AutosaveRequest>();

        let handle = tokio::spawn(async move {
            while let Some(mut pending) = rx.recv().await {
                // Keep replacing the pending snapshot until the channel
                // stays quiet for the full debounce window.
                loop {
                    tokio::select! {
                        next = rx.recv() => match next {
                            Some(request) => pending = request,
                            None => break,
                        },
                        _ = tokio::time::sleep(debounce) => break,
                    }
                }

                if let Err(e) = db
                    .autosave_portfolio(
                        pending.user_id,
                        AUTOSAVE_NAME,
                        &pending.formation,
                        &pending.holdings,
                    )
                    .await
                {
                    log::error!("Autosave failed for user {}: {}", pending.user_id, e);
                }
            }
        });

        Self { tx, handle }
    }

    /// Queue a snapshot, resetting the quiet-period timer. Cheap enough
    /// to call on every mutation; the actual write is debounced.
    pub fn schedule(&self, request: AutosaveRequest) {
        if self.tx.send(request).is_err() {
            log::warn!("Autosave task is gone; snapshot dropped");
        }
    }

    /// Stop the task. A snapshot still inside its quiet period is
    /// discarded. Also runs on drop.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for Autosaver {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
