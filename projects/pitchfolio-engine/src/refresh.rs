//! Timer-driven market refresh. The refresher owns a background task that
//! perturbs a shared [`MarketData`] on a fixed interval and hands the
//! refreshed state to a callback so callers can propagate prices into
//! their holdings. The task is aborted on shutdown or drop so no tick can
//! touch torn-down state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::market::MarketData;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Stand-in for network latency; there is no real I/O behind a refresh.
const SIMULATED_LATENCY: Duration = Duration::from_millis(1000);

pub struct MarketRefresher {
    handle: JoinHandle<()>,
}

impl MarketRefresher {
    /// Spawn the refresh loop. `on_refresh` runs after every tick while
    /// the market lock is held, with the freshly perturbed state.
    pub fn spawn<F>(market: Arc<Mutex<MarketData>>, interval: Duration, mut on_refresh: F) -> Self
    where
        F: FnMut(&MarketData) + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                tokio::time::sleep(SIMULATED_LATENCY).await;

                let mut market = market.lock().await;
                let mut rng = rand::thread_rng();
                let updated = market.refresh_all(&mut rng);
                log::debug!("market refresh updated {} quotes", updated);
                on_refresh(&market);
            }
        });
        Self { handle }
    }

    /// Stop the loop. Idempotent; also runs on drop.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for MarketRefresher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
