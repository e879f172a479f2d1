//! Polling scheduler: the eventual-consistency fallback when the push
//! channel is down.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tracing::debug;

use crate::synchronizer::Synchronizer;

/// Run the polling loop for a synchronizer.
///
/// Refreshes immediately, then on every interval tick. The loop selects
/// on the teardown signal, so the timer never fires into a torn-down
/// synchronizer. Refresh failures are already soft-recorded by the
/// engine; the loop just keeps ticking.
pub async fn run(sync: Arc<Synchronizer>, interval: Duration) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = sync.closed() => break,
            _ = ticker.tick() => {
                let _ = sync.refresh().await;
            }
        }
    }

    debug!(scope = %sync.scope().cache_key(), "Polling loop stopped");
}
