use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use linelog_ringlog::SharedLog;
use tokio::time::{self, MissedTickBehavior};
use tracing::trace;

use crate::shutdown::Shutdown;

/// Format of an injected timestamp record, RFC 2822 style.
const TIMESTAMP_FORMAT: &str = "timestamp:%a, %d %b %Y %H:%M:%S %z\n";

/// Append a timestamp record every `period` until shutdown is signalled.
///
/// The first record lands one full period after start; the shutdown signal
/// wins over a pending tick.
pub(crate) async fn run(log: SharedLog, period: Duration, shutdown: Arc<Shutdown>) {
    let mut ticks = time::interval_at(time::Instant::now() + period, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = shutdown.wait() => break,
            _ = ticks.tick() => {
                let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
                trace!("appending timestamp record");
                log.append_record(stamp.into_bytes());
            }
        }
    }
}
