use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global tracing subscriber.
///
/// The filter comes from `RUST_LOG`, defaulting to `info`. Records emitted
/// through the `log` facade (the store crate) are picked up by the
/// subscriber's log bridge.
pub fn configure_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let format = tracing_subscriber::fmt::layer().with_target(false).compact();

    tracing_subscriber::registry().with(filter).with(format).init();
}
