//! Setting up a log subscriber.

use tracing_subscriber::EnvFilter;

/// Setup logging of events reported by the codec.
///
/// Use the RUST_LOG environment variable to override the defaults.
///
/// E.g. To enable debug level logging:
///   RUST_LOG=DEBUG
///
/// Or to see every record the decoder reads:
///   RUST_LOG=dnswire::codec=TRACE
///
/// Calling this more than once is harmless; only the first call installs
/// a subscriber.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_thread_ids(true)
        .without_time()
        .try_init()
        .ok();
}
