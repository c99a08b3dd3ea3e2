use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber, filtered by `RUST_LOG` or `default_filter`.
///
/// Only the tracing dispatcher is set; the `log` facade stays free for the
/// fast_log report file. A subscriber that is already set is kept.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
