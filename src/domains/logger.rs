use chrono::Utc;
use log::{error as log_error, info as log_info, warn as log_warn, LevelFilter};
use std::sync::Arc;

/// Reporting port for planning runs (progress lines, statistics summaries).
/// Infallible from the caller's side; adapters swallow their own I/O errors.
pub trait DomainLogger: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);

    /// Multi-line blocks such as statistics summaries, one call per line.
    fn info_block(&self, block: &str) {
        for line in block.lines() {
            self.info(line);
        }
    }

    /// Block until buffered reports are written. Call before the process exits.
    fn flush(&self) {}
}

pub type DynLogger = Arc<dyn DomainLogger>;

/// Report sink backed by `fast_log`, writing through the `log` facade.
pub struct FileLogger;

impl FileLogger {
    /// Install `fast_log` as the global `log` backend, appending to `path`.
    /// Fails if another `log` backend is already installed.
    pub fn init(path: &str, level: LevelFilter) -> Result<(), Box<dyn std::error::Error>> {
        fast_log::init(fast_log::config::Config::new().file(path).level(level))?;
        Ok(())
    }
}

impl DomainLogger for FileLogger {
    fn info(&self, msg: &str) {
        log_info!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn warn(&self, msg: &str) {
        log_warn!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn error(&self, msg: &str) {
        log_error!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    /// fast_log writes on a background thread; this waits for it to drain.
    fn flush(&self) {
        log::logger().flush();
    }
}
