use super::console_logger::init_console_logger;
use super::file_logger::init_file_logger;
use crate::config::LoggingConfig;
use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

/// Forwards every report to each sink in order.
pub struct MultiLogger {
    sinks: Vec<DynLogger>,
}

impl MultiLogger {
    pub fn new(sinks: Vec<DynLogger>) -> Self {
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        for sink in &self.sinks {
            sink.info(msg);
        }
    }

    fn warn(&self, msg: &str) {
        for sink in &self.sinks {
            sink.warn(msg);
        }
    }

    fn error(&self, msg: &str) {
        for sink in &self.sinks {
            sink.error(msg);
        }
    }

    fn flush(&self) {
        for sink in &self.sinks {
            sink.flush();
        }
    }
}

/// Console plus file logger at `path`; console alone if the file logger cannot start.
pub fn init_combined_logger(path: &str, level: log::LevelFilter) -> DynLogger {
    let console = init_console_logger();
    match init_file_logger(path, level) {
        Ok(file) => Arc::new(MultiLogger::new(vec![console, file])),
        Err(e) => {
            console.warn(&format!("{}; reporting to console only", e));
            console
        }
    }
}

/// Report sink selected by the `[logging]` table.
pub fn init_logger(config: &LoggingConfig) -> DynLogger {
    match &config.file {
        Some(path) => init_combined_logger(path, config.level_filter()),
        None => init_console_logger(),
    }
}
