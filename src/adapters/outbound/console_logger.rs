use crate::domains::logger::{DomainLogger, DynLogger};
use std::io::Write;
use std::sync::Arc;

/// Progress and summaries on stdout, warnings and errors on stderr.
pub struct ConsoleLogger;

impl DomainLogger for ConsoleLogger {
    fn info(&self, msg: &str) {
        println!("{}", msg);
    }

    fn warn(&self, msg: &str) {
        eprintln!("WARN: {}", msg);
    }

    fn error(&self, msg: &str) {
        eprintln!("ERROR: {}", msg);
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

pub fn init_console_logger() -> DynLogger {
    Arc::new(ConsoleLogger)
}
