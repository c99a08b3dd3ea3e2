use crate::domains::logger::{DynLogger, FileLogger};
use log::LevelFilter;
use std::path::Path;
use std::sync::Arc;

/// Install fast_log appending to `path` and return the report sink writing to it.
///
/// The parent directory is created first. Only one `log` backend can be
/// installed per process, so a second call fails.
pub fn init_file_logger(path: &str, level: LevelFilter) -> Result<DynLogger, String> {
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create log directory {}: {}", parent.display(), e))?;
    }
    FileLogger::init(path, level).map_err(|e| format!("Failed to initialize fast_log: {}", e))?;
    Ok(Arc::new(FileLogger))
}
