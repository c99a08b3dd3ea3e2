// fast_log installs a process-wide backend, so this test gets its own binary.
use log::LevelFilter;
use micro_navigator::adapters::outbound::init_file_logger;
use micro_navigator::domains::logger::DomainLogger;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_flush_writes_every_report_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("logs").join("navigator.log");
    let logger = init_file_logger(path.to_str().unwrap(), LevelFilter::Info).unwrap();

    const LINES: usize = 200;
    for i in 0..LINES {
        logger.info(&format!("scenario-report {}", i));
    }
    log::debug!("scenario-report below level");
    logger.flush();

    let content = fs::read_to_string(&path).unwrap();
    let written = content
        .lines()
        .filter(|line| line.contains("scenario-report"))
        .count();
    assert_eq!(written, LINES);
    assert!(content.contains("scenario-report 199"));
}
