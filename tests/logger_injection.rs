use micro_navigator::adapters::outbound::{init_noop_logger, FilesystemGridSource, MultiLogger};
use micro_navigator::application::NavigationService;
use micro_navigator::domains::logger::{DomainLogger, DynLogger};
use micro_navigator::domains::navigation::{FieldParams, Footprint};
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

struct BridgeCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl BridgeCapture {
    fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl DomainLogger for BridgeCapture {
    fn info(&self, msg: &str) {
        self.messages.lock().unwrap().push(format!("INFO:{}", msg));
    }
    fn warn(&self, msg: &str) {
        self.messages.lock().unwrap().push(format!("WARN:{}", msg));
    }
    fn error(&self, msg: &str) {
        self.messages.lock().unwrap().push(format!("ERR:{}", msg));
    }
}

#[test]
fn test_multi_logger_forwards_to_every_sink() {
    let first = Arc::new(BridgeCapture::new());
    let second = Arc::new(BridgeCapture::new());
    let multi = MultiLogger::new(vec![
        first.clone() as DynLogger,
        second.clone() as DynLogger,
        init_noop_logger(),
    ]);
    assert_eq!(multi.len(), 3);

    multi.info("one");
    multi.warn("two");
    multi.error("three");
    multi.info_block("a\nb");

    for capture in [&first, &second] {
        let msgs = capture.messages.lock().unwrap();
        assert_eq!(
            *msgs,
            vec!["INFO:one", "WARN:two", "ERR:three", "INFO:a", "INFO:b"]
        );
    }
}

#[test]
fn test_service_reports_through_injected_logger() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("walled.txt"), "2 0 0\n1 1 1\n0 0 3\n").unwrap();

    let capture = Arc::new(BridgeCapture::new());
    let service = NavigationService::new(
        Arc::new(FilesystemGridSource::new(Some(dir.path().to_path_buf()))),
        FieldParams::default(),
        capture.clone() as DynLogger,
    );

    let outcome = service.plan_map("walled.txt", Footprint::new(1, 1)).unwrap();
    assert!(!outcome.success());

    let msgs = capture.messages.lock().unwrap();
    assert!(msgs.iter().any(|m| m == "INFO:Computing potential field..."));
    assert!(msgs
        .iter()
        .any(|m| m.starts_with("WARN:Path did not reach goal (gradient descent")));
}
