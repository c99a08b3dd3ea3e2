use micro_navigator::adapters::outbound::{init_noop_logger, FilesystemGridSource};
use micro_navigator::application::*;
use micro_navigator::domains::navigation::{FieldParams, Footprint};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

const CORRIDOR: &str = "\
1 1 1 1 1 1 1
1 1 1 1 1 1 1
2 0 0 0 0 0 3
1 1 1 1 1 1 1
1 1 1 1 1 1 1
";

const OPEN: &str = "\
2 0 0 0 0
0 0 0 0 0
0 0 0 0 0
0 0 0 0 0
0 0 0 0 3
";

fn map_dir() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("corridor.txt"), CORRIDOR).unwrap();
    fs::write(dir.path().join("open.txt"), OPEN).unwrap();
    dir
}

fn evaluator(maps: &Path) -> PerformanceEvaluator {
    let service = NavigationService::new(
        Arc::new(FilesystemGridSource::new(Some(maps.to_path_buf()))),
        FieldParams::default(),
        init_noop_logger(),
    );
    PerformanceEvaluator::new(service, Footprint::new(1, 1))
}

fn scenarios() -> Vec<ScenarioConfig> {
    vec![
        ScenarioConfig::new("Open", "open.txt"),
        ScenarioConfig::new("Corridor", "corridor.txt"),
        ScenarioConfig::new("Corridor wide", "corridor.txt").with_robot(3, 3),
        ScenarioConfig::new("Missing", "no_such_map.txt"),
    ]
}

#[cfg(test)]
mod evaluator_tests {
    use super::*;

    #[test]
    fn test_run_all_collects_one_result_per_scenario() {
        let maps = map_dir();
        let mut evaluator = evaluator(maps.path());
        evaluator.run_all(&scenarios());

        let results = evaluator.results();
        assert_eq!(results.len(), 4);

        let open = &results[0];
        assert!(open.success);
        assert_eq!(open.path_length, 5);
        assert_eq!(open.nodes_explored, 5);
        assert_eq!((open.robot_width, open.robot_height), (1, 1));

        let corridor = &results[1];
        assert!(corridor.success);
        assert_eq!(corridor.path_length, 7);
        assert_eq!(corridor.num_obstacles, 28);

        let wide = &results[2];
        assert!(!wide.success);
        assert_eq!((wide.robot_width, wide.robot_height), (3, 3));
        assert_eq!(wide.path_length, 0);
        assert!(wide
            .failure_reason
            .as_deref()
            .unwrap()
            .contains("no valid neighbors"));

        let missing = &results[3];
        assert!(!missing.success);
        assert!(missing.failure_reason.as_deref().unwrap().contains("no_such_map.txt"));
        assert_eq!((missing.map_rows, missing.map_cols), (0, 0));
    }

    #[test]
    fn test_run_all_clears_previous_results() {
        let maps = map_dir();
        let mut evaluator = evaluator(maps.path());
        evaluator.run_all(&scenarios());
        evaluator.run_all(&scenarios()[..1]);
        assert_eq!(evaluator.results().len(), 1);
    }

    #[test]
    fn test_summary_statistics() {
        let maps = map_dir();
        let mut evaluator = evaluator(maps.path());
        assert!(evaluator.summary_statistics().is_none());

        evaluator.run_all(&scenarios());
        let summary = evaluator.summary_statistics().unwrap();
        assert_eq!(summary.total_scenarios, 4);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 2);
        assert!((summary.success_rate - 50.0).abs() < 1e-9);
        assert!((summary.avg_path_length - 6.0).abs() < 1e-9);
        // (5 + 7 + 1 + 0) / 4
        assert!((summary.avg_nodes_explored - 3.25).abs() < 1e-9);

        let text = summary.to_string();
        assert!(text.contains("Success Rate: 50.0%"));
        assert!(text.contains("Average Path Length: 6.00 steps"));
    }

    #[test]
    fn test_comparison_table_marks_failures() {
        let maps = map_dir();
        let mut evaluator = evaluator(maps.path());
        assert_eq!(evaluator.comparison_table(), "No results to display.");

        evaluator.run_all(&scenarios());
        let table = evaluator.comparison_table();
        let header = table.lines().nth(3).unwrap();
        for column in ["Scenario", "Status", "Time (ms)", "Nodes", "Path Len", "Path Cost"] {
            assert!(header.contains(column));
        }

        let missing = table.lines().find(|l| l.starts_with("Missing")).unwrap();
        assert!(missing.contains("FAILED"));
        assert_eq!(missing.matches("N/A").count(), 2);

        let open = table.lines().find(|l| l.starts_with("Open")).unwrap();
        assert!(open.contains("SUCCESS"));
        assert!(open.contains("5.66"));
    }

    #[test]
    fn test_save_results_writes_json_and_csv() {
        let maps = map_dir();
        let out = tempdir().unwrap();
        let out_dir = out.path().join("evaluation");

        let mut evaluator = evaluator(maps.path());
        evaluator.run_all(&scenarios());
        evaluator.save_results(&out_dir).unwrap();

        let json = fs::read_to_string(out_dir.join("results.json")).unwrap();
        let parsed: Vec<ScenarioResult> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, evaluator.results());

        let mut reader = csv::Reader::from_path(out_dir.join("results.csv")).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "scenario_name");
        assert_eq!(headers.len(), 13);
        assert_eq!(reader.records().count(), 4);
    }

    #[test]
    fn test_save_without_results_skips_csv() {
        let maps = map_dir();
        let out = tempdir().unwrap();
        let evaluator = evaluator(maps.path());
        evaluator.save_results(out.path()).unwrap();

        assert_eq!(fs::read_to_string(out.path().join("results.json")).unwrap(), "[]");
        assert!(!out.path().join("results.csv").exists());
    }

    #[test]
    fn test_renders_successful_scenarios_only() {
        let maps = map_dir();
        let renders = tempdir().unwrap();
        let mut evaluator = evaluator(maps.path()).with_render_dir(renders.path());
        evaluator.run_all(&scenarios());

        assert!(renders.path().join("open_path.svg").exists());
        assert!(renders.path().join("corridor_path.svg").exists());
        assert!(!renders.path().join("corridor_wide_path.svg").exists());
        assert!(!renders.path().join("missing_path.svg").exists());
    }
}
