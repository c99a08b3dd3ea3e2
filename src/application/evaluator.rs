//! Batch evaluation of the planner over a list of map scenarios.

use super::navigation_service::NavigationService;
use crate::adapters::outbound::svg_render::{save_svg, SvgStyle};
use crate::common::ApplicationResult;
use crate::domains::navigation::{Footprint, PlanningStatistics};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const TABLE_WIDTH: usize = 100;
const BANNER_WIDTH: usize = 60;

/// One scenario to run. Missing robot dimensions use the evaluator's default footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    pub map_file: String,
    #[serde(default)]
    pub robot_width: Option<usize>,
    #[serde(default)]
    pub robot_height: Option<usize>,
}

impl ScenarioConfig {
    pub fn new(name: impl Into<String>, map_file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            map_file: map_file.into(),
            robot_width: None,
            robot_height: None,
        }
    }

    pub fn with_robot(mut self, width: usize, height: usize) -> Self {
        self.robot_width = Some(width);
        self.robot_height = Some(height);
        self
    }

    pub fn footprint(&self, default: Footprint) -> Footprint {
        Footprint::new(
            self.robot_width.unwrap_or(default.width),
            self.robot_height.unwrap_or(default.height),
        )
    }
}

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    #[serde(default, rename = "scenario")]
    scenarios: Vec<ScenarioConfig>,
}

/// Parse `[[scenario]]` tables.
pub fn parse_scenarios(content: &str) -> anyhow::Result<Vec<ScenarioConfig>> {
    let file: ScenarioFile = toml::from_str(content)?;
    Ok(file.scenarios)
}

pub async fn load_scenarios<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<ScenarioConfig>> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading scenarios {}", path.display()))?;
    parse_scenarios(&content).with_context(|| format!("parsing scenarios {}", path.display()))
}

/// Bundled maps: every map with a point robot, then the maze and cluttered maps with a 2x2 robot.
pub fn default_scenarios() -> Vec<ScenarioConfig> {
    vec![
        ScenarioConfig::new("Scenario 1: Simple", "scenario1_simple.txt").with_robot(1, 1),
        ScenarioConfig::new("Scenario 2: Corridor", "scenario2_corridor.txt").with_robot(1, 1),
        ScenarioConfig::new("Scenario 3: Maze", "scenario3_maze.txt").with_robot(1, 1),
        ScenarioConfig::new("Scenario 4: Cluttered", "scenario4_cluttered.txt").with_robot(1, 1),
        ScenarioConfig::new("Scenario 5: Narrow", "scenario5_narrow.txt").with_robot(1, 1),
        ScenarioConfig::new("Scenario 6: Large", "scenario6_large.txt").with_robot(1, 1),
        ScenarioConfig::new("Scenario 3: Maze (2x2 Robot)", "scenario3_maze.txt").with_robot(2, 2),
        ScenarioConfig::new("Scenario 4: Cluttered (2x2 Robot)", "scenario4_cluttered.txt")
            .with_robot(2, 2),
    ]
}

/// One row of the results files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub map_file: String,
    pub success: bool,
    pub failure_reason: Option<String>,
    pub planning_time_ms: f64,
    pub map_rows: usize,
    pub map_cols: usize,
    pub num_obstacles: usize,
    pub robot_width: usize,
    pub robot_height: usize,
    pub nodes_explored: usize,
    pub path_length: usize,
    pub path_cost: f64,
}

impl ScenarioResult {
    fn from_statistics(scenario: &ScenarioConfig, statistics: &PlanningStatistics) -> Self {
        let record = statistics.to_record();
        Self {
            scenario_name: scenario.name.clone(),
            map_file: scenario.map_file.clone(),
            success: record.success,
            failure_reason: record.failure_reason,
            planning_time_ms: record.planning_time_ms,
            map_rows: record.map_rows,
            map_cols: record.map_cols,
            num_obstacles: record.num_obstacles,
            robot_width: record.robot_width,
            robot_height: record.robot_height,
            nodes_explored: record.nodes_explored,
            path_length: record.path_length,
            path_cost: record.path_cost,
        }
    }
}

/// Aggregate over all results. Path averages use successful runs only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub total_scenarios: usize,
    pub successful: usize,
    pub failed: usize,
    /// Percent
    pub success_rate: f64,
    pub avg_planning_time_ms: f64,
    pub avg_nodes_explored: f64,
    pub avg_path_length: f64,
    pub avg_path_cost: f64,
}

impl fmt::Display for SummaryStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(BANNER_WIDTH);
        writeln!(f, "{rule}")?;
        writeln!(f, "OVERALL SUMMARY")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Total Scenarios: {}", self.total_scenarios)?;
        writeln!(f, "Successful: {}", self.successful)?;
        writeln!(f, "Failed: {}", self.failed)?;
        writeln!(f, "Success Rate: {:.1}%", self.success_rate)?;
        writeln!(f)?;
        writeln!(f, "Average Planning Time: {:.2} ms", self.avg_planning_time_ms)?;
        writeln!(f, "Average Nodes Explored: {:.1}", self.avg_nodes_explored)?;
        if self.successful > 0 {
            writeln!(f, "Average Path Length: {:.2} steps", self.avg_path_length)?;
            writeln!(f, "Average Path Cost: {:.2} units", self.avg_path_cost)?;
        }
        write!(f, "{rule}")
    }
}

pub struct PerformanceEvaluator {
    service: NavigationService,
    default_footprint: Footprint,
    render_dir: Option<PathBuf>,
    results: Vec<ScenarioResult>,
}

impl PerformanceEvaluator {
    pub fn new(service: NavigationService, default_footprint: Footprint) -> Self {
        Self {
            service,
            default_footprint,
            render_dir: None,
            results: Vec::new(),
        }
    }

    /// Render an SVG into `dir` for every successful scenario.
    pub fn with_render_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.render_dir = Some(dir.into());
        self
    }

    pub fn results(&self) -> &[ScenarioResult] {
        &self.results
    }

    /// Run one scenario and append its result.
    ///
    /// Map errors do not propagate: they become a failed result carrying the
    /// error text.
    pub fn run_scenario(&mut self, scenario: &ScenarioConfig) -> &ScenarioResult {
        let footprint = scenario.footprint(self.default_footprint);
        let logger = self.service.logger().clone();
        let rule = "=".repeat(BANNER_WIDTH);

        logger.info("");
        logger.info(&rule);
        logger.info(&format!("Running Scenario: {}", scenario.name));
        logger.info(&format!("Map File: {}", scenario.map_file));
        logger.info(&format!("Robot Size: {} x {}", footprint.height, footprint.width));
        logger.info(&rule);

        let statistics = match self.service.plan_map(&scenario.map_file, footprint) {
            Ok(outcome) => {
                if outcome.success() {
                    if let Some(dir) = &self.render_dir {
                        let file = dir.join(format!("{}_path.svg", file_stem(&scenario.name)));
                        let style = SvgStyle::default().with_title(scenario.name.clone());
                        match save_svg(&outcome.map, outcome.path(), &style, &file) {
                            Ok(()) => logger.info(&format!("Visualization saved: {}", file.display())),
                            Err(e) => logger.warn(&format!("Failed to render {}: {}", file.display(), e)),
                        }
                    }
                }
                outcome.statistics
            }
            Err(e) => {
                warn!(scenario = %scenario.name, error = %e, "scenario failed to load");
                logger.error(&e.to_string());
                let mut statistics = PlanningStatistics::new();
                statistics.set_success(false, Some(e.to_string()));
                statistics
            }
        };

        logger.info_block(&statistics.summary());
        let result = ScenarioResult::from_statistics(scenario, &statistics);
        info!(
            scenario = %result.scenario_name,
            success = result.success,
            nodes_explored = result.nodes_explored,
            "scenario finished"
        );
        self.results.push(result);
        &self.results[self.results.len() - 1]
    }

    /// Clear previous results, then run every scenario in order.
    pub fn run_all(&mut self, scenarios: &[ScenarioConfig]) {
        self.results.clear();
        for scenario in scenarios {
            self.run_scenario(scenario);
        }
    }

    /// Write `results.json` and, when there are results, `results.csv` into `dir`.
    pub fn save_results<P: AsRef<Path>>(&self, dir: P) -> ApplicationResult<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let json_file = dir.join("results.json");
        fs::write(&json_file, serde_json::to_string_pretty(&self.results)?)?;
        self.service
            .logger()
            .info(&format!("Results saved to: {}", json_file.display()));

        if !self.results.is_empty() {
            let csv_file = dir.join("results.csv");
            let mut out = csv::Writer::from_path(&csv_file)?;
            for result in &self.results {
                out.serialize(result)?;
            }
            out.flush()?;
            self.service
                .logger()
                .info(&format!("Results saved to: {}", csv_file.display()));
        }
        Ok(())
    }

    pub fn comparison_table(&self) -> String {
        if self.results.is_empty() {
            return "No results to display.".to_string();
        }

        let heavy = "=".repeat(TABLE_WIDTH);
        let mut lines = vec![
            heavy.clone(),
            "PERFORMANCE COMPARISON TABLE".to_string(),
            heavy.clone(),
            format!(
                "{:<25} {:<10} {:<12} {:<10} {:<12} {:<12}",
                "Scenario", "Status", "Time (ms)", "Nodes", "Path Len", "Path Cost"
            ),
            "-".repeat(TABLE_WIDTH),
        ];

        for result in &self.results {
            let status = if result.success { "SUCCESS" } else { "FAILED" };
            let (path_len, path_cost) = if result.success {
                (result.path_length.to_string(), format!("{:.2}", result.path_cost))
            } else {
                ("N/A".to_string(), "N/A".to_string())
            };
            lines.push(format!(
                "{:<25} {:<10} {:<12} {:<10} {:<12} {:<12}",
                result.scenario_name,
                status,
                format!("{:.2}", result.planning_time_ms),
                result.nodes_explored,
                path_len,
                path_cost
            ));
        }

        lines.push(heavy);
        lines.join("\n")
    }

    pub fn summary_statistics(&self) -> Option<SummaryStatistics> {
        if self.results.is_empty() {
            return None;
        }

        let total = self.results.len();
        let successes: Vec<&ScenarioResult> = self.results.iter().filter(|r| r.success).collect();
        let successful = successes.len();

        let avg_planning_time_ms =
            self.results.iter().map(|r| r.planning_time_ms).sum::<f64>() / total as f64;
        let avg_nodes_explored =
            self.results.iter().map(|r| r.nodes_explored as f64).sum::<f64>() / total as f64;
        let (avg_path_length, avg_path_cost) = if successful > 0 {
            (
                successes.iter().map(|r| r.path_length as f64).sum::<f64>() / successful as f64,
                successes.iter().map(|r| r.path_cost).sum::<f64>() / successful as f64,
            )
        } else {
            (0.0, 0.0)
        };

        Some(SummaryStatistics {
            total_scenarios: total,
            successful,
            failed: total - successful,
            success_rate: successful as f64 / total as f64 * 100.0,
            avg_planning_time_ms,
            avg_nodes_explored,
            avg_path_length,
            avg_path_cost,
        })
    }
}

/// Scenario name reduced to a file-name-safe stem.
fn file_stem(name: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            stem.push(ch.to_ascii_lowercase());
        } else if !stem.ends_with('_') {
            stem.push('_');
        }
    }
    stem.trim_matches('_').to_string()
}
