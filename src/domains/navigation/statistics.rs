use super::extractor::path_cost;
use super::grid::{Grid, Position};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::time::{Duration, Instant};

const RULE_WIDTH: usize = 50;

/// Statistics gathered over one planning run.
#[derive(Debug, Clone, Default)]
pub struct PlanningStatistics {
    started: Option<Instant>,
    pub planning_time: Duration,
    pub nodes_explored: usize,
    pub path_length: usize,
    pub path_cost: f64,
    pub success: bool,
    pub failure_reason: Option<String>,
    /// (rows, cols)
    pub map_size: (usize, usize),
    pub num_obstacles: usize,
    /// (height, width)
    pub robot_size: (usize, usize),
}

/// Flat, serializable view of [`PlanningStatistics`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsRecord {
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

impl PlanningStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn start_timer(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Records the time since [`start_timer`](Self::start_timer). No-op if the timer never started.
    pub fn stop_timer(&mut self) {
        if let Some(started) = self.started.take() {
            self.planning_time = started.elapsed();
        }
    }

    pub fn planning_time_ms(&self) -> f64 {
        self.planning_time.as_secs_f64() * 1000.0
    }

    /// Map dimensions and obstacle count, taken from the grid before inflation.
    pub fn set_map_info(&mut self, grid: &Grid, robot_width: usize, robot_height: usize) {
        self.map_size = (grid.rows(), grid.cols());
        self.num_obstacles = grid.obstacle_count();
        self.robot_size = (robot_height, robot_width);
    }

    pub fn set_path_info(&mut self, path: &[Position]) {
        self.path_length = path.len();
        self.path_cost = path_cost(path);
    }

    pub fn set_success(&mut self, success: bool, failure_reason: Option<String>) {
        self.success = success;
        self.failure_reason = failure_reason;
    }

    pub fn add_nodes_explored(&mut self, nodes: usize) {
        self.nodes_explored += nodes;
    }

    pub fn average_step_cost(&self) -> Option<f64> {
        (self.path_length > 0).then(|| self.path_cost / self.path_length as f64)
    }

    /// Human-readable report.
    pub fn summary(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();

        // Writing into a String cannot fail
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "PLANNING STATISTICS");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Status: {}", if self.success { "SUCCESS" } else { "FAILED" });
        if !self.success {
            if let Some(reason) = &self.failure_reason {
                let _ = writeln!(out, "Failure Reason: {reason}");
            }
        }

        let (rows, cols) = self.map_size;
        let (height, width) = self.robot_size;
        let _ = writeln!(out);
        let _ = writeln!(out, "Map Information:");
        let _ = writeln!(out, "  - Map Size: {rows} x {cols} = {} cells", rows * cols);
        let _ = writeln!(out, "  - Number of Obstacles: {}", self.num_obstacles);
        let _ = writeln!(out, "  - Robot Size: {height} x {width} cells");

        let _ = writeln!(out);
        let _ = writeln!(out, "Planning Performance:");
        let _ = writeln!(out, "  - Planning Time: {:.2} ms", self.planning_time_ms());
        let _ = writeln!(out, "  - Nodes Explored: {}", self.nodes_explored);

        if self.success {
            let _ = writeln!(out);
            let _ = writeln!(out, "Path Quality:");
            let _ = writeln!(out, "  - Path Length: {} steps", self.path_length);
            let _ = writeln!(out, "  - Path Cost: {:.2} units", self.path_cost);
            if let Some(avg) = self.average_step_cost() {
                let _ = writeln!(out, "  - Average Step Cost: {avg:.2} units");
            }
        }

        out.push_str(&rule);
        out
    }

    pub fn to_record(&self) -> StatisticsRecord {
        StatisticsRecord {
            success: self.success,
            failure_reason: self.failure_reason.clone(),
            planning_time_ms: self.planning_time_ms(),
            map_rows: self.map_size.0,
            map_cols: self.map_size.1,
            num_obstacles: self.num_obstacles,
            robot_width: self.robot_size.1,
            robot_height: self.robot_size.0,
            nodes_explored: self.nodes_explored,
            path_length: self.path_length,
            path_cost: self.path_cost,
        }
    }
}
