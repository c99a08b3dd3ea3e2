use crate::domains::navigation::{FieldParams, Footprint};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Field gains; the `[planner]` table.
pub type PlannerConfig = FieldParams;
/// Default robot footprint; the `[robot]` table.
pub type RobotConfig = Footprint;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub planner: PlannerConfig,
    pub robot: RobotConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Batch evaluation results and renders go here.
    pub directory: PathBuf,
    /// Single run: the loaded map without a path.
    pub map_svg: PathBuf,
    pub path_csv: PathBuf,
    pub path_svg: PathBuf,
    /// Render an SVG for every successful evaluation scenario.
    pub render_successful: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("evaluation"),
            map_svg: PathBuf::from("map_output.svg"),
            path_csv: PathBuf::from("path_output.csv"),
            path_svg: PathBuf::from("path_output.svg"),
            render_successful: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Report file written through fast_log; console only when unset.
    pub file: Option<String>,
    pub level: String,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub tracing_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
            tracing_filter: "warn".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Unknown level names fall back to `Info`.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Reads `path` when given, otherwise returns the defaults.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path).await,
            None => Ok(Self::default()),
        }
    }
}
