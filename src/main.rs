use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use micro_navigator::adapters::outbound::{
    export_path, init_logger, init_tracing, save_svg, FilesystemGridSource, SvgStyle,
};
use micro_navigator::application::NavigationService;
use micro_navigator::domains::navigation::Footprint;
use micro_navigator::Config;

const DEFAULT_CONFIG: &str = "config.toml";

/// Plan a path for a rectangular robot on a single occupancy grid map.
#[derive(Debug, Parser)]
#[command(name = "micro-navigator", version)]
struct Cli {
    /// Map file name, resolved against NAVIGATOR_MAP_DIR (default ./resources/maps)
    #[arg(long, default_value = "example_map.txt")]
    map: String,

    /// Robot width in cells (overrides [robot] in the config)
    #[arg(long)]
    robot_width: Option<usize>,

    /// Robot height in cells (overrides [robot] in the config)
    #[arg(long)]
    robot_height: Option<usize>,

    /// Configuration file; ./config.toml is used when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path CSV output (overrides [output].path_csv)
    #[arg(long)]
    export: Option<PathBuf>,

    /// SVG render output (overrides [output].path_svg)
    #[arg(long)]
    render: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .or_else(|| Path::new(DEFAULT_CONFIG).exists().then(|| PathBuf::from(DEFAULT_CONFIG)));
    let config = Config::load_or_default(config_path.as_deref()).await?;

    let logger = init_logger(&config.logging);
    init_tracing(&config.logging.tracing_filter);
    info!(config = ?config_path, "configuration loaded");

    let rule = "=".repeat(60);
    logger.info("");
    logger.info(&rule);
    logger.info(" MICRO-NAVIGATOR - SINGLE SCENARIO RUN");
    logger.info(&rule);

    let footprint = Footprint::new(
        cli.robot_width.unwrap_or(config.robot.width),
        cli.robot_height.unwrap_or(config.robot.height),
    );
    let service = NavigationService::new(
        Arc::new(FilesystemGridSource::new(None)),
        config.planner,
        logger.clone(),
    );

    let loaded = service
        .load_map(&cli.map)
        .with_context(|| format!("loading map {}", cli.map))?;
    logger.info(&format!("Start: {}, Goal: {}", loaded.start, loaded.goal));
    logger.info(&format!(
        "Robot Size: {} x {} cells",
        footprint.height, footprint.width
    ));

    let style = SvgStyle::default().with_title(cli.map.clone());
    save_svg(&loaded.grid, &[], &style, &config.output.map_svg)?;
    logger.info(&format!("Map saved to {}", config.output.map_svg.display()));

    let outcome = service.plan(&loaded, footprint);

    let svg_file = cli.render.unwrap_or(config.output.path_svg);
    save_svg(&loaded.grid, outcome.path(), &style, &svg_file)?;
    logger.info(&format!("Path visualization saved to {}", svg_file.display()));

    let csv_file = cli.export.unwrap_or(config.output.path_csv);
    export_path(outcome.path(), &csv_file)?;
    logger.info(&format!("Path exported to {}", csv_file.display()));

    logger.info("");
    logger.info_block(&outcome.statistics.summary());
    logger.flush();

    Ok(())
}
