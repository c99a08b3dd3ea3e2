use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use micro_navigator::adapters::outbound::{init_logger, init_tracing, FilesystemGridSource};
use micro_navigator::application::{
    default_scenarios, load_scenarios, NavigationService, PerformanceEvaluator,
};
use micro_navigator::Config;

/// Run the planner over a batch of scenarios and save comparable results.
#[derive(Debug, Parser)]
#[command(name = "run-evaluation", version)]
struct Cli {
    /// TOML file of [[scenario]] tables; the bundled scenario list when omitted
    #[arg(long)]
    scenarios: Option<PathBuf>,

    /// Results directory (overrides [output].directory)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Configuration file; ./config.toml is used when present
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .or_else(|| Path::new("config.toml").exists().then(|| PathBuf::from("config.toml")));
    let config = Config::load_or_default(config_path.as_deref()).await?;

    let logger = init_logger(&config.logging);
    init_tracing(&config.logging.tracing_filter);

    let scenarios = match &cli.scenarios {
        Some(path) => load_scenarios(path).await?,
        None => default_scenarios(),
    };
    let output_dir = cli.output.unwrap_or(config.output.directory);

    let rule = "=".repeat(70);
    logger.info("");
    logger.info(&rule);
    logger.info(" MICRO-NAVIGATOR PERFORMANCE EVALUATION");
    logger.info(&rule);
    logger.info(&format!("Total scenarios to evaluate: {}", scenarios.len()));
    logger.info(&rule);

    let service = NavigationService::new(
        Arc::new(FilesystemGridSource::new(None)),
        config.planner,
        logger.clone(),
    );
    let mut evaluator = PerformanceEvaluator::new(service, config.robot);
    if config.output.render_successful {
        evaluator = evaluator.with_render_dir(&output_dir);
    }

    evaluator.run_all(&scenarios);

    logger.info("");
    logger.info_block(&evaluator.comparison_table());
    logger.info("");
    match evaluator.summary_statistics() {
        Some(summary) => logger.info_block(&summary.to_string()),
        None => logger.info("No results to summarize."),
    }

    evaluator.save_results(&output_dir)?;

    logger.info("");
    logger.info(&rule);
    logger.info(" EVALUATION COMPLETE");
    logger.info(&rule);
    logger.flush();

    Ok(())
}
