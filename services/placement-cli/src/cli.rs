use crate::demo::{run_demo, run_scenario, DemoArgs, ScenarioArgs};
use clap::{Parser, Subcommand};
use placement_engine::config::AppConfig;
use placement_engine::error::AppError;
use placement_engine::telemetry;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "Placement Automation",
    about = "Run campus placement drives, rankings, and offer policy from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk a seeded cohort through two drives and an offer round (default command)
    Demo(DemoArgs),
    /// Replay a scenario file and print the resulting rankings and summary as JSON
    Scenario(ScenarioArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    info!(
        ?config.environment,
        max_offers = config.placement.max_offers,
        dream_threshold = config.placement.dream_threshold,
        "placement cli ready"
    );

    let command = cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()));

    match command {
        Command::Demo(args) => run_demo(&config, args),
        Command::Scenario(args) => run_scenario(&config, args),
    }
}
