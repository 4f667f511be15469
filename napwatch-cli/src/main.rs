use clap::Parser;
use colored::Colorize;

use napwatch_cli::cli::{Cli, Commands, ConfigAction};
use napwatch_cli::error::CliError;
use napwatch_cli::output::OutputWriter;
use napwatch_cli::{commands, load_config, logging};
use napwatch_core::config::NapwatchConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // `config validate` reports a broken file instead of failing on it.
    let mut config = match &cli.command {
        Commands::Config(args) if matches!(args.action, ConfigAction::Validate) => {
            NapwatchConfig::default()
        }
        _ => load_config(&cli.config).await?,
    };
    if let Some(level) = cli.log_level {
        config.general.log_level = level;
        config.validate()?;
    }

    logging::init_tracing(&config.general)?;
    napwatch_core::metrics::describe_all();
    tracing::debug!(config = %cli.config.display(), "napwatch starting");

    let writer = OutputWriter::new(cli.output);
    match cli.command {
        Commands::Process(args) => commands::process::execute(args, &config, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    }
}
