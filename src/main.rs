//! sigma-translate: bidirectional Sigma <-> Splunk SPL detection rule
//! translator.

use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sigma_translate::cli::{AppState, Cli, Commands};
use sigma_translate::config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (file_config, _path) = config::load_or_default(None);
    let log_level = if cli.verbose { "debug" } else { file_config.logging.level.as_str() };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let state = AppState::new();

    match cli.command {
        Commands::Convert(command) => sigma_translate::cli::run_convert(&state, command, &cli.format),
        Commands::Profile(command) => sigma_translate::cli::run_profile(&state, command),
        Commands::Sysmon(command) => sigma_translate::cli::run_sysmon(&state, command),
        Commands::Audit(command) => sigma_translate::cli::run_audit(&state, command),

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "sigma-translate", &mut io::stdout());
            Ok(())
        }

        Commands::ConfigSchema { output } => {
            let schema = serde_json::to_string_pretty(&config::generate_json_schema())?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)?;
                    eprintln!("schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
            Ok(())
        }
    }
}
