//! `convert` subcommand handler.

use std::io::Read;
use std::path::PathBuf;

use clap::Subcommand;
use uuid::Uuid;

use crate::emitter::EmitOptions;
use crate::reports::{create_reporter, ReportFormat};

use super::AppState;

#[derive(Subcommand)]
pub enum ConvertCommands {
    /// Translate a Sigma YAML rule into an SPL search.
    SigmaToSpl {
        /// Path to the Sigma YAML rule, or `-` for stdin.
        input: PathBuf,
        #[arg(long)]
        profile: Option<Uuid>,
        #[arg(long)]
        index: Option<String>,
        #[arg(long)]
        sourcetype: Option<String>,
    },

    /// Recognize a restricted SPL search back into best-effort Sigma YAML.
    SplToSigma {
        input: PathBuf,
        #[arg(long)]
        profile: Option<Uuid>,
    },

    /// Draft a Sigma rule from a free-text description via the configured
    /// LLM adapter.
    TextToSigma {
        input: PathBuf,
        #[arg(long)]
        profile: Option<Uuid>,
    },
}

pub fn run(state: &AppState, command: ConvertCommands, format: &str) -> anyhow::Result<()> {
    let reporter = create_reporter(ReportFormat::parse(format).unwrap_or(ReportFormat::Summary));

    let response = match command {
        ConvertCommands::SigmaToSpl {
            input,
            profile,
            index,
            sourcetype,
        } => {
            let yaml = read_input(&input)?;
            let options = EmitOptions {
                index,
                sourcetype,
                time_range: None,
            };
            state.orchestrator().sigma_to_spl(&yaml, profile, &options)?
        }
        ConvertCommands::SplToSigma { input, profile } => {
            let spl = read_input(&input)?;
            state.orchestrator().spl_to_sigma(&spl, profile)?
        }
        ConvertCommands::TextToSigma { input, profile } => {
            let text = read_input(&input)?;
            state.orchestrator().text_to_sigma(&text, profile)?
        }
    };

    println!("{}", reporter.generate(&response)?);
    Ok(())
}

fn read_input(path: &PathBuf) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}
