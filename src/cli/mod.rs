//! CLI surface: `convert`, `profile`, `sysmon`, `audit`, `completions`, and
//! `config-schema` subcommands, each a thin wrapper over the orchestrator
//! and stores.

mod audit;
mod convert;
mod profile;
mod sysmon;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

pub use audit::{run as run_audit, AuditCommands};
pub use convert::{run as run_convert, ConvertCommands};
pub use profile::{run as run_profile, ProfileCommands};
pub use sysmon::{run as run_sysmon, SysmonCommands};

use crate::llm::NullLlmAdapter;
use crate::orchestrator::Orchestrator;
use crate::store::{AuditStore, HistoryStore, ProfileStore, SysmonStore};

/// The process-wide state a CLI invocation operates against: the four
/// stores plus whichever LLM adapter is configured (none, by default).
pub struct AppState {
    pub profiles: ProfileStore,
    pub sysmon: SysmonStore,
    pub audit: AuditStore,
    pub history: HistoryStore,
    pub llm: NullLlmAdapter,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            profiles: ProfileStore::new(),
            sysmon: SysmonStore::new(),
            audit: AuditStore::new(),
            history: HistoryStore::new(),
            llm: NullLlmAdapter,
        }
    }

    #[must_use]
    pub fn orchestrator(&self) -> Orchestrator<'_> {
        Orchestrator::new(&self.profiles, &self.sysmon, &self.audit, &self.history).with_llm(&self.llm)
    }
}

#[derive(Parser)]
#[command(name = "sigma-translate")]
#[command(author = "Binarly.io")]
#[command(version)]
#[command(about = "Bidirectional Sigma <-> Splunk SPL detection rule translator", long_about = None)]
pub struct Cli {
    /// Enable debug-level logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for commands that render a conversion result.
    #[arg(long, global = true, default_value = "summary")]
    pub format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate between Sigma and SPL.
    #[command(subcommand)]
    Convert(ConvertCommands),

    /// Manage field-mapping profiles.
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Manage Sysmon configuration state.
    #[command(subcommand)]
    Sysmon(SysmonCommands),

    /// Manage Windows audit-policy configuration state.
    #[command(subcommand)]
    Audit(AuditCommands),

    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate the JSON Schema for the config file format.
    ConfigSchema {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
