//! `sysmon` subcommand handler.

use clap::Subcommand;
use uuid::Uuid;

use super::AppState;

#[derive(Subcommand)]
pub enum SysmonCommands {
    /// List every known Sysmon configuration.
    List,

    /// Show one Sysmon configuration in full.
    Show { id: Uuid },

    /// Make a Sysmon configuration the active one.
    Activate { id: Uuid },
}

pub fn run(state: &AppState, command: SysmonCommands) -> anyhow::Result<()> {
    match command {
        SysmonCommands::List => {
            for c in state.sysmon.list() {
                let marker = if c.is_active { " (active)" } else { "" };
                println!("{}\t{}\t{}{}", c.id, c.name, c.version, marker);
            }
        }
        SysmonCommands::Show { id } => {
            let config = state.sysmon.get(id)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        SysmonCommands::Activate { id } => {
            state.sysmon.activate(id)?;
            println!("{id} is now the active Sysmon configuration");
        }
    }
    Ok(())
}
