//! `audit` subcommand handler.

use clap::Subcommand;
use uuid::Uuid;

use super::AppState;

#[derive(Subcommand)]
pub enum AuditCommands {
    /// List every known Windows audit-policy configuration.
    List,

    /// Show one audit-policy configuration in full.
    Show { id: Uuid },

    /// Make an audit-policy configuration the active one.
    Activate { id: Uuid },
}

pub fn run(state: &AppState, command: AuditCommands) -> anyhow::Result<()> {
    match command {
        AuditCommands::List => {
            for c in state.audit.list() {
                let marker = if c.is_active { " (active)" } else { "" };
                println!("{}\t{}{}", c.id, c.name, marker);
            }
        }
        AuditCommands::Show { id } => {
            let config = state.audit.get(id)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        AuditCommands::Activate { id } => {
            state.audit.activate(id)?;
            println!("{id} is now the active audit configuration");
        }
    }
    Ok(())
}
