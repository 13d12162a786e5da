//! `profile` subcommand handler: CRUD over the profile store.

use clap::Subcommand;
use uuid::Uuid;

use crate::model::{Mapping, Profile};

use super::AppState;

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// List every profile.
    List,

    /// Show one profile in full.
    Show { id: Uuid },

    /// Create a new profile.
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// Update a profile's description.
    Update {
        id: Uuid,
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a profile.
    Delete { id: Uuid },

    /// Make a profile the default.
    SetDefault { id: Uuid },

    /// Add a single mapping rule to a profile.
    AddMapping {
        id: Uuid,
        sigma_field: String,
        target_field: String,
        #[arg(long)]
        transform: Option<String>,
    },

    /// Remove a profile's mapping for one Sigma field.
    RemoveMapping { id: Uuid, sigma_field: String },

    /// Replace every mapping rule on a profile from a JSON file
    /// (`[{"sigma_field": ..., "target_field": ...}, ...]`).
    ReplaceMappings { id: Uuid, file: std::path::PathBuf },

    /// Merge mapping rules from a JSON file into a profile, overwriting any
    /// existing rule with the same `sigma_field`.
    ImportMappings { id: Uuid, file: std::path::PathBuf },

    /// Suggest CIM-standard target fields for a list of Sigma fields.
    Suggest { id: Uuid, sigma_fields: Vec<String> },
}

pub fn run(state: &AppState, command: ProfileCommands) -> anyhow::Result<()> {
    match command {
        ProfileCommands::List => {
            for p in state.profiles.list() {
                let marker = if p.is_default { " (default)" } else { "" };
                println!("{}\t{}{}", p.id, p.name, marker);
            }
        }
        ProfileCommands::Show { id } => {
            let profile = state.profiles.get(id)?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        ProfileCommands::Create { name, description } => {
            let mut profile = Profile::new(name);
            profile.description = description;
            let created = state.profiles.create(profile)?;
            println!("created profile {}", created.id);
        }
        ProfileCommands::Update { id, description } => {
            let mut profile = state.profiles.get(id)?;
            if description.is_some() {
                profile.description = description;
            }
            state.profiles.update(profile)?;
            println!("updated profile {id}");
        }
        ProfileCommands::Delete { id } => {
            state.profiles.delete(id)?;
            println!("deleted profile {id}");
        }
        ProfileCommands::SetDefault { id } => {
            state.profiles.set_default(id)?;
            println!("{id} is now the default profile");
        }
        ProfileCommands::AddMapping {
            id,
            sigma_field,
            target_field,
            transform,
        } => {
            let mut mapping = Mapping::new(sigma_field, target_field);
            if let Some(transform) = transform {
                mapping = mapping.with_transform(transform);
            }
            state.profiles.add_mapping(id, mapping)?;
            println!("mapping added to profile {id}");
        }
        ProfileCommands::RemoveMapping { id, sigma_field } => {
            state.profiles.remove_mapping(id, &sigma_field)?;
            println!("mapping for '{sigma_field}' removed from profile {id}");
        }
        ProfileCommands::ReplaceMappings { id, file } => {
            let mappings: Vec<Mapping> = serde_json::from_str(&std::fs::read_to_string(file)?)?;
            let count = mappings.len();
            state.profiles.replace_mappings(id, mappings)?;
            println!("profile {id} now has {count} mapping(s)");
        }
        ProfileCommands::ImportMappings { id, file } => {
            let mappings: Vec<Mapping> = serde_json::from_str(&std::fs::read_to_string(file)?)?;
            let updated = state.profiles.import_mappings(id, mappings)?;
            println!("profile {id} now has {} mapping(s)", updated.mappings.len());
        }
        ProfileCommands::Suggest { id, sigma_fields } => {
            let suggestions = state.profiles.suggest(id, &sigma_fields)?;
            println!("{}", serde_json::to_string_pretty(&suggestions)?);
        }
    }
    Ok(())
}
