//! **A bidirectional translator between Sigma detection rules and Splunk
//! SPL searches.**
//!
//! `sigma-translate` parses Sigma YAML rules and compiles their condition
//! expressions into a normalized boolean query, resolves field names
//! against a configurable mapping profile (with a built-in CIM fallback),
//! and emits an equivalent SPL search. It also runs in reverse: a
//! restricted subset of SPL can be recognized back into best-effort Sigma
//! YAML. Alongside translation, it analyzes what telemetry a rule actually
//! requires (Sysmon event IDs, Windows audit subcategories) and reports
//! gaps where a Sigma field has no confident mapping.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: The Sigma rule AST, the normalized query AST, field
//!   mapping profiles, Sysmon/Windows audit configuration state, and the
//!   cross-component result types.
//! - **[`parser`]**: Sigma YAML loading and the field-modifier/condition
//!   sub-parsers ([`parser::parse_sigma_yaml`]).
//! - **[`resolver`]**: Layered field resolution (profile mapping -> CIM
//!   table -> built-in defaults -> identity fallback).
//! - **[`compiler`]**: Compiles a rule's condition expression into a
//!   normalized `Query`, folding Sigma field modifiers along the way.
//! - **[`emitter`]**: Renders a compiled `Query` to SPL text.
//! - **[`prereq`]**: Computes the Sysmon/Windows-native log sources a rule
//!   needs.
//! - **[`gaps`]**: Surfaces unresolved or heuristically-resolved fields.
//! - **[`coverage`]**: Compares a rule's requirements against the active
//!   Sysmon/audit configuration.
//! - **[`recognizer`]**: Parses a restricted SPL subset back into Sigma.
//! - **[`store`]**: Process-wide Profile/Sysmon/audit/history repositories.
//! - **[`orchestrator`]**: The three library entry points —
//!   [`orchestrator::Orchestrator::sigma_to_spl`],
//!   [`orchestrator::Orchestrator::spl_to_sigma`],
//!   [`orchestrator::Orchestrator::text_to_sigma`] — wiring the rest of
//!   the crate together.
//! - **[`llm`]**: The optional LLM collaborator contract for `text_to_sigma`.
//! - **[`reports`]**: JSON/YAML/summary rendering of a conversion result.
//! - **[`config`]**: Application configuration (logging, store seeding,
//!   emitter defaults).
//! - **[`cli`]**: The `clap`-derived command-line surface.
//!
//! ## Getting Started
//!
//! ```no_run
//! use sigma_translate::store::{AuditStore, HistoryStore, ProfileStore, SysmonStore};
//! use sigma_translate::orchestrator::Orchestrator;
//! use sigma_translate::emitter::EmitOptions;
//! use sigma_translate::model::Profile;
//!
//! let profiles = ProfileStore::new();
//! let profile = profiles.create(Profile::new("default")).unwrap();
//! let sysmon = SysmonStore::new();
//! let audit = AuditStore::new();
//! let history = HistoryStore::new();
//! let orchestrator = Orchestrator::new(&profiles, &sysmon, &audit, &history);
//!
//! let yaml = "title: Suspicious whoami\nlogsource:\n  category: process_creation\ndetection:\n  selection:\n    CommandLine|contains: whoami\n  condition: selection\n";
//! let response = orchestrator.sigma_to_spl(yaml, Some(profile.id), &EmitOptions::default()).unwrap();
//! println!("{}", response.output_spl.unwrap());
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod cli;
pub mod compiler;
pub mod config;
pub mod coverage;
pub mod emitter;
pub mod error;
pub mod gaps;
pub mod llm;
pub mod model;
pub mod orchestrator;
pub mod parser;
pub mod prereq;
pub mod recognizer;
pub mod reports;
pub mod resolver;
pub mod store;

// Re-export the most commonly used types for convenience.
pub use config::{AppConfig, AppConfigBuilder};
pub use error::{Error, ErrorContext, OptionContext, Result};
pub use model::{ConversionResponse, LogSource, Profile, Query, SigmaRule};
pub use orchestrator::Orchestrator;
pub use reports::{create_reporter, ReportFormat, ReportGenerator};
