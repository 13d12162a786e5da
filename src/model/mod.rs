//! Data model shared across every component: the Sigma AST (C1), the
//! normalized Query AST (C4), field-mapping profiles (C2), Sysmon/Windows
//! audit configuration state (C8), and the cross-component result types
//! returned by the orchestrator (C10).

mod audit;
mod condition;
mod conversion;
mod profile;
mod query;
mod sigma;
mod sysmon;

pub use audit::*;
pub use condition::*;
pub use conversion::*;
pub use profile::*;
pub use query::*;
pub use sigma::*;
pub use sysmon::*;
