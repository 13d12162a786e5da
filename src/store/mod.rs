//! Process-wide repositories (C2): Profile, Sysmon, and Windows audit
//! configuration storage behind `RwLock`, plus a monotonic conversion
//! history store. Reader-preferring in spirit: lookups take a read guard;
//! administrative writes take a single short-lived write guard, and the
//! `is_default`/`is_active` toggles happen inside that one guard so two
//! concurrent writers can never leave two records both marked default.

mod audit_store;
mod history_store;
mod profile_store;
mod sysmon_store;

pub use audit_store::AuditStore;
pub use history_store::HistoryStore;
pub use profile_store::ProfileStore;
pub use sysmon_store::SysmonStore;
