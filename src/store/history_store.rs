//! Conversion history repository (C2): every orchestrator entry point
//! records its result here before returning it, assigning a monotonically
//! increasing id.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::model::ConversionRecord;

pub struct HistoryStore {
    next_id: AtomicU64,
    records: RwLock<Vec<ConversionRecord>>,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            records: RwLock::new(Vec::new()),
        }
    }

    /// Assign the next id and persist `record`, returning the stamped copy.
    pub fn record(&self, mut record: ConversionRecord) -> ConversionRecord {
        record.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.records.write().expect("lock poisoned").push(record.clone());
        record
    }

    #[must_use]
    pub fn list(&self) -> Vec<ConversionRecord> {
        self.records.read().expect("lock poisoned").clone()
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<ConversionRecord> {
        self.records.read().expect("lock poisoned").iter().find(|r| r.id == id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConversionType;
    use chrono::Utc;

    fn blank_record() -> ConversionRecord {
        ConversionRecord {
            id: 0,
            name: "test".to_string(),
            conversion_type: ConversionType::SigmaToSpl,
            profile_id: None,
            input_content: String::new(),
            output_sigma: None,
            output_spl: None,
            prerequisites: crate::model::PrerequisiteReport {
                required_logs: Vec::new(),
                event_ids: Vec::new(),
                channels: Vec::new(),
                configuration: Vec::new(),
                has_alternatives: false,
            },
            mappings: Vec::new(),
            gaps: Vec::new(),
            health_checks: Vec::new(),
            correlation_notes: Vec::new(),
            llm_used: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn ids_are_assigned_monotonically() {
        let store = HistoryStore::new();
        let a = store.record(blank_record());
        let b = store.record(blank_record());
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[test]
    fn get_finds_a_recorded_conversion() {
        let store = HistoryStore::new();
        let a = store.record(blank_record());
        assert_eq!(store.get(a.id).unwrap().id, a.id);
        assert!(store.get(999).is_none());
    }
}
