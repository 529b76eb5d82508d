//! Append-only audit trail store
//!
//! Every decision the engine takes lands here: who did what to what,
//! when, with what result. Entries are stamped at write time under the
//! write lock, so readers never observe a partially-written entry, and
//! the stored timestamp (not the event time) is the canonical order key.
//! Entries are never mutated or removed.

use crate::error::Result;
use crate::types::{AuditAction, AuditEntry, AuditOutcome};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fields supplied by the caller when appending; the store assigns
/// `entry_id`, `recorded_at` and `seq` itself.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    /// Caller identity
    pub actor: String,
    /// What was done
    pub action: AuditAction,
    /// Target entity reference
    pub target: String,
    /// Operation outcome
    pub outcome: AuditOutcome,
    /// Optional structured detail
    pub detail: Option<serde_json::Value>,
}

/// Query filters for the audit log
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Match on target entity reference
    pub source_id: Option<String>,
    /// Match on action type
    pub action: Option<AuditAction>,
    /// Match on outcome status
    pub status: Option<AuditOutcome>,
    /// Truncate the filtered, sorted result to this many entries
    pub limit: Option<usize>,
}

/// Outcome counts over a filtered set of entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    /// Entries matching the filter (before truncation)
    pub total: usize,
    /// Entries with `success` outcome
    pub success: usize,
    /// Entries with `failure` outcome
    pub failure: usize,
    /// Entries with `partial` outcome
    pub partial: usize,
}

/// In-memory append-only audit log
pub struct AuditTrailStore {
    entries: RwLock<Vec<AuditEntry>>,
}

impl AuditTrailStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Append one entry, stamping `recorded_at` and `seq` at write time.
    ///
    /// The in-memory log cannot fail; the Result in the signature is the
    /// contract for a backing store, where unavailability surfaces as
    /// `StorageUnavailable` and is fatal to the calling operation.
    pub fn append(&self, record: AuditRecord) -> Result<AuditEntry> {
        let mut entries = self.entries.write();
        let entry = AuditEntry {
            entry_id: Uuid::new_v4(),
            actor: record.actor,
            action: record.action,
            target: record.target,
            recorded_at: chrono::Utc::now(),
            outcome: record.outcome,
            detail: record.detail,
            seq: entries.len() as u64,
        };
        entries.push(entry.clone());
        tracing::debug!(
            action = entry.action.as_str(),
            entity = %entry.target,
            outcome = entry.outcome.as_str(),
            "audit entry appended"
        );
        Ok(entry)
    }

    /// Query entries: filter first, then sort newest-first by stored
    /// timestamp (insertion order as tiebreak), then truncate to the
    /// limit. Truncating before filtering would silently drop matching
    /// entries and must never happen.
    pub fn query(&self, filter: &AuditFilter) -> Vec<AuditEntry> {
        let entries = self.entries.read();
        let mut matched: Vec<AuditEntry> = entries
            .iter()
            .filter(|e| Self::matches(e, filter))
            .cloned()
            .collect();

        matched.sort_by(|a, b| {
            b.recorded_at
                .cmp(&a.recorded_at)
                .then(b.seq.cmp(&a.seq))
        });

        if let Some(limit) = filter.limit {
            matched.truncate(limit);
        }
        matched
    }

    /// Outcome summary over the filtered set, ignoring the limit
    pub fn summary(&self, filter: &AuditFilter) -> AuditSummary {
        let entries = self.entries.read();
        let mut summary = AuditSummary::default();
        for entry in entries.iter().filter(|e| Self::matches(e, filter)) {
            summary.total += 1;
            match entry.outcome {
                AuditOutcome::Success => summary.success += 1,
                AuditOutcome::Failure => summary.failure += 1,
                AuditOutcome::Partial => summary.partial += 1,
            }
        }
        summary
    }

    /// Total entries ever appended
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True if nothing has been appended yet
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn matches(entry: &AuditEntry, filter: &AuditFilter) -> bool {
        if let Some(source_id) = &filter.source_id {
            if &entry.target != source_id {
                return false;
            }
        }
        if let Some(action) = filter.action {
            if entry.action != action {
                return false;
            }
        }
        if let Some(status) = filter.status {
            if entry.outcome != status {
                return false;
            }
        }
        true
    }
}

impl Default for AuditTrailStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(action: AuditAction, outcome: AuditOutcome, target: &str) -> AuditRecord {
        AuditRecord {
            actor: "tester".to_string(),
            action,
            target: target.to_string(),
            outcome,
            detail: None,
        }
    }

    #[test]
    fn test_append_assigns_sequence() {
        let store = AuditTrailStore::new();
        let a = store
            .append(record(AuditAction::CreateAlert, AuditOutcome::Success, "a1"))
            .unwrap();
        let b = store
            .append(record(AuditAction::MarkRead, AuditOutcome::Success, "a1"))
            .unwrap();
        assert_eq!(a.seq, 0);
        assert_eq!(b.seq, 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_filter_then_sort_then_truncate() {
        let store = AuditTrailStore::new();
        // 5 success, 3 failure interleaved
        use AuditOutcome::{Failure, Success};
        let outcomes = [
            Success, Success, Failure, Success, Failure, Success, Success, Failure,
        ];
        for (i, outcome) in outcomes.into_iter().enumerate() {
            store
                .append(record(
                    AuditAction::Transition,
                    outcome,
                    &format!("a{}", i),
                ))
                .unwrap();
        }

        let result = store.query(&AuditFilter {
            status: Some(AuditOutcome::Failure),
            limit: Some(2),
            ..Default::default()
        });

        // Exactly 2 failures, newest first; truncating before filtering
        // would have returned successes here
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|e| e.outcome == AuditOutcome::Failure));
        assert!(result[0].seq > result[1].seq);
        assert_eq!(result[0].target, "a7".to_string());
    }

    #[test]
    fn test_summary_counts_ignore_limit() {
        let store = AuditTrailStore::new();
        for outcome in [
            AuditOutcome::Success,
            AuditOutcome::Success,
            AuditOutcome::Failure,
            AuditOutcome::Partial,
        ] {
            store
                .append(record(AuditAction::CreateAlert, outcome, "a1"))
                .unwrap();
        }

        let summary = store.summary(&AuditFilter {
            limit: Some(1),
            ..Default::default()
        });
        assert_eq!(
            summary,
            AuditSummary {
                total: 4,
                success: 2,
                failure: 1,
                partial: 1,
            }
        );
    }

    #[test]
    fn test_filter_by_source_and_action() {
        let store = AuditTrailStore::new();
        store
            .append(record(AuditAction::CreateAlert, AuditOutcome::Success, "a1"))
            .unwrap();
        store
            .append(record(AuditAction::MarkRead, AuditOutcome::Success, "a1"))
            .unwrap();
        store
            .append(record(AuditAction::MarkRead, AuditOutcome::Success, "a2"))
            .unwrap();

        let result = store.query(&AuditFilter {
            source_id: Some("a1".to_string()),
            action: Some(AuditAction::MarkRead),
            ..Default::default()
        });
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].target, "a1");
    }
}
