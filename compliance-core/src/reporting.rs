//! Read-side aggregation for dashboards
//!
//! Counts of alerts by severity and status, the overdue count, and
//! audit outcome summaries. Overdue is time-dependent and is recomputed
//! from the alert's due date on every call — it is never cached, so it
//! cannot go stale within a query.

use crate::alerts::{AlertFilter, AlertLifecycleManager};
use crate::audit::{AuditFilter, AuditSummary, AuditTrailStore};
use crate::types::{Alert, AlertStatus, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Aggregated compliance posture at one instant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// When the report was computed
    pub as_of: DateTime<Utc>,

    /// Alerts ever created (none are deleted)
    pub total_alerts: usize,

    /// Count per severity
    pub by_severity: Vec<(Severity, usize)>,

    /// Count per workflow status
    pub by_status: Vec<(AlertStatus, usize)>,

    /// Active alerts past their due date, computed at `as_of`
    pub overdue: usize,

    /// Audit trail outcome counts
    pub audit: AuditSummary,
}

/// Read-only reporting façade over the manager and the audit store
pub struct ReportingFacade {
    alerts: Arc<AlertLifecycleManager>,
    audit: Arc<AuditTrailStore>,
}

impl ReportingFacade {
    /// Create a façade over the given stores
    pub fn new(alerts: Arc<AlertLifecycleManager>, audit: Arc<AuditTrailStore>) -> Self {
        Self { alerts, audit }
    }

    /// Compute the full report at the given instant
    pub fn compliance_report(&self, now: DateTime<Utc>) -> ComplianceReport {
        let all = self.alerts.list(&AlertFilter::default());

        let by_severity = Severity::all()
            .into_iter()
            .map(|s| (s, all.iter().filter(|a| a.severity == s).count()))
            .collect();

        let by_status = AlertStatus::all()
            .into_iter()
            .map(|s| (s, all.iter().filter(|a| a.status == s).count()))
            .collect();

        let overdue = all.iter().filter(|a| a.is_overdue(now)).count();

        ComplianceReport {
            as_of: now,
            total_alerts: all.len(),
            by_severity,
            by_status,
            overdue,
            audit: self.audit.summary(&AuditFilter::default()),
        }
    }

    /// Active alerts past their due date at the given instant, newest first
    pub fn overdue_alerts(&self, now: DateTime<Utc>) -> Vec<Alert> {
        self.alerts
            .list(&AlertFilter {
                status: Some(AlertStatus::Active),
                ..Default::default()
            })
            .into_iter()
            .filter(|a| a.is_overdue(now))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn setup() -> (Arc<AlertLifecycleManager>, ReportingFacade) {
        let audit = Arc::new(AuditTrailStore::new());
        let alerts = Arc::new(AlertLifecycleManager::new(audit.clone()));
        let facade = ReportingFacade::new(alerts.clone(), audit);
        (alerts, facade)
    }

    #[test]
    fn test_report_counts_by_severity_and_status() {
        let (mgr, facade) = setup();
        mgr.create("rm-1", Severity::High, "one", None, vec![]).unwrap();
        mgr.create("rm-1", Severity::High, "two", None, vec![]).unwrap();
        let low = mgr.create("rm-1", Severity::Low, "three", None, vec![]).unwrap();
        mgr.transition("officer-7", low.alert_id, AlertStatus::Resolved)
            .unwrap();

        let report = facade.compliance_report(Utc::now());
        assert_eq!(report.total_alerts, 3);

        let high = report
            .by_severity
            .iter()
            .find(|(s, _)| *s == Severity::High)
            .unwrap();
        assert_eq!(high.1, 2);

        let resolved = report
            .by_status
            .iter()
            .find(|(s, _)| *s == AlertStatus::Resolved)
            .unwrap();
        assert_eq!(resolved.1, 1);

        // 3 creations + 1 transition, all successful
        assert_eq!(report.audit.total, 4);
        assert_eq!(report.audit.success, 4);
    }

    #[test]
    fn test_overdue_recomputed_per_instant() {
        let (mgr, facade) = setup();
        let now = Utc::now();
        mgr.create(
            "rm-1",
            Severity::High,
            "deadline",
            Some(now + Duration::hours(1)),
            vec![],
        )
        .unwrap();

        // Not yet due
        assert_eq!(facade.compliance_report(now).overdue, 0);
        assert!(facade.overdue_alerts(now).is_empty());

        // Same data, later clock: now overdue. Nothing was stored.
        let later = now + Duration::hours(2);
        assert_eq!(facade.compliance_report(later).overdue, 1);
        assert_eq!(facade.overdue_alerts(later).len(), 1);
    }
}
