//! Alert lifecycle management
//!
//! Owns every Alert entity and all of its state changes. Each mutation
//! holds the per-alert map entry for the whole read-validate-write, so
//! concurrent operators cannot interleave into an inconsistent state and
//! transitions are validated against the committed status, never a stale
//! read. Every state change lands in the audit trail before it is
//! published; if the audit write fails, the mutation fails with it —
//! an alert without an audit trace is not an acceptable outcome.
//!
//! Alerts are never deleted. Resolved and dismissed alerts persist for
//! audit purposes.

use crate::audit::{AuditRecord, AuditTrailStore};
use crate::error::{Error, Result};
use crate::types::{Alert, AlertStatus, AuditAction, AuditOutcome, Severity};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Filters for listing alerts
#[derive(Debug, Clone, Default)]
pub struct AlertFilter {
    /// Match on workflow status
    pub status: Option<AlertStatus>,
    /// Match on severity
    pub severity: Option<Severity>,
    /// Only alerts not yet read by an operator
    pub unread_only: bool,
    /// Truncate the filtered, sorted result
    pub limit: Option<usize>,
}

/// Manager owning all alerts and their transitions
pub struct AlertLifecycleManager {
    alerts: DashMap<Uuid, Alert>,
    audit: Arc<AuditTrailStore>,
}

impl AlertLifecycleManager {
    /// Create a manager writing its trail to the given audit store
    pub fn new(audit: Arc<AuditTrailStore>) -> Self {
        Self {
            alerts: DashMap::new(),
            audit,
        }
    }

    /// The audit store this manager writes to
    pub fn audit(&self) -> &Arc<AuditTrailStore> {
        &self.audit
    }

    /// Create a new alert. Always starts Active, unread, unactioned.
    ///
    /// The audit entry is appended before the alert is published into
    /// the map: an audit failure means no alert is created.
    pub fn create(
        &self,
        actor: &str,
        severity: Severity,
        rationale: impl Into<String>,
        due_date: Option<DateTime<Utc>>,
        linked_transactions: Vec<Uuid>,
    ) -> Result<Alert> {
        let alert = Alert {
            alert_id: Uuid::new_v4(),
            severity,
            status: AlertStatus::Active,
            created_at: Utc::now(),
            due_date,
            linked_transactions,
            rationale: rationale.into(),
            read: false,
            actioned: false,
        };

        self.audit.append(AuditRecord {
            actor: actor.to_string(),
            action: AuditAction::CreateAlert,
            target: alert.alert_id.to_string(),
            outcome: AuditOutcome::Success,
            detail: Some(serde_json::json!({
                "severity": alert.severity.as_str(),
                "rationale": alert.rationale,
            })),
        })?;

        self.alerts.insert(alert.alert_id, alert.clone());
        tracing::info!(
            alert_id = %alert.alert_id,
            severity = alert.severity.as_str(),
            "alert created"
        );
        Ok(alert)
    }

    /// Mark an alert as read. Idempotent; no status change.
    pub fn mark_read(&self, actor: &str, alert_id: Uuid) -> Result<Alert> {
        self.set_flag(actor, alert_id, AuditAction::MarkRead, |alert| {
            alert.read = true;
        })
    }

    /// Mark an alert as actioned. Idempotent.
    ///
    /// Orthogonal to status on purpose: "actioned" records operator
    /// engagement while status records the workflow stage, and the two
    /// can diverge during prolonged investigations. A status change is a
    /// separate explicit `transition` call.
    pub fn mark_actioned(&self, actor: &str, alert_id: Uuid) -> Result<Alert> {
        self.set_flag(actor, alert_id, AuditAction::MarkActioned, |alert| {
            alert.actioned = true;
        })
    }

    fn set_flag(
        &self,
        actor: &str,
        alert_id: Uuid,
        action: AuditAction,
        apply: fn(&mut Alert),
    ) -> Result<Alert> {
        // Entry guard held across audit + mutation serializes per-alert
        let mut entry = self
            .alerts
            .get_mut(&alert_id)
            .ok_or_else(|| Error::NotFound(format!("alert {}", alert_id)))?;

        self.audit.append(AuditRecord {
            actor: actor.to_string(),
            action,
            target: alert_id.to_string(),
            outcome: AuditOutcome::Success,
            detail: None,
        })?;

        apply(&mut entry);
        Ok(entry.clone())
    }

    /// Transition an alert to a new workflow status.
    ///
    /// Fails with `InvalidTransition` if the committed status is
    /// terminal or the edge is not a permitted move; the failed attempt
    /// is itself recorded in the audit trail.
    pub fn transition(&self, actor: &str, alert_id: Uuid, new_status: AlertStatus) -> Result<Alert> {
        let mut entry = self
            .alerts
            .get_mut(&alert_id)
            .ok_or_else(|| Error::NotFound(format!("alert {}", alert_id)))?;

        let current = entry.status;
        if !current.can_transition_to(new_status) {
            self.audit.append(AuditRecord {
                actor: actor.to_string(),
                action: AuditAction::Transition,
                target: alert_id.to_string(),
                outcome: AuditOutcome::Failure,
                detail: Some(serde_json::json!({
                    "from": current.as_str(),
                    "to": new_status.as_str(),
                })),
            })?;
            return Err(Error::InvalidTransition {
                from: current,
                to: new_status,
            });
        }

        self.audit.append(AuditRecord {
            actor: actor.to_string(),
            action: AuditAction::Transition,
            target: alert_id.to_string(),
            outcome: AuditOutcome::Success,
            detail: Some(serde_json::json!({
                "from": current.as_str(),
                "to": new_status.as_str(),
            })),
        })?;

        entry.status = new_status;
        tracing::info!(
            alert_id = %alert_id,
            from = current.as_str(),
            to = new_status.as_str(),
            "alert transitioned"
        );
        Ok(entry.clone())
    }

    /// Fetch one alert by ID
    pub fn get(&self, alert_id: Uuid) -> Result<Alert> {
        self.alerts
            .get(&alert_id)
            .map(|entry| entry.clone())
            .ok_or_else(|| Error::NotFound(format!("alert {}", alert_id)))
    }

    /// List alerts matching the filter, newest first
    pub fn list(&self, filter: &AlertFilter) -> Vec<Alert> {
        let mut matched: Vec<Alert> = self
            .alerts
            .iter()
            .filter(|entry| {
                let alert = entry.value();
                filter.status.map_or(true, |s| alert.status == s)
                    && filter.severity.map_or(true, |s| alert.severity == s)
                    && (!filter.unread_only || !alert.read)
            })
            .map(|entry| entry.value().clone())
            .collect();

        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = filter.limit {
            matched.truncate(limit);
        }
        matched
    }

    /// Number of alerts ever created (none are deleted)
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// True if no alert has been created yet
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
