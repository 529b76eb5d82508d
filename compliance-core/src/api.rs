//! Request/response boundary for the engine
//!
//! The only surface the calling API layer talks to. All inputs arrive as
//! untrusted strings and are validated before touching core state:
//! unknown enum values fail with `InvalidRequest` and are never coerced
//! to a default. Every call returns a tagged `Result`; nothing panics
//! across this boundary. Caller identity is an opaque string passed into
//! every mutating operation — the engine holds no ambient session state.

use crate::alerts::{AlertFilter, AlertLifecycleManager};
use crate::audit::{AuditFilter, AuditRecord, AuditSummary, AuditTrailStore};
use crate::error::{Error, Result};
use crate::policy::PolicyMatrix;
use crate::reporting::{ComplianceReport, ReportingFacade};
use crate::types::{
    Alert, AlertStatus, AuditAction, AuditEntry, AuditOutcome, PolicyDecision, Severity,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Request to create an alert manually
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAlertRequest {
    /// Severity, one of LOW / MEDIUM / HIGH / CRITICAL
    pub severity: String,
    /// Free-text rationale
    pub rationale: String,
    /// Optional review deadline
    pub due_date: Option<DateTime<Utc>>,
    /// Linked transaction IDs
    #[serde(default)]
    pub linked_transactions: Vec<Uuid>,
}

/// Filters for listing alerts through the boundary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertListRequest {
    /// Status filter (wire string)
    pub status: Option<String>,
    /// Severity filter (wire string)
    pub severity: Option<String>,
    /// Only unread alerts
    #[serde(default)]
    pub unread_only: bool,
    /// Result truncation
    pub limit: Option<usize>,
}

/// Alert listing with total before truncation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertListResponse {
    /// Matching alerts, newest first
    pub alerts: Vec<Alert>,
    /// Matching count before the limit was applied
    pub total: usize,
}

/// Filters for querying the audit log through the boundary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditLogRequest {
    /// Target entity reference filter
    pub source_id: Option<String>,
    /// Action filter (wire string)
    pub action: Option<String>,
    /// Outcome filter (wire string)
    pub status: Option<String>,
    /// Result truncation
    pub limit: Option<usize>,
}

/// Audit log entries plus outcome summary over the filtered set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogResponse {
    /// Matching entries, newest first
    pub entries: Vec<AuditEntry>,
    /// total/success/failure/partial counts over the filtered set
    pub summary: AuditSummary,
}

/// Boundary façade over the whole engine
pub struct ComplianceApi {
    alerts: Arc<AlertLifecycleManager>,
    audit: Arc<AuditTrailStore>,
    policy: Arc<PolicyMatrix>,
    reporting: ReportingFacade,
}

impl ComplianceApi {
    /// Assemble the boundary over the engine's components
    pub fn new(
        alerts: Arc<AlertLifecycleManager>,
        audit: Arc<AuditTrailStore>,
        policy: Arc<PolicyMatrix>,
    ) -> Self {
        let reporting = ReportingFacade::new(alerts.clone(), audit.clone());
        Self {
            alerts,
            audit,
            policy,
            reporting,
        }
    }

    /// Create an alert from a manual operator action
    pub fn create(&self, actor: &str, request: CreateAlertRequest) -> Result<Alert> {
        let severity = Severity::from_str(&request.severity).ok_or_else(|| {
            Error::InvalidRequest(format!("unknown severity: {}", request.severity))
        })?;
        if request.rationale.trim().is_empty() {
            return Err(Error::InvalidRequest(
                "rationale must not be empty".to_string(),
            ));
        }
        self.alerts.create(
            actor,
            severity,
            request.rationale,
            request.due_date,
            request.linked_transactions,
        )
    }

    /// Mark an alert as read
    pub fn mark_read(&self, actor: &str, alert_id: &str) -> Result<Alert> {
        self.alerts.mark_read(actor, parse_alert_id(alert_id)?)
    }

    /// Mark an alert as actioned
    pub fn mark_actioned(&self, actor: &str, alert_id: &str) -> Result<Alert> {
        self.alerts.mark_actioned(actor, parse_alert_id(alert_id)?)
    }

    /// Transition an alert to a new status
    pub fn transition(&self, actor: &str, alert_id: &str, new_status: &str) -> Result<Alert> {
        let status = AlertStatus::from_str(new_status)
            .ok_or_else(|| Error::InvalidRequest(format!("unknown status: {}", new_status)))?;
        self.alerts
            .transition(actor, parse_alert_id(alert_id)?, status)
    }

    /// List alerts matching the filters
    pub fn list_alerts(&self, request: AlertListRequest) -> Result<AlertListResponse> {
        let status = request
            .status
            .as_deref()
            .map(|s| {
                AlertStatus::from_str(s)
                    .ok_or_else(|| Error::InvalidRequest(format!("unknown status: {}", s)))
            })
            .transpose()?;
        let severity = request
            .severity
            .as_deref()
            .map(|s| {
                Severity::from_str(s)
                    .ok_or_else(|| Error::InvalidRequest(format!("unknown severity: {}", s)))
            })
            .transpose()?;

        // One read: total and page must come from the same snapshot
        let mut alerts = self.alerts.list(&AlertFilter {
            status,
            severity,
            unread_only: request.unread_only,
            limit: None,
        });
        let total = alerts.len();
        if let Some(limit) = request.limit {
            alerts.truncate(limit);
        }
        Ok(AlertListResponse { alerts, total })
    }

    /// Query the audit log, returning entries plus an outcome summary
    pub fn audit_log(&self, request: AuditLogRequest) -> Result<AuditLogResponse> {
        let action = request
            .action
            .as_deref()
            .map(|s| {
                AuditAction::from_str(s)
                    .ok_or_else(|| Error::InvalidRequest(format!("unknown action: {}", s)))
            })
            .transpose()?;
        let status = request
            .status
            .as_deref()
            .map(|s| {
                AuditOutcome::from_str(s)
                    .ok_or_else(|| Error::InvalidRequest(format!("unknown outcome: {}", s)))
            })
            .transpose()?;

        let filter = AuditFilter {
            source_id: request.source_id,
            action,
            status,
            limit: request.limit,
        };
        Ok(AuditLogResponse {
            entries: self.audit.query(&filter),
            summary: self.audit.summary(&filter),
        })
    }

    /// Evaluate the policy matrix. Pure: never appends to the audit
    /// trail by itself.
    pub fn evaluate(&self, origin: &str, target: &str, action: &str) -> Result<PolicyDecision> {
        self.policy.evaluate(origin, target, action)
    }

    /// Evaluate the policy matrix to gate a real action, recording the
    /// decision in the audit trail (a denied check is a `failure` entry).
    pub fn authorize_action(
        &self,
        actor: &str,
        origin: &str,
        target: &str,
        action: &str,
    ) -> Result<PolicyDecision> {
        let decision = self.policy.evaluate(origin, target, action)?;
        self.audit.append(AuditRecord {
            actor: actor.to_string(),
            action: AuditAction::PolicyCheck,
            target: format!("{}->{}", origin.trim().to_uppercase(), target.trim().to_uppercase()),
            outcome: if decision.allowed {
                AuditOutcome::Success
            } else {
                AuditOutcome::Failure
            },
            detail: Some(serde_json::json!({
                "action": action,
                "allowed": decision.allowed,
                "reason": decision.reason.as_str(),
                "matrix_version": self.policy.version(),
            })),
        })?;
        Ok(decision)
    }

    /// Aggregated compliance posture at the given instant
    pub fn report(&self, now: DateTime<Utc>) -> ComplianceReport {
        self.reporting.compliance_report(now)
    }
}

fn parse_alert_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| Error::InvalidRequest(format!("malformed alert id: {}", raw)))
}
