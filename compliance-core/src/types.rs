//! Core types for the compliance engine
//!
//! All types are designed for:
//! - Deterministic serialization (serde)
//! - Memory safety (no unsafe code)
//! - Exact arithmetic (Decimal for money)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Regulatory jurisdiction code (e.g. DIFC, ADGM, SAMA)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Jurisdiction(String);

impl Jurisdiction {
    /// Create a jurisdiction code, normalised to uppercase
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the code is blank after normalisation
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Alert severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Informational, no deadline pressure
    Low,
    /// Worth a look within normal workflow
    Medium,
    /// Requires prompt review
    High,
    /// Requires immediate escalation
    Critical,
}

impl Severity {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }

    /// Parse from wire representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "LOW" => Some(Severity::Low),
            "MEDIUM" => Some(Severity::Medium),
            "HIGH" => Some(Severity::High),
            "CRITICAL" => Some(Severity::Critical),
            _ => None,
        }
    }

    /// All severities, for aggregation
    pub fn all() -> [Severity; 4] {
        [
            Severity::Low,
            Severity::Medium,
            Severity::High,
            Severity::Critical,
        ]
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Alert workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStatus {
    /// Open, awaiting triage
    Active,
    /// Under investigation by an operator
    UnderReview,
    /// Closed with remediation
    Resolved,
    /// Closed as false positive / not actionable
    Dismissed,
}

impl AlertStatus {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Active => "ACTIVE",
            AlertStatus::UnderReview => "UNDER_REVIEW",
            AlertStatus::Resolved => "RESOLVED",
            AlertStatus::Dismissed => "DISMISSED",
        }
    }

    /// Parse from wire representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(AlertStatus::Active),
            "UNDER_REVIEW" => Some(AlertStatus::UnderReview),
            "RESOLVED" => Some(AlertStatus::Resolved),
            "DISMISSED" => Some(AlertStatus::Dismissed),
            _ => None,
        }
    }

    /// Resolved and Dismissed are terminal: no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, AlertStatus::Resolved | AlertStatus::Dismissed)
    }

    /// Valid forward transitions of the alert state machine.
    ///
    /// UnderReview -> Active is permitted as a "reopen for more info"
    /// move; the terminal states accept nothing.
    pub fn can_transition_to(&self, next: AlertStatus) -> bool {
        match (self, next) {
            (AlertStatus::Active, AlertStatus::UnderReview) => true,
            (AlertStatus::Active, AlertStatus::Resolved) => true,
            (AlertStatus::Active, AlertStatus::Dismissed) => true,
            (AlertStatus::UnderReview, AlertStatus::Resolved) => true,
            (AlertStatus::UnderReview, AlertStatus::Dismissed) => true,
            (AlertStatus::UnderReview, AlertStatus::Active) => true,
            _ => false,
        }
    }

    /// All statuses, for aggregation
    pub fn all() -> [AlertStatus; 4] {
        [
            AlertStatus::Active,
            AlertStatus::UnderReview,
            AlertStatus::Resolved,
            AlertStatus::Dismissed,
        ]
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable transaction fact ingested from the feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction ID
    pub transaction_id: Uuid,

    /// Amount (exact decimal)
    pub amount: Decimal,

    /// ISO 4217 currency code
    pub currency: String,

    /// Origin jurisdiction
    pub origin: Jurisdiction,

    /// Destination jurisdiction
    pub destination: Jurisdiction,

    /// Sending counterparty identifier
    pub counterparty: String,

    /// Receiving party identifier
    pub beneficiary: String,

    /// When the transaction occurred
    pub occurred_at: DateTime<Utc>,
}

/// Compliance alert raised against one or more transactions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Unique alert ID
    pub alert_id: Uuid,

    /// Priority classification
    pub severity: Severity,

    /// Workflow status
    pub status: AlertStatus,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Optional review deadline
    pub due_date: Option<DateTime<Utc>>,

    /// Transactions that triggered this alert
    pub linked_transactions: Vec<Uuid>,

    /// Free-text rationale naming the triggering rule
    pub rationale: String,

    /// Seen by an operator
    pub read: bool,

    /// An operator has taken some action (orthogonal to status)
    pub actioned: bool,
}

impl Alert {
    /// Derived overdue property, computed at read time and never stored.
    ///
    /// Only an Active alert with a due date in the past is overdue.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == AlertStatus::Active
            && self.due_date.map(|due| due < now).unwrap_or(false)
    }
}

/// Reason code attached to a policy decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// Target is in the origin's permitted set
    AllowedByMatrix,
    /// Target absent from the permitted set (or origin unknown)
    DeniedCrossJurisdiction,
}

impl DecisionReason {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionReason::AllowedByMatrix => "allowed_by_matrix",
            DecisionReason::DeniedCrossJurisdiction => "denied_cross_jurisdiction",
        }
    }
}

/// Ephemeral result of a policy matrix evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDecision {
    /// Whether the cross-jurisdiction action is permitted
    pub allowed: bool,

    /// Fixed reason code
    pub reason: DecisionReason,
}

/// Action types recorded in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A new alert was created
    CreateAlert,
    /// An alert was marked as read
    MarkRead,
    /// An alert was marked as actioned
    MarkActioned,
    /// An alert status transition
    Transition,
    /// A policy matrix evaluation gated a real action
    PolicyCheck,
    /// A transaction was examined and produced no alert
    TransactionExamined,
}

impl AuditAction {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::CreateAlert => "create_alert",
            AuditAction::MarkRead => "mark_read",
            AuditAction::MarkActioned => "mark_actioned",
            AuditAction::Transition => "transition",
            AuditAction::PolicyCheck => "policy_check",
            AuditAction::TransactionExamined => "transaction_examined",
        }
    }

    /// Parse from wire representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "create_alert" => Some(AuditAction::CreateAlert),
            "mark_read" => Some(AuditAction::MarkRead),
            "mark_actioned" => Some(AuditAction::MarkActioned),
            "transition" => Some(AuditAction::Transition),
            "policy_check" => Some(AuditAction::PolicyCheck),
            "transaction_examined" => Some(AuditAction::TransactionExamined),
            _ => None,
        }
    }
}

/// Outcome of an audited operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    /// Operation fully applied
    Success,
    /// Operation rejected or failed
    Failure,
    /// Operation partially applied (infrastructure faults only)
    Partial,
}

impl AuditOutcome {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOutcome::Success => "success",
            AuditOutcome::Failure => "failure",
            AuditOutcome::Partial => "partial",
        }
    }

    /// Parse from wire representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "success" => Some(AuditOutcome::Success),
            "failure" => Some(AuditOutcome::Failure),
            "partial" => Some(AuditOutcome::Partial),
            _ => None,
        }
    }
}

/// Immutable audit trail entry
///
/// `recorded_at` is stamped by the store at write time and is the
/// canonical ordering key; `seq` preserves insertion order as the
/// tiebreak under clock skew.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique entry ID
    pub entry_id: Uuid,

    /// Caller identity (opaque string supplied by the boundary)
    pub actor: String,

    /// What was done
    pub action: AuditAction,

    /// Reference to the target entity (alert ID, transaction ID, ...)
    pub target: String,

    /// Write-time timestamp assigned by the store
    pub recorded_at: DateTime<Utc>,

    /// Outcome of the operation
    pub outcome: AuditOutcome,

    /// Optional structured detail payload
    pub detail: Option<serde_json::Value>,

    /// Insertion sequence number (append order)
    pub seq: u64,
}
