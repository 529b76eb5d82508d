//! WealthGuard Compliance Core
//!
//! Compliance monitoring and policy evaluation engine for a
//! wealth-management dashboard: transaction alerting, a
//! cross-jurisdiction policy matrix, and an append-only audit trail.
//!
//! # Architecture
//!
//! - **Audit Trail Store**: append-only log of every decision
//! - **Policy Matrix Evaluator**: pure (origin, target, action) lookup
//! - **Alert Lifecycle Manager**: alert state machine, per-alert serialized
//! - **Query/Reporting Façade**: read-side aggregation, overdue computed
//!   at query time
//!
//! # Invariants
//!
//! - Terminal alert statuses (RESOLVED, DISMISSED) accept no transition
//! - Audit entries are never mutated or deleted
//! - "Overdue" is derived at read time, never stored
//! - Mutations fully apply (state + audit) or fully fail

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod alerts;
pub mod api;
pub mod audit;
pub mod config;
pub mod error;
pub mod policy;
pub mod reporting;
pub mod types;

// Re-exports
pub use alerts::{AlertFilter, AlertLifecycleManager};
pub use api::ComplianceApi;
pub use audit::{AuditFilter, AuditRecord, AuditSummary, AuditTrailStore};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use policy::PolicyMatrix;
pub use reporting::{ComplianceReport, ReportingFacade};
pub use types::{
    Alert, AlertStatus, AuditAction, AuditEntry, AuditOutcome, DecisionReason, Jurisdiction,
    PolicyDecision, Severity, Transaction,
};
