//! WealthGuard Transaction Stream Monitor
//!
//! Ingests a transaction feed and classifies it into compliance alerts:
//! ordered scoring rules (amount thresholds, cross-jurisdiction policy
//! checks, per-counterparty velocity windows) with first-match-wins
//! severity. Alerts are created through the compliance-core lifecycle
//! manager, so every decision lands in the audit trail.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod feed;
pub mod monitor;
pub mod rules;
pub mod velocity;

// Re-exports
pub use feed::{ScriptedFeed, TransactionFeed};
pub use monitor::TransactionMonitor;
pub use rules::{RuleContext, RuleMatch, ScoringRule};
pub use velocity::{VelocityTracker, WindowStats};
