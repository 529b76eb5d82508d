//! Scoring rules for the transaction stream
//!
//! Rules form a fixed, ordered set evaluated per transaction; the first
//! rule whose trigger condition holds determines the alert severity.
//! Rules never combine or sum severities — a transaction tripping both
//! the amount and velocity checks gets the amount rule's severity
//! because that rule sits earlier in the order.

use crate::velocity::WindowStats;
use compliance_core::config::MonitorConfig;
use compliance_core::policy::PolicyMatrix;
use compliance_core::types::{Severity, Transaction};
use compliance_core::Result;

/// Action class the monitor checks against the policy matrix
pub const TRANSFER_ACTION: &str = "transfer";

/// A triggered rule: severity plus a rationale naming the rule
#[derive(Debug, Clone)]
pub struct RuleMatch {
    /// Rule identifier, carried into the alert rationale and audit detail
    pub rule: &'static str,
    /// Severity declared by the rule
    pub severity: Severity,
    /// Human-readable rationale with the observed values
    pub rationale: String,
}

/// Evaluation context shared by all rules for one transaction
pub struct RuleContext<'a> {
    /// Monitor thresholds
    pub config: &'a MonitorConfig,
    /// Cross-jurisdiction policy matrix
    pub policy: &'a PolicyMatrix,
    /// Counterparty window stats including the current transaction
    pub window: WindowStats,
    /// Window stats exceed the configured velocity limits
    pub velocity_exceeded: bool,
}

/// One scoring rule in the ordered set
pub trait ScoringRule: Send + Sync {
    /// Stable rule identifier
    fn name(&self) -> &'static str;

    /// Returns a match if the rule's trigger condition holds
    fn evaluate(&self, tx: &Transaction, ctx: &RuleContext<'_>) -> Result<Option<RuleMatch>>;
}

/// Amount at or above the critical threshold
pub struct CriticalAmountRule;

impl ScoringRule for CriticalAmountRule {
    fn name(&self) -> &'static str {
        "critical_amount_threshold"
    }

    fn evaluate(&self, tx: &Transaction, ctx: &RuleContext<'_>) -> Result<Option<RuleMatch>> {
        if tx.amount >= ctx.config.critical_amount_threshold {
            return Ok(Some(RuleMatch {
                rule: self.name(),
                severity: Severity::Critical,
                rationale: format!(
                    "rule critical_amount_threshold: {} {} >= {}",
                    tx.amount, tx.currency, ctx.config.critical_amount_threshold
                ),
            }));
        }
        Ok(None)
    }
}

/// Amount at or above the high threshold
pub struct HighAmountRule;

impl ScoringRule for HighAmountRule {
    fn name(&self) -> &'static str {
        "high_amount_threshold"
    }

    fn evaluate(&self, tx: &Transaction, ctx: &RuleContext<'_>) -> Result<Option<RuleMatch>> {
        if tx.amount >= ctx.config.high_amount_threshold {
            return Ok(Some(RuleMatch {
                rule: self.name(),
                severity: Severity::High,
                rationale: format!(
                    "rule high_amount_threshold: {} {} >= {}",
                    tx.amount, tx.currency, ctx.config.high_amount_threshold
                ),
            }));
        }
        Ok(None)
    }
}

/// Origin/destination pair denied by the policy matrix
pub struct CrossJurisdictionRule;

impl ScoringRule for CrossJurisdictionRule {
    fn name(&self) -> &'static str {
        "cross_jurisdiction_denied"
    }

    fn evaluate(&self, tx: &Transaction, ctx: &RuleContext<'_>) -> Result<Option<RuleMatch>> {
        let decision = ctx.policy.evaluate(
            tx.origin.as_str(),
            tx.destination.as_str(),
            TRANSFER_ACTION,
        )?;
        if !decision.allowed {
            return Ok(Some(RuleMatch {
                rule: self.name(),
                severity: Severity::High,
                rationale: format!(
                    "rule cross_jurisdiction_denied: {} -> {} ({})",
                    tx.origin,
                    tx.destination,
                    decision.reason.as_str()
                ),
            }));
        }
        Ok(None)
    }
}

/// Counterparty window exceeds the velocity limits
pub struct VelocityRule;

impl ScoringRule for VelocityRule {
    fn name(&self) -> &'static str {
        "velocity_window_exceeded"
    }

    fn evaluate(&self, tx: &Transaction, ctx: &RuleContext<'_>) -> Result<Option<RuleMatch>> {
        if ctx.velocity_exceeded {
            return Ok(Some(RuleMatch {
                rule: self.name(),
                severity: Severity::Medium,
                rationale: format!(
                    "rule velocity_window_exceeded: counterparty {} at {} txns / {} total in window",
                    tx.counterparty, ctx.window.count, ctx.window.total_amount
                ),
            }));
        }
        Ok(None)
    }
}

/// The fixed rule set in priority order
pub fn default_rules() -> Vec<Box<dyn ScoringRule>> {
    vec![
        Box::new(CriticalAmountRule),
        Box::new(HighAmountRule),
        Box::new(CrossJurisdictionRule),
        Box::new(VelocityRule),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use compliance_core::config::PolicyConfig;
    use compliance_core::types::Jurisdiction;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn tx(amount: i64, origin: &str, destination: &str) -> Transaction {
        Transaction {
            transaction_id: Uuid::new_v4(),
            amount: Decimal::from(amount),
            currency: "USD".to_string(),
            origin: Jurisdiction::new(origin),
            destination: Jurisdiction::new(destination),
            counterparty: "CP-1".to_string(),
            beneficiary: "BN-1".to_string(),
            occurred_at: Utc::now(),
        }
    }

    fn context<'a>(
        config: &'a MonitorConfig,
        policy: &'a PolicyMatrix,
        velocity_exceeded: bool,
    ) -> RuleContext<'a> {
        RuleContext {
            config,
            policy,
            window: WindowStats {
                count: 1,
                total_amount: Decimal::from(100),
            },
            velocity_exceeded,
        }
    }

    #[test]
    fn test_first_match_wins_ordering() {
        let config = MonitorConfig::default();
        let policy = PolicyMatrix::from_config(&PolicyConfig::default());
        // Over the critical threshold AND on a denied corridor AND
        // velocity-exceeded: the critical amount rule sits first
        let ctx = context(&config, &policy, true);
        let transaction = tx(5_000_000, "DIFC", "SAMA");

        let matched = default_rules()
            .iter()
            .find_map(|rule| rule.evaluate(&transaction, &ctx).unwrap());
        let matched = matched.unwrap();
        assert_eq!(matched.rule, "critical_amount_threshold");
        assert_eq!(matched.severity, Severity::Critical);
    }

    #[test]
    fn test_high_amount_between_thresholds() {
        let config = MonitorConfig::default();
        let policy = PolicyMatrix::from_config(&PolicyConfig::default());
        let ctx = context(&config, &policy, false);

        let matched = HighAmountRule
            .evaluate(&tx(300_000, "DIFC", "ADGM"), &ctx)
            .unwrap()
            .unwrap();
        assert_eq!(matched.severity, Severity::High);

        assert!(CriticalAmountRule
            .evaluate(&tx(300_000, "DIFC", "ADGM"), &ctx)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_cross_jurisdiction_rule_uses_matrix() {
        let config = MonitorConfig::default();
        let policy = PolicyMatrix::from_config(&PolicyConfig::default());
        let ctx = context(&config, &policy, false);

        let denied = CrossJurisdictionRule
            .evaluate(&tx(100, "DIFC", "SAMA"), &ctx)
            .unwrap()
            .unwrap();
        assert_eq!(denied.severity, Severity::High);
        assert!(denied.rationale.contains("denied_cross_jurisdiction"));

        assert!(CrossJurisdictionRule
            .evaluate(&tx(100, "DIFC", "ADGM"), &ctx)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_velocity_rule_reads_context() {
        let config = MonitorConfig::default();
        let policy = PolicyMatrix::from_config(&PolicyConfig::default());

        let quiet = context(&config, &policy, false);
        assert!(VelocityRule
            .evaluate(&tx(100, "DIFC", "ADGM"), &quiet)
            .unwrap()
            .is_none());

        let busy = context(&config, &policy, true);
        let matched = VelocityRule
            .evaluate(&tx(100, "DIFC", "ADGM"), &busy)
            .unwrap()
            .unwrap();
        assert_eq!(matched.severity, Severity::Medium);
    }
}
