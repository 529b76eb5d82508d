//! Transaction stream monitor
//!
//! Consumes a feed of transactions and runs each through the ordered
//! scoring rules. A triggered rule creates an alert through the
//! lifecycle manager with the rule's declared severity; a quiet
//! transaction is recorded as examined in the audit trail and produces
//! nothing — silence is a valid, expected outcome.

use crate::rules::{default_rules, RuleContext, ScoringRule};
use crate::velocity::VelocityTracker;
use chrono::{Duration, Utc};
use compliance_core::alerts::AlertLifecycleManager;
use compliance_core::audit::AuditRecord;
use compliance_core::config::MonitorConfig;
use compliance_core::policy::PolicyMatrix;
use compliance_core::types::{Alert, AuditAction, AuditOutcome, Transaction};
use compliance_core::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Prune idle counterparty windows every this many transactions
const PRUNE_INTERVAL: u64 = 256;

/// Monitor running the scoring rules over the transaction stream
pub struct TransactionMonitor {
    config: MonitorConfig,
    policy: Arc<PolicyMatrix>,
    alerts: Arc<AlertLifecycleManager>,
    velocity: VelocityTracker,
    rules: Vec<Box<dyn ScoringRule>>,
    examined: AtomicU64,
}

impl TransactionMonitor {
    /// Create a monitor with the default rule set
    pub fn new(
        config: MonitorConfig,
        policy: Arc<PolicyMatrix>,
        alerts: Arc<AlertLifecycleManager>,
    ) -> Self {
        let velocity = VelocityTracker::new(config.velocity.clone());
        Self {
            config,
            policy,
            alerts,
            velocity,
            rules: default_rules(),
            examined: AtomicU64::new(0),
        }
    }

    /// Examine one transaction: first triggered rule wins.
    ///
    /// Returns the created alert, or `None` when no rule fired (the
    /// examination is still recorded in the audit trail).
    pub fn process(&self, actor: &str, tx: &Transaction) -> Result<Option<Alert>> {
        let window = self.velocity.observe(
            &tx.counterparty,
            tx.transaction_id,
            tx.amount,
            tx.occurred_at,
        );
        let ctx = RuleContext {
            config: &self.config,
            policy: &self.policy,
            window,
            velocity_exceeded: self.velocity.exceeds_limits(&window),
        };

        self.examined.fetch_add(1, Ordering::Relaxed);

        for rule in &self.rules {
            if let Some(matched) = rule.evaluate(tx, &ctx)? {
                tracing::warn!(
                    transaction_id = %tx.transaction_id,
                    rule = matched.rule,
                    severity = matched.severity.as_str(),
                    "scoring rule triggered"
                );
                let due_date = Utc::now() + Duration::hours(self.config.review_due_hours);
                let alert = self.alerts.create(
                    actor,
                    matched.severity,
                    matched.rationale,
                    Some(due_date),
                    vec![tx.transaction_id],
                )?;
                return Ok(Some(alert));
            }
        }

        // No rule fired: record the examination, raise nothing
        self.alerts.audit().append(AuditRecord {
            actor: actor.to_string(),
            action: AuditAction::TransactionExamined,
            target: tx.transaction_id.to_string(),
            outcome: AuditOutcome::Success,
            detail: None,
        })?;
        tracing::debug!(
            transaction_id = %tx.transaction_id,
            "transaction examined, no alert"
        );
        Ok(None)
    }

    /// Transactions examined so far
    pub fn examined(&self) -> u64 {
        self.examined.load(Ordering::Relaxed)
    }

    /// Counterparties currently holding velocity state
    pub fn tracked_counterparties(&self) -> usize {
        self.velocity.tracked_counterparties()
    }

    /// Consume the feed mailbox until the sender side closes.
    ///
    /// A processing error on one transaction is logged and does not stop
    /// the stream; idle counterparty windows are pruned periodically so
    /// memory stays bounded.
    pub async fn run(&self, actor: &str, mut feed: mpsc::Receiver<Transaction>) {
        while let Some(tx) = feed.recv().await {
            match self.process(actor, &tx) {
                Ok(Some(alert)) => {
                    tracing::info!(
                        transaction_id = %tx.transaction_id,
                        alert_id = %alert.alert_id,
                        "alert raised from stream"
                    );
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(
                        transaction_id = %tx.transaction_id,
                        error = %e,
                        "failed to process transaction"
                    );
                }
            }

            if self.examined() % PRUNE_INTERVAL == 0 {
                self.velocity.prune_idle(Utc::now());
            }
        }
        tracing::info!(examined = self.examined(), "transaction feed closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compliance_core::audit::{AuditFilter, AuditTrailStore};
    use compliance_core::config::{EngineConfig, PolicyConfig};
    use compliance_core::types::{AlertStatus, Jurisdiction, Severity};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn setup() -> (TransactionMonitor, Arc<AlertLifecycleManager>) {
        let config = EngineConfig::default();
        let audit = Arc::new(AuditTrailStore::new());
        let alerts = Arc::new(AlertLifecycleManager::new(audit));
        let policy = Arc::new(PolicyMatrix::from_config(&PolicyConfig::default()));
        let monitor = TransactionMonitor::new(config.monitor, policy, alerts.clone());
        (monitor, alerts)
    }

    fn tx(amount: i64, origin: &str, destination: &str, counterparty: &str) -> Transaction {
        Transaction {
            transaction_id: Uuid::new_v4(),
            amount: Decimal::from(amount),
            currency: "USD".to_string(),
            origin: Jurisdiction::new(origin),
            destination: Jurisdiction::new(destination),
            counterparty: counterparty.to_string(),
            beneficiary: "BN-1".to_string(),
            occurred_at: Utc::now(),
        }
    }

    #[test]
    fn test_quiet_transaction_is_examined_but_silent() {
        let (monitor, alerts) = setup();
        let quiet = tx(1_000, "DIFC", "ADGM", "CP-1");

        let result = monitor.process("monitor", &quiet).unwrap();
        assert!(result.is_none());
        assert!(alerts.is_empty());
        assert_eq!(monitor.examined(), 1);

        let examined = alerts.audit().query(&AuditFilter {
            action: Some(AuditAction::TransactionExamined),
            ..Default::default()
        });
        assert_eq!(examined.len(), 1);
        assert_eq!(examined[0].target, quiet.transaction_id.to_string());
    }

    #[test]
    fn test_critical_amount_raises_critical_alert() {
        let (monitor, _alerts) = setup();
        let big = tx(2_000_000, "DIFC", "ADGM", "CP-1");

        let alert = monitor.process("monitor", &big).unwrap().unwrap();
        assert_eq!(alert.severity, Severity::Critical);
        assert_eq!(alert.status, AlertStatus::Active);
        assert_eq!(alert.linked_transactions, vec![big.transaction_id]);
        assert!(alert.rationale.contains("critical_amount_threshold"));
        assert!(alert.due_date.is_some());
    }

    #[test]
    fn test_denied_corridor_raises_high_alert() {
        let (monitor, _alerts) = setup();
        let cross = tx(1_000, "DIFC", "SAMA", "CP-1");

        let alert = monitor.process("monitor", &cross).unwrap().unwrap();
        assert_eq!(alert.severity, Severity::High);
        assert!(alert.rationale.contains("cross_jurisdiction_denied"));
    }

    #[test]
    fn test_amount_rule_outranks_velocity_rule() {
        let (monitor, _alerts) = setup();
        // Fill the velocity window with quiet transactions first
        for _ in 0..10 {
            assert!(monitor
                .process("monitor", &tx(1, "DIFC", "ADGM", "CP-9"))
                .unwrap()
                .is_none());
        }
        // This one trips both velocity and the high-amount threshold;
        // the amount rule sits earlier in the order
        let alert = monitor
            .process("monitor", &tx(300_000, "DIFC", "ADGM", "CP-9"))
            .unwrap()
            .unwrap();
        assert_eq!(alert.severity, Severity::High);
        assert!(alert.rationale.contains("high_amount_threshold"));
    }

    #[test]
    fn test_velocity_breach_raises_medium_alert() {
        let (monitor, alerts) = setup();
        // Default limit is 10 transactions per window
        for _ in 0..10 {
            assert!(monitor
                .process("monitor", &tx(10, "DIFC", "ADGM", "CP-5"))
                .unwrap()
                .is_none());
        }
        let alert = monitor
            .process("monitor", &tx(10, "DIFC", "ADGM", "CP-5"))
            .unwrap()
            .unwrap();
        assert_eq!(alert.severity, Severity::Medium);
        assert!(alert.rationale.contains("velocity_window_exceeded"));
        assert_eq!(alerts.len(), 1);
    }

    #[tokio::test]
    async fn test_run_consumes_mailbox_until_closed() {
        let (monitor, alerts) = setup();
        let (sender, receiver) = mpsc::channel(16);

        sender.send(tx(1_000, "DIFC", "ADGM", "CP-1")).await.unwrap();
        sender.send(tx(2_000_000, "DIFC", "ADGM", "CP-2")).await.unwrap();
        drop(sender);

        monitor.run("monitor", receiver).await;
        assert_eq!(monitor.examined(), 2);
        assert_eq!(alerts.len(), 1);
    }
}
