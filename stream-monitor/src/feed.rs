//! Transaction feed producers
//!
//! Where a real feed is unavailable the monitor's producer interface is
//! satisfied by a deterministic scripted feed, keeping rule-triggering
//! tests reproducible. No embedded randomness.

use compliance_core::types::Transaction;
use std::collections::VecDeque;
use tokio::sync::mpsc;

/// Pull-style producer of transaction events
pub trait TransactionFeed {
    /// Next transaction, or `None` when the feed is exhausted
    fn next_transaction(&mut self) -> Option<Transaction>;
}

/// Deterministic feed replaying a fixed script of transactions
pub struct ScriptedFeed {
    script: VecDeque<Transaction>,
}

impl ScriptedFeed {
    /// Build a feed from a fixed transaction script
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            script: transactions.into(),
        }
    }

    /// Transactions remaining in the script
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl TransactionFeed for ScriptedFeed {
    fn next_transaction(&mut self) -> Option<Transaction> {
        self.script.pop_front()
    }
}

/// Drain a feed into the monitor's mailbox, closing it afterwards
pub async fn pump(mut feed: impl TransactionFeed, sender: mpsc::Sender<Transaction>) {
    while let Some(tx) = feed.next_transaction() {
        if sender.send(tx).await.is_err() {
            tracing::warn!("monitor mailbox closed, dropping remaining feed");
            return;
        }
    }
}
