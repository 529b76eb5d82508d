//! Cross-jurisdiction policy matrix evaluation
//!
//! The matrix maps (origin jurisdiction, action class) to the set of
//! target jurisdictions the origin may act against. Evaluation is a pure
//! function over the configuration: deterministic, no side effects, no
//! audit writes of its own. The matrix is versioned external
//! configuration and is immutable once constructed; replacing it is an
//! administrative operation outside the request write path.

use crate::config::PolicyConfig;
use crate::error::{Error, Result};
use crate::types::{DecisionReason, Jurisdiction, PolicyDecision};
use std::collections::{HashMap, HashSet};

/// Versioned cross-jurisdiction policy matrix
#[derive(Debug, Clone)]
pub struct PolicyMatrix {
    version: u32,
    // Map: (origin, action) -> permitted target set
    permitted: HashMap<(String, String), HashSet<String>>,
}

impl PolicyMatrix {
    /// Build a matrix from configuration
    pub fn from_config(config: &PolicyConfig) -> Self {
        let mut permitted: HashMap<(String, String), HashSet<String>> = HashMap::new();
        for rule in &config.rules {
            let origin = Jurisdiction::new(&rule.origin);
            let action = rule.action.trim().to_lowercase();
            let entry = permitted
                .entry((origin.as_str().to_string(), action))
                .or_default();
            for target in &rule.targets {
                entry.insert(Jurisdiction::new(target).as_str().to_string());
            }
        }
        Self {
            version: config.version,
            permitted,
        }
    }

    /// Matrix version, for audit detail payloads
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Evaluate whether `origin` may perform `action` against `target`.
    ///
    /// Missing or blank origin/target/action is a malformed request, not
    /// a policy outcome: defaulting to some fixed jurisdiction would be
    /// a policy decision the caller has to make explicitly. An origin
    /// with no matrix entry has an empty permitted set (deny-by-default).
    pub fn evaluate(&self, origin: &str, target: &str, action: &str) -> Result<PolicyDecision> {
        let origin = Jurisdiction::new(origin);
        let target = Jurisdiction::new(target);
        let action = action.trim().to_lowercase();

        if origin.is_empty() {
            return Err(Error::InvalidRequest(
                "policy evaluation requires an origin jurisdiction".to_string(),
            ));
        }
        if target.is_empty() {
            return Err(Error::InvalidRequest(
                "policy evaluation requires a target jurisdiction".to_string(),
            ));
        }
        if action.is_empty() {
            return Err(Error::InvalidRequest(
                "policy evaluation requires an action class".to_string(),
            ));
        }

        let allowed = self
            .permitted
            .get(&(origin.as_str().to_string(), action))
            .map(|targets| targets.contains(target.as_str()))
            .unwrap_or(false);

        let reason = if allowed {
            DecisionReason::AllowedByMatrix
        } else {
            DecisionReason::DeniedCrossJurisdiction
        };

        Ok(PolicyDecision { allowed, reason })
    }
}
