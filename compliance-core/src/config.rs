//! Configuration for the compliance engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Cross-jurisdiction policy matrix
    pub policy: PolicyConfig,

    /// Transaction monitor rule thresholds
    pub monitor: MonitorConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            policy: PolicyConfig::default(),
            monitor: MonitorConfig::default(),
        }
    }
}

/// Versioned policy matrix configuration.
///
/// Updating the matrix is an administrative operation: a new config is
/// loaded and a new evaluator built from it outside the request path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Matrix version, carried into audit detail payloads
    pub version: u32,

    /// Permitted (origin, action) -> targets entries. An origin with no
    /// entry has an empty permitted set (deny-by-default).
    pub rules: Vec<PolicyRuleConfig>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            version: 1,
            rules: vec![
                PolicyRuleConfig {
                    origin: "DIFC".to_string(),
                    action: "transfer".to_string(),
                    targets: vec!["DIFC".to_string(), "ADGM".to_string()],
                },
                PolicyRuleConfig {
                    origin: "ADGM".to_string(),
                    action: "transfer".to_string(),
                    targets: vec!["ADGM".to_string(), "DIFC".to_string()],
                },
            ],
        }
    }
}

/// One permitted-targets entry of the policy matrix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyRuleConfig {
    /// Origin jurisdiction code
    pub origin: String,

    /// Action class (e.g. "transfer")
    pub action: String,

    /// Target jurisdictions the origin may act against
    pub targets: Vec<String>,
}

/// Transaction monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Amount at or above which an alert is raised at High severity
    pub high_amount_threshold: Decimal,

    /// Amount at or above which an alert is raised at Critical severity
    pub critical_amount_threshold: Decimal,

    /// Review deadline attached to monitor-raised alerts (hours)
    pub review_due_hours: i64,

    /// Rolling-window velocity limits
    pub velocity: VelocityConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            high_amount_threshold: Decimal::from(250_000),      // $250k
            critical_amount_threshold: Decimal::from(1_000_000), // $1M
            review_due_hours: 48,
            velocity: VelocityConfig::default(),
        }
    }
}

/// Rolling-window velocity configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelocityConfig {
    /// Lookback window duration (minutes)
    pub window_minutes: i64,

    /// Maximum transactions per counterparty inside the window
    pub max_transactions_in_window: u32,

    /// Maximum total amount per counterparty inside the window
    pub max_amount_in_window: Decimal,
}

impl Default for VelocityConfig {
    fn default() -> Self {
        Self {
            window_minutes: 60,
            max_transactions_in_window: 10,
            max_amount_in_window: Decimal::from(2_000_000), // $2M
        }
    }
}

impl EngineConfig {
    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config: {}", e)))?;
        let config: EngineConfig = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load defaults with overrides from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = EngineConfig::default();

        if let Ok(raw) = std::env::var("COMPLIANCE_HIGH_AMOUNT_THRESHOLD") {
            config.monitor.high_amount_threshold = parse_env_decimal(
                "COMPLIANCE_HIGH_AMOUNT_THRESHOLD",
                &raw,
            )?;
        }

        if let Ok(raw) = std::env::var("COMPLIANCE_CRITICAL_AMOUNT_THRESHOLD") {
            config.monitor.critical_amount_threshold = parse_env_decimal(
                "COMPLIANCE_CRITICAL_AMOUNT_THRESHOLD",
                &raw,
            )?;
        }

        if let Ok(raw) = std::env::var("COMPLIANCE_VELOCITY_WINDOW_MINUTES") {
            config.monitor.velocity.window_minutes = raw.parse().map_err(|_| {
                crate::Error::Config(format!(
                    "COMPLIANCE_VELOCITY_WINDOW_MINUTES is not an integer: {}",
                    raw
                ))
            })?;
        }

        if let Ok(raw) = std::env::var("COMPLIANCE_MAX_TRANSACTIONS_IN_WINDOW") {
            config.monitor.velocity.max_transactions_in_window = raw.parse().map_err(|_| {
                crate::Error::Config(format!(
                    "COMPLIANCE_MAX_TRANSACTIONS_IN_WINDOW is not an integer: {}",
                    raw
                ))
            })?;
        }

        if let Ok(raw) = std::env::var("COMPLIANCE_MAX_AMOUNT_IN_WINDOW") {
            config.monitor.velocity.max_amount_in_window = parse_env_decimal(
                "COMPLIANCE_MAX_AMOUNT_IN_WINDOW",
                &raw,
            )?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Sanity checks on threshold ordering
    pub fn validate(&self) -> crate::Result<()> {
        if self.monitor.critical_amount_threshold <= self.monitor.high_amount_threshold {
            return Err(crate::Error::Config(
                "critical_amount_threshold must exceed high_amount_threshold".to_string(),
            ));
        }
        if self.monitor.velocity.window_minutes <= 0 {
            return Err(crate::Error::Config(
                "velocity window_minutes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env_decimal(name: &str, raw: &str) -> crate::Result<Decimal> {
    raw.parse()
        .map_err(|_| crate::Error::Config(format!("{} is not a decimal: {}", name, raw)))
}
