//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "simulateLatency": true,
//!   "latency": { "recipientsMs": 300, "transactionsAddMs": 500, ... },
//!   "transfers": { "estimatedArrivalDays": 3, "defaultFromCurrency": "USD", ... }
//! }
//! ```
//! Unknown fields are preserved on save.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment override for latency simulation (for CI/testing)
pub const SIMULATE_LATENCY_ENV: &str = "REMITPAY_SIMULATE_LATENCY";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    simulate_latency: Option<bool>,
    #[serde(default)]
    latency: LatencySettings,
    #[serde(default)]
    transfers: TransferSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Artificial delays applied before store mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencySettings {
    #[serde(default = "default_recipients_ms")]
    pub recipients_ms: u64,
    #[serde(default = "default_transactions_add_ms")]
    pub transactions_add_ms: u64,
    #[serde(default = "default_transactions_update_ms")]
    pub transactions_update_ms: u64,
    #[serde(default = "default_auth_ms")]
    pub auth_ms: u64,
}

fn default_recipients_ms() -> u64 {
    300
}

fn default_transactions_add_ms() -> u64 {
    500
}

fn default_transactions_update_ms() -> u64 {
    300
}

fn default_auth_ms() -> u64 {
    500
}

impl Default for LatencySettings {
    fn default() -> Self {
        Self {
            recipients_ms: default_recipients_ms(),
            transactions_add_ms: default_transactions_add_ms(),
            transactions_update_ms: default_transactions_update_ms(),
            auth_ms: default_auth_ms(),
        }
    }
}

/// Defaults for the send flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferSettings {
    #[serde(default = "default_arrival_days")]
    pub estimated_arrival_days: i64,
    #[serde(default = "default_from_currency")]
    pub default_from_currency: String,
    #[serde(default = "default_to_currency")]
    pub default_to_currency: String,
}

fn default_arrival_days() -> i64 {
    3
}

fn default_from_currency() -> String {
    "USD".to_string()
}

fn default_to_currency() -> String {
    "KES".to_string()
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            estimated_arrival_days: default_arrival_days(),
            default_from_currency: default_from_currency(),
            default_to_currency: default_to_currency(),
        }
    }
}

/// Store delays resolved from the settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub recipients: Duration,
    pub transactions_add: Duration,
    pub transactions_update: Duration,
    pub auth: Duration,
}

impl Latency {
    /// No artificial delay anywhere
    pub fn none() -> Self {
        Self {
            recipients: Duration::ZERO,
            transactions_add: Duration::ZERO,
            transactions_update: Duration::ZERO,
            auth: Duration::ZERO,
        }
    }
}

impl From<LatencySettings> for Latency {
    fn from(s: LatencySettings) -> Self {
        Self {
            recipients: Duration::from_millis(s.recipients_ms),
            transactions_add: Duration::from_millis(s.transactions_add_ms),
            transactions_update: Duration::from_millis(s.transactions_update_ms),
            auth: Duration::from_millis(s.auth_ms),
        }
    }
}

/// RemitPay configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub simulate_latency: bool,
    pub latency: LatencySettings,
    pub transfers: TransferSettings,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulate_latency: true,
            latency: LatencySettings::default(),
            transfers: TransferSettings::default(),
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// Latency simulation can be toggled via:
    /// 1. Settings file (`simulateLatency`)
    /// 2. Environment variable REMITPAY_SIMULATE_LATENCY (takes precedence)
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)
                .with_context(|| format!("Failed to read {}", settings_path.display()))?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let simulate_latency = match std::env::var(SIMULATE_LATENCY_ENV).ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.simulate_latency.unwrap_or(true),
        };

        Ok(Self {
            simulate_latency,
            latency: raw.latency,
            transfers: raw.transfers.clone(),
            _raw_settings: raw,
        })
    }

    /// Save config to the data directory
    /// Preserves other settings that the CLI doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let settings_path = data_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.simulate_latency = Some(self.simulate_latency);
        settings.latency = self.latency;
        settings.transfers = self.transfers.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Config for tests and scripted use: no delays
    pub fn without_latency() -> Self {
        Self {
            simulate_latency: false,
            ..Self::default()
        }
    }

    /// Effective store delays
    pub fn latency(&self) -> Latency {
        if self.simulate_latency {
            self.latency.into()
        } else {
            Latency::none()
        }
    }
}
