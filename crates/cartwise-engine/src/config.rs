//! # Engine Configuration
//!
//! Fee policy and catalog settings for the engine.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CARTWISE_TAX_RATE_BPS=850                                          │
//! │     CARTWISE_FETCH_TIMEOUT_MS=2000                                     │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/cartwise/cartwise.toml (Linux)                           │
//! │     ~/Library/Application Support/com.cartwise.engine/... (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     8.5% tax, free shipping from $35.00, else $5.99                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # cartwise.toml
//! [fees]
//! tax_rate_bps = 850                    # 8.5%
//! free_shipping_threshold_cents = 3500  # $35.00
//! flat_shipping_fee_cents = 599         # $5.99
//!
//! [catalog]
//! fetch_timeout_ms = 2000
//! ```
//!
//! Amounts are in cents and the tax rate in basis points so no float ever
//! reaches the pricing path.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use cartwise_core::{FeePolicy, Money, TaxRate};
use cartwise_core::{
    DEFAULT_FLAT_SHIPPING_FEE_CENTS, DEFAULT_FREE_SHIPPING_THRESHOLD_CENTS, DEFAULT_TAX_RATE_BPS,
};

use crate::error::{EngineError, EngineResult};
use crate::DEFAULT_FETCH_TIMEOUT_MS;

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "cartwise.toml";

pub const ENV_TAX_RATE_BPS: &str = "CARTWISE_TAX_RATE_BPS";
pub const ENV_FREE_SHIPPING_THRESHOLD_CENTS: &str = "CARTWISE_FREE_SHIPPING_THRESHOLD_CENTS";
pub const ENV_FLAT_SHIPPING_FEE_CENTS: &str = "CARTWISE_FLAT_SHIPPING_FEE_CENTS";
pub const ENV_FETCH_TIMEOUT_MS: &str = "CARTWISE_FETCH_TIMEOUT_MS";

// =============================================================================
// Fee Settings
// =============================================================================

/// The `[fees]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSettings {
    /// Tax rate in basis points (850 = 8.5%).
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,

    /// Subtotal (cents) at or above which shipping is free.
    #[serde(default = "default_free_shipping_threshold")]
    pub free_shipping_threshold_cents: i64,

    /// Shipping fee (cents) below the threshold.
    #[serde(default = "default_flat_shipping_fee")]
    pub flat_shipping_fee_cents: i64,
}

fn default_tax_rate_bps() -> u32 {
    DEFAULT_TAX_RATE_BPS
}

fn default_free_shipping_threshold() -> i64 {
    DEFAULT_FREE_SHIPPING_THRESHOLD_CENTS
}

fn default_flat_shipping_fee() -> i64 {
    DEFAULT_FLAT_SHIPPING_FEE_CENTS
}

impl Default for FeeSettings {
    fn default() -> Self {
        FeeSettings {
            tax_rate_bps: default_tax_rate_bps(),
            free_shipping_threshold_cents: default_free_shipping_threshold(),
            flat_shipping_fee_cents: default_flat_shipping_fee(),
        }
    }
}

impl FeeSettings {
    pub fn fee_policy(&self) -> FeePolicy {
        FeePolicy::new(
            TaxRate::from_bps(self.tax_rate_bps),
            Money::from_cents(self.free_shipping_threshold_cents),
            Money::from_cents(self.flat_shipping_fee_cents),
        )
    }
}

// =============================================================================
// Catalog Settings
// =============================================================================

/// The `[catalog]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Deadline for the single catalog fetch of a reconciliation.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_ms: u64,
}

fn default_fetch_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT_MS
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            fetch_timeout_ms: default_fetch_timeout(),
        }
    }
}

impl CatalogSettings {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

// =============================================================================
// Engine Configuration
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub fees: FeeSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl EngineConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else the platform default)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> EngineResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading engine config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or falls back to defaults if anything goes wrong.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document; missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> EngineResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml_string(&self) -> EngineResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> EngineResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| EngineError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| EngineError::ConfigSaveFailed(e.to_string()))?;
        }

        std::fs::write(&path, self.to_toml_string()?)
            .map_err(|e| EngineError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Engine config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> EngineResult<()> {
        self.fee_policy()
            .validate()
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))?;

        if self.catalog.fetch_timeout_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "fetch_timeout_ms must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `CARTWISE_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key/value source.
    ///
    /// Unparseable values are logged and ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bps) = parse_override::<u32>(&lookup, ENV_TAX_RATE_BPS) {
            debug!(tax_rate_bps = bps, "Overriding tax rate from environment");
            self.fees.tax_rate_bps = bps;
        }

        if let Some(cents) = parse_override::<i64>(&lookup, ENV_FREE_SHIPPING_THRESHOLD_CENTS) {
            self.fees.free_shipping_threshold_cents = cents;
        }

        if let Some(cents) = parse_override::<i64>(&lookup, ENV_FLAT_SHIPPING_FEE_CENTS) {
            self.fees.flat_shipping_fee_cents = cents;
        }

        if let Some(ms) = parse_override::<u64>(&lookup, ENV_FETCH_TIMEOUT_MS) {
            debug!(fetch_timeout_ms = ms, "Overriding fetch timeout from environment");
            self.catalog.fetch_timeout_ms = ms;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "cartwise", "engine")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn fee_policy(&self) -> FeePolicy {
        self.fees.fee_policy()
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.catalog.fetch_timeout()
    }
}

fn parse_override<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable config override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.fee_policy(), FeePolicy::default());
        assert_eq!(config.fetch_timeout(), Duration::from_millis(2000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [fees]
            tax_rate_bps = 600
            "#,
        )
        .unwrap();

        assert_eq!(config.fees.tax_rate_bps, 600);
        assert_eq!(config.fees.free_shipping_threshold_cents, 3500);
        assert_eq!(config.catalog.fetch_timeout_ms, 2000);
    }

    #[test]
    fn test_malformed_toml_is_a_load_error() {
        let err = EngineConfig::from_toml_str("[fees]\ntax_rate_bps = \"lots\"").unwrap_err();
        assert!(matches!(err, EngineError::ConfigLoadFailed(_)));
    }

    #[test]
    fn test_overrides_win_over_file_values() {
        let mut config = EngineConfig::default();
        config.apply_overrides(lookup_from(&[
            (ENV_TAX_RATE_BPS, "725"),
            (ENV_FLAT_SHIPPING_FEE_CENTS, "499"),
            (ENV_FETCH_TIMEOUT_MS, " 150 "),
        ]));

        assert_eq!(config.fees.tax_rate_bps, 725);
        assert_eq!(config.fees.flat_shipping_fee_cents, 499);
        assert_eq!(config.fees.free_shipping_threshold_cents, 3500);
        assert_eq!(config.catalog.fetch_timeout_ms, 150);
    }

    #[test]
    fn test_unparseable_override_is_ignored() {
        let mut config = EngineConfig::default();
        config.apply_overrides(lookup_from(&[(ENV_TAX_RATE_BPS, "eight")]));
        assert_eq!(config.fees.tax_rate_bps, 850);
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();
        config.fees.tax_rate_bps = 10_001;
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));

        let mut config = EngineConfig::default();
        config.fees.flat_shipping_fee_cents = -1;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.catalog.fetch_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = EngineConfig::default().to_toml_string().unwrap();
        assert!(toml_str.contains("[fees]"));
        assert!(toml_str.contains("[catalog]"));
        assert_eq!(
            EngineConfig::from_toml_str(&toml_str).unwrap(),
            EngineConfig::default()
        );
    }

    #[test]
    fn test_save_then_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = EngineConfig::default();
        config.fees.free_shipping_threshold_cents = 5000;
        config.save(Some(path.clone())).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }
}
