//! Shelfwatch configuration system.
//!
//! One immutable [`ShelfwatchConfig`] is built in `main` and passed by
//! reference into every component. Values come from an optional TOML file
//! (~/.shelfwatch/config.toml) with environment variables applied on top,
//! so a bare crontab entry with exported secrets needs no file at all.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, ShelfwatchError};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelfwatchConfig {
    #[serde(default)]
    pub shopify: ShopifyConfig,
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub window: WindowConfig,
    /// IANA timezone used when rendering order timestamps.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "America/Chicago".into()
}

impl Default for ShelfwatchConfig {
    fn default() -> Self {
        Self {
            shopify: ShopifyConfig::default(),
            slack: SlackConfig::default(),
            window: WindowConfig::default(),
            timezone: default_timezone(),
        }
    }
}

impl ShelfwatchConfig {
    /// Load config: default file path if present, then env overrides.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Load config from a specific TOML file, then env overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ShelfwatchError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ShelfwatchError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Get the default config path (~/.shelfwatch/config.toml).
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".shelfwatch")
            .join("config.toml")
    }

    /// Overlay environment variables onto the loaded values.
    pub fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("SHOPIFY_SHOP") {
            self.shopify.shop = v;
        }
        if let Ok(v) = std::env::var("SHOPIFY_ADMIN_TOKEN") {
            self.shopify.admin_token = v;
        }
        if let Ok(v) = std::env::var("SHOPIFY_API_VERSION") {
            self.shopify.api_version = v;
        }
        if let Ok(v) = std::env::var("SHOPIFY_ADMIN_STORE_HANDLE") {
            self.shopify.store_handle = Some(v);
        }
        if let Ok(v) = std::env::var("SLACK_BOT_TOKEN") {
            self.slack.bot_token = v;
        }
        if let Ok(v) = std::env::var("SLACK_CHANNEL_ID") {
            self.slack.channel_id = v;
        }
    }

    /// Fail fast on missing required values, before any network call.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.shopify.shop.is_empty() {
            missing.push("shopify.shop / SHOPIFY_SHOP");
        }
        if self.shopify.admin_token.is_empty() {
            missing.push("shopify.admin_token / SHOPIFY_ADMIN_TOKEN");
        }
        if self.slack.bot_token.is_empty() {
            missing.push("slack.bot_token / SLACK_BOT_TOKEN");
        }
        if self.slack.channel_id.is_empty() {
            missing.push("slack.channel_id / SLACK_CHANNEL_ID");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ShelfwatchError::Config(format!(
                "Missing required values: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Shopify Admin API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopifyConfig {
    /// Shop hostname, e.g. "my-store.myshopify.com".
    #[serde(default)]
    pub shop: String,
    /// Admin API access token.
    #[serde(default)]
    pub admin_token: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Store handle for admin.shopify.com links. When unset, order links
    /// fall back to the legacy https://{shop}/admin/orders/{id} form.
    #[serde(default)]
    pub store_handle: Option<String>,
}

fn default_api_version() -> String {
    "2025-10".into()
}

impl Default for ShopifyConfig {
    fn default() -> Self {
        Self {
            shop: String::new(),
            admin_token: String::new(),
            api_version: default_api_version(),
            store_handle: None,
        }
    }
}

/// Slack posting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Bot token (xoxb-...).
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub channel_id: String,
    /// Maximum characters per mrkdwn section body.
    #[serde(default = "default_max_section_chars")]
    pub max_section_chars: usize,
    /// Fixed pause between consecutive posts, to stay under Slack rate limits.
    #[serde(default = "default_post_delay_ms")]
    pub post_delay_ms: u64,
}

fn default_max_section_chars() -> usize {
    2900
}
fn default_post_delay_ms() -> u64 {
    600
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            channel_id: String::new(),
            max_section_chars: default_max_section_chars(),
            post_delay_ms: default_post_delay_ms(),
        }
    }
}

/// Review window bounds: orders created between now - lookback_days and
/// now - grace_hours. The grace period keeps orders still inside the normal
/// fulfillment turnaround out of the digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,
    #[serde(default = "default_grace_hours")]
    pub grace_hours: i64,
}

fn default_lookback_days() -> i64 {
    30
}
fn default_grace_hours() -> i64 {
    24
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            lookback_days: default_lookback_days(),
            grace_hours: default_grace_hours(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ShelfwatchConfig::default();
        assert_eq!(config.shopify.api_version, "2025-10");
        assert_eq!(config.slack.max_section_chars, 2900);
        assert_eq!(config.slack.post_delay_ms, 600);
        assert_eq!(config.window.lookback_days, 30);
        assert_eq!(config.window.grace_hours, 24);
        assert_eq!(config.timezone, "America/Chicago");
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            timezone = "UTC"

            [shopify]
            shop = "demo.myshopify.com"
            admin_token = "shpat_test"
            store_handle = "demo"

            [slack]
            bot_token = "xoxb-test"
            channel_id = "C012345"
            post_delay_ms = 100

            [window]
            grace_hours = 48
        "#;

        let config: ShelfwatchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.shopify.shop, "demo.myshopify.com");
        assert_eq!(config.shopify.store_handle.as_deref(), Some("demo"));
        assert_eq!(config.slack.post_delay_ms, 100);
        assert_eq!(config.window.grace_hours, 48);
        // untouched fields keep defaults
        assert_eq!(config.shopify.api_version, "2025-10");
        assert_eq!(config.window.lookback_days, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_missing_fields_use_defaults() {
        let toml_str = "";
        let config: ShelfwatchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.slack.max_section_chars, 2900);
        assert_eq!(config.timezone, "America/Chicago");
    }

    #[test]
    fn test_validate_reports_all_missing() {
        let config = ShelfwatchConfig::default();
        let err = config.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("SHOPIFY_SHOP"));
        assert!(msg.contains("SHOPIFY_ADMIN_TOKEN"));
        assert!(msg.contains("SLACK_BOT_TOKEN"));
        assert!(msg.contains("SLACK_CHANNEL_ID"));
    }
}
