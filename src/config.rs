//! Wrapper configuration loaded from `~/.config/addon-wrapper/config.toml`.
//!
//! Every field has a default, so a missing file (or a partial one) is fine.
//! Environment variables override the file:
//!
//! | Variable | Field |
//! |---|---|
//! | `ADDON_WRAPPER_TIMEOUT_MS` | `timeout_ms` |
//! | `ADDON_WRAPPER_USER_AGENT` | `user_agent` |
//! | `ADDON_WRAPPER_PROXY_ENABLED` | `proxy.enabled` |
//! | `ADDON_WRAPPER_PROXY_URL` | `proxy.url` |
//! | `ADDON_WRAPPER_PROXY_RULES` | `proxy.rules` |

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::redact::Redactor;

/// Default per-request timeout for addon calls.
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Default `User-Agent` sent to addons.
pub const DEFAULT_USER_AGENT: &str = concat!("addon-wrapper/", env!("CARGO_PKG_VERSION"));

/// Settings shared by every addon wrapper in the process.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WrapperConfig {
    /// Timeout applied to each addon request, in milliseconds.
    pub timeout_ms: u64,
    /// `User-Agent` header sent to addons.
    pub user_agent: String,
    /// Extra headers sent with every request. Empty values are ignored.
    pub headers: BTreeMap<String, String>,
    /// Log URLs, headers and client IPs unmasked.
    pub log_sensitive_info: bool,
    pub proxy: ProxyConfig,
}

/// Outbound proxy settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Global switch. When off no request is proxied.
    pub enabled: bool,
    /// Proxy URL (`http://`, `https://` or `socks5://`).
    pub url: Option<String>,
    /// Comma separated `host:true|false` rules, evaluated last-match-wins.
    /// `*` matches every host, `*.example.com` matches by suffix.
    pub rules: Option<String>,
}

impl Default for WrapperConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: BTreeMap::new(),
            log_sensitive_info: false,
            proxy: ProxyConfig::default(),
        }
    }
}

impl WrapperConfig {
    /// Load from the default location, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if an override variable holds an unparseable value.
    pub fn load() -> Result<Self> {
        let mut config = Self::from_file(&config_path())?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        toml::from_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))
    }

    /// Apply overrides from a variable lookup (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ms) = lookup("ADDON_WRAPPER_TIMEOUT_MS") {
            self.timeout_ms = ms
                .trim()
                .parse()
                .with_context(|| format!("ADDON_WRAPPER_TIMEOUT_MS is not a number: {ms}"))?;
        }
        if let Some(ua) = lookup("ADDON_WRAPPER_USER_AGENT") {
            self.user_agent = ua;
        }
        if let Some(enabled) = lookup("ADDON_WRAPPER_PROXY_ENABLED") {
            self.proxy.enabled = enabled
                .trim()
                .parse()
                .with_context(|| {
                    format!("ADDON_WRAPPER_PROXY_ENABLED must be true or false: {enabled}")
                })?;
        }
        if let Some(url) = lookup("ADDON_WRAPPER_PROXY_URL") {
            self.proxy.url = Some(url);
        }
        if let Some(rules) = lookup("ADDON_WRAPPER_PROXY_RULES") {
            self.proxy.rules = Some(rules);
        }
        Ok(())
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn redactor(&self) -> Redactor {
        if self.log_sensitive_info {
            Redactor::revealing()
        } else {
            Redactor::new()
        }
    }
}

/// Return the path to the config file.
fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("addon-wrapper")
        .join("config.toml")
}
