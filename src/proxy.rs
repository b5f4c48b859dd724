//! Per-host proxy routing.
//!
//! Rules come from a comma separated list of `pattern:true|false` pairs and
//! are folded in order, so a later rule overrides an earlier one for any
//! host they both match:
//!
//! ```text
//! *:true,*.cdn.example.com:false,cdn.example.com:true
//! ```
//!
//! proxies everything, except subdomains of `cdn.example.com`, except
//! `cdn.example.com` itself.

use tracing::warn;
use url::Url;

use crate::config::ProxyConfig;

/// A single parsed routing rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyRule {
    /// `*` — applies to every host.
    Global(bool),
    /// `*suffix` — applies to hosts ending with `suffix`.
    Suffix { suffix: String, enabled: bool },
    /// Exact hostname.
    Exact { host: String, enabled: bool },
}

impl ProxyRule {
    /// Parse one `pattern:true|false` entry.
    ///
    /// Returns `None` when the entry has no `:` or its value is not
    /// literally `true` or `false`.
    pub fn parse(entry: &str) -> Option<Self> {
        let (pattern, value) = entry.trim().rsplit_once(':')?;
        let enabled = match value.trim() {
            "true" => true,
            "false" => false,
            _ => return None,
        };
        let pattern = pattern.trim().to_ascii_lowercase();

        Some(if pattern == "*" {
            Self::Global(enabled)
        } else if let Some(suffix) = pattern.strip_prefix('*') {
            Self::Suffix {
                suffix: suffix.to_string(),
                enabled,
            }
        } else {
            Self::Exact {
                host: pattern,
                enabled,
            }
        })
    }

    /// The rule's verdict for `host`, or `None` if it does not apply.
    fn verdict(&self, host: &str) -> Option<bool> {
        match self {
            Self::Global(enabled) => Some(*enabled),
            Self::Suffix { suffix, enabled } => host.ends_with(suffix.as_str()).then_some(*enabled),
            Self::Exact { host: exact, enabled } => (host == exact).then_some(*enabled),
        }
    }
}

/// Parse a comma separated rule list. Invalid entries are logged and skipped.
pub fn parse_rules(rules: &str) -> Vec<ProxyRule> {
    rules
        .split(',')
        .filter(|entry| !entry.trim().is_empty())
        .filter_map(|entry| {
            let rule = ProxyRule::parse(entry);
            if rule.is_none() {
                warn!(rule = entry.trim(), "Invalid proxy rule, skipping");
            }
            rule
        })
        .collect()
}

/// Decides whether a destination must go through the outbound proxy.
#[derive(Debug, Clone, Default)]
pub struct ProxyRouter {
    enabled: bool,
    rules: Vec<ProxyRule>,
}

impl ProxyRouter {
    #[must_use]
    pub fn new(enabled: bool, rules: Vec<ProxyRule>) -> Self {
        Self { enabled, rules }
    }

    #[must_use]
    pub fn from_config(config: &ProxyConfig) -> Self {
        let rules = config.rules.as_deref().map(parse_rules).unwrap_or_default();
        Self::new(config.enabled, rules)
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Routing decision for `url`. Unparseable URLs are never proxied.
    pub fn should_proxy(&self, url: &str) -> bool {
        let host = match Url::parse(url) {
            Ok(parsed) => match parsed.host_str() {
                Some(host) => host.to_ascii_lowercase(),
                None => {
                    warn!("URL has no host, not proxying");
                    return false;
                }
            },
            Err(e) => {
                warn!(error = %e, "Failed to parse URL for proxy routing, not proxying");
                return false;
            }
        };

        self.should_proxy_host(&host)
    }

    /// Routing decision for a bare hostname.
    pub fn should_proxy_host(&self, host: &str) -> bool {
        if !self.enabled {
            return false;
        }
        self.rules
            .iter()
            .fold(true, |current, rule| rule.verdict(host).unwrap_or(current))
    }
}
