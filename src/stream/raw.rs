//! Stream objects as addons send them.
//!
//! Addons are loosely typed, so every field is optional and unknown fields
//! are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One entry of an addon's `streams` array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStream {
    pub name: Option<String>,
    /// Older addons put the description here.
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub external_url: Option<String>,
    pub info_hash: Option<String>,
    pub file_idx: Option<u32>,
    pub sources: Option<Vec<String>>,
    pub subtitles: Option<Vec<Subtitle>>,
    /// Usenet post age, e.g. `"12d"`.
    pub age: Option<String>,
    pub behavior_hints: Option<BehaviorHints>,
}

impl RawStream {
    /// Free text describing the stream, `description` preferred over `title`.
    pub fn text(&self) -> Option<&str> {
        self.description.as_deref().or(self.title.as_deref())
    }

    /// Short label for error messages.
    pub fn label(&self) -> String {
        self.name
            .as_deref()
            .or_else(|| self.text().and_then(|t| t.lines().next()))
            .or(self.url.as_deref())
            .map(|s| s.replace('\n', " "))
            .unwrap_or_else(|| "unnamed stream".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtitle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub url: String,
    pub lang: String,
}

/// Playback hints attached to a stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorHints {
    pub country_whitelist: Option<Vec<String>>,
    pub not_web_ready: Option<bool>,
    pub binge_group: Option<String>,
    pub proxy_headers: Option<ProxyHeaders>,
    pub video_hash: Option<String>,
    pub video_size: Option<u64>,
    pub filename: Option<String>,
}

/// Headers a player must send (request) or expect (response) when fetching
/// the stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyHeaders {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<BTreeMap<String, String>>,
}

impl ProxyHeaders {
    /// `true` when neither side carries headers.
    pub fn is_unset(&self) -> bool {
        self.request.is_none() && self.response.is_none()
    }
}
