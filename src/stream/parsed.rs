//! Canonical stream record produced by the normalizer.

use serde::{Deserialize, Serialize};

use crate::parser::ParsedNameData;
use crate::stream::raw::{ProxyHeaders, Subtitle};

/// Identity of the addon a stream came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonInfo {
    pub name: String,
    pub id: String,
}

impl AddonInfo {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

/// How the stream is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamType {
    P2p,
    Usenet,
    Debrid,
    Live,
    Unknown,
}

/// Debrid service serving the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebridProvider {
    /// Service id, e.g. `realdebrid`.
    pub id: String,
    /// Whether the service already has the content cached, when the addon says.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TorrentInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seeders: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsenetInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
}

/// Behavior hints that matter downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamHints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_whitelist: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_web_ready: Option<bool>,
    /// Absent when the addon sent neither request nor response headers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_headers: Option<ProxyHeaders>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_hash: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitles: Option<Vec<Subtitle>>,
    pub behavior_hints: StreamHints,
}

/// A stream normalized into the shape the aggregator sorts and filters on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedStream {
    #[serde(flatten)]
    pub parsed: ParsedNameData,
    /// Always `false` here; proxying of the final media is decided later.
    pub proxied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub addon: AddonInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    /// Info hash used internally for deduplication, also set for debrid
    /// streams whose hash was recovered from the URL.
    #[serde(rename = "_infoHash", skip_serializing_if = "Option::is_none")]
    pub internal_info_hash: Option<String>,
    pub torrent: TorrentInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<DebridProvider>,
    pub usenet: UsenetInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indexers: Option<String>,
    /// Duration in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal: Option<bool>,
    #[serde(rename = "type")]
    pub stream_type: StreamType,
    pub stream: StreamData,
}
