//! Raw stream → [`ParsedStream`] normalization.
//!
//! Normalization runs in two steps:
//!
//! 1. [`StreamNormalizer::context_for`] reads what the addon encoded in free
//!    text (filename, size, seeders, indexer, debrid service, ...) into a
//!    [`StreamContext`].
//! 2. [`build_stream`] merges the raw stream and its context into the
//!    canonical record. This step is pure and infallible.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::parser::{FilenameParser, NameParser, ParsedNameData};
use crate::stream::parsed::{
    AddonInfo, DebridProvider, ParsedStream, StreamData, StreamHints, StreamType, TorrentInfo,
    UsenetInfo,
};
use crate::stream::raw::RawStream;

/// Why a single stream was dropped.
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Stream {label} is not a valid stream object: {source}")]
    Invalid {
        label: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Stream {label} could not be parsed from filename {filename:?}")]
    Unparseable { label: String, filename: String },
}

/// Everything known about a stream beyond its raw fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamContext {
    pub parsed: ParsedNameData,
    pub filename: Option<String>,
    pub folder_name: Option<String>,
    pub message: Option<String>,
    pub provider: Option<DebridProvider>,
    pub indexer: Option<String>,
    pub size: Option<u64>,
    pub seeders: Option<u32>,
    pub age: Option<String>,
    pub duration: Option<u64>,
    pub personal: Option<bool>,
    /// Overrides the raw `infoHash` for the internal hash field.
    pub info_hash: Option<String>,
}

/// Delivery type, first match wins: p2p, usenet, debrid, live, unknown.
pub fn classify(
    torrent_hash: Option<&str>,
    usenet_age: Option<&str>,
    provider: Option<&DebridProvider>,
    url: Option<&str>,
) -> StreamType {
    if torrent_hash.is_some() {
        StreamType::P2p
    } else if usenet_age.is_some() {
        StreamType::Usenet
    } else if provider.is_some() {
        StreamType::Debrid
    } else if url.is_some_and(|u| u.ends_with(".m3u8")) {
        StreamType::Live
    } else {
        StreamType::Unknown
    }
}

/// Merge a raw stream and its context into the canonical record.
pub fn build_stream(addon: &AddonInfo, raw: &RawStream, ctx: StreamContext) -> ParsedStream {
    let hints = raw.behavior_hints.clone().unwrap_or_default();
    let folder_name = ctx.folder_name.filter(|folder| ctx.filename.as_ref() != Some(folder));

    let torrent = TorrentInfo {
        info_hash: raw.info_hash.clone(),
        file_index: raw.file_idx,
        sources: raw.sources.clone(),
        seeders: ctx.seeders,
    };
    let stream_type = classify(
        torrent.info_hash.as_deref(),
        ctx.age.as_deref(),
        ctx.provider.as_ref(),
        raw.url.as_deref(),
    );

    ParsedStream {
        parsed: ctx.parsed,
        proxied: false,
        message: ctx.message,
        addon: addon.clone(),
        filename: ctx.filename,
        folder_name,
        size: ctx.size,
        url: raw.url.clone(),
        external_url: raw.external_url.clone(),
        internal_info_hash: ctx.info_hash.or_else(|| raw.info_hash.clone()),
        torrent,
        provider: ctx.provider,
        usenet: UsenetInfo { age: ctx.age },
        indexers: ctx.indexer,
        duration: ctx.duration,
        personal: ctx.personal,
        stream_type,
        stream: StreamData {
            subtitles: raw.subtitles.clone(),
            behavior_hints: StreamHints {
                country_whitelist: hints.country_whitelist,
                not_web_ready: hints.not_web_ready,
                proxy_headers: hints.proxy_headers.filter(|h| !h.is_unset()),
                video_hash: hints.video_hash,
            },
        },
    }
}

static SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s?([KMGT])i?B\b").unwrap());
static SEEDERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"👤\s*(\d+)").unwrap());
static INDEXER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:⚙\x{FE0F}?|🔍)\s*([^\n]+)").unwrap());
static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"⏱\x{FE0F}?\s*(?:(\d+)h)?\s*(?:(\d+)m)?\s*(?:(\d+)s)?").unwrap()
});
static SERVICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(RD|AD|PM|TB|DL|OC|ED|PKP)\s*(\+|⚡|⏳|download)?\]").unwrap()
});
static HASH_IN_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([a-f0-9]{40})\b").unwrap());

/// Debrid service tags as they appear in addon stream names.
const SERVICES: &[(&str, &str)] = &[
    ("RD", "realdebrid"),
    ("AD", "alldebrid"),
    ("PM", "premiumize"),
    ("TB", "torbox"),
    ("DL", "debridlink"),
    ("OC", "offcloud"),
    ("ED", "easydebrid"),
    ("PKP", "pikpak"),
];

fn extract_size(text: &str) -> Option<u64> {
    let caps = SIZE.captures(text)?;
    let value: f64 = caps.get(1)?.as_str().replace(',', ".").parse().ok()?;
    let exponent = match caps.get(2)?.as_str().to_ascii_uppercase().as_str() {
        "K" => 1,
        "M" => 2,
        "G" => 3,
        _ => 4,
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let bytes = (value * 1024_f64.powi(exponent)).round() as u64;
    Some(bytes)
}

fn extract_seeders(text: &str) -> Option<u32> {
    SEEDERS.captures(text)?.get(1)?.as_str().parse().ok()
}

fn extract_indexer(text: &str) -> Option<String> {
    let indexer = INDEXER.captures(text)?.get(1)?.as_str().trim();
    (!indexer.is_empty()).then(|| indexer.to_string())
}

fn extract_duration(text: &str) -> Option<u64> {
    let caps = DURATION.captures(text)?;
    let part = |i: usize| -> u64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    let seconds = part(1)
        .checked_mul(3600)?
        .checked_add(part(2).checked_mul(60)?)?
        .checked_add(part(3))?;
    (seconds > 0).then_some(seconds)
}

fn extract_provider(name: &str) -> Option<DebridProvider> {
    let caps = SERVICE.captures(name)?;
    let tag = caps.get(1)?.as_str();
    let id = SERVICES.iter().find(|(short, _)| *short == tag)?.1;
    let cached = caps.get(2).map(|m| matches!(m.as_str(), "+" | "⚡"));
    Some(DebridProvider {
        id: id.to_string(),
        cached,
    })
}

fn first_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(String::from)
}

/// Turns raw addon streams into [`ParsedStream`]s.
#[derive(Clone)]
pub struct StreamNormalizer {
    parser: Arc<dyn NameParser>,
}

impl std::fmt::Debug for StreamNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamNormalizer").finish_non_exhaustive()
    }
}

impl Default for StreamNormalizer {
    fn default() -> Self {
        Self::new(Arc::new(FilenameParser::new()))
    }
}

impl StreamNormalizer {
    pub fn new(parser: Arc<dyn NameParser>) -> Self {
        Self { parser }
    }

    /// Read the stream's free-text fields into a [`StreamContext`].
    ///
    /// Without a filename the stream name is parsed instead; a stream with
    /// neither keeps empty parsed data. Only a parser rejection is an error.
    pub fn context_for(&self, raw: &RawStream) -> Result<StreamContext, NormalizeError> {
        let text = raw.text().unwrap_or_default();
        let name = raw.name.as_deref().unwrap_or_default();
        let hints = raw.behavior_hints.as_ref();

        let (filename, folder_name) = match hints.and_then(|h| h.filename.clone()) {
            Some(filename) => (Some(filename), first_line(text)),
            None => (first_line(text), None),
        };
        let parsed = match filename.clone().or_else(|| first_line(name)) {
            Some(subject) => self.parser.parse(&subject).ok_or_else(|| {
                NormalizeError::Unparseable {
                    label: raw.label(),
                    filename: subject.clone(),
                }
            })?,
            None => ParsedNameData::default(),
        };

        let playable = raw.url.is_some() || raw.external_url.is_some() || raw.info_hash.is_some();
        let info_hash = raw.info_hash.clone().or_else(|| {
            let url = raw.url.as_deref()?;
            HASH_IN_URL
                .captures(url)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_ascii_lowercase())
        });

        Ok(StreamContext {
            parsed,
            filename,
            folder_name,
            message: (!playable).then(|| text.trim().to_string()).filter(|m| !m.is_empty()),
            provider: extract_provider(name),
            indexer: extract_indexer(text),
            size: hints.and_then(|h| h.video_size).or_else(|| extract_size(text)),
            seeders: extract_seeders(text),
            age: raw.age.clone(),
            duration: extract_duration(text),
            personal: (name.contains('☁') || text.contains('☁')).then_some(true),
            info_hash,
        })
    }

    /// Normalize one typed raw stream.
    pub fn normalize(
        &self,
        addon: &AddonInfo,
        raw: &RawStream,
    ) -> Result<ParsedStream, NormalizeError> {
        let ctx = self.context_for(raw)?;
        Ok(build_stream(addon, raw, ctx))
    }

    /// Normalize one untyped entry of an addon's `streams` array.
    pub fn normalize_value(
        &self,
        addon: &AddonInfo,
        value: Value,
    ) -> Result<ParsedStream, NormalizeError> {
        let label = value
            .get("name")
            .and_then(Value::as_str)
            .map_or_else(|| "unnamed stream".to_string(), |n| n.replace('\n', " "));
        let raw: RawStream = serde_json::from_value(value)
            .map_err(|source| NormalizeError::Invalid { label, source })?;
        self.normalize(addon, &raw)
    }
}
