//! The addon wrapper: fetch, normalize, partition.

use std::future::Future;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::WrapperConfig;
use crate::error::{ErrorKind, Result, WrapperError};
use crate::fetcher::StreamFetcher;
use crate::manifest::manifest_url;
use crate::normalize::StreamNormalizer;
use crate::stream::parsed::{AddonInfo, ParsedStream};
use crate::stream::source::{StreamRequest, StreamSource};

/// Result of one addon request: whatever normalized, plus a message for
/// everything that did not.
#[derive(Debug, Default, Serialize)]
pub struct ParsedStreams {
    pub streams: Vec<ParsedStream>,
    pub errors: Vec<String>,
    /// Set when the request itself failed; `streams` is empty in that case.
    #[serde(skip)]
    pub fetch_error: Option<ErrorKind>,
}

/// Queries one addon and normalizes its streams.
///
/// Stateless across requests: the addon identity, manifest URL, timeout,
/// header template and client IP are fixed at construction.
pub struct AddonWrapper {
    addon: AddonInfo,
    source: Box<dyn StreamSource>,
    normalizer: StreamNormalizer,
}

impl std::fmt::Debug for AddonWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddonWrapper")
            .field("addon", &self.addon)
            .field("source", &self.source.name())
            .finish_non_exhaustive()
    }
}

impl AddonWrapper {
    /// Wrap the addon at `base_url` (any of `stremio://host/cfg`,
    /// `https://host/cfg/` or a full manifest URL).
    pub fn new(
        addon: AddonInfo,
        base_url: &str,
        config: &WrapperConfig,
        client_ip: Option<String>,
    ) -> Result<Self> {
        let fetcher =
            StreamFetcher::new(addon.name.clone(), manifest_url(base_url), config, client_ip)?;
        Ok(Self::with_source(addon, Box::new(fetcher), StreamNormalizer::default()))
    }

    /// Wrap an arbitrary stream source.
    pub fn with_source(
        addon: AddonInfo,
        source: Box<dyn StreamSource>,
        normalizer: StreamNormalizer,
    ) -> Self {
        Self {
            addon,
            source,
            normalizer,
        }
    }

    #[must_use]
    pub fn addon(&self) -> &AddonInfo {
        &self.addon
    }

    /// Fetch and normalize the streams for `request`.
    ///
    /// Never fails as a whole: a failed fetch yields a single error message
    /// and no streams, a stream that does not normalize is dropped and its
    /// message kept. Streams and errors keep the addon's order.
    pub async fn get_parsed_streams(&self, request: &StreamRequest) -> ParsedStreams {
        let fetched = self.source.fetch_streams(request).await;
        self.collect(fetched)
    }

    /// Like [`Self::get_parsed_streams`], abandoning the in-flight request
    /// when `cancel` completes first.
    pub async fn get_parsed_streams_until<F>(
        &self,
        request: &StreamRequest,
        cancel: F,
    ) -> ParsedStreams
    where
        F: Future<Output = ()> + Send,
    {
        let fetched = tokio::select! {
            fetched = self.source.fetch_streams(request) => fetched,
            () = cancel => Err(WrapperError::Cancelled { addon: self.addon.name.clone() }),
        };
        self.collect(fetched)
    }

    fn collect(&self, fetched: Result<Vec<serde_json::Value>>) -> ParsedStreams {
        let raw_streams = match fetched {
            Ok(streams) => streams,
            Err(e) => {
                warn!(addon = %self.addon.name, error = %e, "Failed to fetch streams");
                return ParsedStreams {
                    streams: Vec::new(),
                    errors: vec![e.to_string()],
                    fetch_error: Some(e.kind()),
                };
            }
        };

        let mut result = ParsedStreams::default();
        for value in raw_streams {
            match self.normalizer.normalize_value(&self.addon, value) {
                Ok(stream) => result.streams.push(stream),
                Err(e) => {
                    debug!(addon = %self.addon.name, error = %e, "Dropping stream");
                    result.errors.push(e.to_string());
                }
            }
        }

        debug!(
            addon = %self.addon.name,
            parsed = result.streams.len(),
            failed = result.errors.len(),
            "Normalized streams"
        );
        result
    }
}
