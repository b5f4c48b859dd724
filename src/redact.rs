//! Log redaction for addon URLs, headers and client addresses.
//!
//! Addon URLs routinely embed API keys or user configuration in their path
//! (`https://addon.example.com/<base64 config>/stream/movie/tt123.json`).
//! Every log call site in this crate goes through a [`Redactor`] so those
//! values never reach the log sink.

use std::fmt::Write;

use url::Url;

use crate::error::Result;

/// Placeholder written in place of a sensitive value.
pub const REDACTED: &str = "<redacted>";

/// Number of trailing path segments kept verbatim (`stream/{type}/{id}.json`).
const KEPT_SEGMENTS: usize = 3;

/// Masks sensitive values before they are logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Redactor {
    reveal: bool,
}

impl Redactor {
    /// A redactor that masks everything.
    #[must_use]
    pub const fn new() -> Self {
        Self { reveal: false }
    }

    /// A redactor that passes values through untouched. Local debugging only.
    #[must_use]
    pub const fn revealing() -> Self {
        Self { reveal: true }
    }

    /// Mask a single value. Empty values stay empty.
    #[must_use]
    pub fn mask(&self, value: &str) -> String {
        if self.reveal || value.is_empty() {
            value.to_string()
        } else {
            REDACTED.to_string()
        }
    }

    /// Log-safe rendering of an absolute URL.
    ///
    /// Scheme and host are kept, every path segment before the last three is
    /// masked on its own, the query string is dropped.
    pub fn url(&self, raw: &str) -> Result<String> {
        let url = Url::parse(raw)?;
        let mut out = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());
        if let Some(port) = url.port() {
            let _ = write!(out, ":{port}");
        }

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.collect())
            .unwrap_or_default();
        let masked_until = segments.len().saturating_sub(KEPT_SEGMENTS);

        let path = segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                if i < masked_until {
                    self.mask(segment)
                } else {
                    (*segment).to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("/");

        out.push('/');
        out.push_str(&path);
        Ok(out)
    }
}

/// Mask a sensitive value with the default [`Redactor`].
#[must_use]
pub fn mask_sensitive(value: &str) -> String {
    Redactor::new().mask(value)
}

/// Redact an addon URL with the default [`Redactor`].
pub fn redact_url(raw: &str) -> Result<String> {
    Redactor::new().url(raw)
}
