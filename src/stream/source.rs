//! Stream source trait and request type.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// What to ask an addon for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRequest {
    /// Stremio content type (`movie`, `series`, `channel`, `tv`, ...).
    pub media_type: String,
    /// Content id, e.g. `tt0133093` or `tt0944947:1:1`.
    pub media_id: String,
}

impl StreamRequest {
    pub fn new(media_type: impl Into<String>, media_id: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            media_id: media_id.into(),
        }
    }
}

/// Anything that can produce an addon's raw `streams` array.
///
/// [`crate::fetcher::StreamFetcher`] is the HTTP implementation; hosts and
/// tests may supply their own.
#[async_trait]
pub trait StreamSource: Send + Sync {
    /// Addon name used in error messages.
    fn name(&self) -> &str;

    /// Fetch the raw stream objects for `request`, in addon order.
    async fn fetch_streams(&self, request: &StreamRequest) -> Result<Vec<Value>>;
}
