//! `addon-wrapper` - Stream addon client and normalizer
//!
//! # Features
//!
//! - **Fetching**: one `GET /stream/{type}/{id}.json` per request, with a hard
//!   timeout, client IP forwarding and per-host proxy routing
//! - **Normalization**: loosely typed addon streams become [`ParsedStream`]
//!   records classified as p2p, usenet, debrid, live or unknown
//! - **Safe logging**: addon URLs, headers and client IPs are redacted before
//!   they reach the log
//!
//! # Example
//!
//! ```rust,no_run
//! use addon_wrapper::{AddonInfo, AddonWrapper, StreamRequest, WrapperConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = WrapperConfig::load()?;
//!     let wrapper = AddonWrapper::new(
//!         AddonInfo::new("Torrentio", "torrentio"),
//!         "stremio://torrentio.strem.fun/",
//!         &config,
//!         None,
//!     )?;
//!     let result = wrapper
//!         .get_parsed_streams(&StreamRequest::new("movie", "tt0133093"))
//!         .await;
//!     println!("{} streams, {} errors", result.streams.len(), result.errors.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod fetcher;
pub mod manifest;
pub mod normalize;
pub mod parser;
pub mod proxy;
pub mod redact;
pub mod stream;
pub mod wrapper;

pub use config::{ProxyConfig, WrapperConfig};
pub use error::{ErrorKind, WrapperError};
pub use fetcher::StreamFetcher;
pub use normalize::{NormalizeError, StreamContext, StreamNormalizer};
pub use parser::{FilenameParser, NameParser, ParsedNameData};
pub use proxy::{ProxyRouter, ProxyRule};
pub use redact::Redactor;
pub use stream::{AddonInfo, ParsedStream, RawStream, StreamRequest, StreamSource, StreamType};
pub use wrapper::{AddonWrapper, ParsedStreams};

/// Version of addon-wrapper
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
