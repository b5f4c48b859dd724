//! HTTP fetcher for an addon's `/stream/{type}/{id}.json` resource.
//!
//! Features:
//! - Fixed header template built once (User-Agent, configured extras,
//!   client IP forwarding)
//! - Per-host proxy routing via [`ProxyRouter`]
//! - Hard timeout covering connect, send and body; the in-flight request is
//!   dropped when it elapses
//! - Redacted logging of URLs, headers and the client IP

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Client, Proxy};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::WrapperConfig;
use crate::error::{Result, WrapperError};
use crate::manifest::manifest_base;
use crate::proxy::ProxyRouter;
use crate::redact::Redactor;
use crate::stream::source::{StreamRequest, StreamSource};

/// Headers carrying the caller's IP so addons see the original client.
pub const IP_FORWARD_HEADERS: [&str; 6] = [
    "x-client-ip",
    "x-forwarded-for",
    "x-real-ip",
    "true-client-ip",
    "x-forwarded",
    "forwarded-for",
];

/// Fetches raw streams from one addon.
#[derive(Debug)]
pub struct StreamFetcher {
    addon_name: String,
    manifest_url: String,
    timeout: Duration,
    headers: HeaderMap,
    client_ip: Option<String>,
    router: ProxyRouter,
    redactor: Redactor,
    direct: Client,
    proxied: Option<Client>,
}

impl StreamFetcher {
    /// Create a fetcher for the addon at `manifest_url`.
    ///
    /// Empty configured header values are dropped. Header names or values
    /// that are not valid HTTP, and an unusable proxy URL, are config errors.
    pub fn new(
        addon_name: impl Into<String>,
        manifest_url: impl Into<String>,
        config: &WrapperConfig,
        client_ip: Option<String>,
    ) -> Result<Self> {
        let addon_name = addon_name.into();
        let headers = build_headers(config, client_ip.as_deref())?;
        let router = ProxyRouter::from_config(&config.proxy);

        let direct = client_builder().no_proxy().build().map_err(config_error)?;
        let proxied = match config.proxy.url.as_deref().filter(|_| router.is_enabled()) {
            Some(proxy_url) => {
                let proxy = Proxy::all(proxy_url).map_err(config_error)?;
                Some(client_builder().proxy(proxy).build().map_err(config_error)?)
            }
            None => {
                if router.is_enabled() {
                    warn!(
                        addon = %addon_name,
                        "Proxy routing enabled without a proxy URL, requests go direct"
                    );
                }
                None
            }
        };

        Ok(Self {
            addon_name,
            manifest_url: manifest_url.into(),
            timeout: config.timeout(),
            headers,
            client_ip,
            router,
            redactor: config.redactor(),
            direct,
            proxied,
        })
    }

    #[must_use]
    pub fn manifest_url(&self) -> &str {
        &self.manifest_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Headers sent with every request.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// `{manifest base}/stream/{type}/{encoded id}.json`
    #[must_use]
    pub fn stream_url(&self, request: &StreamRequest) -> String {
        format!(
            "{}/stream/{}/{}.json",
            manifest_base(&self.manifest_url),
            request.media_type,
            urlencoding::encode(&request.media_id)
        )
    }

    fn client_for(&self, url: &str) -> &Client {
        match &self.proxied {
            Some(proxied) if self.router.should_proxy(url) => proxied,
            _ => &self.direct,
        }
    }

    fn log_request(&self, url: &str) {
        let client_ip = self
            .client_ip
            .as_deref()
            .map_or_else(|| "none".to_string(), |ip| self.redactor.mask(ip));

        match self.redactor.url(url) {
            Ok(redacted) => info!(
                addon = %self.addon_name,
                url = %redacted,
                client_ip = %client_ip,
                "Fetching streams"
            ),
            Err(e) => debug!(addon = %self.addon_name, error = %e, "Stream URL not loggable"),
        }

        let masked: Vec<String> = self
            .headers
            .iter()
            .map(|(name, value)| {
                format!("{name}: {}", self.redactor.mask(value.to_str().unwrap_or_default()))
            })
            .collect();
        debug!(headers = ?masked, "Request headers");
    }

    async fn execute(&self, url: &str) -> Result<Vec<Value>> {
        let response = self
            .client_for(url)
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.request_error(e))?;

        if !status.is_success() {
            return Err(WrapperError::HttpStatus {
                addon: self.addon_name.clone(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                body: serde_json::from_slice(&body).ok(),
            });
        }

        let malformed = |detail: String| WrapperError::MalformedResponse {
            addon: self.addon_name.clone(),
            detail,
        };
        let value: Value =
            serde_json::from_slice(&body).map_err(|e| malformed(format!("invalid JSON: {e}")))?;

        match value {
            Value::Object(mut object) => match object.remove("streams") {
                Some(Value::Array(streams)) => Ok(streams),
                Some(_) => Err(malformed("streams is not an array".into())),
                None => Err(malformed("missing streams field".into())),
            },
            _ => Err(malformed("response is not a JSON object".into())),
        }
    }

    fn request_error(&self, e: reqwest::Error) -> WrapperError {
        if e.is_timeout() {
            return WrapperError::Timeout {
                addon: self.addon_name.clone(),
                timeout: self.timeout,
            };
        }
        // The URL may carry addon credentials
        WrapperError::Request {
            addon: self.addon_name.clone(),
            source: e.without_url(),
        }
    }
}

#[async_trait]
impl StreamSource for StreamFetcher {
    fn name(&self) -> &str {
        &self.addon_name
    }

    #[instrument(skip(self), fields(addon = %self.addon_name))]
    async fn fetch_streams(&self, request: &StreamRequest) -> Result<Vec<Value>> {
        let url = self.stream_url(request);
        self.log_request(&url);

        let streams = tokio::time::timeout(self.timeout, self.execute(&url))
            .await
            .map_err(|_| WrapperError::Timeout {
                addon: self.addon_name.clone(),
                timeout: self.timeout,
            })??;

        debug!(count = streams.len(), "Addon returned streams");
        Ok(streams)
    }
}

fn client_builder() -> reqwest::ClientBuilder {
    Client::builder()
        .use_rustls_tls()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_nodelay(true)
        .brotli(true)
        .zstd(true)
        .gzip(true)
        .deflate(true)
        .redirect(reqwest::redirect::Policy::limited(10))
}

fn build_headers(config: &WrapperConfig, client_ip: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, header_value(&config.user_agent)?);

    for (name, value) in config.headers.iter().filter(|(_, v)| !v.trim().is_empty()) {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| WrapperError::Config(format!("invalid header name {name:?}: {e}")))?;
        headers.insert(name, header_value(value)?);
    }

    if let Some(ip) = client_ip {
        let value = header_value(ip)?;
        for name in IP_FORWARD_HEADERS {
            headers.insert(HeaderName::from_static(name), value.clone());
        }
    }

    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| WrapperError::Config(format!("invalid header value: {e}")))
}

fn config_error(e: reqwest::Error) -> WrapperError {
    WrapperError::Config(e.to_string())
}
