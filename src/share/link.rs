//! Share links: a snapshot compressed into the `data` query parameter.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, warn};
use url::Url;

use super::codec::{compress, decompress};
use super::snapshot::Snapshot;
use crate::error::{PlanError, Result};

/// Query parameter carrying the compressed snapshot.
pub const SHARE_PARAM: &str = "data";

/// Default endpoint of the TinyURL creation API.
pub const TINYURL_ENDPOINT: &str = "https://tinyurl.com/api-create.php";

const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Compress a snapshot into a share payload.
pub fn encode_payload(snapshot: &Snapshot) -> Result<String> {
    Ok(compress(&snapshot.to_json()?))
}

/// Decode a share payload.
///
/// # Returns
/// `Ok(None)` when the payload is empty or decompresses to nothing.
///
/// # Errors
/// [`PlanError::CorruptPersistedState`] for payloads that do not decompress
/// or do not hold a snapshot.
pub fn decode_payload(payload: &str) -> Result<Option<Snapshot>> {
    match decompress(payload.trim())? {
        Some(json) if !json.is_empty() => Snapshot::from_json(&json).map(Some),
        _ => Ok(None),
    }
}

/// Build the long share URL for `snapshot`.
///
/// Any query string or fragment already on `base_url` is dropped.
pub fn build_share_url(base_url: &str, snapshot: &Snapshot) -> Result<String> {
    let base = base_url.split(['?', '#']).next().unwrap_or(base_url);
    Ok(format!("{base}?{SHARE_PARAM}={}", encode_payload(snapshot)?))
}

/// A snapshot read from a share URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedPlan {
    pub snapshot: Snapshot,
    /// The input URL with the share parameter removed
    pub clean_url: String,
}

/// Extract the shared snapshot from a URL.
///
/// # Returns
/// `Ok(None)` when the URL has no (or an empty) share parameter.
///
/// # Errors
/// [`PlanError::InvalidUrl`] if `input` is not a URL, and
/// [`PlanError::CorruptPersistedState`] if the parameter does not decode.
pub fn parse_share_url(input: &str) -> Result<Option<SharedPlan>> {
    let mut url = Url::parse(input.trim())
        .map_err(|e| PlanError::InvalidUrl(format!("{input}: {e}")))?;

    let Some(payload) = url
        .query_pairs()
        .find(|(key, _)| key == SHARE_PARAM)
        .map(|(_, value)| value.into_owned())
    else {
        return Ok(None);
    };

    let Some(snapshot) = decode_payload(&payload)? else {
        return Ok(None);
    };

    let remaining: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != SHARE_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if remaining.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(remaining);
    }

    debug!(rows = snapshot.rows.len(), "Decoded shared plan");
    Ok(Some(SharedPlan {
        snapshot,
        clean_url: url.to_string(),
    }))
}

/// Shortens long URLs through some external service.
pub trait UrlShortener {
    fn shorten(&self, long_url: &str) -> Result<String>;
}

/// [`UrlShortener`] backed by TinyURL's `api-create.php`.
pub struct TinyUrlShortener {
    client: Client,
    endpoint: Url,
}

impl TinyUrlShortener {
    /// Create a shortener for `endpoint`, with `timeout` bounding each request.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| PlanError::InvalidUrl(format!("{endpoint}: {e}")))?;
        let client = Client::builder()
            .connect_timeout(timeout.min(Duration::from_secs(CONNECT_TIMEOUT_SECS)))
            .timeout(timeout)
            .user_agent(concat!("skillplan/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, endpoint })
    }

    fn request_url(&self, long_url: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("url", long_url);
        url
    }
}

impl UrlShortener for TinyUrlShortener {
    fn shorten(&self, long_url: &str) -> Result<String> {
        let response = self
            .client
            .get(self.request_url(long_url))
            .send()?
            .error_for_status()?;
        let text = response.text()?;
        let text = text.trim();
        if text.starts_with("http") {
            Ok(text.to_string())
        } else {
            Err(PlanError::ShortenerRejected(text.chars().take(80).collect()))
        }
    }
}

/// Shorten `long_url`, falling back to it on any failure.
pub fn shorten_or_original(shortener: &dyn UrlShortener, long_url: &str) -> String {
    match shortener.shorten(long_url) {
        Ok(short) => short,
        Err(e) => {
            warn!("URL shortening failed, using the long URL: {e}");
            long_url.to_string()
        }
    }
}
