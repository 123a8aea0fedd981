//! Bot source fetching and content-kind detection
//!
//! A [`Source`] is one configured catalog URL. Each refresh issues a single
//! GET per source; the first successful response is sniffed to decide which
//! parser applies, and the decision sticks for the lifetime of the source so
//! later refreshes skip the sniffing entirely.

use crate::index::BotIndex;
use crate::{parser, Result, WardenError};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

/// Default per-request deadline for source fetches
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// The shape a source serves its catalog in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// JSON object of per-bot metadata
    Json,
    /// Robots exclusion format (RFC 9309)
    Exclusion,
    /// Bare newline-separated name list
    Plaintext,
}

/// One configured bot catalog location
#[derive(Debug, Clone)]
pub struct Source {
    /// The URL fetched on every refresh
    pub url: String,
    /// Content kind remembered from the first successful fetch
    kind: Option<ContentKind>,
}

impl Source {
    /// Creates a source that has not been fetched yet
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: None,
        }
    }

    /// Returns the remembered content kind, if any fetch succeeded yet
    pub fn kind(&self) -> Option<ContentKind> {
        self.kind
    }

    /// Builds the HTTP client shared by all sources of a manager
    pub fn build_client() -> Result<Client> {
        Ok(Client::builder().timeout(FETCH_TIMEOUT).build()?)
    }

    /// Fetches this source and parses the response into a [`BotIndex`]
    ///
    /// Success requires HTTP 200 exactly; any other status, a transport
    /// failure, or a malformed URL is an error. On the first success the
    /// content kind is detected and cached on the source.
    ///
    /// # Arguments
    ///
    /// * `client` - The shared HTTP client
    pub async fn fetch_index(&mut self, client: &Client) -> Result<BotIndex> {
        let response = client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| WardenError::Http {
                url: self.url.clone(),
                source: e,
            })?;

        if response.status() != StatusCode::OK {
            return Err(WardenError::SourceStatus {
                url: self.url.clone(),
                status: response.status(),
            });
        }

        let headers = response.headers().clone();
        let final_url = response.url().clone();
        let body = response.text().await.map_err(|e| WardenError::Http {
            url: self.url.clone(),
            source: e,
        })?;

        let kind = match self.kind {
            Some(kind) => kind,
            None => {
                let kind = detect_kind(&headers, &final_url, &body);
                tracing::debug!("source '{}' detected as {:?}", self.url, kind);
                self.kind = Some(kind);
                kind
            }
        };

        parser::parse(kind, &body, &self.url)
    }
}

/// Decides which parser applies to a response
///
/// Checks run in order, first match wins:
/// 1. `Content-Type: application/json`
/// 2. the final (post-redirect) URL path ends in `.json`
/// 3. unless `X-Content-Type-Options: nosniff`, a body starting with `{`
/// 4. any line that is a `User-agent` directive marks exclusion format
/// 5. everything else is a plain name list
fn detect_kind(headers: &HeaderMap, final_url: &Url, body: &str) -> ContentKind {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let media_type = content_type.split(';').next().unwrap_or("").trim();
    if media_type.eq_ignore_ascii_case("application/json") {
        return ContentKind::Json;
    }

    if final_url.path().ends_with(".json") {
        return ContentKind::Json;
    }

    let sniff_allowed = headers
        .get("x-content-type-options")
        .and_then(|v| v.to_str().ok())
        .map(|v| !v.trim().eq_ignore_ascii_case("nosniff"))
        .unwrap_or(true);
    if sniff_allowed && body.as_bytes().first() == Some(&b'{') {
        return ContentKind::Json;
    }

    if body.lines().any(parser::is_user_agent_line) {
        return ContentKind::Exclusion;
    }

    ContentKind::Plaintext
}
