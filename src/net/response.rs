//! Minimal asset response model.
//!
//! This struct represents a **fully buffered** response returned by an
//! [`AssetFetcher`](crate::net::AssetFetcher). It contains the final URL (after redirects,
//! if the client follows them), status code + reason, response headers, and the raw body bytes.
//!
//! ## Notes
//! - The body is stored as raw `Vec<u8>` and is handed to the image decoder as-is.
//! - `headers` is an `http::HeaderMap`, which is **case-insensitive** for
//!   header names. Directory fetches leave it empty.
//! - `status_text` is typically derived from the status code’s canonical
//!   reason phrase and may be `"Unknown"` for non-standard codes.
//!
use http::HeaderMap;

/// Simple structure for asset responses.
#[derive(Debug)]
pub struct Response {
    /// Final URL of the response (after redirects, if any).
    pub url: url::Url,

    /// Numeric status code (e.g., `200`). Directory fetches always report `200`.
    pub status: u16,

    /// Human-readable reason phrase (e.g., `"OK"`).
    pub status_text: String,

    /// Response headers as a case-insensitive map.
    pub headers: HeaderMap,

    /// Raw response body bytes.
    pub body: Vec<u8>,
}

impl Response {
    /// A successful response carrying `body`, as produced by non-HTTP fetchers.
    pub fn ok(url: url::Url, body: Vec<u8>) -> Self {
        Self {
            url,
            status: 200,
            status_text: "OK".to_string(),
            headers: HeaderMap::new(),
            body,
        }
    }

    /// Value of the `Content-Type` header, if present and readable.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(http::header::CONTENT_TYPE)?.to_str().ok()
    }
}
