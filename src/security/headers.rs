//! Cross-origin isolation response headers.
//!
//! Browsers only expose `SharedArrayBuffer` and high-resolution timers to
//! documents that are cross-origin isolated, which requires both headers below
//! on the document and its subresources.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::http::response::ResponseHook;

pub const CROSS_ORIGIN_EMBEDDER_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-embedder-policy");
pub const CROSS_ORIGIN_OPENER_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-opener-policy");

pub const REQUIRE_CORP: HeaderValue = HeaderValue::from_static("require-corp");
pub const SAME_ORIGIN: HeaderValue = HeaderValue::from_static("same-origin");

/// Appends COEP then COOP to every response.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossOriginIsolation;

impl ResponseHook for CrossOriginIsolation {
    fn on_headers_complete(&self, headers: &mut HeaderMap) {
        headers.append(CROSS_ORIGIN_EMBEDDER_POLICY, REQUIRE_CORP);
        headers.append(CROSS_ORIGIN_OPENER_POLICY, SAME_ORIGIN);
    }
}
