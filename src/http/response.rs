//! Response finalization.
//!
//! # Responsibilities
//! - Define the hook run on every response before its header block is sent
//! - Apply the hook as middleware around the static file service
//!
//! # Design Decisions
//! - The hook sees only the header map; status, body, and streaming are untouched
//! - Runs for every status code the inner stack produces (200, 304, 404, 405, 408, ...)
//! - Hooks are stateless and shared as `Arc<dyn ResponseHook>` across connections
//! - `Date` and `Content-Length` are settled before the hook runs, so hyper has
//!   nothing left to add after the hook's headers except `Connection`

use std::sync::Arc;
use std::time::SystemTime;

use axum::{
    body::HttpBody,
    extract::{Request, State},
    http::{
        header::{CONTENT_LENGTH, DATE, TRANSFER_ENCODING},
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::Response,
};

/// Callback invoked once per exchange after the inner service has built its
/// headers and before hyper writes the terminating blank line.
pub trait ResponseHook: Send + Sync + 'static {
    fn on_headers_complete(&self, headers: &mut HeaderMap);
}

impl<F> ResponseHook for F
where
    F: Fn(&mut HeaderMap) + Send + Sync + 'static,
{
    fn on_headers_complete(&self, headers: &mut HeaderMap) {
        self(headers)
    }
}

/// Shared handle to the hook installed on a router.
pub type SharedHook = Arc<dyn ResponseHook>;

/// Middleware that runs the inner stack, fills in `Date` and `Content-Length`,
/// then hands the response headers to the hook.
pub async fn finalize_headers(
    State(hook): State<SharedHook>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let body_len = response.body().size_hint().exact();
    let headers = response.headers_mut();
    stamp_date(headers);
    if let Some(len) = body_len {
        stamp_content_length(headers, len);
    }
    hook.on_headers_complete(headers);
    response
}

fn stamp_date(headers: &mut HeaderMap) {
    if headers.contains_key(DATE) {
        return;
    }
    if let Ok(value) = HeaderValue::from_str(&httpdate::fmt_http_date(SystemTime::now())) {
        headers.insert(DATE, value);
    }
}

// Same rule axum's router applies, only earlier.
fn stamp_content_length(headers: &mut HeaderMap, len: u64) {
    if headers.contains_key(CONTENT_LENGTH) || headers.contains_key(TRANSFER_ENCODING) {
        return;
    }
    headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
}
