use crate::web::state::AppState;
use anyhow::Result;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderValue, Request, Response};
use axum::middleware::Next;
use std::sync::Arc;
use url::Url;

/// CSP for the admin pages. Images may also come from the backend's CDN.
pub fn content_security_policy(cdn_base: &str) -> Result<HeaderValue> {
    let cdn_origin = Url::parse(cdn_base)?.origin().ascii_serialization();
    let policy = format!(
        "default-src 'self'; script-src 'self' 'unsafe-inline' https://unpkg.com; style-src 'self' 'unsafe-inline'; img-src 'self' data: blob: {}; font-src 'self'; frame-ancestors 'none'; base-uri 'self'; form-action 'self'",
        cdn_origin
    );
    Ok(HeaderValue::from_str(&policy)?)
}

pub fn security_headers<B>(mut response: Response<B>, csp: &HeaderValue) -> Response<B> {
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );

    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    headers.insert(header::CONTENT_SECURITY_POLICY, csp.clone());

    response
}

pub async fn apply_security_headers(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let response = next.run(request).await;
    security_headers(response, &state.content_security_policy)
}
