use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::future::Future;
use std::pin::Pin;

/// Whether the request was issued by htmx.
pub struct HxRequest(pub bool);

impl<S> FromRequestParts<S> for HxRequest
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> Pin<Box<dyn Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>>
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        let is_htmx = parts.headers.get("HX-Request").is_some();
        Box::pin(async move { Ok(HxRequest(is_htmx)) })
    }
}

/// `name` attribute of the element that triggered an htmx request.
pub struct HxTriggerName(pub Option<String>);

impl<S> FromRequestParts<S> for HxTriggerName
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> Pin<Box<dyn Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>>
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        let name = parts
            .headers
            .get("HX-Trigger-Name")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        Box::pin(async move { Ok(HxTriggerName(name)) })
    }
}
