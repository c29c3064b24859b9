use crate::api::ApiError;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(e) = self.0.downcast_ref::<MultipartError>() {
            tracing::warn!("Malformed form submission: {}", e);
            return (e.status(), e.body_text()).into_response();
        }

        match self.0.downcast_ref::<ApiError>() {
            Some(ApiError::NotFound(what)) => {
                tracing::debug!("Not found: {}", what);
                (StatusCode::NOT_FOUND, "Not found").into_response()
            }
            Some(ApiError::Transport(e)) => {
                tracing::error!("Backend unreachable: {}", e);
                (StatusCode::BAD_GATEWAY, "Portfolio API unreachable").into_response()
            }
            _ => {
                tracing::error!("Application error: {:?}", self.0);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;
