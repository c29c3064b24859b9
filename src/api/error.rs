use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("backend rejected the request ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid endpoint URL: {0}")]
    Url(String),
}

impl ApiError {
    /// A 4xx the user can fix by changing the form, such as a missing title
    /// or a duplicate email.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Status { status, .. } if (400..500).contains(status))
    }

    /// Message suitable for showing next to the form that caused it.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::NotFound(what) => format!("{what} no longer exists"),
            other => other.to_string(),
        }
    }
}

/// Pull the message out of a `{"error": "..."}` body, falling back to the raw
/// body and then to the status reason.
pub(crate) fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: String,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.error;
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.chars().take(200).collect();
    }
    status
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn error_field_wins() {
        let msg = error_message(r#"{"error":"Email already exists"}"#, StatusCode::BAD_REQUEST);
        assert_eq!(msg, "Email already exists");
    }

    #[test]
    fn falls_back_to_body_then_reason() {
        assert_eq!(error_message("boom", StatusCode::BAD_REQUEST), "boom");
        assert_eq!(error_message("  ", StatusCode::BAD_REQUEST), "Bad Request");
    }

    #[test]
    fn only_client_errors_are_rejections() {
        let rejected = ApiError::Status {
            status: 400,
            message: "Title and slug are required".into(),
        };
        let failed = ApiError::Status {
            status: 500,
            message: "oops".into(),
        };
        assert!(rejected.is_rejection());
        assert!(!failed.is_rejection());
        assert!(!ApiError::NotFound("blog".into()).is_rejection());
    }
}
