pub mod admin;
pub mod blogs;
pub mod categories;
pub mod htmx;
pub mod languages;
pub mod projects;
pub mod users;

use crate::models::ImageUpload;
use crate::services::upload::{self, UploadError};
use crate::web::error::AppResult;
use crate::web::forms::MultipartForm;
use crate::web::state::AppState;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use tera::Context;

pub(crate) fn make_admin_context(state: &AppState, section: &str) -> Context {
    let mut ctx = Context::new();
    ctx.insert("admin_title", &state.config.admin.title);
    ctx.insert("section", section);
    ctx.insert("version", env!("CARGO_PKG_VERSION"));
    ctx.insert("max_upload_size", &state.config.uploads.max_upload_size);
    ctx
}

pub(crate) fn render(
    state: &AppState,
    template: &str,
    ctx: &Context,
    status: StatusCode,
) -> AppResult<Response> {
    let html = state.templates.render(template, ctx)?;
    Ok((status, Html(html)).into_response())
}

/// Status for an editor page: 422 when it is shown again because of an error.
pub(crate) fn form_status(error: &Option<String>) -> StatusCode {
    if error.is_some() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::OK
    }
}

/// After a mutation, send the browser back to a list screen.
pub(crate) fn redirect_to(path: &str, is_htmx: bool) -> Response {
    if is_htmx {
        (
            [(
                header::HeaderName::from_static("hx-redirect"),
                path.to_string(),
            )],
            "",
        )
            .into_response()
    } else {
        Redirect::to(path).into_response()
    }
}

pub(crate) fn take_upload(
    state: &AppState,
    form: &mut MultipartForm,
    field: Option<&'static str>,
) -> Result<Option<ImageUpload>, UploadError> {
    let Some(field) = field else {
        return Ok(None);
    };
    match form.take_file(field) {
        Some(part) if part.exceeds(state.upload_limit) => Err(UploadError::TooLarge {
            size: part.size,
            max: state.upload_limit,
        }),
        _ if form.is_truncated() => Err(UploadError::SubmissionTooLarge {
            max: state.upload_limit,
        }),
        Some(part) => upload::accept_image(field, &part.file_name, part.data, state.upload_limit),
        None => Ok(None),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub q: String,
    /// Blog list only: restrict to one category id.
    #[serde(default)]
    pub category: Option<String>,
}
