use crate::api::Resource;
use crate::models::{Language, LanguageInput};
use crate::services::listing;
use crate::web::error::AppResult;
use crate::web::extractors::HxRequest;
use crate::web::forms::MultipartForm;
use crate::web::handlers::{
    form_status, make_admin_context, redirect_to, render, take_upload, ListQuery,
};
use crate::web::state::AppState;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct LanguageFormView {
    id: Option<String>,
    name: String,
    icon: Option<String>,
}

fn render_form(
    state: &AppState,
    view: &LanguageFormView,
    error: Option<String>,
) -> AppResult<Response> {
    let mut ctx = make_admin_context(state, "languages");
    ctx.insert("language", view);
    ctx.insert("is_new", &view.id.is_none());
    ctx.insert("error", &error);
    render(state, "admin/languages/form.html", &ctx, form_status(&error))
}

fn read_submission(form: &MultipartForm, id: Option<String>) -> (LanguageInput, LanguageFormView) {
    let input = LanguageInput {
        name: form.text("name").trim().to_string(),
    };
    let view = LanguageFormView {
        id,
        name: input.name.clone(),
        icon: form.get("current_icon").filter(|s| !s.is_empty()).map(String::from),
    };
    (input, view)
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> AppResult<Response> {
    let languages = listing::search(state.api.list::<Language>().await?, &query.q);

    let mut ctx = make_admin_context(&state, "languages");
    ctx.insert("languages", &languages);
    ctx.insert("q", &query.q);

    render(&state, "admin/languages/index.html", &ctx, StatusCode::OK)
}

pub async fn new_language(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let view = LanguageFormView {
        id: None,
        name: String::new(),
        icon: None,
    };
    render_form(&state, &view, None)
}

pub async fn create_language(
    State(state): State<Arc<AppState>>,
    HxRequest(is_htmx): HxRequest,
    multipart: Multipart,
) -> AppResult<Response> {
    let mut form = MultipartForm::read(multipart, state.upload_limit).await?;
    let (input, view) = read_submission(&form, None);

    let upload = match take_upload(&state, &mut form, Language::FILE_FIELD) {
        Ok(upload) => upload,
        Err(e) => return render_form(&state, &view, Some(e.to_string())),
    };

    match state.api.create::<Language>(&input, upload).await {
        Ok(_) => Ok(redirect_to("/admin/languages", is_htmx)),
        Err(e) if e.is_rejection() => render_form(&state, &view, Some(e.user_message())),
        Err(e) => Err(e.into()),
    }
}

pub async fn edit_language(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let language = state.api.get::<Language>(&id).await?;
    let view = LanguageFormView {
        id: Some(language.id),
        name: language.name,
        icon: language.icon,
    };
    render_form(&state, &view, None)
}

pub async fn update_language(
    State(state): State<Arc<AppState>>,
    HxRequest(is_htmx): HxRequest,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Response> {
    let mut form = MultipartForm::read(multipart, state.upload_limit).await?;
    let (input, view) = read_submission(&form, Some(id.clone()));

    let upload = match take_upload(&state, &mut form, Language::FILE_FIELD) {
        Ok(upload) => upload,
        Err(e) => return render_form(&state, &view, Some(e.to_string())),
    };

    match state.api.update::<Language>(&id, &input, upload).await {
        Ok(_) => Ok(redirect_to("/admin/languages", is_htmx)),
        Err(e) if e.is_rejection() => render_form(&state, &view, Some(e.user_message())),
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_language(
    State(state): State<Arc<AppState>>,
    HxRequest(is_htmx): HxRequest,
    Path(id): Path<String>,
) -> AppResult<Response> {
    state.api.delete::<Language>(&id).await?;
    Ok(redirect_to("/admin/languages", is_htmx))
}
