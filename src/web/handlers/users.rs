use crate::api::Resource;
use crate::models::{User, UserInput};
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
struct UserFormView {
    id: Option<String>,
    name: String,
    email: String,
    avatar: Option<String>,
}

impl UserFormView {
    fn blank() -> Self {
        Self {
            id: None,
            name: String::new(),
            email: String::new(),
            avatar: None,
        }
    }

    fn from_user(user: &User) -> Self {
        let input = UserInput::from(user);
        Self {
            id: Some(user.id.clone()),
            name: input.name,
            email: input.email,
            avatar: user.avatar.clone(),
        }
    }
}

fn read_submission(form: &MultipartForm, id: Option<String>) -> (UserInput, UserFormView) {
    let input = UserInput {
        name: form.text("name").trim().to_string(),
        email: form.text("email").trim().to_string(),
    };
    let view = UserFormView {
        id,
        name: input.name.clone(),
        email: input.email.clone(),
        avatar: form.get("current_avatar").filter(|s| !s.is_empty()).map(String::from),
    };
    (input, view)
}

fn render_form(state: &AppState, view: &UserFormView, error: Option<String>) -> AppResult<Response> {
    let mut ctx = make_admin_context(state, "users");
    ctx.insert("user", view);
    ctx.insert("is_new", &view.id.is_none());
    ctx.insert("error", &error);
    render(state, "admin/users/form.html", &ctx, form_status(&error))
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> AppResult<Response> {
    let users = listing::search(state.api.list::<User>().await?, &query.q);

    let mut ctx = make_admin_context(&state, "users");
    ctx.insert("users", &users);
    ctx.insert("q", &query.q);

    render(&state, "admin/users/index.html", &ctx, StatusCode::OK)
}

pub async fn new_user(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    render_form(&state, &UserFormView::blank(), None)
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    HxRequest(is_htmx): HxRequest,
    multipart: Multipart,
) -> AppResult<Response> {
    let mut form = MultipartForm::read(multipart, state.upload_limit).await?;
    let (input, view) = read_submission(&form, None);

    let upload = match take_upload(&state, &mut form, User::FILE_FIELD) {
        Ok(upload) => upload,
        Err(e) => return render_form(&state, &view, Some(e.to_string())),
    };

    match state.api.create::<User>(&input, upload).await {
        Ok(_) => Ok(redirect_to("/admin/users", is_htmx)),
        Err(e) if e.is_rejection() => render_form(&state, &view, Some(e.user_message())),
        Err(e) => Err(e.into()),
    }
}

pub async fn edit_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let user = state.api.get::<User>(&id).await?;
    render_form(&state, &UserFormView::from_user(&user), None)
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    HxRequest(is_htmx): HxRequest,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Response> {
    let mut form = MultipartForm::read(multipart, state.upload_limit).await?;
    let (input, view) = read_submission(&form, Some(id.clone()));

    let upload = match take_upload(&state, &mut form, User::FILE_FIELD) {
        Ok(upload) => upload,
        Err(e) => return render_form(&state, &view, Some(e.to_string())),
    };

    match state.api.update::<User>(&id, &input, upload).await {
        Ok(_) => Ok(redirect_to("/admin/users", is_htmx)),
        Err(e) if e.is_rejection() => render_form(&state, &view, Some(e.user_message())),
        Err(e) => Err(e.into()),
    }
}
