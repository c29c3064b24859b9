use crate::api::Resource;
use crate::models::{date_part, Language, Project, ProjectInput, User};
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
struct ProjectFormView {
    id: Option<String>,
    title: String,
    description: String,
    link: String,
    created_at: String,
    language_ids: Vec<String>,
    author_ids: Vec<String>,
    image: Option<String>,
}

impl ProjectFormView {
    fn blank() -> Self {
        Self {
            id: None,
            title: String::new(),
            description: String::new(),
            link: String::new(),
            created_at: String::new(),
            language_ids: Vec::new(),
            author_ids: Vec::new(),
            image: None,
        }
    }

    fn from_project(project: &Project) -> Self {
        Self {
            id: Some(project.id.clone()),
            title: project.title.clone(),
            description: project.description.clone(),
            link: project.link.clone().unwrap_or_default(),
            created_at: date_part(&project.created_at).to_string(),
            language_ids: project.languages.iter().map(|l| l.id.clone()).collect(),
            author_ids: project.authors.iter().map(|a| a.id.clone()).collect(),
            image: project.image.clone(),
        }
    }
}

fn read_submission(form: &MultipartForm, id: Option<String>) -> (ProjectInput, ProjectFormView) {
    let input = ProjectInput {
        title: form.text("title").trim().to_string(),
        description: form.text("description"),
        link: form.text("link").trim().to_string(),
        created_at: form.text("created_at").trim().to_string(),
        language_ids: form.list("language_ids"),
        author_ids: form.list("author_ids"),
    };
    let view = ProjectFormView {
        id,
        title: input.title.clone(),
        description: input.description.clone(),
        link: input.link.clone(),
        created_at: input.created_at.clone(),
        language_ids: input.language_ids.clone(),
        author_ids: input.author_ids.clone(),
        image: form.get("current_image").filter(|s| !s.is_empty()).map(String::from),
    };
    (input, view)
}

async fn render_form(
    state: &AppState,
    view: &ProjectFormView,
    error: Option<String>,
) -> AppResult<Response> {
    let (languages, users) =
        tokio::try_join!(state.api.list::<Language>(), state.api.list::<User>())?;

    let mut ctx = make_admin_context(state, "projects");
    ctx.insert("project", view);
    ctx.insert("languages", &languages);
    ctx.insert("users", &users);
    ctx.insert("is_new", &view.id.is_none());
    ctx.insert("error", &error);

    render(state, "admin/projects/form.html", &ctx, form_status(&error))
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> AppResult<Response> {
    let projects = listing::search(state.api.list::<Project>().await?, &query.q);

    let mut ctx = make_admin_context(&state, "projects");
    ctx.insert("projects", &projects);
    ctx.insert("q", &query.q);

    render(&state, "admin/projects/index.html", &ctx, StatusCode::OK)
}

pub async fn new_project(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    render_form(&state, &ProjectFormView::blank(), None).await
}

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    HxRequest(is_htmx): HxRequest,
    multipart: Multipart,
) -> AppResult<Response> {
    let mut form = MultipartForm::read(multipart, state.upload_limit).await?;
    let (input, view) = read_submission(&form, None);

    let upload = match take_upload(&state, &mut form, Project::FILE_FIELD) {
        Ok(upload) => upload,
        Err(e) => return render_form(&state, &view, Some(e.to_string())).await,
    };

    match state.api.create::<Project>(&input, upload).await {
        Ok(_) => Ok(redirect_to("/admin/projects", is_htmx)),
        Err(e) if e.is_rejection() => render_form(&state, &view, Some(e.user_message())).await,
        Err(e) => Err(e.into()),
    }
}

pub async fn edit_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let project = state.api.get::<Project>(&id).await?;
    render_form(&state, &ProjectFormView::from_project(&project), None).await
}

pub async fn update_project(
    State(state): State<Arc<AppState>>,
    HxRequest(is_htmx): HxRequest,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Response> {
    let mut form = MultipartForm::read(multipart, state.upload_limit).await?;
    let (input, view) = read_submission(&form, Some(id.clone()));

    let upload = match take_upload(&state, &mut form, Project::FILE_FIELD) {
        Ok(upload) => upload,
        Err(e) => return render_form(&state, &view, Some(e.to_string())).await,
    };

    match state.api.update::<Project>(&id, &input, upload).await {
        Ok(_) => Ok(redirect_to("/admin/projects", is_htmx)),
        Err(e) if e.is_rejection() => render_form(&state, &view, Some(e.user_message())).await,
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    HxRequest(is_htmx): HxRequest,
    Path(id): Path<String>,
) -> AppResult<Response> {
    state.api.delete::<Project>(&id).await?;
    Ok(redirect_to("/admin/projects", is_htmx))
}
