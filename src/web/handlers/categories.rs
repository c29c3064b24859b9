use crate::models::{Category, CategoryInput};
use crate::services::listing;
use crate::web::error::AppResult;
use crate::web::extractors::HxRequest;
use crate::web::handlers::{form_status, make_admin_context, redirect_to, render, ListQuery};
use crate::web::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Form;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Serialize)]
struct CategoryFormView {
    id: Option<String>,
    name: String,
}

fn render_form(
    state: &AppState,
    view: &CategoryFormView,
    error: Option<String>,
) -> AppResult<Response> {
    let mut ctx = make_admin_context(state, "categories");
    ctx.insert("category", view);
    ctx.insert("is_new", &view.id.is_none());
    ctx.insert("error", &error);
    render(state, "admin/categories/form.html", &ctx, form_status(&error))
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> AppResult<Response> {
    let categories = listing::search(state.api.list::<Category>().await?, &query.q);

    let mut ctx = make_admin_context(&state, "categories");
    ctx.insert("categories", &categories);
    ctx.insert("q", &query.q);

    render(&state, "admin/categories/index.html", &ctx, StatusCode::OK)
}

pub async fn new_category(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let view = CategoryFormView {
        id: None,
        name: String::new(),
    };
    render_form(&state, &view, None)
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    HxRequest(is_htmx): HxRequest,
    Form(form): Form<CategoryForm>,
) -> AppResult<Response> {
    let input = CategoryInput {
        name: form.name.trim().to_string(),
    };

    match state.api.create::<Category>(&input, None).await {
        Ok(_) => Ok(redirect_to("/admin/categories", is_htmx)),
        Err(e) if e.is_rejection() => {
            let view = CategoryFormView {
                id: None,
                name: input.name,
            };
            render_form(&state, &view, Some(e.user_message()))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn edit_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let category = state.api.get::<Category>(&id).await?;
    let view = CategoryFormView {
        id: Some(category.id),
        name: category.name,
    };
    render_form(&state, &view, None)
}

pub async fn update_category(
    State(state): State<Arc<AppState>>,
    HxRequest(is_htmx): HxRequest,
    Path(id): Path<String>,
    Form(form): Form<CategoryForm>,
) -> AppResult<Response> {
    let input = CategoryInput {
        name: form.name.trim().to_string(),
    };

    match state.api.update::<Category>(&id, &input, None).await {
        Ok(_) => Ok(redirect_to("/admin/categories", is_htmx)),
        Err(e) if e.is_rejection() => {
            let view = CategoryFormView {
                id: Some(id),
                name: input.name,
            };
            render_form(&state, &view, Some(e.user_message()))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    HxRequest(is_htmx): HxRequest,
    Path(id): Path<String>,
) -> AppResult<Response> {
    state.api.delete::<Category>(&id).await?;
    Ok(redirect_to("/admin/categories", is_htmx))
}
