use super::assets;
use super::handlers;
use super::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

/// Headroom for the text fields sent alongside an image.
const FORM_OVERHEAD: usize = 1024 * 1024;

pub fn admin_routes(upload_limit: usize) -> Router<Arc<AppState>> {
    let body_limit = DefaultBodyLimit::max(upload_limit.saturating_add(FORM_OVERHEAD));

    Router::new()
        .route("/", get(|| async { Redirect::to("/admin") }))
        .route("/admin", get(handlers::admin::dashboard))
        .route("/admin/users", get(handlers::users::index))
        .route("/admin/users/new", get(handlers::users::new_user))
        .route("/admin/users", post(handlers::users::create_user))
        .route("/admin/users/:id/edit", get(handlers::users::edit_user))
        .route("/admin/users/:id", post(handlers::users::update_user))
        .route("/admin/blogs", get(handlers::blogs::index))
        .route("/admin/blogs/new", get(handlers::blogs::new_blog))
        .route("/admin/blogs", post(handlers::blogs::create_blog))
        .route("/admin/blogs/:id/edit", get(handlers::blogs::edit_blog))
        .route("/admin/blogs/:id", post(handlers::blogs::update_blog))
        .route("/admin/blogs/:id/delete", post(handlers::blogs::delete_blog))
        .route("/admin/languages", get(handlers::languages::index))
        .route("/admin/languages/new", get(handlers::languages::new_language))
        .route("/admin/languages", post(handlers::languages::create_language))
        .route(
            "/admin/languages/:id/edit",
            get(handlers::languages::edit_language),
        )
        .route("/admin/languages/:id", post(handlers::languages::update_language))
        .route(
            "/admin/languages/:id/delete",
            post(handlers::languages::delete_language),
        )
        .route("/admin/categories", get(handlers::categories::index))
        .route(
            "/admin/categories/new",
            get(handlers::categories::new_category),
        )
        .route(
            "/admin/categories",
            post(handlers::categories::create_category),
        )
        .route(
            "/admin/categories/:id/edit",
            get(handlers::categories::edit_category),
        )
        .route(
            "/admin/categories/:id",
            post(handlers::categories::update_category),
        )
        .route(
            "/admin/categories/:id/delete",
            post(handlers::categories::delete_category),
        )
        .route("/admin/projects", get(handlers::projects::index))
        .route("/admin/projects/new", get(handlers::projects::new_project))
        .route("/admin/projects", post(handlers::projects::create_project))
        .route(
            "/admin/projects/:id/edit",
            get(handlers::projects::edit_project),
        )
        .route("/admin/projects/:id", post(handlers::projects::update_project))
        .route(
            "/admin/projects/:id/delete",
            post(handlers::projects::delete_project),
        )
        .layer(body_limit)
}

pub fn htmx_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/htmx/slug", post(handlers::htmx::slug))
        .route("/htmx/markdown/insert", post(handlers::htmx::markdown_insert))
        .route("/htmx/preview", post(handlers::htmx::preview))
}

pub fn asset_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/static/*path", get(assets::serve_static))
        .route("/health", get(|| async { "ok" }))
}
