use crate::models::{Blog, Category, Language, Project, User};
use crate::services::listing::{pinned_first, DashboardStats};
use crate::web::error::AppResult;
use crate::web::handlers::{make_admin_context, render};
use crate::web::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use std::sync::Arc;

const RECENT_BLOGS: usize = 5;

pub async fn dashboard(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let api = &state.api;
    let fetched = tokio::try_join!(
        api.list::<User>(),
        api.list::<Blog>(),
        api.list::<Language>(),
        api.list::<Category>(),
        api.list::<Project>(),
    );

    let mut ctx = make_admin_context(&state, "dashboard");
    match fetched {
        Ok((users, blogs, languages, categories, projects)) => {
            let stats = DashboardStats {
                users: users.len(),
                blogs: blogs.len(),
                languages: languages.len(),
                categories: categories.len(),
                projects: projects.len(),
            };
            let recent: Vec<Blog> = pinned_first(blogs).into_iter().take(RECENT_BLOGS).collect();
            ctx.insert("stats", &stats);
            ctx.insert("recent_blogs", &recent);
        }
        Err(e) => {
            tracing::warn!("Dashboard could not load counts: {}", e);
            ctx.insert("stats", &DashboardStats::default());
            ctx.insert("recent_blogs", &Vec::<Blog>::new());
            ctx.insert("backend_error", &e.to_string());
        }
    }

    render(&state, "admin/dashboard.html", &ctx, StatusCode::OK)
}
