use crate::api::Resource;
use crate::models::{Blog, BlogInput, Category, User};
use crate::services::listing;
use crate::services::slug::{SlugField, SlugSync};
use crate::web::error::AppResult;
use crate::web::extractors::HxRequest;
use crate::web::forms::MultipartForm;
use crate::web::handlers::htmx::{toolbar, SlugFieldView};
use crate::web::handlers::{
    form_status, make_admin_context, redirect_to, render, take_upload, ListQuery,
};
use crate::web::state::AppState;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde::Serialize;
use std::sync::Arc;

/// Everything on the blog editor except the title/slug pair, which travels
/// as a [`SlugField`].
#[derive(Debug, Serialize)]
struct BlogFormView {
    id: Option<u64>,
    excerpt: String,
    content: String,
    pinned: bool,
    author_ids: Vec<String>,
    category_ids: Vec<String>,
    image: Option<String>,
}

impl BlogFormView {
    fn blank() -> Self {
        Self {
            id: None,
            excerpt: String::new(),
            content: String::new(),
            pinned: false,
            author_ids: Vec::new(),
            category_ids: Vec::new(),
            image: None,
        }
    }

    fn from_blog(blog: &Blog) -> Self {
        Self {
            id: Some(blog.id),
            excerpt: blog.excerpt.clone().unwrap_or_default(),
            content: blog.content.clone().unwrap_or_default(),
            pinned: blog.pinned,
            author_ids: blog.authors.iter().map(|a| a.id.clone()).collect(),
            category_ids: blog.categories.iter().map(|c| c.id.clone()).collect(),
            image: blog.image.clone(),
        }
    }
}

/// Read a submitted editor. The slug comes out of the field-sync state
/// machine, so a linked form without scripting still gets a derived slug.
fn read_submission(form: &MultipartForm, id: Option<u64>) -> (BlogInput, BlogFormView, SlugField) {
    let field = SlugField::restore(
        form.text("title"),
        form.text("slug"),
        SlugSync::from_form(form.get("slug_sync")),
    );
    let sync = field.sync();
    let (title, slug) = field.finalize();

    let input = BlogInput {
        title: title.clone(),
        slug: slug.clone(),
        excerpt: form.text("excerpt"),
        content: form.text("content"),
        pinned: form.flag("pinned"),
        author_ids: form.list("author_ids"),
        category_ids: form.list("category_ids"),
    };
    let view = BlogFormView {
        id,
        excerpt: input.excerpt.clone(),
        content: input.content.clone(),
        pinned: input.pinned,
        author_ids: input.author_ids.clone(),
        category_ids: input.category_ids.clone(),
        image: form.get("current_image").filter(|s| !s.is_empty()).map(String::from),
    };

    (input, view, SlugField::restore(title, slug, sync))
}

async fn render_form(
    state: &AppState,
    view: &BlogFormView,
    slug: &SlugField,
    error: Option<String>,
) -> AppResult<Response> {
    let (users, categories) =
        tokio::try_join!(state.api.list::<User>(), state.api.list::<Category>())?;

    let mut ctx = make_admin_context(state, "blogs");
    ctx.insert("blog", view);
    ctx.insert("title", slug.title());
    ctx.insert("slug_field", &SlugFieldView::from(slug));
    ctx.insert("users", &users);
    ctx.insert("categories", &categories);
    ctx.insert("toolbar", &toolbar());
    ctx.insert("content", &view.content);
    ctx.insert("preview_html", &state.markdown.render(&view.content));
    ctx.insert("is_new", &view.id.is_none());
    ctx.insert("error", &error);

    render(state, "admin/blogs/form.html", &ctx, form_status(&error))
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> AppResult<Response> {
    let category = query.category.as_deref().filter(|c| !c.is_empty());
    let (blogs, categories) = match category {
        Some(id) => tokio::try_join!(
            state.api.list_blogs_in_category(id),
            state.api.list::<Category>()
        )?,
        None => tokio::try_join!(state.api.list::<Blog>(), state.api.list::<Category>())?,
    };
    let blogs = listing::search(blogs, &query.q);

    let mut ctx = make_admin_context(&state, "blogs");
    ctx.insert("blogs", &blogs);
    ctx.insert("categories", &categories);
    ctx.insert("q", &query.q);
    ctx.insert("category", &category);

    render(&state, "admin/blogs/index.html", &ctx, StatusCode::OK)
}

pub async fn new_blog(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    render_form(&state, &BlogFormView::blank(), &SlugField::for_new(), None).await
}

pub async fn create_blog(
    State(state): State<Arc<AppState>>,
    HxRequest(is_htmx): HxRequest,
    multipart: Multipart,
) -> AppResult<Response> {
    let mut form = MultipartForm::read(multipart, state.upload_limit).await?;
    let (input, view, slug) = read_submission(&form, None);

    let upload = match take_upload(&state, &mut form, Blog::FILE_FIELD) {
        Ok(upload) => upload,
        Err(e) => return render_form(&state, &view, &slug, Some(e.to_string())).await,
    };

    match state.api.create::<Blog>(&input, upload).await {
        Ok(blog) => {
            tracing::info!("Blog '{}' saved as #{}", blog.slug, blog.id);
            Ok(redirect_to("/admin/blogs", is_htmx))
        }
        Err(e) if e.is_rejection() => {
            render_form(&state, &view, &slug, Some(e.user_message())).await
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn edit_blog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Response> {
    let blog = state.api.get::<Blog>(&id).await?;
    let slug = SlugField::for_existing(blog.title.clone(), blog.slug.clone());
    render_form(&state, &BlogFormView::from_blog(&blog), &slug, None).await
}

pub async fn update_blog(
    State(state): State<Arc<AppState>>,
    HxRequest(is_htmx): HxRequest,
    Path(id): Path<u64>,
    multipart: Multipart,
) -> AppResult<Response> {
    let mut form = MultipartForm::read(multipart, state.upload_limit).await?;
    let (input, view, slug) = read_submission(&form, Some(id));

    let upload = match take_upload(&state, &mut form, Blog::FILE_FIELD) {
        Ok(upload) => upload,
        Err(e) => return render_form(&state, &view, &slug, Some(e.to_string())).await,
    };

    match state.api.update::<Blog>(&id, &input, upload).await {
        Ok(_) => Ok(redirect_to("/admin/blogs", is_htmx)),
        Err(e) if e.is_rejection() => {
            render_form(&state, &view, &slug, Some(e.user_message())).await
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_blog(
    State(state): State<Arc<AppState>>,
    HxRequest(is_htmx): HxRequest,
    Path(id): Path<u64>,
) -> AppResult<Response> {
    state.api.delete::<Blog>(&id).await?;
    Ok(redirect_to("/admin/blogs", is_htmx))
}
