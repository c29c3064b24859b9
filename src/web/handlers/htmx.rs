use crate::services::markdown::{insert_markdown, MarkdownAction, Selection};
use crate::services::slug::{is_canonical_slug, FieldEdit, SlugField, SlugSync};
use crate::web::error::AppResult;
use crate::web::extractors::HxTriggerName;
use crate::web::handlers::render;
use crate::web::state::AppState;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Form;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tera::Context;

/// The slug half of the title/slug pair as templates see it.
#[derive(Debug, Serialize)]
pub(crate) struct SlugFieldView {
    slug: String,
    sync: SlugSync,
    canonical: bool,
}

impl From<&SlugField> for SlugFieldView {
    fn from(field: &SlugField) -> Self {
        Self {
            slug: field.slug().to_string(),
            sync: field.sync(),
            canonical: is_canonical_slug(field.slug()),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ToolbarButton {
    name: &'static str,
    label: &'static str,
    syntax: &'static str,
}

pub(crate) fn toolbar() -> Vec<ToolbarButton> {
    MarkdownAction::ALL
        .iter()
        .map(|a| ToolbarButton {
            name: a.name(),
            label: a.label(),
            syntax: a.syntax(),
        })
        .collect()
}

#[derive(Deserialize)]
pub struct SlugForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    slug_sync: Option<String>,
}

/// One edit on the title/slug pair.
///
/// A title edit answers with the whole slug field, re-derived when linked.
/// A slug edit only swaps the hidden sync input so the text the user is
/// typing is never replaced under the cursor.
pub async fn slug(
    State(state): State<Arc<AppState>>,
    HxTriggerName(trigger): HxTriggerName,
    Form(form): Form<SlugForm>,
) -> AppResult<Response> {
    let sync = SlugSync::from_form(form.slug_sync.as_deref());
    let (edit, template) = match trigger.as_deref() {
        Some("slug") => (FieldEdit::Slug(form.slug.clone()), "htmx/slug_sync.html"),
        _ => (FieldEdit::Title(form.title.clone()), "htmx/slug_field.html"),
    };

    let mut field = SlugField::restore(form.title, form.slug, sync);
    field.apply(edit);
    tracing::debug!("Slug field now '{}' ({})", field.slug(), field.sync());

    let mut ctx = Context::new();
    ctx.insert("slug_field", &SlugFieldView::from(&field));
    render(&state, template, &ctx, StatusCode::OK)
}

#[derive(Deserialize)]
pub struct InsertForm {
    #[serde(default)]
    content: String,
    action: String,
    #[serde(default)]
    selection_start: Option<usize>,
    #[serde(default)]
    selection_end: Option<usize>,
}

/// Apply a toolbar button to the editor text. Without a reported selection
/// the syntax goes at the end.
pub async fn markdown_insert(
    State(state): State<Arc<AppState>>,
    Form(form): Form<InsertForm>,
) -> AppResult<Response> {
    let Ok(action) = form.action.parse::<MarkdownAction>() else {
        return Ok((StatusCode::BAD_REQUEST, "Unknown toolbar action").into_response());
    };

    let start = form.selection_start.unwrap_or(usize::MAX);
    let end = form.selection_end.unwrap_or(start);
    let edit = insert_markdown(&form.content, Selection::new(start, end), action);

    let mut ctx = Context::new();
    ctx.insert("content", &edit.text);
    ctx.insert("cursor", &edit.cursor);

    let mut response = render(&state, "htmx/content_editor.html", &ctx, StatusCode::OK)?;
    response
        .headers_mut()
        .insert("HX-Trigger", HeaderValue::from_static("content-changed"));
    Ok(response)
}

#[derive(Deserialize)]
pub struct PreviewForm {
    #[serde(default)]
    content: String,
}

pub async fn preview(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PreviewForm>,
) -> AppResult<Response> {
    let mut ctx = Context::new();
    ctx.insert("html", &state.markdown.render(&form.content));
    render(&state, "htmx/preview.html", &ctx, StatusCode::OK)
}
