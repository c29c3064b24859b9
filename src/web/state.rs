use crate::api::ApiClient;
use crate::services::markdown::PreviewRenderer;
use crate::web::security;
use crate::Config;
use anyhow::Result;
use axum::http::HeaderValue;
use std::collections::HashMap;
use tera::{Tera, Value};

pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
    pub templates: Tera,
    pub markdown: PreviewRenderer,
    /// Largest image accepted from the browser, in bytes.
    pub upload_limit: usize,
    pub content_security_policy: HeaderValue,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let mut templates = Tera::default();

        templates.register_filter("format_date", format_date_filter);
        templates.register_filter("truncate_str", truncate_str_filter);
        let cdn_base = config.api.cdn_base();
        templates.register_filter(
            "cdn",
            move |value: &Value, _: &HashMap<String, Value>| -> tera::Result<Value> {
                let path = value
                    .as_str()
                    .ok_or_else(|| tera::Error::msg("cdn requires a string"))?;
                Ok(Value::String(cdn_url(&cdn_base, path)))
            },
        );
        templates.add_raw_templates(vec![
            ("admin/base.html", include_str!("../../templates/admin/base.html")),
            ("admin/dashboard.html", include_str!("../../templates/admin/dashboard.html")),
            ("admin/users/index.html", include_str!("../../templates/admin/users/index.html")),
            ("admin/users/form.html", include_str!("../../templates/admin/users/form.html")),
            ("admin/blogs/index.html", include_str!("../../templates/admin/blogs/index.html")),
            ("admin/blogs/form.html", include_str!("../../templates/admin/blogs/form.html")),
            ("admin/languages/index.html", include_str!("../../templates/admin/languages/index.html")),
            ("admin/languages/form.html", include_str!("../../templates/admin/languages/form.html")),
            ("admin/categories/index.html", include_str!("../../templates/admin/categories/index.html")),
            ("admin/categories/form.html", include_str!("../../templates/admin/categories/form.html")),
            ("admin/projects/index.html", include_str!("../../templates/admin/projects/index.html")),
            ("admin/projects/form.html", include_str!("../../templates/admin/projects/form.html")),
            ("htmx/slug_field.html", include_str!("../../templates/htmx/slug_field.html")),
            ("htmx/slug_sync.html", include_str!("../../templates/htmx/slug_sync.html")),
            ("htmx/content_editor.html", include_str!("../../templates/htmx/content_editor.html")),
            ("htmx/preview.html", include_str!("../../templates/htmx/preview.html")),
        ])?;

        let api = ApiClient::new(&config.api)?;
        let upload_limit = config.uploads.max_upload_bytes()?;
        let content_security_policy = security::content_security_policy(&config.api.cdn_base())?;

        Ok(Self {
            config,
            api,
            templates,
            markdown: PreviewRenderer::new(),
            upload_limit,
            content_security_policy,
        })
    }
}

fn format_date_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let date_str = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("format_date requires a string"))?;

    let format = args
        .get("format")
        .and_then(|v| v.as_str())
        .unwrap_or("%d.%m.%Y");

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date_str) {
        return Ok(Value::String(dt.format(format).to_string()));
    }

    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Value::String(dt.format(format).to_string()));
    }

    if let Ok(d) = chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        return Ok(Value::String(d.format(format).to_string()));
    }

    Ok(Value::String(date_str.to_string()))
}

/// Stored image references are either absolute URLs or paths below the CDN.
fn cdn_url(cdn_base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!("{}/{}", cdn_base, path.trim_start_matches('/'))
    }
}

fn truncate_str_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("truncate_str requires a string"))?;
    let len = args.get("len").and_then(|v| v.as_u64()).unwrap_or(16) as usize;
    if s.chars().count() > len {
        let cut: String = s.chars().take(len).collect();
        Ok(Value::String(format!("{}…", cut)))
    } else {
        Ok(Value::String(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_date_handles_backend_timestamps() {
        let out = format_date_filter(&Value::from("2024-03-01T10:00:00+01:00"), &HashMap::new());
        assert_eq!(out.ok(), Some(Value::from("01.03.2024")));
    }

    #[test]
    fn relative_images_resolve_below_the_cdn() {
        assert_eq!(
            cdn_url("http://localhost:8080/cdn", "/users/1/a.png"),
            "http://localhost:8080/cdn/users/1/a.png"
        );
        assert_eq!(
            cdn_url("http://localhost:8080/cdn", "https://img.example.com/a.png"),
            "https://img.example.com/a.png"
        );
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let mut args = HashMap::new();
        args.insert("len".to_string(), Value::from(3));
        let out = truncate_str_filter(&Value::from("Äpfel"), &args);
        assert_eq!(out.ok(), Some(Value::from("Äpf…")));
    }
}
