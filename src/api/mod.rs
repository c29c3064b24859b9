//! Typed client for the portfolio REST backend.
//!
//! Every collection follows the same shape (`GET /{path}`, `GET /{path}/{id}`,
//! multipart `POST`/`PUT`, optional `DELETE`), so the operations are generic
//! over [`Resource`]. Blogs add a category filter and a slug lookup.

mod error;
mod resource;

pub use error::ApiError;
pub use resource::{Deletable, Resource};

use crate::config::ApiConfig;
use crate::models::{Blog, FormFields, ImageUpload};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("portfolio-admin/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base = Url::parse(&config.base_url).map_err(|e| ApiError::Url(e.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(format!("{} cannot be a base URL", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn list<R: Resource>(&self) -> Result<Vec<R>, ApiError> {
        let url = self.endpoint(&[R::PATH])?;
        self.fetch_json(self.http.get(url), R::PATH).await
    }

    pub async fn get<R: Resource>(&self, id: &R::Id) -> Result<R, ApiError> {
        let id = id.to_string();
        let url = self.endpoint(&[R::PATH, &id])?;
        self.fetch_json(self.http.get(url), &format!("{} {}", R::LABEL, id))
            .await
    }

    pub async fn create<R: Resource>(
        &self,
        input: &R::Input,
        upload: Option<ImageUpload>,
    ) -> Result<R, ApiError> {
        let url = self.endpoint(&[R::PATH])?;
        let form = multipart_form(input, upload)?;
        let created: R = self
            .fetch_json(self.http.post(url).multipart(form), R::PATH)
            .await?;
        tracing::info!("Created {}", R::LABEL);
        Ok(created)
    }

    pub async fn update<R: Resource>(
        &self,
        id: &R::Id,
        input: &R::Input,
        upload: Option<ImageUpload>,
    ) -> Result<R, ApiError> {
        let id = id.to_string();
        let url = self.endpoint(&[R::PATH, &id])?;
        let form = multipart_form(input, upload)?;
        let updated: R = self
            .fetch_json(
                self.http.put(url).multipart(form),
                &format!("{} {}", R::LABEL, id),
            )
            .await?;
        tracing::info!("Updated {} {}", R::LABEL, id);
        Ok(updated)
    }

    pub async fn delete<R: Deletable>(&self, id: &R::Id) -> Result<(), ApiError> {
        let id = id.to_string();
        let url = self.endpoint(&[R::PATH, &id])?;
        let what = format!("{} {}", R::LABEL, id);
        self.send(self.http.request(Method::DELETE, url), &what)
            .await?;
        tracing::info!("Deleted {}", what);
        Ok(())
    }

    /// `GET /blogs?category_id=...`
    pub async fn list_blogs_in_category(&self, category_id: &str) -> Result<Vec<Blog>, ApiError> {
        let mut url = self.endpoint(&[Blog::PATH])?;
        url.query_pairs_mut().append_pair("category_id", category_id);
        self.fetch_json(self.http.get(url), Blog::PATH).await
    }

    /// `GET /blogs/slug/{slug}`
    pub async fn get_blog_by_slug(&self, slug: &str) -> Result<Blog, ApiError> {
        let url = self.endpoint(&[Blog::PATH, "slug", slug])?;
        self.fetch_json(self.http.get(url), &format!("blog '{}'", slug))
            .await
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<T, ApiError> {
        let body = self.send(request, what).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!("Undecodable response for {}: {}", what, e);
            ApiError::Decode(e)
        })
    }

    /// Send a request and return the body of a 2xx response.
    async fn send(&self, request: reqwest::RequestBuilder, what: &str) -> Result<String, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("Request for {} failed: {}", what, e);
            ApiError::Transport(e)
        })?;

        let status = response.status();
        tracing::debug!("{} {} -> {}", what, response.url(), status);
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            let message = error::error_message(&body, status);
            tracing::warn!("Backend returned {} for {}: {}", status, what, message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(body)
    }
}

fn multipart_form<I: FormFields>(input: &I, upload: Option<ImageUpload>) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for (name, value) in input.form_fields() {
        form = form.text(name, value);
    }
    if let Some(upload) = upload {
        let part = Part::bytes(upload.data)
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)?;
        form = form.part(upload.field, part);
    }
    Ok(form)
}
