use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use portfolio_admin::api::ApiError;
use portfolio_admin::config::ApiConfig;
use portfolio_admin::models::{Blog, Category, User, UserInput};
use portfolio_admin::web::{self, AppState};
use portfolio_admin::{ApiClient, Config};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        cdn_url: None,
        timeout_secs: 5,
    }
}

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&api_config(&server.uri())).expect("client builds")
}

fn app(server: &MockServer) -> Router {
    app_with(server, |_| {})
}

fn app_with(server: &MockServer, configure: impl FnOnce(&mut Config)) -> Router {
    let mut config = Config::default();
    config.api.base_url = server.uri();
    configure(&mut config);
    let state = AppState::new(config).expect("state builds");
    web::router(Arc::new(state))
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

mod api_client_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_decodes_null_collections_as_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blogs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "title": "First", "slug": "first", "authors": null, "categories": null},
                {"id": 2, "title": "Second", "slug": "second", "pinned": true, "excerpt": ""}
            ])))
            .mount(&server)
            .await;

        let blogs = client(&server).list::<Blog>().await.expect("list succeeds");
        assert_eq!(blogs.len(), 2);
        assert!(blogs[0].authors.is_empty());
        assert!(blogs[0].categories.is_empty());
        assert!(blogs[1].pinned);
        assert_eq!(blogs[1].excerpt, None);
    }

    #[tokio::test]
    async fn test_missing_entity_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blogs/7"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "Blog not found"})),
            )
            .mount(&server)
            .await;

        let err = client(&server).get::<Blog>(&7).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_error_body_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "Name is required"})),
            )
            .mount(&server)
            .await;

        let input = UserInput {
            name: String::new(),
            email: "x@example.com".into(),
        };
        let err = client(&server).create::<User>(&input, None).await.unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(err.user_message(), "Name is required");
    }

    #[tokio::test]
    async fn test_create_sends_multipart_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users"))
            .and(body_string_contains("name=\"email\""))
            .and(body_string_contains("ada@example.com"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "u-1", "name": "Ada", "email": "ada@example.com"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let input = UserInput {
            name: "Ada".into(),
            email: "ada@example.com".into(),
        };
        let user = client(&server).create::<User>(&input, None).await.expect("created");
        assert_eq!(user.id, "u-1");
    }

    #[tokio::test]
    async fn test_blog_lookups() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blogs"))
            .and(query_param("category_id", "c-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 3, "title": "Tagged", "slug": "tagged"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/blogs/slug/hello-world"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(
                {"id": 9, "title": "Hello World", "slug": "hello-world"}
            )))
            .mount(&server)
            .await;

        let api = client(&server);
        let tagged = api.list_blogs_in_category("c-1").await.expect("filtered list");
        assert_eq!(tagged[0].id, 3);
        let blog = api.get_blog_by_slug("hello-world").await.expect("by slug");
        assert_eq!(blog.id, 9);
    }

    #[tokio::test]
    async fn test_delete_category() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/categories/c-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .delete::<Category>("c-2")
            .await
            .expect("deleted");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_transport_error() {
        let api = ApiClient::new(&api_config("http://127.0.0.1:9")).expect("client builds");
        let err = api.list::<User>().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "got {:?}", err);
        assert!(!err.is_rejection());
    }
}

mod router_tests {
    use super::*;

    fn slug_request(trigger: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/htmx/slug")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("HX-Request", "true");
        if let Some(name) = trigger {
            builder = builder.header("HX-Trigger-Name", name);
        }
        builder.body(Body::from(body.to_string())).expect("request builds")
    }

    const BOUNDARY: &str = "portfolio-test-boundary";

    fn multipart_request(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
        multipart_upload_request(uri, fields, None)
    }

    /// Text fields first, then the optional `(field, file name, bytes)` part,
    /// in the order a browser sends the editor forms.
    fn multipart_upload_request(
        uri: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &str, Vec<u8>)>,
    ) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((name, file_name, data)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(&data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request builds")
    }

    #[tokio::test]
    async fn test_title_edit_while_linked_derives_slug() {
        let server = MockServer::start().await;
        let response = app(&server)
            .oneshot(slug_request(
                Some("title"),
                "title=Gr%C3%BC%C3%9Fe+aus+K%C3%B6ln&slug=old&slug_sync=linked",
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("value=\"gruesse-aus-koeln\""), "{}", html);
        assert!(html.contains("name=\"slug_sync\" value=\"linked\""), "{}", html);
        // An empty linked slug is derived on submit, so the browser must not block it.
        assert!(!html.contains("required"), "{}", html);
        assert!(html.contains("data-keep-while-editing"), "{}", html);
    }

    #[tokio::test]
    async fn test_title_edit_while_broken_keeps_slug() {
        let server = MockServer::start().await;
        let response = app(&server)
            .oneshot(slug_request(
                Some("title"),
                "title=Another+Title&slug=my-custom&slug_sync=broken",
            ))
            .await
            .expect("response");

        let html = body_text(response).await;
        assert!(html.contains("value=\"my-custom\""), "{}", html);
        assert!(html.contains("value=\"broken\""), "{}", html);
        assert!(html.contains(" required"), "{}", html);
    }

    #[tokio::test]
    async fn test_slug_edit_breaks_link() {
        let server = MockServer::start().await;
        let response = app(&server)
            .oneshot(slug_request(
                Some("slug"),
                "title=Hello&slug=hand-made&slug_sync=linked",
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("id=\"slug-sync\""), "{}", html);
        assert!(html.contains("value=\"broken\""), "{}", html);
        assert!(!html.contains("hand-made"), "{}", html);
    }

    #[tokio::test]
    async fn test_markdown_insert_returns_editor_with_cursor() {
        let server = MockServer::start().await;
        let request = Request::builder()
            .method("POST")
            .uri("/htmx/markdown/insert")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(
                "content=hello+world&action=bold&selection_start=6&selection_end=11",
            ))
            .expect("request builds");

        let response = app(&server).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("HX-Trigger").and_then(|v| v.to_str().ok()),
            Some("content-changed")
        );
        let html = body_text(response).await;
        assert!(html.contains("data-cursor=\"15\""), "{}", html);
        assert!(html.contains("hello **world**"), "{}", html);
    }

    #[tokio::test]
    async fn test_unknown_toolbar_action_is_bad_request() {
        let server = MockServer::start().await;
        let request = Request::builder()
            .method("POST")
            .uri("/htmx/markdown/insert")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("content=x&action=underline"))
            .expect("request builds");

        let response = app(&server).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_preview_is_sanitized() {
        let server = MockServer::start().await;
        let request = Request::builder()
            .method("POST")
            .uri("/htmx/preview")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(
                "content=%2A%2Abold%2A%2A%0A%0A%3Cscript%3Ealert(1)%3C%2Fscript%3E",
            ))
            .expect("request builds");

        let response = app(&server).oneshot(request).await.expect("response");
        let html = body_text(response).await;
        assert!(html.contains("<strong>bold</strong>"), "{}", html);
        assert!(!html.contains("<script"), "{}", html);
    }

    #[tokio::test]
    async fn test_blog_submitted_without_scripting_gets_derived_slug() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/blogs"))
            .and(body_string_contains("hello-world"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 11, "title": "Hello World", "slug": "hello-world"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = multipart_request(
            "/admin/blogs",
            &[
                ("title", "Hello World"),
                ("slug", ""),
                ("slug_sync", "linked"),
                ("content", "Body"),
                ("author_ids", "u-1"),
            ],
        );
        let response = app(&server).oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/admin/blogs")
        );
    }

    #[tokio::test]
    async fn test_rejected_blog_rerenders_form_with_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/blogs"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "Slug already exists"})),
            )
            .mount(&server)
            .await;
        for collection in ["/users", "/categories"] {
            Mock::given(method("GET"))
                .and(path(collection))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
                .mount(&server)
                .await;
        }

        let request = multipart_request(
            "/admin/blogs",
            &[
                ("title", "Hello World"),
                ("slug", "taken"),
                ("slug_sync", "broken"),
            ],
        );
        let response = app(&server).oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("Slug already exists"), "{}", html);
        assert!(html.contains("value=\"taken\""), "{}", html);
        assert!(html.contains("value=\"broken\""), "{}", html);
    }

    #[tokio::test]
    async fn test_missing_blog_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blogs/404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let request = Request::builder()
            .uri("/admin/blogs/404/edit")
            .body(Body::empty())
            .expect("request builds");
        let response = app(&server).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dashboard_survives_backend_outage() {
        let mut config = Config::default();
        config.api.base_url = "http://127.0.0.1:9".into();
        let app = web::router(Arc::new(AppState::new(config).expect("state builds")));

        let request = Request::builder()
            .uri("/admin")
            .body(Body::empty())
            .expect("request builds");
        let response = app.oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("could not be reached"), "{}", html);
    }

    #[tokio::test]
    async fn test_health_carries_security_headers() {
        let server = MockServer::start().await;
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .expect("request builds");
        let response = app(&server).oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let csp = response
            .headers()
            .get(header::CONTENT_SECURITY_POLICY)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(csp.contains(&server.uri().replace("/cdn", "")), "{}", csp);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_static_assets_are_embedded() {
        let server = MockServer::start().await;
        let request = Request::builder()
            .uri("/static/admin.js")
            .body(Body::empty())
            .expect("request builds");
        let response = app(&server).oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .contains("javascript"));
        let script = body_text(response).await;
        assert!(script.contains("htmx:beforeSwap"), "{}", script);
        assert!(script.contains("data-keep-while-editing"), "{}", script);
    }

    fn png_of_size(len: usize) -> Vec<u8> {
        let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        data.resize(len, 0);
        data
    }

    async fn mount_blog_lookups(server: &MockServer) {
        for collection in ["/users", "/categories"] {
            Mock::given(method("GET"))
                .and(path(collection))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
                .mount(server)
                .await;
        }
    }

    #[tokio::test]
    async fn test_new_blog_slug_is_not_required_while_linked() {
        let server = MockServer::start().await;
        mount_blog_lookups(&server).await;

        let request = Request::builder()
            .uri("/admin/blogs/new")
            .body(Body::empty())
            .expect("request builds");
        let response = app(&server).oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        let slug_input = html
            .split("<input id=\"slug\"")
            .nth(1)
            .and_then(|rest| rest.split('>').next())
            .expect("slug input rendered");
        assert!(!slug_input.contains("required"), "{}", slug_input);
    }

    #[tokio::test]
    async fn test_upload_far_over_limit_rerenders_form_with_message() {
        let server = MockServer::start().await;
        mount_blog_lookups(&server).await;
        Mock::given(method("POST"))
            .and(path("/blogs"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
            .expect(0)
            .mount(&server)
            .await;

        let request = multipart_upload_request(
            "/admin/blogs",
            &[
                ("title", "Holiday Photos"),
                ("slug", "my-slug"),
                ("slug_sync", "broken"),
                ("content", "Pictures"),
            ],
            Some(("image_file", "huge.png", png_of_size(3 * 1024 * 1024))),
        );
        let app = app_with(&server, |config| {
            config.uploads.max_upload_size = "1MB".into();
        });
        let response = app.oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("File too large"), "{}", html);
        assert!(html.contains("value=\"my-slug\""), "{}", html);
        assert!(html.contains("value=\"broken\""), "{}", html);
    }

    #[tokio::test]
    async fn test_upload_just_over_limit_rerenders_form_with_message() {
        let server = MockServer::start().await;
        let limit = 1024 * 1024;

        let request = multipart_upload_request(
            "/admin/users",
            &[("name", "Ada"), ("email", "ada@example.com")],
            Some(("avatar", "ada.png", png_of_size(limit + 10))),
        );
        let app = app_with(&server, |config| {
            config.uploads.max_upload_size = "1MB".into();
        });
        let response = app.oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(
            html.contains(&format!("File too large: {} bytes", limit + 10)),
            "{}",
            html
        );
        assert!(html.contains("value=\"Ada\""), "{}", html);
    }

    #[tokio::test]
    async fn test_slow_request_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blogs/7"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": 7, "title": "Slow", "slug": "slow"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let request = Request::builder()
            .uri("/admin/blogs/7/edit")
            .body(Body::empty())
            .expect("request builds");
        let app = app_with(&server, |config| {
            config.server.request_timeout_secs = 1;
        });
        let response = app.oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }
}

mod config_tests {
    use super::*;
    use portfolio_admin::cli;
    use std::io::Write;

    #[test]
    fn test_load_reads_file_and_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "[admin]\ntitle = \"My Portfolio\"\n\n[api]\nbase_url = \"http://api.internal:9000\"\n\n[uploads]\nmax_upload_size = \"2MB\""
        )
        .expect("write config");

        let config = Config::load(file.path()).expect("config loads");
        assert_eq!(config.admin.title, "My Portfolio");
        assert_eq!(config.api.cdn_base(), "http://api.internal:9000/cdn");
        assert_eq!(config.uploads.max_upload_bytes().ok(), Some(2 * 1024 * 1024));
        assert_eq!(config.server.port, 3001);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[api]\nbase_url = \"not a url\"").expect("write config");
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_api_url_override_beats_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("portfolio-admin.toml");

        let config = cli::load_config(&missing, Some("https://api.example.com"))
            .expect("defaults with override");
        assert_eq!(config.api.base_url, "https://api.example.com");

        assert!(cli::load_config(&missing, Some("nope")).is_err());
    }

    #[tokio::test]
    async fn test_init_writes_loadable_config_once() {
        let dir = tempfile::tempdir().expect("temp dir");

        cli::init::run(dir.path()).await.expect("first init");
        let written = dir.path().join("portfolio-admin.toml");
        let config = Config::load(&written).expect("written config loads");
        assert_eq!(config.server.port, 3001);

        assert!(cli::init::run(dir.path()).await.is_err());
    }
}
