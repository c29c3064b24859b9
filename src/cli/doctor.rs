use crate::api::ApiClient;
use crate::models::{Blog, Category, Language, Project, User};
use crate::Config;
use anyhow::Result;
use std::path::Path;

#[derive(Debug)]
enum CheckStatus {
    Ok,
    Warn,
    Fail,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Ok => write!(f, "\x1b[32m✓ OK\x1b[0m"),
            CheckStatus::Warn => write!(f, "\x1b[33m⚠ WARN\x1b[0m"),
            CheckStatus::Fail => write!(f, "\x1b[31m✗ FAIL\x1b[0m"),
        }
    }
}

struct CheckResult {
    name: String,
    status: CheckStatus,
    detail: String,
}

impl CheckResult {
    fn new(name: impl Into<String>, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            detail: detail.into(),
        }
    }
}

pub async fn run(config_path: &Path, api_url: Option<&str>) -> Result<()> {
    println!("\n  portfolio-admin doctor\n");

    let mut results = Vec::new();

    let config = match super::load_config(config_path, api_url) {
        Ok(config) => {
            let source = if config_path.exists() {
                format!("Loaded from {}", config_path.display())
            } else {
                "No config file, using defaults".to_string()
            };
            results.push(CheckResult::new("Configuration", CheckStatus::Ok, source));
            config
        }
        Err(e) => {
            results.push(CheckResult::new(
                "Configuration",
                CheckStatus::Fail,
                format!("{:#}", e),
            ));
            return finish(&results);
        }
    };

    results.push(CheckResult::new(
        "Upload limit",
        CheckStatus::Ok,
        config.uploads.max_upload_size.clone(),
    ));

    match ApiClient::new(&config.api) {
        Ok(api) => check_backend(&api, &config, &mut results).await,
        Err(e) => results.push(CheckResult::new(
            "Portfolio API",
            CheckStatus::Fail,
            e.to_string(),
        )),
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    match std::net::TcpListener::bind(&addr) {
        Ok(_listener) => results.push(CheckResult::new(
            "Listen address",
            CheckStatus::Ok,
            format!("{} is available", addr),
        )),
        Err(e) => results.push(CheckResult::new(
            "Listen address",
            CheckStatus::Warn,
            format!("{} cannot be bound ({}). Use --port", addr, e),
        )),
    }

    finish(&results)
}

async fn check_backend(api: &ApiClient, config: &Config, results: &mut Vec<CheckResult>) {
    let counts = tokio::try_join!(
        api.list::<User>(),
        api.list::<Blog>(),
        api.list::<Language>(),
        api.list::<Category>(),
        api.list::<Project>(),
    );

    match counts {
        Ok((users, blogs, languages, categories, projects)) => {
            results.push(CheckResult::new(
                "Portfolio API",
                CheckStatus::Ok,
                format!("Reachable at {}", config.api.base_url),
            ));
            results.push(CheckResult::new(
                "Content",
                CheckStatus::Ok,
                format!(
                    "{} users, {} blogs, {} languages, {} categories, {} projects",
                    users.len(),
                    blogs.len(),
                    languages.len(),
                    categories.len(),
                    projects.len()
                ),
            ));
            let missing_slugs = blogs.iter().filter(|b| b.slug.trim().is_empty()).count();
            if missing_slugs > 0 {
                results.push(CheckResult::new(
                    "Blog slugs",
                    CheckStatus::Warn,
                    format!("{} blog(s) have an empty slug", missing_slugs),
                ));
            }
        }
        Err(e) => results.push(CheckResult::new(
            "Portfolio API",
            CheckStatus::Fail,
            format!("{} ({})", e.user_message(), config.api.base_url),
        )),
    }
}

fn finish(results: &[CheckResult]) -> Result<()> {
    print_results(results);

    if results.iter().any(|r| matches!(r.status, CheckStatus::Fail)) {
        println!("\n  \x1b[31mSome checks failed. Fix the issues above before serving.\x1b[0m\n");
        anyhow::bail!("doctor found failing checks");
    }
    println!("\n  \x1b[32mAll checks passed.\x1b[0m\n");
    Ok(())
}

fn print_results(results: &[CheckResult]) {
    let width = results.iter().map(|r| r.name.len()).max().unwrap_or(20);

    for (i, result) in results.iter().enumerate() {
        println!(
            "  {:>2}. {:<width$}  {}  {}",
            i + 1,
            result.name,
            result.status,
            result.detail,
            width = width,
        );
    }
}
