use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "portfolio-admin.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdminConfig {
    #[serde(default = "default_title")]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Where the backend serves uploaded images. Defaults to `{base_url}/cdn`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdn_url: Option<String>,
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_upload")]
    pub max_upload_size: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cdn_url: None,
            timeout_secs: default_api_timeout(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_size: default_max_upload(),
        }
    }
}

fn default_title() -> String {
    "Portfolio Admin".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_request_timeout() -> u64 {
    30
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_api_timeout() -> u64 {
    10
}

fn default_max_upload() -> String {
    "10MB".to_string()
}

impl ApiConfig {
    pub fn cdn_base(&self) -> String {
        match &self.cdn_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("{}/cdn", self.base_url.trim_end_matches('/')),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_http_url("api.base_url", &self.base_url)?;
        if let Some(ref cdn) = self.cdn_url {
            validate_http_url("api.cdn_url", cdn)?;
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("api.timeout_secs must be greater than 0");
        }
        Ok(())
    }
}

impl UploadConfig {
    pub fn max_upload_bytes(&self) -> Result<usize> {
        let bytes = parse_size(&self.max_upload_size)?;
        if bytes == 0 {
            anyhow::bail!("uploads.max_upload_size must be greater than 0");
        }
        Ok(bytes)
    }
}

fn validate_http_url(key: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| anyhow::anyhow!("{} '{}' is invalid: {}", key, value, e))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => anyhow::bail!("{} must use http or https, not '{}'", key, other),
    }
}

/// Parse sizes such as `512KB`, `10MB` or `1 GB` (binary multiples).
pub fn parse_size(value: &str) -> Result<usize> {
    let trimmed = value.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);

    let number: usize = digits
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid size '{}'", value))?;
    let multiplier: usize = match unit.trim().to_ascii_uppercase().as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1024,
        "MB" | "M" => 1024 * 1024,
        "GB" | "G" => 1024 * 1024 * 1024,
        other => anyhow::bail!("Unknown size unit '{}' in '{}'", other, value),
    };

    number
        .checked_mul(multiplier)
        .ok_or_else(|| anyhow::anyhow!("Size '{}' is too large", value))
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Could not read config file '{}': {}", path.display(), e)
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file means "all defaults".
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.admin.title.trim().is_empty() {
            anyhow::bail!("admin.title must not be empty");
        }
        if self.server.request_timeout_secs == 0 {
            anyhow::bail!("server.request_timeout_secs must be greater than 0");
        }
        self.api.validate()?;
        self.uploads.max_upload_bytes()?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
