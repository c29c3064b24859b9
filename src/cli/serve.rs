use crate::web;
use anyhow::Result;
use std::path::Path;

pub async fn run(
    config_path: &Path,
    api_url: Option<&str>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let mut config = super::load_config(config_path, api_url)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Starting dashboard at http://{}", addr);

    web::serve(config, &addr).await
}
