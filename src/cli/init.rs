use crate::config::DEFAULT_CONFIG_FILE;
use crate::Config;
use anyhow::Result;
use std::path::Path;

pub async fn run(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;

    let target = path.join(DEFAULT_CONFIG_FILE);
    if target.exists() {
        anyhow::bail!("{} already exists, not overwriting", target.display());
    }

    std::fs::write(&target, Config::default().to_toml()?)?;

    tracing::info!("Wrote {}", target.display());
    tracing::info!("Point api.base_url at the portfolio API, then run 'portfolio-admin serve'");

    Ok(())
}
