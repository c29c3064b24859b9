pub mod doctor;
pub mod init;
pub mod serve;
pub mod slug;

use crate::config::DEFAULT_CONFIG_FILE;
use crate::Config;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "portfolio-admin")]
#[command(version)]
#[command(about = "Admin dashboard for the portfolio API", long_about = None)]
pub struct Cli {
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Overrides `api.base_url` from the config file.
    #[arg(long, global = true, env = "PORTFOLIO_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the dashboard
    Serve {
        #[arg(short = 'H', long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Write a default config file
    Init {
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Check config and backend connectivity
    Doctor,
    /// Print the slug derived from a title
    Slug {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
}

/// Load the config file (defaults when absent), apply the command-line API
/// override and validate the result.
pub fn load_config(path: &Path, api_url: Option<&str>) -> Result<Config> {
    let mut config = Config::load_or_default(path)?;
    if let Some(url) = api_url {
        config.api.base_url = url.trim().to_string();
    }
    config.validate()?;
    Ok(config)
}
