use clap::Parser;
use portfolio_admin::cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portfolio_admin=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let api_url = cli.api_url.as_deref();

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            portfolio_admin::cli::serve::run(&cli.config, api_url, host, port).await?;
        }
        Some(Commands::Init { path }) => {
            portfolio_admin::cli::init::run(&path).await?;
        }
        Some(Commands::Doctor) => {
            portfolio_admin::cli::doctor::run(&cli.config, api_url).await?;
        }
        Some(Commands::Slug { title }) => {
            portfolio_admin::cli::slug::run(&title)?;
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
