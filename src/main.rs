use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use magpie::cli::{commands, Cli, Commands};
use magpie::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape {
            quota,
            strategy,
            replies,
            headed,
        } => {
            let mut config = Config::load(cli.config.as_deref())?;

            if let Some(quota) = quota {
                config.scraper.quota = quota;
            }
            if let Some(strategy) = strategy {
                config.scraper.strategy = strategy;
            }
            if replies {
                config.scraper.scrape_replies = true;
            }
            if headed {
                config.browser.headless = false;
            }

            commands::scrape(&config).await?;
        }
        Commands::List => {
            let config = Config::load(cli.config.as_deref())?;
            commands::list(&config)?;
        }
        Commands::Init { path } => {
            commands::init(path.as_deref())?;
        }
    }

    Ok(())
}
