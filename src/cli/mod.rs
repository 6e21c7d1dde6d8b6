pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "magpie")]
#[command(about = "Scrape comment threads from infinite-scroll video pages", long_about = None)]
pub struct Cli {
    /// Path to the config file (default: ~/.config/magpie/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape comments for every configured video
    Scrape {
        /// Override the per-video comment quota
        #[arg(long)]
        quota: Option<u64>,

        /// Override the scroll strategy (simple, batched, expensive)
        #[arg(long)]
        strategy: Option<String>,

        /// Expand reply threads before extraction
        #[arg(long)]
        replies: bool,

        /// Show the browser window while scraping
        #[arg(long)]
        headed: bool,
    },
    /// List configured videos without scraping
    List,
    /// Write a commented default config file
    Init {
        /// Destination path (default: the standard config path)
        path: Option<std::path::PathBuf>,
    },
}
