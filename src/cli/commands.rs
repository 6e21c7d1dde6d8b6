use std::path::Path;

use tracing::{error, info, warn};

use crate::app::{MagpieError, Result};
use crate::browser::ChromeSurface;
use crate::config::Config;
use crate::export;
use crate::scraper::ScrapeSession;

/// Scrape every configured video in order.
///
/// Each video gets its own browser process, released on every exit
/// path. One video's failure is logged and the loop moves on to the
/// next.
pub async fn scrape(config: &Config) -> Result<()> {
    if config.videos.is_empty() {
        println!("No videos configured");
        return Ok(());
    }

    let mut succeeded = 0;
    let mut failed = 0;

    for video in &config.videos {
        info!(video = %video.title, "-----  Scraping starts  -----");

        if let Err(e) = video.parsed_url() {
            eprintln!("  Skipping {}: {}", video.title, e);
            failed += 1;
            continue;
        }

        let surface = match ChromeSurface::launch(&config.browser).await {
            Ok(surface) => surface,
            Err(e) => {
                eprintln!("  Error launching browser for {}: {}", video.title, e);
                failed += 1;
                continue;
            }
        };

        let mut session = ScrapeSession::new(video.clone(), config.scraper.clone());
        let outcome = session.scrape(&surface).await;

        if let Err(e) = surface.close().await {
            warn!(video = %video.title, "Browser did not close cleanly: {}", e);
        }

        match outcome {
            Ok(()) => {
                info!(
                    video = %video.title,
                    total = session.total_comments(),
                    scraped = session.records().len(),
                    "Scrape finished"
                );

                match export::write_csv(&config.output.dir, &video.title, session.records()) {
                    Ok(path) => {
                        println!(
                            "{}: {} comments -> {}",
                            video.title,
                            session.records().len(),
                            path.display()
                        );
                        succeeded += 1;
                    }
                    Err(e) => {
                        eprintln!("  Error writing output for {}: {}", video.title, e);
                        failed += 1;
                    }
                }
            }
            Err(e) => {
                error!(video = %video.title, "Scrape aborted: {}", e);
                eprintln!("  Error scraping {}: {}", video.title, e);
                failed += 1;
            }
        }

        info!(video = %video.title, "-----  Scraping ends  -----");
    }

    println!("Scrape complete: {} succeeded, {} failed", succeeded, failed);
    Ok(())
}

/// Print the configured videos.
pub fn list(config: &Config) -> Result<()> {
    if config.videos.is_empty() {
        println!("No videos configured");
        return Ok(());
    }

    for video in &config.videos {
        println!(
            "{} ({}, {})\n  {}",
            video.title, video.channel, video.release_date, video.url
        );
        if let Some(ref tags) = video.tags {
            println!("  tags: {}", tags);
        }
    }

    Ok(())
}

/// Write the commented default config.
pub fn init(path: Option<&Path>) -> Result<()> {
    let target = match path {
        Some(p) => p.to_path_buf(),
        None => Config::default_config_path().map_err(|e| MagpieError::Config(e.to_string()))?,
    };

    if target.exists() {
        println!("Config already exists: {}", target.display());
        return Ok(());
    }

    Config::create_default_config(&target).map_err(|e| MagpieError::Config(e.to_string()))?;
    println!("Wrote default config: {}", target.display());

    Ok(())
}
