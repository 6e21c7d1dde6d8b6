//! The scrape session: orchestrates probing, strategy execution,
//! deduplication and record assembly for a single video.

use chrono::Local;
use tracing::{info, warn};

use crate::app::{MagpieError, Result};
use crate::browser::Surface;
use crate::domain::{CommentRecord, VideoRef};
use crate::scraper::config::ScrapeSettings;
use crate::scraper::dedupe::dedupe;
use crate::scraper::motion::{move_to, Direction};
use crate::scraper::strategy::Strategy;

/// Where a session currently is in its lifecycle.
///
/// Terminal on success is `Assembled`; a propagated failure aborts the
/// session in whatever phase it reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Probing,
    Scraping,
    Deduplicating,
    Assembled,
}

/// One scraping run over one video's comment thread.
///
/// A session runs at most one scrape; scraping into a session that
/// already holds records is a logged no-op until [`clear`] is called.
///
/// [`clear`]: ScrapeSession::clear
pub struct ScrapeSession {
    video: VideoRef,
    settings: ScrapeSettings,
    records: Vec<CommentRecord>,
    total_comments: u64,
    phase: SessionPhase,
}

impl ScrapeSession {
    pub fn new(video: VideoRef, settings: ScrapeSettings) -> Self {
        Self {
            video,
            settings,
            records: Vec::new(),
            total_comments: 0,
            phase: SessionPhase::Idle,
        }
    }

    pub fn records(&self) -> &[CommentRecord] {
        &self.records
    }

    /// Total-comment-count estimate discovered by the probe. May be
    /// stale relative to the final record count if the live count
    /// fluctuates during a long scrape.
    pub fn total_comments(&self) -> u64 {
        self.total_comments
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Reset the session so it can scrape again.
    pub fn clear(&mut self) {
        self.records.clear();
        self.total_comments = 0;
        self.phase = SessionPhase::Idle;
    }

    /// Run the full scrape against the given automation surface.
    ///
    /// An unknown strategy name and a non-empty session both finish
    /// with a warning and no records; every other failure propagates
    /// and aborts this video's scrape.
    pub async fn scrape(&mut self, surface: &dyn Surface) -> Result<()> {
        if !self.records.is_empty() {
            warn!("You must clear records before you can scrape again");
            return Ok(());
        }

        let Some(strategy) = Strategy::parse(&self.settings.strategy) else {
            warn!(name = %self.settings.strategy, "Scrape method does not exist");
            return Ok(());
        };

        let collection_date = Local::now().format("%Y-%m-%d").to_string();

        self.phase = SessionPhase::Probing;
        surface.navigate(&self.video.url).await?;

        self.total_comments = self.probe_total_comments(surface).await?;
        info!(total = self.total_comments, "Total comments discovered");

        let end_targets = self
            .settings
            .pacing
            .scroll_end_targets(self.total_comments, self.settings.quota);
        info!(count = end_targets, "Times to scroll end");

        self.phase = SessionPhase::Scraping;
        let batch = strategy.run(surface, &self.settings, end_targets).await?;

        self.phase = SessionPhase::Deduplicating;
        let (unique, _removed) = dedupe(batch);

        self.phase = SessionPhase::Assembled;
        let rows = unique
            .texts
            .into_iter()
            .zip(unique.times)
            .zip(unique.authors);

        for ((text, time), author) in rows {
            self.records.push(CommentRecord::new(
                text,
                time,
                author,
                collection_date.clone(),
                self.video.title.clone(),
                self.video.tags.clone(),
            ));
        }

        info!(count = self.records.len(), "Session assembled records");

        Ok(())
    }

    /// Wait for the total-comment-count element to render.
    ///
    /// The count only appears once the page's initial layout settles,
    /// which can take arbitrarily long; this loop retries indefinitely,
    /// issuing small scroll nudges to prod lazy rendering along. It is
    /// the one place a lapsed wait is not fatal.
    async fn probe_total_comments(&self, surface: &dyn Surface) -> Result<u64> {
        let selector = self.settings.selectors.comment_count.clone();

        loop {
            match surface
                .find_one(&selector, self.settings.count_probe_timeout())
                .await
            {
                Ok(handle) => {
                    let text = handle.text().await?;
                    return parse_count(&text);
                }
                Err(e) if e.is_render_timeout() => {
                    move_to(
                        surface,
                        &self.settings,
                        Direction::PageDown,
                        self.settings.settle.probe_nudge(),
                    )
                    .await?;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Parse a rendered comment count such as `1,234`.
fn parse_count(text: &str) -> Result<u64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();

    digits
        .parse::<u64>()
        .map_err(|_| MagpieError::CountParse(text.to_string()))
}
