//! The three interchangeable scroll strategies.
//!
//! All strategies converge on the same output shape: a [`RawBatch`]
//! concatenating every extraction pass, handed to the deduplicator
//! exactly once by the session.
//!
//! - `simple`: one long descent, one expansion round, one extraction.
//!   Cheapest, but replies rendered only transiently can be missed.
//! - `batched`: bounded batches of end-moves with expansion and
//!   extraction per batch, so the renderer never accumulates an
//!   unbounded node count.
//! - `expensive`: escalating page-down waves with an aggressive
//!   over-scroll back up before each extraction. Most automation
//!   calls, most thorough reply coverage.

use tracing::info;

use crate::app::Result;
use crate::browser::Surface;
use crate::scraper::config::ScrapeSettings;
use crate::scraper::expand::{expand, ExpansionKind};
use crate::scraper::extract::{extract, RawBatch};
use crate::scraper::motion::{move_repeated, move_to, run_to_end, Direction, ScrollState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Simple,
    Batched,
    Expensive,
}

impl Strategy {
    /// Parse a strategy name. Unknown names yield `None`; the session
    /// logs and produces zero records rather than failing.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "simple" => Some(Strategy::Simple),
            "batched" => Some(Strategy::Batched),
            "expensive" => Some(Strategy::Expensive),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Simple => "simple",
            Strategy::Batched => "batched",
            Strategy::Expensive => "expensive",
        }
    }

    /// Drive the movement/expansion/extraction cycle for this strategy.
    ///
    /// `end_targets` is the movement-count target computed from the
    /// comment quota.
    pub async fn run(
        self,
        surface: &dyn Surface,
        settings: &ScrapeSettings,
        end_targets: usize,
    ) -> Result<RawBatch> {
        info!(strategy = self.name(), "Scrape strategy starts");

        match self {
            Strategy::Simple => simple(surface, settings, end_targets).await,
            Strategy::Batched => batched(surface, settings, end_targets).await,
            Strategy::Expensive => expensive(surface, settings, end_targets).await,
        }
    }
}

/// Run both reply-expansion kinds, then the read-more expansion.
async fn expand_round(surface: &dyn Surface, settings: &ScrapeSettings) {
    if settings.scrape_replies {
        expand(surface, settings, ExpansionKind::ShowReplies).await;
        expand(surface, settings, ExpansionKind::ShowMoreReplies).await;
    }
    expand(surface, settings, ExpansionKind::ReadMore).await;
}

async fn simple(
    surface: &dyn Surface,
    settings: &ScrapeSettings,
    end_targets: usize,
) -> Result<RawBatch> {
    let mut state = ScrollState::default();

    info!("Started scrolling end");
    let run = run_to_end(surface, settings, end_targets, &mut state).await?;
    info!(count = run.moves, "Scroll end count");

    expand_round(surface, settings).await;

    if settings.scrape_replies {
        // Expanded replies render above the current viewport; return
        // to the top and walk back down so they materialize before the
        // single extraction pass.
        let down_moves = settings.pacing.scroll_down_times(run.moves, true);

        info!("Started scrolling top");
        move_to(surface, settings, Direction::Top, settings.settle.top_move()).await?;

        info!(count = down_moves, "Started scrolling down");
        move_repeated(
            surface,
            settings,
            Direction::PageDown,
            down_moves,
            settings.settle.down_move(),
        )
        .await?;
    }

    extract(surface, settings).await
}

async fn batched(
    surface: &dyn Surface,
    settings: &ScrapeSettings,
    end_targets: usize,
) -> Result<RawBatch> {
    let mut accumulated = RawBatch::default();
    let mut state = ScrollState::default();

    let batches = end_targets / settings.pacing.end_moves_per_batch + 1;

    for batch_index in 0..batches {
        info!(batch = batch_index, "Entered batch");

        info!("Started scrolling end");
        let run = run_to_end(
            surface,
            settings,
            settings.pacing.end_moves_per_batch,
            &mut state,
        )
        .await?;
        info!(count = run.moves, "Batch scroll end count");

        expand_round(surface, settings).await;

        if settings.scrape_replies {
            let up_moves = settings.pacing.scroll_up_times(run.moves);
            info!(count = up_moves, "Started scrolling up");
            move_repeated(
                surface,
                settings,
                Direction::PageUp,
                up_moves,
                settings.settle.up_move(),
            )
            .await?;
        }

        accumulated.append(extract(surface, settings).await?);

        // A stalled batch still gets expanded and extracted above; the
        // outer loop ends here.
        if run.stalled {
            break;
        }
    }

    Ok(accumulated)
}

async fn expensive(
    surface: &dyn Surface,
    settings: &ScrapeSettings,
    end_targets: usize,
) -> Result<RawBatch> {
    let mut accumulated = RawBatch::default();

    let unit = settings.pacing.expensive_unit;
    let down_target = settings.pacing.scroll_down_times(end_targets, false);
    info!(count = down_target, "Down-move budget");

    let mut progress = 0;
    let mut first_pass = true;

    while progress < down_target {
        // The first descent covers one unit; later descents double it
        // because the viewport must re-cross ground given back by the
        // over-scroll phase.
        let descent = if first_pass { unit } else { unit * 2 };

        info!(count = descent, "Started scrolling down");
        move_repeated(
            surface,
            settings,
            Direction::PageDown,
            descent,
            settings.settle.expensive_down(),
        )
        .await?;

        expand_round(surface, settings).await;

        let ascent = unit + settings.pacing.over_scroll_buffer;
        info!(count = ascent, "Started scrolling up");
        move_repeated(
            surface,
            settings,
            Direction::PageUp,
            ascent,
            settings.settle.up_move(),
        )
        .await?;

        accumulated.append(extract(surface, settings).await?);

        progress += unit;
        first_pass = false;
    }

    Ok(accumulated)
}
