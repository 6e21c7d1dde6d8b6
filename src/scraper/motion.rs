//! Viewport movement and the growth probe.
//!
//! Movement is dispatched as key events against the scroll root; each
//! move is followed by a settle delay so asynchronously rendered
//! content has a chance to appear before the next action reads the
//! page. The growth probe reads the document extent before and after a
//! movement batch: a non-increasing extent means the stream is
//! exhausted for that pass.

use std::time::Duration;

use tracing::info;

use crate::app::Result;
use crate::browser::{Key, Surface};
use crate::scraper::config::ScrapeSettings;

/// Script returning the renderable-content extent.
const EXTENT_SCRIPT: &str = "document.documentElement.scrollHeight";

/// Primitive viewport movements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Top,
    End,
    PageUp,
    PageDown,
}

impl Direction {
    fn key(self) -> Key {
        match self {
            Direction::Top => Key::Home,
            Direction::End => Key::End,
            Direction::PageUp => Key::PageUp,
            Direction::PageDown => Key::PageDown,
        }
    }
}

/// Extent seen by the previous probe, threaded through movement
/// batches so stall detection works across strategy iterations.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScrollState {
    pub extent: i64,
}

/// Outcome of one bounded move-to-end loop.
#[derive(Debug, Clone, Copy)]
pub struct EndRun {
    /// End-moves actually issued, including the one that stalled.
    pub moves: usize,
    /// The extent stopped growing before the budget was spent.
    pub stalled: bool,
}

/// Issue one movement and block for the settle delay.
pub async fn move_to(
    surface: &dyn Surface,
    settings: &ScrapeSettings,
    direction: Direction,
    settle: Duration,
) -> Result<()> {
    let root = surface
        .find_one(&settings.selectors.scroll_root, settings.element_timeout())
        .await?;
    root.press_key(direction.key()).await?;
    tokio::time::sleep(settle).await;
    Ok(())
}

/// Read the current document extent.
pub async fn extent(surface: &dyn Surface) -> Result<i64> {
    let value = surface.run_script(EXTENT_SCRIPT).await?;
    Ok(value.as_i64().unwrap_or(0))
}

/// Move to the end of the document up to `max_moves` times, stopping
/// early when the extent stalls.
pub async fn run_to_end(
    surface: &dyn Surface,
    settings: &ScrapeSettings,
    max_moves: usize,
    state: &mut ScrollState,
) -> Result<EndRun> {
    let mut moves = 0;

    for _ in 0..max_moves {
        move_to(surface, settings, Direction::End, settings.settle.end_move()).await?;
        moves += 1;

        let new_extent = extent(surface).await?;
        if new_extent <= state.extent {
            info!("Scrolling ends due to reaching end");
            return Ok(EndRun {
                moves,
                stalled: true,
            });
        }
        state.extent = new_extent;
    }

    Ok(EndRun {
        moves,
        stalled: false,
    })
}

/// Issue `count` moves in one direction with a shared settle delay.
pub async fn move_repeated(
    surface: &dyn Surface,
    settings: &ScrapeSettings,
    direction: Direction,
    count: usize,
    settle: Duration,
) -> Result<()> {
    for _ in 0..count {
        move_to(surface, settings, direction, settle).await?;
    }
    Ok(())
}
