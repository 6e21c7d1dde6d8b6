//! One extraction pass over the currently rendered comment nodes.

use tracing::info;

use crate::app::Result;
use crate::browser::Surface;
use crate::scraper::config::ScrapeSettings;

/// Parallel ordered sequences produced by one extraction pass.
///
/// Transient: batches are concatenated as a strategy runs and consumed
/// by the deduplicator, never retained.
#[derive(Debug, Default, Clone)]
pub struct RawBatch {
    pub texts: Vec<String>,
    pub times: Vec<String>,
    pub authors: Vec<String>,
}

impl RawBatch {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn append(&mut self, mut other: RawBatch) {
        self.texts.append(&mut other.texts);
        self.times.append(&mut other.times);
        self.authors.append(&mut other.authors);
    }
}

/// Read the rendered comment nodes into a [`RawBatch`].
///
/// Waits (bounded) for at least one comment node to exist before
/// reading; a lapsed bound is fatal for the pass and propagates.
pub async fn extract(surface: &dyn Surface, settings: &ScrapeSettings) -> Result<RawBatch> {
    surface
        .find_one(&settings.selectors.comment_text, settings.element_timeout())
        .await?;

    let texts = read_all(surface, &settings.selectors.comment_text).await?;
    let times = read_all(surface, &settings.selectors.relative_time).await?;
    let authors = read_all(surface, &settings.selectors.author).await?;

    info!(count = texts.len(), "Extraction pass read comments");

    Ok(RawBatch {
        texts,
        times,
        authors,
    })
}

async fn read_all(surface: &dyn Surface, selector: &str) -> Result<Vec<String>> {
    let handles = surface.find_all(selector).await?;
    let mut values = Vec::with_capacity(handles.len());
    for handle in &handles {
        values.push(handle.text().await?);
    }
    Ok(values)
}
