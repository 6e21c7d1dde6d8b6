//! CSV serialization of scraped comment records.
//!
//! One file per video, named after the video title, with columns
//! `comment_text, time_elapsed_since_comment, author,
//! time_of_collection, from_video, tags`.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::app::Result;
use crate::domain::CommentRecord;

/// Write `records` to `output_<video title>.csv` under `dir`.
///
/// Returns the path written. The title is sanitized so it is always a
/// valid single-component filename.
pub fn write_csv(dir: &Path, video_title: &str, records: &[CommentRecord]) -> Result<PathBuf> {
    let path = dir.join(format!("output_{}.csv", sanitize_title(video_title)));

    // Header written explicitly so an empty record set still produces
    // a well-formed file.
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(&path)?;
    writer.write_record([
        "comment_text",
        "time_elapsed_since_comment",
        "author",
        "time_of_collection",
        "from_video",
        "tags",
    ])?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!(path = %path.display(), count = records.len(), "Wrote comment records");

    Ok(path)
}

/// Replace filesystem-hostile characters with underscores.
fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
