use serde::Serialize;

/// A single scraped comment with its provenance.
///
/// Created only by the session after deduplication; immutable once
/// created. Field order matches the CSV column order of the produced
/// output table.
#[derive(Debug, Clone, Serialize)]
pub struct CommentRecord {
    pub comment_text: String,
    /// Relative timestamp as rendered by the UI, e.g. "3 weeks ago".
    pub time_elapsed_since_comment: String,
    pub author: String,
    /// Collection date, `YYYY-MM-DD`.
    pub time_of_collection: String,
    pub from_video: String,
    pub tags: Option<String>,
}

impl CommentRecord {
    pub fn new(
        comment_text: String,
        time_elapsed_since_comment: String,
        author: String,
        time_of_collection: String,
        from_video: String,
        tags: Option<String>,
    ) -> Self {
        Self {
            comment_text,
            time_elapsed_since_comment,
            author,
            time_of_collection,
            from_video,
            tags,
        }
    }
}
