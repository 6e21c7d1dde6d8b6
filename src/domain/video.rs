use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::Result;

/// A target video to scrape comments from.
///
/// Immutable input descriptor: built from configuration and never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRef {
    pub title: String,
    pub url: String,
    pub channel: String,
    pub release_date: String,
    /// Free-form comma-separated labels carried through to every
    /// comment record scraped from this video.
    #[serde(default)]
    pub tags: Option<String>,
}

impl VideoRef {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        channel: impl Into<String>,
        release_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            channel: channel.into(),
            release_date: release_date.into(),
            tags: None,
        }
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    /// Validate the URL field.
    pub fn parsed_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.url)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_url_valid() {
        let video = VideoRef::new(
            "Some Video",
            "https://www.youtube.com/watch?v=abc123",
            "Some Channel",
            "Jan 1, 2020",
        );
        assert!(video.parsed_url().is_ok());
    }

    #[test]
    fn test_parsed_url_invalid() {
        let video = VideoRef::new("Bad", "not a url", "Channel", "Jan 1, 2020");
        assert!(video.parsed_url().is_err());
    }

    #[test]
    fn test_with_tags() {
        let video = VideoRef::new("V", "https://example.com", "C", "D").with_tags("mv, reaction");
        assert_eq!(video.tags.as_deref(), Some("mv, reaction"));
    }
}
