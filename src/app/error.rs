use thiserror::Error;

#[derive(Error, Debug)]
pub enum MagpieError {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Timed out after {secs}s waiting for `{selector}`")]
    RenderTimeout { selector: String, secs: f64 },

    #[error("Could not read a comment count from `{0}`")]
    CountParse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl MagpieError {
    /// True when the error is a bounded wait that lapsed without the
    /// awaited element appearing.
    pub fn is_render_timeout(&self) -> bool {
        matches!(self, MagpieError::RenderTimeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, MagpieError>;
