//! Configuration management.
//!
//! Configuration is read from a TOML file (default:
//! `~/.config/magpie/config.toml`). If the default file doesn't exist,
//! a commented template is created. Missing fields fall back to their
//! defaults.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::VideoRef;
use crate::scraper::ScrapeSettings;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Videos to scrape, in order.
    pub videos: Vec<VideoRef>,
    pub scraper: ScrapeSettings,
    pub browser: BrowserSettings,
    pub output: OutputSettings,
}

/// Browser process options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Run without a visible window (default: true)
    pub headless: bool,

    /// User agent override
    pub user_agent: Option<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            user_agent: None,
        }
    }
}

/// Where and how results are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory the per-video CSV files land in (default: current dir)
    pub dir: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// With an explicit path the file must exist and parse. Without
    /// one, the default path is used and a commented template is
    /// created on first run.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::default_config_path()?;
                if !default_path.exists() {
                    Self::create_default_config(&default_path)?;
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })?;

        Ok(config)
    }

    /// Default config file path: `~/.config/magpie/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("magpie").join("config.toml"))
    }

    /// Write the commented template config to `path`.
    pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// The commented template written on first run.
    pub fn default_config_content() -> String {
        r##"# Magpie configuration
#
# Each [[videos]] entry is one comment thread to scrape. One CSV file
# is produced per video, named after the video title.

# [[videos]]
# title = "Some Video"
# url = "https://www.youtube.com/watch?v=XXXXXXXXXXX"
# channel = "Some Channel"
# release_date = "Jan 1, 2020"
# tags = "mv, reaction"

[scraper]
# How many comments to aim for per video
quota = 100

# Scroll strategy: "simple" (cheapest), "batched" (bounded DOM growth)
# or "expensive" (most thorough reply coverage)
strategy = "simple"

# Expand reply threads before extraction
scrape_replies = false

# Bounded wait for a single element lookup, in seconds
element_timeout_secs = 10.0

# Bounded wait per attempt while probing the total comment count.
# The probe itself retries until the count renders.
count_probe_timeout_secs = 1.0

[scraper.pacing]
# Comments the UI surfaces per full move-to-end cycle. Empirical: a
# layout change on the target UI invalidates these ratios, so they are
# all overridable here.
comments_per_end_move = 20
end_moves_per_batch = 80
expensive_unit = 200
moves_per_end_move = 4
from_top_extra_moves = 11
over_scroll_buffer = 20

[scraper.settle]
# Delay after each movement or click, in seconds. This is the only
# backpressure against asynchronous rendering.
end_move_secs = 3.0
down_move_secs = 1.5
up_move_secs = 1.5
top_move_secs = 1.0
expensive_down_secs = 1.0
probe_nudge_secs = 0.5
post_click_secs = 0.5

[scraper.selectors]
# CSS selectors for the comment thread UI.
scroll_root = "body"
comment_count = "#count > yt-formatted-string > span:nth-child(1)"
comment_text = "#content-text"
relative_time = "#header-author > yt-formatted-string > a"
author = "#author-text"
show_replies = "#more-replies > yt-button-shape > button > yt-touch-feedback-shape > div"
show_more_replies = "#button > ytd-button-renderer > yt-button-shape > button"
read_more = "#more > span"

[browser]
# Run without a visible window
headless = true

[output]
# Directory the per-video CSV files land in
dir = "."
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
