//! # Magpie
//!
//! Extracts server-paginated comment threads from infinite-scroll video
//! pages into deduplicated CSV tables.
//!
//! The target UI only renders comment nodes near the viewport, discards
//! nodes scrolled far out of view, and hides replies and truncated text
//! behind expansion controls. Magpie drives a browser through one of
//! three scroll strategies, pausing for rendering after every movement,
//! triggering expansion where needed, and merging the overlapping
//! extraction passes into a single duplicate-free record set per video.
//!
//! ## Architecture
//!
//! ```text
//! config → session → browser surface → strategy → dedupe → CSV
//! ```
//!
//! ## Quick start
//!
//! ```bash
//! # Write a commented config template
//! magpie init
//!
//! # Add [[videos]] entries to the config, then
//! magpie scrape
//! ```

/// Error types and the crate-wide `Result` alias.
pub mod app;

/// Browser automation surface: the [`Surface`](browser::Surface) and
/// [`DomHandle`](browser::DomHandle) traits plus the chromiumoxide
/// implementation.
pub mod browser;

/// Command-line interface using clap.
pub mod cli;

/// TOML configuration: target videos, pacing ratios, settle delays,
/// selectors, browser and output options.
pub mod config;

/// Core domain models: [`VideoRef`](domain::VideoRef) and
/// [`CommentRecord`](domain::CommentRecord).
pub mod domain;

/// CSV output, one file per video.
pub mod export;

/// The scroll/extract/dedup engine:
/// [`ScrapeSession`](scraper::ScrapeSession) orchestrating viewport
/// movement, growth probing, expansion triggers, extraction passes and
/// deduplication under a selected [`Strategy`](scraper::Strategy).
pub mod scraper;
