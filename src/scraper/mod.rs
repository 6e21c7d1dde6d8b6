//! Incremental comment extraction engine.
//!
//! The hard problem here is not network I/O but content discovery
//! under an opaque rendering surface: the UI only materializes comment
//! nodes near the viewport, garbage-collects nodes scrolled far out of
//! view, and hides replies and truncated text behind expansion
//! controls. The engine moves the viewport in a chosen pattern, pauses
//! for rendering, triggers expansion, extracts whatever is currently
//! rendered, and merges the overlapping passes into one duplicate-free
//! result.
//!
//! # Architecture
//!
//! ```text
//! Session → probe count → strategy (motion + expand + extract)* → dedupe → records
//! ```

pub mod config;
pub mod dedupe;
pub mod expand;
pub mod extract;
pub mod motion;
pub mod session;
pub mod strategy;

pub use config::{Pacing, ScrapeSettings, Selectors, SettleTimes};
pub use expand::{ExpansionKind, ExpansionReport};
pub use extract::RawBatch;
pub use session::{ScrapeSession, SessionPhase};
pub use strategy::Strategy;
