//! Browser automation surface.
//!
//! The scraping engine only needs a handful of capabilities from the
//! browser: navigate, locate elements (with a bounded wait), dispatch
//! scroll-inducing key events, run a script, and read element text.
//! Those capabilities are expressed as the [`Surface`] and [`DomHandle`]
//! traits so the engine can be driven against a real Chrome session or
//! a scripted test double.

mod chrome;

pub use chrome::ChromeSurface;

use std::time::Duration;

use async_trait::async_trait;

use crate::app::Result;

/// Keys the viewport mover is allowed to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    PageDown,
    PageUp,
    Home,
    End,
}

impl Key {
    /// The DOM key value sent over the wire.
    pub fn as_dom_key(self) -> &'static str {
        match self {
            Key::PageDown => "PageDown",
            Key::PageUp => "PageUp",
            Key::Home => "Home",
            Key::End => "End",
        }
    }
}

/// A handle onto one rendered DOM element.
///
/// Handles are transient: the renderer garbage-collects nodes scrolled
/// far out of view, so a handle may go stale at any time. Callers that
/// iterate handle collections must treat per-handle failures as
/// expected (see the expansion trigger).
#[async_trait]
pub trait DomHandle: Send + Sync {
    /// Rendered text content of the element.
    async fn text(&self) -> Result<String>;

    /// Dispatch a key event to the element.
    async fn press_key(&self, key: Key) -> Result<()>;

    /// Click the element via script, bypassing interactability checks.
    ///
    /// Expansion controls are frequently occluded or mid-animation
    /// while the page is scrolling; a scripted click still lands.
    async fn force_click(&self) -> Result<()>;
}

/// The browser capabilities the scraping engine consumes.
#[async_trait]
pub trait Surface: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Find the first element matching `selector`, polling until
    /// `timeout` lapses. A lapsed bound is a
    /// [`MagpieError::RenderTimeout`](crate::app::MagpieError).
    async fn find_one(&self, selector: &str, timeout: Duration) -> Result<Box<dyn DomHandle>>;

    /// All elements currently matching `selector`, in document order.
    /// Zero matches is an empty vector, not an error.
    async fn find_all(&self, selector: &str) -> Result<Vec<Box<dyn DomHandle>>>;

    /// Evaluate a script in the page and return its value.
    async fn run_script(&self, script: &str) -> Result<serde_json::Value>;
}
