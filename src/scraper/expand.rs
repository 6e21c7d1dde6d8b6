//! Expansion triggers: reveal replies, further reply pages, and
//! truncated comment text.
//!
//! DOM churn during scrolling makes per-control failure expected: a
//! control may be stale, already expanded, or mid-animation by the
//! time it is clicked. An individual failure therefore never aborts
//! the pass; it is recorded in the report instead.

use tracing::{debug, info};

use crate::browser::Surface;
use crate::scraper::config::ScrapeSettings;

/// The kinds of UI controls that reveal additional content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionKind {
    ShowReplies,
    ShowMoreReplies,
    ReadMore,
}

impl ExpansionKind {
    pub fn label(self) -> &'static str {
        match self {
            ExpansionKind::ShowReplies => "show replies",
            ExpansionKind::ShowMoreReplies => "show more replies",
            ExpansionKind::ReadMore => "read more",
        }
    }

    fn selector(self, settings: &ScrapeSettings) -> &str {
        match self {
            ExpansionKind::ShowReplies => &settings.selectors.show_replies,
            ExpansionKind::ShowMoreReplies => &settings.selectors.show_more_replies,
            ExpansionKind::ReadMore => &settings.selectors.read_more,
        }
    }
}

/// Per-pass activation outcome.
#[derive(Debug, Default)]
pub struct ExpansionReport {
    /// Controls successfully activated.
    pub clicked: usize,
    /// One reason per control that could not be activated.
    pub failures: Vec<String>,
}

/// Activate every currently matching control of the given kind.
///
/// Locating zero controls yields an empty report; a failed lookup is
/// recorded as a single failure rather than propagated, matching the
/// tolerance policy for the rest of the pass.
pub async fn expand(
    surface: &dyn Surface,
    settings: &ScrapeSettings,
    kind: ExpansionKind,
) -> ExpansionReport {
    let mut report = ExpansionReport::default();

    let controls = match surface.find_all(kind.selector(settings)).await {
        Ok(controls) => controls,
        Err(e) => {
            report.failures.push(format!("lookup failed: {}", e));
            return report;
        }
    };

    for control in &controls {
        match control.force_click().await {
            Ok(()) => {
                report.clicked += 1;
                tokio::time::sleep(settings.settle.post_click()).await;
            }
            Err(e) => {
                debug!(kind = kind.label(), "Expansion control skipped: {}", e);
                report.failures.push(e.to_string());
            }
        }
    }

    info!(
        kind = kind.label(),
        clicked = report.clicked,
        failed = report.failures.len(),
        "Expansion pass finished"
    );

    report
}
