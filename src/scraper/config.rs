use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tuning knobs for one scraping session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeSettings {
    /// How many comments to aim for per video (default: 100)
    pub quota: u64,

    /// Scroll strategy: "simple", "batched" or "expensive" (default: "simple")
    pub strategy: String,

    /// Expand reply threads before extraction (default: false)
    pub scrape_replies: bool,

    /// Bounded wait for any single element lookup, in seconds (default: 10)
    pub element_timeout_secs: f64,

    /// Bounded wait for one attempt at the comment-count probe, in
    /// seconds. The probe itself retries indefinitely. (default: 1)
    pub count_probe_timeout_secs: f64,

    pub pacing: Pacing,
    pub settle: SettleTimes,
    pub selectors: Selectors,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            quota: 100,
            strategy: "simple".to_string(),
            scrape_replies: false,
            element_timeout_secs: 10.0,
            count_probe_timeout_secs: 1.0,
            pacing: Pacing::default(),
            settle: SettleTimes::default(),
            selectors: Selectors::default(),
        }
    }
}

impl ScrapeSettings {
    pub fn element_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.element_timeout_secs)
    }

    pub fn count_probe_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.count_probe_timeout_secs)
    }
}

/// Movement-count ratios, tuned empirically against one version of the
/// target UI. Kept as named, overridable values because a UI layout
/// change silently invalidates hardcoded ratios.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    /// Comments the UI surfaces per full move-to-end cycle (default: 20)
    pub comments_per_end_move: u64,

    /// End-moves per batch in the batched strategy (default: 80)
    pub end_moves_per_batch: usize,

    /// Page-down unit per pass in the expensive strategy (default: 200)
    pub expensive_unit: usize,

    /// Page-moves equivalent to one end-move (default: 4)
    pub moves_per_end_move: usize,

    /// Extra page-downs when re-descending from the top (default: 11)
    pub from_top_extra_moves: usize,

    /// Extra page-ups past the unit in the expensive strategy, to force
    /// a fresh extraction region into view (default: 20)
    pub over_scroll_buffer: usize,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            comments_per_end_move: 20,
            end_moves_per_batch: 80,
            expensive_unit: 200,
            moves_per_end_move: 4,
            from_top_extra_moves: 11,
            over_scroll_buffer: 20,
        }
    }
}

impl Pacing {
    /// How many move-to-end cycles a quota calls for.
    pub fn scroll_end_targets(&self, total_comments: u64, quota: u64) -> usize {
        (total_comments.min(quota) / self.comments_per_end_move) as usize
    }

    /// Page-downs needed to re-render content covered by `end_moves`
    /// end-moves, with an extra allowance when starting from the top.
    pub fn scroll_down_times(&self, end_moves: usize, from_top: bool) -> usize {
        let base = end_moves * self.moves_per_end_move;
        if from_top {
            base + self.from_top_extra_moves
        } else {
            base
        }
    }

    /// Page-ups needed to back out of `end_moves` end-moves.
    pub fn scroll_up_times(&self, end_moves: usize) -> usize {
        end_moves * self.moves_per_end_move
    }
}

/// Settle delays after each movement or click, in seconds.
///
/// Pacing is the sole backpressure mechanism against asynchronous
/// rendering; nothing else guarantees content has loaded before an
/// extraction pass reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettleTimes {
    pub end_move_secs: f64,
    pub down_move_secs: f64,
    pub up_move_secs: f64,
    pub top_move_secs: f64,
    /// Faster down-move pacing used inside the expensive strategy's
    /// long descent phases.
    pub expensive_down_secs: f64,
    /// Small nudge pacing while waiting for the initial page layout.
    pub probe_nudge_secs: f64,
    pub post_click_secs: f64,
}

impl Default for SettleTimes {
    fn default() -> Self {
        Self {
            end_move_secs: 3.0,
            down_move_secs: 1.5,
            up_move_secs: 1.5,
            top_move_secs: 1.0,
            expensive_down_secs: 1.0,
            probe_nudge_secs: 0.5,
            post_click_secs: 0.5,
        }
    }
}

impl SettleTimes {
    pub fn end_move(&self) -> Duration {
        Duration::from_secs_f64(self.end_move_secs)
    }

    pub fn down_move(&self) -> Duration {
        Duration::from_secs_f64(self.down_move_secs)
    }

    pub fn up_move(&self) -> Duration {
        Duration::from_secs_f64(self.up_move_secs)
    }

    pub fn top_move(&self) -> Duration {
        Duration::from_secs_f64(self.top_move_secs)
    }

    pub fn expensive_down(&self) -> Duration {
        Duration::from_secs_f64(self.expensive_down_secs)
    }

    pub fn probe_nudge(&self) -> Duration {
        Duration::from_secs_f64(self.probe_nudge_secs)
    }

    pub fn post_click(&self) -> Duration {
        Duration::from_secs_f64(self.post_click_secs)
    }

    /// All delays zeroed. Used by tests driving a scripted surface.
    pub fn instant() -> Self {
        Self {
            end_move_secs: 0.0,
            down_move_secs: 0.0,
            up_move_secs: 0.0,
            top_move_secs: 0.0,
            expensive_down_secs: 0.0,
            probe_nudge_secs: 0.0,
            post_click_secs: 0.0,
        }
    }
}

/// CSS selectors for the comment thread UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// Scroll target that receives movement key events
    pub scroll_root: String,

    /// Total comment count shown at the top of the thread
    pub comment_count: String,

    /// Comment body text nodes
    pub comment_text: String,

    /// Relative timestamp nodes, parallel to the text nodes
    pub relative_time: String,

    /// Author name nodes, parallel to the text nodes
    pub author: String,

    /// Controls that reveal a reply thread
    pub show_replies: String,

    /// Controls that reveal further pages of a long reply thread
    pub show_more_replies: String,

    /// Controls that expand truncated comment text
    pub read_more: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            scroll_root: "body".to_string(),
            comment_count: "#count > yt-formatted-string > span:nth-child(1)".to_string(),
            comment_text: "#content-text".to_string(),
            relative_time: "#header-author > yt-formatted-string > a".to_string(),
            author: "#author-text".to_string(),
            show_replies: "#more-replies > yt-button-shape > button > yt-touch-feedback-shape > div"
                .to_string(),
            show_more_replies: "#button > ytd-button-renderer > yt-button-shape > button"
                .to_string(),
            read_more: "#more > span".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_end_targets_quota_binds() {
        let pacing = Pacing::default();
        assert_eq!(pacing.scroll_end_targets(250, 100), 5);
    }

    #[test]
    fn test_scroll_end_targets_total_binds() {
        let pacing = Pacing::default();
        assert_eq!(pacing.scroll_end_targets(40, 100), 2);
    }

    #[test]
    fn test_scroll_down_times_from_top() {
        let pacing = Pacing::default();
        assert_eq!(pacing.scroll_down_times(5, true), 31);
    }

    #[test]
    fn test_scroll_down_times_in_place() {
        let pacing = Pacing::default();
        assert_eq!(pacing.scroll_down_times(5, false), 20);
    }

    #[test]
    fn test_scroll_up_times() {
        let pacing = Pacing::default();
        assert_eq!(pacing.scroll_up_times(5), 20);
    }

    #[test]
    fn test_scroll_end_targets_custom_ratio() {
        let pacing = Pacing {
            comments_per_end_move: 10,
            ..Default::default()
        };
        assert_eq!(pacing.scroll_end_targets(250, 100), 10);
    }

    #[test]
    fn test_default_settings() {
        let settings = ScrapeSettings::default();
        assert_eq!(settings.quota, 100);
        assert_eq!(settings.strategy, "simple");
        assert!(!settings.scrape_replies);
        assert_eq!(settings.element_timeout(), Duration::from_secs(10));
        assert_eq!(settings.count_probe_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_instant_settle_is_zero() {
        let settle = SettleTimes::instant();
        assert_eq!(settle.end_move(), Duration::ZERO);
        assert_eq!(settle.post_click(), Duration::ZERO);
    }
}
