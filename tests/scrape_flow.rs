//! End-to-end engine tests against a scripted automation surface.
//!
//! The mock models the essentials of the real rendering surface: a
//! comment count element, comment nodes that materialize as the
//! viewport moves down, a document extent that grows while new nodes
//! render and stalls once the stream is exhausted, and read-more
//! controls that can each be expanded exactly once.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;

use magpie::app::{MagpieError, Result};
use magpie::browser::{DomHandle, Key, Surface};
use magpie::domain::VideoRef;
use magpie::scraper::expand::{expand, ExpansionKind};
use magpie::scraper::{ScrapeSession, ScrapeSettings, SettleTimes};

#[derive(Default)]
struct MockState {
    /// Unique comments the page can ever surface.
    total_comments: usize,
    /// Text rendered inside the comment-count element.
    reported_count: String,
    /// Comments revealed per End press / per PageDown press.
    per_end_move: usize,
    per_page_down: usize,
    /// The count element only renders after this many PageDown presses.
    count_after_downs: usize,

    revealed: usize,
    end_presses: usize,
    down_presses: usize,
    up_presses: usize,
    home_presses: usize,
    navigations: Vec<String>,

    read_more_controls: usize,
    read_more_expanded: HashSet<usize>,
}

impl MockState {
    fn extent(&self) -> i64 {
        1000 + (self.revealed as i64) * 120
    }

    fn press(&mut self, key: Key) {
        match key {
            Key::End => {
                self.end_presses += 1;
                self.revealed = (self.revealed + self.per_end_move).min(self.total_comments);
            }
            Key::PageDown => {
                self.down_presses += 1;
                self.revealed = (self.revealed + self.per_page_down).min(self.total_comments);
            }
            Key::PageUp => self.up_presses += 1,
            Key::Home => self.home_presses += 1,
        }
    }
}

#[derive(Clone)]
struct MockSurface {
    state: Arc<Mutex<MockState>>,
}

impl MockSurface {
    fn new(state: MockState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn handle(&self, kind: HandleKind) -> Box<dyn DomHandle> {
        Box::new(MockHandle {
            state: self.state.clone(),
            kind,
        })
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }
}

#[derive(Clone, Copy)]
enum HandleKind {
    Root,
    Count,
    Text(usize),
    Time(usize),
    Author(usize),
    ReadMore(usize),
}

struct MockHandle {
    state: Arc<Mutex<MockState>>,
    kind: HandleKind,
}

#[async_trait]
impl DomHandle for MockHandle {
    async fn text(&self) -> Result<String> {
        let state = self.state.lock().unwrap();
        Ok(match self.kind {
            HandleKind::Count => state.reported_count.clone(),
            HandleKind::Text(i) => format!("comment {}", i),
            HandleKind::Time(i) => format!("{} days ago", i),
            HandleKind::Author(i) => format!("author {}", i),
            _ => String::new(),
        })
    }

    async fn press_key(&self, key: Key) -> Result<()> {
        if matches!(self.kind, HandleKind::Root) {
            self.state.lock().unwrap().press(key);
        }
        Ok(())
    }

    async fn force_click(&self) -> Result<()> {
        if let HandleKind::ReadMore(i) = self.kind {
            let mut state = self.state.lock().unwrap();
            if !state.read_more_expanded.insert(i) {
                return Err(MagpieError::Other("control already expanded".into()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Surface for MockSurface {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.state().navigations.push(url.to_string());
        Ok(())
    }

    async fn find_one(&self, selector: &str, timeout: Duration) -> Result<Box<dyn DomHandle>> {
        let selectors = ScrapeSettings::default().selectors;
        let state = self.state();

        if selector == selectors.scroll_root {
            return Ok(self.handle(HandleKind::Root));
        }
        if selector == selectors.comment_count {
            if state.down_presses >= state.count_after_downs {
                return Ok(self.handle(HandleKind::Count));
            }
        } else if selector == selectors.comment_text && state.revealed > 0 {
            return Ok(self.handle(HandleKind::Text(0)));
        }

        Err(MagpieError::RenderTimeout {
            selector: selector.to_string(),
            secs: timeout.as_secs_f64(),
        })
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<Box<dyn DomHandle>>> {
        let selectors = ScrapeSettings::default().selectors;
        let state = self.state();

        let handles: Vec<Box<dyn DomHandle>> = if selector == selectors.comment_text {
            (0..state.revealed)
                .map(|i| self.handle(HandleKind::Text(i)))
                .collect()
        } else if selector == selectors.relative_time {
            (0..state.revealed)
                .map(|i| self.handle(HandleKind::Time(i)))
                .collect()
        } else if selector == selectors.author {
            (0..state.revealed)
                .map(|i| self.handle(HandleKind::Author(i)))
                .collect()
        } else if selector == selectors.read_more {
            (0..state.read_more_controls)
                .map(|i| self.handle(HandleKind::ReadMore(i)))
                .collect()
        } else {
            Vec::new()
        };

        Ok(handles)
    }

    async fn run_script(&self, _script: &str) -> Result<serde_json::Value> {
        Ok(serde_json::json!(self.state().extent()))
    }
}

fn test_settings(strategy: &str, scrape_replies: bool) -> ScrapeSettings {
    ScrapeSettings {
        strategy: strategy.to_string(),
        scrape_replies,
        element_timeout_secs: 0.2,
        count_probe_timeout_secs: 0.05,
        settle: SettleTimes::instant(),
        ..Default::default()
    }
}

fn test_video() -> VideoRef {
    VideoRef::new(
        "REACTION to Some MV",
        "https://www.youtube.com/watch?v=abc123",
        "Some Channel",
        "Nov 18, 2020",
    )
    .with_tags("japanese, reaction")
}

/// Simple strategy, 45 unique comments surfacing over the movement
/// phases, quota 100: every comment ends up as exactly one record
/// carrying the video title and today's date.
#[tokio::test]
async fn simple_strategy_collects_all_comments() {
    let surface = MockSurface::new(MockState {
        total_comments: 45,
        reported_count: "45".into(),
        per_end_move: 15,
        per_page_down: 3,
        read_more_controls: 4,
        ..Default::default()
    });

    let mut session = ScrapeSession::new(test_video(), test_settings("simple", true));
    session.scrape(&surface).await.unwrap();

    assert_eq!(session.total_comments(), 45);
    assert_eq!(session.records().len(), 45);

    let today = Local::now().format("%Y-%m-%d").to_string();
    let mut seen = HashSet::new();
    for record in session.records() {
        assert_eq!(record.from_video, "REACTION to Some MV");
        assert_eq!(record.time_of_collection, today);
        assert_eq!(record.tags.as_deref(), Some("japanese, reaction"));
        assert!(seen.insert(record.comment_text.clone()), "duplicate record");
    }

    // quota math: min(45, 100) / 20 = 2 end-moves, both productive
    assert_eq!(surface.state().end_presses, 2);
    // replies requested: one return to the top before the descent
    assert_eq!(surface.state().home_presses, 1);
}

/// A stalled extent terminates the move-to-end loop well before the
/// configured maximum.
#[tokio::test]
async fn extent_stall_stops_end_moves_early() {
    let surface = MockSurface::new(MockState {
        total_comments: 10,
        reported_count: "200".into(),
        per_end_move: 5,
        ..Default::default()
    });

    let mut settings = test_settings("simple", false);
    settings.quota = 200;

    let mut session = ScrapeSession::new(test_video(), settings);
    session.scrape(&surface).await.unwrap();

    // Budget was min(200, 200) / 20 = 10 end-moves; growth stopped
    // after 2, so the third press stalls and the loop ends.
    assert_eq!(surface.state().end_presses, 3);
    assert_eq!(session.records().len(), 10);
}

/// Scraping into a session that already holds records is a no-op.
#[tokio::test]
async fn non_empty_session_is_a_no_op() {
    let surface = MockSurface::new(MockState {
        total_comments: 45,
        reported_count: "45".into(),
        per_end_move: 15,
        per_page_down: 3,
        ..Default::default()
    });

    let mut session = ScrapeSession::new(test_video(), test_settings("simple", true));
    session.scrape(&surface).await.unwrap();
    assert_eq!(session.records().len(), 45);

    let end_presses_before = surface.state().end_presses;
    let navigations_before = surface.state().navigations.len();

    session.scrape(&surface).await.unwrap();

    assert_eq!(session.records().len(), 45);
    assert_eq!(surface.state().end_presses, end_presses_before);
    assert_eq!(surface.state().navigations.len(), navigations_before);
}

/// `clear` makes the session usable again.
#[tokio::test]
async fn clear_allows_a_second_scrape() {
    let surface = MockSurface::new(MockState {
        total_comments: 20,
        reported_count: "20".into(),
        per_end_move: 20,
        ..Default::default()
    });

    let mut session = ScrapeSession::new(test_video(), test_settings("simple", false));
    session.scrape(&surface).await.unwrap();
    assert_eq!(session.records().len(), 20);

    session.clear();
    assert!(session.records().is_empty());
    assert_eq!(session.total_comments(), 0);

    session.scrape(&surface).await.unwrap();
    assert_eq!(session.records().len(), 20);
    assert_eq!(surface.state().navigations.len(), 2);
}

/// An unknown strategy name yields zero records and never reaches the
/// browser.
#[tokio::test]
async fn unknown_strategy_yields_no_records() {
    let surface = MockSurface::new(MockState {
        total_comments: 45,
        reported_count: "45".into(),
        per_end_move: 15,
        ..Default::default()
    });

    let mut session = ScrapeSession::new(test_video(), test_settings("turbo", false));
    let outcome = session.scrape(&surface).await;

    assert!(outcome.is_ok());
    assert!(session.records().is_empty());
    assert!(surface.state().navigations.is_empty());
}

/// Re-running the read-more expansion on an already-expanded page
/// yields zero new successes; failures are counted, not propagated.
#[tokio::test]
async fn read_more_expansion_is_idempotent() {
    let surface = MockSurface::new(MockState {
        read_more_controls: 6,
        ..Default::default()
    });
    let settings = test_settings("simple", false);

    let first = expand(&surface, &settings, ExpansionKind::ReadMore).await;
    assert_eq!(first.clicked, 6);
    assert!(first.failures.is_empty());

    let second = expand(&surface, &settings, ExpansionKind::ReadMore).await;
    assert_eq!(second.clicked, 0);
    assert_eq!(second.failures.len(), 6);
}

/// The count probe retries with scroll nudges until the page's initial
/// layout renders the count element.
#[tokio::test]
async fn count_probe_nudges_until_count_renders() {
    let surface = MockSurface::new(MockState {
        total_comments: 20,
        reported_count: "20".into(),
        per_end_move: 20,
        per_page_down: 1,
        count_after_downs: 3,
        ..Default::default()
    });

    let mut session = ScrapeSession::new(test_video(), test_settings("simple", false));
    session.scrape(&surface).await.unwrap();

    assert!(surface.state().down_presses >= 3);
    assert_eq!(session.total_comments(), 20);
    assert_eq!(session.records().len(), 20);
}

/// The batched strategy extracts per batch; overlapping windows are
/// merged by the deduplicator into one record per comment.
#[tokio::test]
async fn batched_strategy_dedupes_overlapping_batches() {
    let surface = MockSurface::new(MockState {
        total_comments: 60,
        reported_count: "60".into(),
        per_end_move: 20,
        ..Default::default()
    });

    let mut settings = test_settings("batched", false);
    settings.quota = 1000;
    settings.pacing.end_moves_per_batch = 2;

    let mut session = ScrapeSession::new(test_video(), settings);
    session.scrape(&surface).await.unwrap();

    // Batch 1 extracts 40 comments, batch 2 extracts all 60; the 40
    // overlapping rows collapse.
    assert_eq!(session.records().len(), 60);

    let mut seen = HashSet::new();
    for record in session.records() {
        assert!(seen.insert(record.comment_text.clone()));
    }
}

/// The expensive strategy's escalating waves still converge on one
/// deduplicated record set.
#[tokio::test]
async fn expensive_strategy_collects_and_dedupes() {
    let surface = MockSurface::new(MockState {
        total_comments: 40,
        reported_count: "40".into(),
        per_page_down: 1,
        read_more_controls: 2,
        ..Default::default()
    });

    let mut settings = test_settings("expensive", false);
    // Keep the wave sizes small so the test stays fast.
    settings.pacing.expensive_unit = 10;
    settings.pacing.over_scroll_buffer = 2;

    let mut session = ScrapeSession::new(test_video(), settings);
    session.scrape(&surface).await.unwrap();

    // down budget = (min(40,100)/20) * 4 = 8 < unit, so one wave of 10
    // page-downs runs; 10 comments revealed, each recorded once.
    assert_eq!(session.records().len(), 10);
    assert_eq!(surface.state().up_presses, 12);
}
