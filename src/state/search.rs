// Search view state management.
// Tracks feed loading, the search term, and the filtered results shown as cards.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::Result;
use crate::feed::{FeedPage, Song};

/// Top-level view state, driven by the feed fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

/// A store read the caller must run, tagged with the generation that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub generation: u64,
    pub term: String,
}

/// Severity of a status line notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
}

/// A message shown in the status line.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warn,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Keep the songs whose title or artist contains `term`, ignoring case.
///
/// An empty term matches nothing. Whitespace is significant.
pub fn filter_songs(songs: Vec<Song>, term: &str) -> Vec<Song> {
    if term.is_empty() {
        return Vec::new();
    }

    let term_lower = term.to_lowercase();
    songs
        .into_iter()
        .filter(|song| song.matches(&term_lower))
        .collect()
}

/// Complete state for the search view.
#[derive(Debug, Default)]
pub struct SearchView {
    /// Feed loading state.
    pub state: ViewState,
    /// Current search term, exactly as typed.
    pub term: String,
    /// Songs matching the term, in store order.
    pub results: Vec<Song>,
    /// First visible row of the results grid.
    pub scroll: usize,
    /// Columns in the results grid at the last draw.
    pub grid_columns: usize,
    /// Latest status line notice.
    pub notice: Option<Notice>,
    /// Generation of the most recently issued search.
    generation: u64,
}

impl SearchView {
    /// Mount the view in the loading state.
    pub fn new() -> Self {
        Self {
            grid_columns: 1,
            ..Self::default()
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state == ViewState::Ready
    }

    /// Apply the feed result. Returns the songs to cache on success.
    pub fn on_feed_loaded(&mut self, result: Result<FeedPage>) -> Option<Vec<Song>> {
        match result {
            Ok(page) => {
                self.state = ViewState::Ready;
                Some(page.items)
            }
            Err(e) => {
                warn!(error = %e, network = e.is_network(), "song feed failed");
                self.state = ViewState::Failed(e.to_string());
                None
            }
        }
    }

    /// Replace the search term.
    ///
    /// Returns a store read to run when the term is non-empty and the view
    /// is ready. An empty term clears the results without touching the store.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn set_term(&mut self, term: impl Into<String>) -> Option<SearchRequest> {
        self.term = term.into();
        self.search()
    }

    /// Append a typed character to the term.
    pub fn push_char(&mut self, c: char) -> Option<SearchRequest> {
        self.term.push(c);
        self.search()
    }

    /// Delete the last character of the term.
    pub fn pop_char(&mut self) -> Option<SearchRequest> {
        self.term.pop();
        self.search()
    }

    /// Re-run the search for the current term, changed or not.
    pub fn trigger_search(&mut self) -> Option<SearchRequest> {
        self.search()
    }

    fn search(&mut self) -> Option<SearchRequest> {
        if !self.is_ready() {
            return None;
        }

        // Every issued search supersedes the ones before it, including clears.
        self.generation += 1;

        if self.term.is_empty() {
            self.set_results(Vec::new());
            return None;
        }

        Some(SearchRequest {
            generation: self.generation,
            term: self.term.clone(),
        })
    }

    /// Apply a completed store read. Results from superseded searches are dropped.
    pub fn on_search_completed(&mut self, generation: u64, result: Result<Vec<Song>>) {
        if generation != self.generation {
            debug!(
                generation,
                latest = self.generation,
                "dropping stale search results"
            );
            return;
        }

        match result {
            Ok(results) => self.set_results(results),
            Err(e) => {
                warn!(error = %e, "song store read failed");
                self.notice = Some(Notice::warn(format!("Search failed: {}", e)));
            }
        }
    }

    /// Record the outcome of caching the fetched songs.
    pub fn on_store_written(&mut self, result: Result<usize>) {
        self.notice = Some(match result {
            Ok(count) => Notice::info(format!("Cached {} songs", count)),
            Err(e) => {
                warn!(error = %e, persistence = e.is_persistence(), "caching songs failed");
                Notice::warn(format!("Could not cache songs: {}", e))
            }
        });
    }

    /// Whether the no-results indicator should be shown.
    pub fn show_no_results(&self) -> bool {
        !self.term.is_empty() && self.results.is_empty()
    }

    /// Number of rows the results occupy in the grid.
    pub fn total_rows(&self) -> usize {
        self.results.len().div_ceil(self.grid_columns.max(1))
    }

    /// Scroll the results grid down by `rows`.
    pub fn scroll_down(&mut self, rows: usize) {
        let max = self.total_rows().saturating_sub(1);
        self.scroll = (self.scroll + rows).min(max);
    }

    /// Scroll the results grid up by `rows`.
    pub fn scroll_up(&mut self, rows: usize) {
        self.scroll = self.scroll.saturating_sub(rows);
    }

    fn set_results(&mut self, results: Vec<Song>) {
        self.results = results;
        self.scroll = 0;
    }
}
