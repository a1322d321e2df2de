// App state and main event loop.
// Spawns feed and store work, applies their completions, and handles keyboard input.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::error::Result;
use crate::feed::{FeedClient, FeedPage, Song};
use crate::state::{SearchRequest, SearchView, filter_songs};
use crate::store::SongStore;
use crate::ui;

/// Rows moved by PageUp/PageDown.
const PAGE_ROWS: usize = 3;

/// Completion of a spawned task.
#[derive(Debug)]
pub enum AppEvent {
    FeedLoaded(Result<FeedPage>),
    StoreWritten(Result<usize>),
    SearchCompleted {
        generation: u64,
        result: Result<Vec<Song>>,
    },
}

/// Main application state.
pub struct App {
    /// Search view state.
    pub view: SearchView,
    /// Whether the app should exit.
    pub should_quit: bool,
    store: Arc<SongStore>,
    feed: FeedClient,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(store: Arc<SongStore>, feed: FeedClient) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            view: SearchView::new(),
            should_quit: false,
            store,
            feed,
            events_tx,
            events_rx,
        }
    }

    /// Start the feed fetch. The view stays in Loading until it completes.
    pub fn mount(&mut self) {
        let feed = self.feed.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = feed.fetch_songs().await;
            let _ = tx.send(AppEvent::FeedLoaded(result));
        });
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        self.mount();
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.drain_events();
            self.handle_terminal_events()?;
        }
        info!("exiting");
        Ok(())
    }

    /// Apply every completion that has arrived so far.
    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_app_event(event);
        }
    }

    /// Apply one task completion to the view.
    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::FeedLoaded(result) => {
                if let Some(songs) = self.view.on_feed_loaded(result) {
                    info!(count = songs.len(), "song feed loaded");
                    self.spawn_upsert(songs);
                }
            }
            AppEvent::StoreWritten(result) => self.view.on_store_written(result),
            AppEvent::SearchCompleted { generation, result } => {
                self.view.on_search_completed(generation, result)
            }
        }
    }

    /// Cache fetched songs without holding up rendering.
    fn spawn_upsert(&self, songs: Vec<Song>) {
        let store = Arc::clone(&self.store);
        let tx = self.events_tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = store.upsert_all(&songs).map(|()| songs.len());
            let _ = tx.send(AppEvent::StoreWritten(result));
        });
    }

    /// Run a search request against the store, if the view issued one.
    fn dispatch(&self, request: Option<SearchRequest>) {
        let Some(SearchRequest { generation, term }) = request else {
            return;
        };

        debug!(generation, term = %term, "searching store");
        let store = Arc::clone(&self.store);
        let tx = self.events_tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = store.get_all().map(|songs| filter_songs(songs, &term));
            let _ = tx.send(AppEvent::SearchCompleted { generation, result });
        });
    }

    /// Poll keyboard and other terminal events.
    #[allow(clippy::collapsible_if)]
    fn handle_terminal_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle a key press.
    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            _ if !self.view.is_ready() => {}
            KeyCode::Char(c) if !ctrl => {
                let request = self.view.push_char(c);
                self.dispatch(request);
            }
            KeyCode::Backspace => {
                let request = self.view.pop_char();
                self.dispatch(request);
            }
            KeyCode::Enter => {
                let request = self.view.trigger_search();
                self.dispatch(request);
            }
            KeyCode::Up => self.view.scroll_up(1),
            KeyCode::Down => self.view.scroll_down(1),
            KeyCode::PageUp => self.view.scroll_up(PAGE_ROWS),
            KeyCode::PageDown => self.view.scroll_down(PAGE_ROWS),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::client::tests::{loopback_client, serve_once};
    use crate::state::{NoticeLevel, ViewState};
    use crate::ui::tests::buffer_text;
    use ratatui::backend::TestBackend;
    use tempfile::TempDir;

    const OCEAN_FEED: &str = r#"{"items":[{"id":1,"title":"Ocean Waves","artist":"Aria","album":"Calm","created_at":"2024-01-01"}]}"#;

    async fn app_for(status_line: &'static str, body: &'static str) -> (TempDir, App) {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(SongStore::open(temp_dir.path().join("SunoSongsDB.json")).unwrap());
        let url = serve_once(status_line, body).await;
        (temp_dir, App::new(store, loopback_client(url)))
    }

    /// Wait for and apply the next `count` task completions.
    async fn settle(app: &mut App, count: usize) {
        for _ in 0..count {
            let event = app.events_rx.recv().await.unwrap();
            app.handle_app_event(event);
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) -> usize {
        text.chars().for_each(|c| press(app, KeyCode::Char(c)));
        text.chars().count()
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| ui::draw(frame, app)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[tokio::test]
    async fn test_fetch_caches_and_searches() {
        let (_temp_dir, mut app) = app_for("200 OK", OCEAN_FEED).await;
        app.mount();
        assert_eq!(app.view.state, ViewState::Loading);

        settle(&mut app, 1).await;
        assert!(app.view.is_ready());

        settle(&mut app, 1).await;
        assert_eq!(app.store.len().unwrap(), 1);
        assert_eq!(app.store.get_all().unwrap()[0].id, "1");
        assert_eq!(
            app.view.notice.as_ref().map(|n| n.level),
            Some(NoticeLevel::Info)
        );

        let typed = type_text(&mut app, "ocean");
        settle(&mut app, typed).await;
        assert_eq!(app.view.results.len(), 1);
        assert!(screen(&mut app).contains("Ocean Waves"));

        let request = app.view.set_term("fire");
        app.dispatch(request);
        settle(&mut app, 1).await;
        assert!(app.view.results.is_empty());
        assert!(app.view.show_no_results());
        assert!(screen(&mut app).contains("No results found."));
    }

    #[tokio::test]
    async fn test_server_error_shows_failure_only() {
        let (_temp_dir, mut app) = app_for("500 Internal Server Error", "{}").await;
        app.mount();
        settle(&mut app, 1).await;

        assert!(matches!(app.view.state, ViewState::Failed(_)));
        assert_eq!(app.store.len().unwrap(), 0);

        let text = screen(&mut app);
        assert!(text.contains("An error occurred"));
        assert!(!text.contains("Search songs..."));
        assert!(!text.contains("Artist:"));

        // Typing does nothing once failed.
        press(&mut app, KeyCode::Char('o'));
        assert!(app.view.term.is_empty());
    }

    #[tokio::test]
    async fn test_enter_reruns_search() {
        let (_temp_dir, mut app) = app_for("200 OK", OCEAN_FEED).await;
        app.mount();
        settle(&mut app, 2).await;

        let typed = type_text(&mut app, "ARIA");
        settle(&mut app, typed).await;
        assert_eq!(app.view.results.len(), 1);

        app.store
            .upsert_all(&[Song::new("2", "Tide", "aria", None, "2024-06-01")])
            .unwrap();
        press(&mut app, KeyCode::Enter);
        settle(&mut app, 1).await;
        assert_eq!(app.view.results.len(), 2);
    }

    #[tokio::test]
    async fn test_keyless_record_fails_cache_write_not_feed() {
        let (_temp_dir, mut app) = app_for(
            "200 OK",
            r#"{"items":[{"id":1,"title":"Ocean Waves","artist":"Aria"},{"id":null,"title":"Ghost","artist":"Nobody"}]}"#,
        )
        .await;
        app.mount();

        settle(&mut app, 2).await;
        assert!(app.view.is_ready());
        assert_eq!(app.store.len().unwrap(), 0);

        let notice = app.view.notice.as_ref().unwrap();
        assert_eq!(notice.level, NoticeLevel::Warn);
        assert!(notice.message.contains("Could not cache songs"));

        let text = screen(&mut app);
        assert!(text.contains("Search songs..."));
        assert!(text.contains("Could not cache songs"));
    }

    #[tokio::test]
    async fn test_escape_quits() {
        let (_temp_dir, mut app) = app_for("200 OK", OCEAN_FEED).await;
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_while_loading() {
        let (_temp_dir, mut app) = app_for("200 OK", OCEAN_FEED).await;
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
        assert!(app.view.term.is_empty());
    }
}
