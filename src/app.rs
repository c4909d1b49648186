use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use ratatui::widgets::ScrollbarState;
use tokio::sync::mpsc;

use crate::capture::{ImageHandle, InputCapture, Submission};
use crate::config::Config;
use crate::conversation::{ConversationLog, ExchangeId};
use crate::reveal::RevealSlot;
use crate::search::{BookResult, BookSearch, HttpSearchClient, SearchResult};
use crate::ui::ToastState;

/// Capacity of the search outcome channel.
const OUTCOME_CHANNEL_CAPACITY: usize = 32;

/// Connection status shown in the chat border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Nothing in flight
    Ready,
    /// This many searches are waiting for the service
    Searching(usize),
}

/// The answer to one dispatched search.
#[derive(Debug)]
pub struct SearchOutcome {
    pub id: ExchangeId,
    pub result: SearchResult<BookResult>,
}

/// Scroll-related state for the conversation view.
#[derive(Debug, Default)]
pub struct ScrollState {
    /// Index of the first visible exchange
    pub offset: usize,
    /// Scrollbar state for ratatui
    pub scrollbar: ScrollbarState,
}

impl ScrollState {
    /// Scroll up one exchange.
    pub fn scroll_up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    /// Scroll down one exchange.
    pub fn scroll_down(&mut self, max_scroll: usize) {
        if self.offset < max_scroll {
            self.offset += 1;
        }
    }

    /// Scroll up by page size.
    pub fn scroll_page_up(&mut self, page_size: usize) {
        self.offset = self.offset.saturating_sub(page_size);
    }

    /// Scroll down by page size.
    pub fn scroll_page_down(&mut self, max_scroll: usize, page_size: usize) {
        self.offset = (self.offset + page_size).min(max_scroll);
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_to_bottom(&mut self, max_scroll: usize) {
        self.offset = max_scroll;
    }

    /// Update scrollbar state.
    pub fn update(&mut self, total_items: usize) {
        self.scrollbar = self.scrollbar.content_length(total_items);
        self.scrollbar = self.scrollbar.position(self.offset);
    }
}

/// Blink state shared by the input cursor and the pending indicator.
#[derive(Debug)]
pub struct AnimationState {
    pub cursor_visible: bool,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            cursor_visible: true,
        }
    }
}

impl AnimationState {
    pub fn toggle_cursor(&mut self) {
        self.cursor_visible = !self.cursor_visible;
    }
}

/// Application state for the book finder.
///
/// Owns the conversation log exclusively. Searches run on spawned tasks and
/// report back through a channel that the event loop drains each frame.
pub struct App {
    /// Every exchange so far, oldest first
    pub conversation: ConversationLog,
    /// Not-yet-submitted input
    pub capture: InputCapture,
    /// Scroll offset and scrollbar
    pub scroll: ScrollState,
    /// Cursor blink / pending pulse
    pub animation: AnimationState,
    /// Toast notification state
    pub toasts: ToastState,
    reveals: HashMap<ExchangeId, RevealSlot>,
    reveal_interval: Duration,
    search: Arc<dyn BookSearch>,
    outcome_tx: mpsc::Sender<SearchOutcome>,
    outcome_rx: mpsc::Receiver<SearchOutcome>,
}

impl App {
    /// Create an app searching through the given backend.
    pub fn new(config: &Config, search: Arc<dyn BookSearch>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel(OUTCOME_CHANNEL_CAPACITY);

        Self {
            conversation: ConversationLog::new(),
            capture: InputCapture::new(),
            scroll: ScrollState::default(),
            animation: AnimationState::default(),
            toasts: ToastState::default(),
            reveals: HashMap::new(),
            reveal_interval: config.reveal.interval(),
            search,
            outcome_tx,
            outcome_rx,
        }
    }

    /// Create an app talking HTTP to the configured service.
    pub fn with_http(config: &Config) -> Self {
        let client = HttpSearchClient::from_config(&config.service);
        Self::new(config, Arc::new(client))
    }

    /// Where searches are sent.
    pub fn endpoint(&self) -> &str {
        self.search.endpoint()
    }

    pub fn status(&self) -> ConnectionStatus {
        match self.conversation.pending_count() {
            0 => ConnectionStatus::Ready,
            n => ConnectionStatus::Searching(n),
        }
    }

    /// Whether anything needs fast redraws.
    pub fn is_busy(&self) -> bool {
        self.conversation.pending_count() > 0
            || self.reveals.values().any(RevealSlot::is_animating)
    }

    /// Handle Enter: either run an `/image <path>` command or submit.
    pub fn handle_enter(&mut self) -> Option<ExchangeId> {
        if let Some(path) = self.capture.image_command().map(str::to_string) {
            self.attach_image(&path);
            return None;
        }
        self.submit()
    }

    /// Load an image file into the pending input.
    pub fn attach_image(&mut self, path: &str) -> bool {
        match ImageHandle::load(path) {
            Ok(image) => {
                self.toasts.info(format!("Attached {}", image.file_name));
                self.capture.set_image(image);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not attach image");
                self.toasts.error(e.to_string());
                false
            }
        }
    }

    /// Drop the selected image.
    pub fn remove_image(&mut self) {
        if let Some(image) = self.capture.remove_image() {
            self.toasts.info(format!("Removed {}", image.file_name));
        }
    }

    /// Submit the pending input.
    ///
    /// The exchange is appended as pending before the search is dispatched.
    /// Returns `None` without touching the log when there is nothing to send.
    /// Must be called inside a tokio runtime.
    pub fn submit(&mut self) -> Option<ExchangeId> {
        let submission = self.capture.submit()?;
        let id = self.conversation.append(submission.user_input());
        self.scroll_to_bottom();
        self.dispatch(id, submission);
        Some(id)
    }

    fn dispatch(&self, id: ExchangeId, submission: Submission) {
        let search = Arc::clone(&self.search);
        let tx = self.outcome_tx.clone();

        tokio::spawn(async move {
            let result = match submission {
                Submission::Text(text) => {
                    tracing::debug!(exchange = %id, "Dispatching text search");
                    search.search_by_text(&text).await
                }
                Submission::Image(image) => {
                    tracing::debug!(exchange = %id, file = %image.file_name, "Dispatching image search");
                    search.search_by_image(image).await
                }
            };

            if tx.send(SearchOutcome { id, result }).await.is_err() {
                tracing::debug!(exchange = %id, "App gone before search finished");
            }
        });
    }

    /// Apply every search outcome that has arrived. Call this in the event loop.
    pub fn process_outcomes(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply_outcome(outcome);
            applied += 1;
        }
        applied
    }

    /// Wait for the next search outcome and apply it.
    ///
    /// Returns false immediately when nothing is pending.
    pub async fn wait_for_outcome(&mut self) -> bool {
        if self.conversation.pending_count() == 0 {
            return false;
        }
        match self.outcome_rx.recv().await {
            Some(outcome) => {
                self.apply_outcome(outcome);
                true
            }
            None => false,
        }
    }

    /// Settle an exchange with its search result.
    ///
    /// A resolved exchange starts revealing its book name. A failed one is
    /// marked failed and reported; nothing is retried.
    pub fn apply_outcome(&mut self, outcome: SearchOutcome) {
        let SearchOutcome { id, result } = outcome;

        match result {
            Ok(book) => {
                let text = book.display_text();
                if self.conversation.resolve(id, book) {
                    self.start_reveal(id, text);
                }
            }
            Err(e) => {
                tracing::warn!(exchange = %id, error = %e, kind = ?e.kind(), "Search failed");
                if self.conversation.fail(id, e.user_message()) {
                    self.toasts.error(format!("Could not identify the book: {}", e));
                }
            }
        }
    }

    /// Reveal `text` in the display slot of an exchange.
    ///
    /// Any reveal already running for that exchange is cancelled first.
    pub fn start_reveal(&mut self, id: ExchangeId, text: impl Into<String>) {
        let interval = self.reveal_interval;
        self.reveals
            .entry(id)
            .or_insert_with(|| RevealSlot::new(interval))
            .reveal(text);
    }

    /// Pull new prefixes from every running reveal. Returns true if any changed.
    pub fn process_reveals(&mut self) -> bool {
        let mut changed = false;
        for slot in self.reveals.values_mut() {
            changed |= slot.poll();
        }
        changed
    }

    /// Text currently revealed for an exchange.
    pub fn revealed_text(&self, id: ExchangeId) -> Option<&str> {
        self.reveals.get(&id).map(RevealSlot::shown)
    }

    pub fn reveal_slot(&self, id: ExchangeId) -> Option<&RevealSlot> {
        self.reveals.get(&id)
    }

    pub fn toggle_cursor(&mut self) {
        self.animation.toggle_cursor();
    }

    /// Tick the toast system to remove expired toasts.
    pub fn tick_toasts(&mut self) {
        self.toasts.tick()
    }

    /// Get max scroll offset based on exchange count.
    pub fn max_scroll(&self) -> usize {
        self.conversation.len().saturating_sub(1)
    }

    pub fn scroll_up(&mut self) {
        self.scroll.scroll_up();
    }

    pub fn scroll_down(&mut self) {
        let max = self.max_scroll();
        self.scroll.scroll_down(max);
    }

    pub fn scroll_page_up(&mut self, page_size: usize) {
        self.scroll.scroll_page_up(page_size);
    }

    pub fn scroll_page_down(&mut self, page_size: usize) {
        let max = self.max_scroll();
        self.scroll.scroll_page_down(max, page_size);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll.scroll_to_top();
    }

    pub fn scroll_to_bottom(&mut self) {
        let max = self.max_scroll();
        self.scroll.scroll_to_bottom(max);
    }

    /// Update scrollbar state.
    pub fn update_scroll_state(&mut self) {
        let total = self.conversation.len();
        self.scroll.update(total);
    }
}
