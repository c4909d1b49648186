//! Toast notifications for transient status messages.
//!
//! Toasts stack in the top-right corner and expire on their own. Failed
//! searches and image attach problems are reported here.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Toast notification level determining color and lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

impl ToastLevel {
    pub fn color(&self) -> Color {
        match self {
            ToastLevel::Info => Color::Cyan,
            ToastLevel::Warning => Color::Yellow,
            ToastLevel::Error => Color::Red,
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            ToastLevel::Info => "[i]",
            ToastLevel::Warning => "[!]",
            ToastLevel::Error => "[x]",
        }
    }

    /// Errors stay up longer so they can be read.
    pub fn default_duration(&self) -> Duration {
        match self {
            ToastLevel::Info => Duration::from_secs(3),
            ToastLevel::Warning => Duration::from_secs(5),
            ToastLevel::Error => Duration::from_secs(8),
        }
    }
}

/// A single toast notification.
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub level: ToastLevel,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Toast {
    pub fn new(id: u64, message: impl Into<String>, level: ToastLevel) -> Self {
        Self::with_duration(id, message, level, level.default_duration())
    }

    pub fn with_duration(
        id: u64,
        message: impl Into<String>,
        level: ToastLevel,
        duration: Duration,
    ) -> Self {
        Self {
            id,
            message: message.into(),
            level,
            created_at: Instant::now(),
            duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }
}

/// Active toasts, oldest first.
#[derive(Debug)]
pub struct ToastState {
    pub toasts: VecDeque<Toast>,
    next_id: u64,
    /// Oldest toasts are dropped beyond this many.
    pub max_visible: usize,
}

impl Default for ToastState {
    fn default() -> Self {
        Self::with_max_visible(3)
    }
}

impl ToastState {
    pub fn with_max_visible(max_visible: usize) -> Self {
        Self {
            toasts: VecDeque::new(),
            next_id: 0,
            max_visible,
        }
    }

    /// Add a toast with the level's default lifetime.
    pub fn push(&mut self, message: impl Into<String>, level: ToastLevel) -> u64 {
        self.push_with_duration(message, level, level.default_duration())
    }

    pub fn push_with_duration(
        &mut self,
        message: impl Into<String>,
        level: ToastLevel,
        duration: Duration,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.toasts
            .push_back(Toast::with_duration(id, message, level, duration));
        while self.toasts.len() > self.max_visible {
            self.toasts.pop_front();
        }
        id
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push(message, ToastLevel::Info)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> u64 {
        self.push(message, ToastLevel::Warning)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(message, ToastLevel::Error)
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }

    /// Remove all expired toasts. Call this on each tick.
    pub fn tick(&mut self) {
        self.toasts.retain(|t| !t.is_expired());
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }
}

/// Shorten `message` to `max` characters, ending with "..." when cut.
fn truncate(message: &str, max: usize) -> String {
    if message.chars().count() <= max {
        return message.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = message.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Render toasts in the top-right corner of the frame.
pub fn render_toasts(f: &mut Frame, toast_state: &ToastState) {
    if toast_state.is_empty() {
        return;
    }

    let frame_area = f.size();
    let toast_width = 44u16.min(frame_area.width.saturating_sub(4));
    let toast_height = 3u16;
    let start_x = frame_area.width.saturating_sub(toast_width + 2);
    // Below the chat border, whose top row carries the status
    let start_y = 2u16;

    for (i, toast) in toast_state.toasts.iter().enumerate() {
        let y = start_y + (i as u16) * toast_height;
        if y + toast_height > frame_area.height {
            break;
        }

        let toast_area = Rect::new(start_x, y, toast_width, toast_height);
        f.render_widget(Clear, toast_area);

        let color = toast.level.color();
        let prefix = toast.level.prefix();
        let max_len = (toast_width as usize).saturating_sub(prefix.len() + 5);

        let content = Line::from(vec![
            Span::styled(prefix, Style::default().fg(color)),
            Span::raw(" "),
            Span::styled(
                truncate(&toast.message, max_len),
                Style::default().fg(Color::White),
            ),
        ]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(Color::Black));

        f.render_widget(Paragraph::new(content).block(block), toast_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_level_default_duration() {
        assert_eq!(ToastLevel::Info.default_duration(), Duration::from_secs(3));
        assert_eq!(ToastLevel::Error.default_duration(), Duration::from_secs(8));
    }

    #[test]
    fn test_toast_state_push_assigns_ids() {
        let mut state = ToastState::default();
        assert_eq!(state.info("one"), 0);
        assert_eq!(state.error("two"), 1);
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_toast_state_max_visible_enforcement() {
        let mut state = ToastState::with_max_visible(2);
        state.info("First");
        state.info("Second");
        state.warning("Third");

        assert_eq!(state.len(), 2);
        assert_eq!(state.toasts.front().unwrap().message, "Second");
        assert_eq!(state.toasts.back().unwrap().message, "Third");
    }

    #[test]
    fn test_toast_state_dismiss() {
        let mut state = ToastState::default();
        let id = state.info("Test");
        state.dismiss(999);
        assert_eq!(state.len(), 1);
        state.dismiss(id);
        assert!(state.is_empty());
    }

    #[test]
    fn test_toast_state_tick_removes_expired() {
        let mut state = ToastState::default();
        state.push_with_duration("Instant", ToastLevel::Info, Duration::from_millis(0));
        state.error("Sticky");

        state.tick();
        assert_eq!(state.len(), 1);
        assert_eq!(state.toasts[0].level, ToastLevel::Error);
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééééé", 6), "ééé...");
    }
}
