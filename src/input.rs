use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, Terminal};

use crate::app::App;
use crate::config::Config;
use crate::ui;

/// Result of handling a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleResult {
    /// Continue running the app
    Continue,
    /// Exit the app
    Exit,
}

/// Run the main application loop.
///
/// Each frame applies arrived search outcomes and reveal prefixes before
/// drawing, so nothing the user sees lags behind the log.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    config: &Config,
) -> io::Result<()> {
    let behavior = &config.behavior;
    let blink = Duration::from_millis(behavior.cursor_blink_ms);
    let mut last_cursor_toggle = Instant::now();

    loop {
        app.process_outcomes();
        app.process_reveals();
        app.tick_toasts();

        terminal.draw(|f| ui::ui(f, app, config))?;

        if last_cursor_toggle.elapsed() >= blink {
            app.toggle_cursor();
            last_cursor_toggle = Instant::now();
        }

        // Fast polling while searches are in flight or a reveal is running
        let timeout = if app.is_busy() {
            Duration::from_millis(behavior.animation_frame_ms)
        } else {
            Duration::from_millis(behavior.idle_poll_ms)
        };

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    // Reset cursor to visible on any keypress
                    app.animation.cursor_visible = true;
                    last_cursor_toggle = Instant::now();

                    if handle_key_event(app, key.code, key.modifiers, config) == HandleResult::Exit
                    {
                        tracing::info!("Exit requested");
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Handle a key event and return whether to continue or exit.
pub fn handle_key_event(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    config: &Config,
) -> HandleResult {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return handle_control_keys(app, code);
    }

    let page_size = config.behavior.scroll_page_size;

    match code {
        KeyCode::Enter => {
            app.handle_enter();
        }
        KeyCode::Char(c) => {
            app.capture.handle_char(c);
        }
        KeyCode::Backspace => {
            app.capture.handle_backspace();
        }
        KeyCode::Left => {
            app.capture.move_cursor_left();
        }
        KeyCode::Right => {
            app.capture.move_cursor_right();
        }
        KeyCode::Up => {
            app.scroll_up();
        }
        KeyCode::Down => {
            app.scroll_down();
        }
        KeyCode::PageUp => {
            app.scroll_page_up(page_size);
        }
        KeyCode::PageDown => {
            app.scroll_page_down(page_size);
        }
        KeyCode::Home => {
            app.scroll_to_top();
        }
        KeyCode::End => {
            app.scroll_to_bottom();
        }
        KeyCode::Esc => {
            return HandleResult::Exit;
        }
        _ => {}
    }
    HandleResult::Continue
}

fn handle_control_keys(app: &mut App, code: KeyCode) -> HandleResult {
    match code {
        KeyCode::Char('c') | KeyCode::Char('d') => HandleResult::Exit,
        KeyCode::Char('x') => {
            app.remove_image();
            HandleResult::Continue
        }
        _ => HandleResult::Continue,
    }
}
