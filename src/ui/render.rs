use ratatui::{
    layout::{Constraint, Direction, Layout, Margin},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, Wrap},
    Frame,
};

use crate::app::{App, ConnectionStatus};
use crate::config::{ColorConfig, Config};
use crate::conversation::{Exchange, ExchangeState};

use super::gradient::{gradient_block_with_status, gradient_color};
use super::text::{gradient_line, wrap_text};
use super::toast::render_toasts;

/// Shown while the conversation is empty.
pub const GREETING: &str = "What book are you looking for?";

/// Shown for an exchange whose search failed.
pub const FAILURE_LINE: &str = "Could not identify the book.";

/// Shown in the input box when nothing is pending.
pub const PLACEHOLDER: &str = "Type a sentence from the book, or /image <path>";

const USER_PREFIX: &str = "You: ";
const ANSWER_PREFIX: &str = "Leaf: ";
const CONTINUATION: &str = "      ";

/// Main UI rendering function.
pub fn ui(f: &mut Frame, app: &mut App, config: &Config) {
    let colors = &config.colors;
    let (chat_start, chat_end) = colors.chat_gradient();
    let (input_start, input_end) = colors.input_gradient();

    let border_color = Color::Black;
    let bg_color = Color::Rgb(20, 20, 25);

    // Thick border: paint everything, then the inner area on top
    f.render_widget(Block::default().style(Style::default().bg(border_color)), f.size());

    let inner_area = f.size().inner(&Margin {
        horizontal: 2,
        vertical: 1,
    });
    f.render_widget(Block::default().style(Style::default().bg(bg_color)), inner_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Conversation
            Constraint::Length(3), // Input box
        ])
        .split(inner_area);

    app.update_scroll_state();

    let text_width = chunks[0].width.saturating_sub(4) as usize;
    let view: &App = app;
    let items: Vec<ListItem> = if view.conversation.is_empty() {
        greeting_items(colors, text_width)
    } else {
        view.conversation
            .iter()
            .skip(view.scroll.offset)
            .flat_map(|exchange| exchange_items(view, exchange, colors, text_width))
            .collect()
    };

    let (status_text, status_color) = match app.status() {
        ConnectionStatus::Ready => ("● Ready".to_string(), Color::Rgb(100, 255, 100)),
        ConnectionStatus::Searching(n) => {
            (format!("● Searching ({})", n), Color::Rgb(100, 200, 255))
        }
    };

    let list = List::new(items).block(gradient_block_with_status(
        " Leaflens ",
        &status_text,
        status_color,
        chat_start,
        chat_end,
    ));
    f.render_widget(list, chunks[0]);

    let total = app.conversation.len();
    let scroll_position = if total > 0 {
        app.scroll.offset as f32 / total as f32
    } else {
        0.0
    };

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("▲"))
        .end_symbol(Some("▼"))
        .track_symbol(Some("░"))
        .thumb_symbol("█")
        .style(Style::default().fg(gradient_color(chat_start, chat_end, scroll_position)));

    f.render_stateful_widget(
        scrollbar,
        chunks[0].inner(&Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut app.scroll.scrollbar,
    );

    let input_block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(gradient_color(input_start, input_end, 0.5)))
        .style(Style::default().bg(Color::Rgb(30, 30, 35)));

    let input = Paragraph::new(input_line(app))
        .style(Style::default().fg(Color::White))
        .block(input_block)
        .wrap(Wrap { trim: false });
    f.render_widget(input, chunks[1]);

    render_toasts(f, &app.toasts);
}

fn greeting_items(colors: &ColorConfig, width: usize) -> Vec<ListItem<'static>> {
    let (start, end) = colors.greeting_gradient();
    wrap_text(GREETING, width)
        .iter()
        .enumerate()
        .map(|(i, line)| ListItem::new(gradient_line(line, i, start, end)))
        .collect()
}

/// The user line, the service line and a blank separator for one exchange.
fn exchange_items(
    app: &App,
    exchange: &Exchange,
    colors: &ColorConfig,
    width: usize,
) -> Vec<ListItem<'static>> {
    let user_style = Style::default().fg(ColorConfig::to_color(&colors.user));
    let answer_style = Style::default().fg(ColorConfig::to_color(&colors.answer));
    let failure_style = Style::default().fg(ColorConfig::to_color(&colors.failure));

    let mut items = prefixed_lines(USER_PREFIX, &exchange.input.summary(), user_style, width);

    match exchange.state() {
        ExchangeState::Pending => {
            let dot = if app.animation.cursor_visible { "●" } else { "○" };
            items.push(ListItem::new(Line::from(vec![
                Span::styled(ANSWER_PREFIX, answer_style.add_modifier(Modifier::BOLD)),
                Span::styled(dot, answer_style),
            ])));
        }
        ExchangeState::Resolved(book) => {
            let text = match app.revealed_text(exchange.id) {
                Some(shown) => shown.to_string(),
                None => book.display_text(),
            };
            items.extend(prefixed_lines(ANSWER_PREFIX, &text, answer_style, width));
        }
        ExchangeState::Failed { reason } => {
            items.extend(prefixed_lines(ANSWER_PREFIX, FAILURE_LINE, failure_style, width));
            items.extend(
                wrap_text(reason, width.saturating_sub(CONTINUATION.len()))
                    .into_iter()
                    .map(|line| {
                        ListItem::new(Line::from(Span::styled(
                            format!("{}{}", CONTINUATION, line),
                            failure_style.add_modifier(Modifier::DIM),
                        )))
                    }),
            );
        }
    }

    items.push(ListItem::new(Line::from("")));
    items
}

/// Wrap `text` with a bold prefix on the first line and indentation after.
fn prefixed_lines(prefix: &str, text: &str, style: Style, width: usize) -> Vec<ListItem<'static>> {
    wrap_text(text, width.saturating_sub(prefix.len()))
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                ListItem::new(Line::from(vec![
                    Span::styled(prefix.to_string(), style.add_modifier(Modifier::BOLD)),
                    Span::styled(line, style),
                ]))
            } else {
                ListItem::new(Line::from(Span::styled(
                    format!("{}{}", CONTINUATION, line),
                    style,
                )))
            }
        })
        .collect()
}

/// The pending input: an image chip, the typed text with a cursor, or a placeholder.
fn input_line(app: &App) -> Line<'static> {
    let cursor_char = if app.animation.cursor_visible { "▎" } else { " " };
    let cursor = Span::styled(
        cursor_char,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::SLOW_BLINK),
    );

    if let Some(image) = app.capture.image() {
        return Line::from(vec![
            Span::styled(
                format!("[image: {}]", image.file_name),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" (Ctrl+X to remove)", Style::default().fg(Color::DarkGray)),
        ]);
    }

    let text = app.capture.text();
    if text.is_empty() {
        return Line::from(vec![
            cursor,
            Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)),
        ]);
    }

    let before: String = text.chars().take(app.capture.cursor()).collect();
    let after: String = text.chars().skip(app.capture.cursor()).collect();
    Line::from(vec![Span::raw(before), cursor, Span::raw(after)])
}
