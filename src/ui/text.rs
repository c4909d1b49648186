use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use super::gradient::gradient_color;

/// Wrap text to fit within a given width.
///
/// Widths are counted in characters. A single word longer than `width`
/// gets its own line rather than being split.
///
/// # Arguments
/// * `text` - The text to wrap
/// * `width` - Maximum width per line
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current_len + word_len + 1 > width && !current_line.is_empty() {
            lines.push(std::mem::take(&mut current_line));
            current_len = 0;
        }

        if !current_line.is_empty() {
            current_line.push(' ');
            current_len += 1;
        }
        current_line.push_str(word);
        current_len += word_len;
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Color a line with a two-stop gradient that drifts a little on each row.
///
/// # Arguments
/// * `text` - The text to colorize
/// * `line_index` - Index of the line (shifts the gradient)
/// * `start` - Gradient start color
/// * `end` - Gradient end color
pub fn gradient_line(
    text: &str,
    line_index: usize,
    start: (u8, u8, u8),
    end: (u8, u8, u8),
) -> Line<'static> {
    let chars: Vec<char> = text.chars().collect();
    let total_chars = chars.len();

    if total_chars == 0 {
        return Line::from("");
    }

    let spans: Vec<Span> = chars
        .iter()
        .enumerate()
        .map(|(i, ch)| {
            let position = (i as f32 / total_chars as f32 + line_index as f32 * 0.1) % 1.0;
            // Fold so the color runs start -> end -> start across the row.
            let folded = 1.0 - (2.0 * position - 1.0).abs();
            let style = Style::default()
                .fg(gradient_color(start, end, folded))
                .add_modifier(Modifier::BOLD);
            Span::styled(ch.to_string(), style)
        })
        .collect();

    Line::from(spans)
}
