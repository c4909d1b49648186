use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{block::Title, Block, Borders},
};

/// Create a gradient color between two RGB values.
///
/// # Arguments
/// * `start` - Starting RGB color
/// * `end` - Ending RGB color
/// * `position` - Position in gradient (0.0 to 1.0, clamped)
pub fn gradient_color(start: (u8, u8, u8), end: (u8, u8, u8), position: f32) -> Color {
    let position = position.clamp(0.0, 1.0);
    let r = (start.0 as f32 + (end.0 as f32 - start.0 as f32) * position) as u8;
    let g = (start.1 as f32 + (end.1 as f32 - start.1 as f32) * position) as u8;
    let b = (start.2 as f32 + (end.2 as f32 - start.2 as f32) * position) as u8;
    Color::Rgb(r, g, b)
}

/// Spread a gradient across the characters of `text`.
pub fn gradient_spans(text: &str, start: (u8, u8, u8), end: (u8, u8, u8)) -> Vec<Span<'static>> {
    let count = text.chars().count();
    let steps = count.saturating_sub(1).max(1) as f32;

    text.chars()
        .enumerate()
        .map(|(i, ch)| {
            Span::styled(
                ch.to_string(),
                Style::default().fg(gradient_color(start, end, i as f32 / steps)),
            )
        })
        .collect()
}

/// A bordered block with a gradient title on the left and a status on the right.
///
/// The border takes the gradient's midpoint color.
pub fn gradient_block_with_status(
    title: &str,
    status_text: &str,
    status_color: Color,
    start: (u8, u8, u8),
    end: (u8, u8, u8),
) -> Block<'static> {
    let title_spans: Vec<Span<'static>> = gradient_spans(title, start, end)
        .into_iter()
        .map(|span| Span::styled(span.content, span.style.add_modifier(Modifier::BOLD)))
        .collect();
    let title_line = Line::from(title_spans);
    let status_line = Line::from(Span::styled(
        format!(" {} ", status_text),
        Style::default().fg(status_color),
    ));

    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(gradient_color(start, end, 0.5)))
        .title(Title::from(title_line).alignment(Alignment::Left))
        .title(Title::from(status_line).alignment(Alignment::Right))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_color_endpoints() {
        let start = (0, 0, 0);
        let end = (200, 100, 50);
        assert_eq!(gradient_color(start, end, 0.0), Color::Rgb(0, 0, 0));
        assert_eq!(gradient_color(start, end, 1.0), Color::Rgb(200, 100, 50));
        assert_eq!(gradient_color(start, end, 0.5), Color::Rgb(100, 50, 25));
    }

    #[test]
    fn test_gradient_color_clamps_position() {
        let start = (10, 20, 30);
        let end = (40, 50, 60);
        assert_eq!(gradient_color(start, end, 2.0), Color::Rgb(40, 50, 60));
        assert_eq!(gradient_color(start, end, -1.0), Color::Rgb(10, 20, 30));
    }

    #[test]
    fn test_gradient_spans_one_per_char() {
        let spans = gradient_spans("Héllo", (0, 0, 0), (255, 255, 255));
        assert_eq!(spans.len(), 5);
        assert_eq!(spans[0].style.fg, Some(Color::Rgb(0, 0, 0)));
        assert_eq!(spans[4].style.fg, Some(Color::Rgb(255, 255, 255)));
    }
}
