//! Title bar and column helpers shared by every full-screen view.

use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::theme::{style_accent, style_muted};

/// Width of the content column the menus and forms are laid out in.
const CONTENT_WIDTH: u16 = 60;

/// Left edge of the content column: centered when the window is wide enough.
pub fn menu_start_column(window_width: u16) -> u16 {
    if window_width > CONTENT_WIDTH + 4 {
        (window_width - CONTENT_WIDTH) / 2
    } else {
        2
    }
}

/// `─── title ───` spanning `width` columns (CJK-aware).
pub fn title_line(title: &str, width: u16) -> Line<'static> {
    let label = format!(" {} ", title);
    let label_w = label.width();
    let width = width as usize;
    if label_w >= width {
        return Line::from(Span::styled(label, style_accent()));
    }
    let left = (width - label_w) / 2;
    let right = width - label_w - left;
    Line::from(vec![
        Span::styled("─".repeat(left), style_muted()),
        Span::styled(label, style_accent()),
        Span::styled("─".repeat(right), style_muted()),
    ])
}

/// Leading spaces that place content at `column`.
pub fn indent(column: u16) -> Span<'static> {
    Span::raw(" ".repeat(column as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_line_fills_width() {
        let line = title_line("musicbox", 40);
        assert_eq!(line.width(), 40);

        let wide = title_line("网易云音乐", 30);
        assert_eq!(wide.width(), 30);
    }

    #[test]
    fn test_menu_start_column() {
        assert_eq!(menu_start_column(80), 10);
        assert_eq!(menu_start_column(40), 2);
    }
}
