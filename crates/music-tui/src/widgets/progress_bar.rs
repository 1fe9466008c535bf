//! Smooth Unicode progress bar widget.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MUTED, C_PLAYING};

/// Render a smooth progress bar in `area`, followed by a percentage label.
/// `progress` is clamped to 0.0..=1.0.
pub fn draw_progress(frame: &mut Frame, area: Rect, progress: f64) {
    if area.width < 4 || area.height == 0 {
        return;
    }
    frame.render_widget(Paragraph::new(progress_line(progress, area.width)), area);
}

pub fn progress_line(progress: f64, width: u16) -> Line<'static> {
    let progress = progress.clamp(0.0, 1.0);
    let label = format!(" {:>3}%", (progress * 100.0).round() as u32);
    let bar_w = (width as usize).saturating_sub(label.len()).max(4);

    // Unicode smooth fill: 8 eighths per cell
    let eighths = (progress * bar_w as f64 * 8.0) as usize;
    let full_blocks = eighths / 8;
    let partial = eighths % 8;

    const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

    let mut bar = String::with_capacity(bar_w + 4);
    for _ in 0..full_blocks {
        bar.push('█');
    }
    if full_blocks < bar_w {
        bar.push(BLOCKS[partial]);
        for _ in (full_blocks + 1)..bar_w {
            bar.push(' ');
        }
    }

    Line::from(vec![
        Span::styled(bar, Style::default().fg(C_PLAYING)),
        Span::styled(label, Style::default().fg(C_MUTED)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_full_and_empty() {
        let empty = text(&progress_line(0.0, 20));
        assert!(empty.ends_with("   0%"));
        assert!(!empty.contains('█'));

        let full = text(&progress_line(1.5, 20));
        assert!(full.ends_with(" 100%"));
        assert_eq!(full.chars().filter(|&c| c == '█').count(), 15);
    }
}
