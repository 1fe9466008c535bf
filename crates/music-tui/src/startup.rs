//! Startup splash: banner plus a progress bar that fills over the configured
//! minimum display time.

use std::time::Duration;

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::debug;

use crate::action::{Event, TickTarget};
use crate::theme::{style_accent, style_secondary};
use crate::widgets::progress_bar::draw_progress;

/// Splash timer cadence.
pub const STARTUP_TICK: Duration = Duration::from_millis(25);

const BANNER: [&str; 2] = [
    "█▀▄▀█ █ █ █▀ █ █▀▀ █▄▄ █▀█ ▀▄▀",
    "█ ▀ █ █▄█ ▄█ █ █▄▄ █▄█ █▄█ █ █",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashStep {
    /// Keep ticking.
    Continue(Duration),
    /// Time is up but no window size is known yet; wait for a resize.
    Waiting,
    Finished,
    /// Event has no meaning for the splash.
    Ignored,
}

pub struct Splash {
    elapsed: Duration,
    total: Duration,
}

impl Splash {
    pub fn new(total: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            total,
        }
    }

    pub fn progress(&self) -> f64 {
        if self.total.is_zero() {
            1.0
        } else {
            self.elapsed.as_secs_f64() / self.total.as_secs_f64()
        }
    }

    pub fn update(&mut self, event: &Event, has_size: bool) -> SplashStep {
        match event {
            Event::Tick(TickTarget::Startup) => {
                self.elapsed = (self.elapsed + STARTUP_TICK).min(self.total);
                self.step(has_size)
            }
            Event::Resize(..) if self.elapsed >= self.total => self.step(has_size),
            _ => SplashStep::Ignored,
        }
    }

    fn step(&self, has_size: bool) -> SplashStep {
        if self.elapsed < self.total {
            SplashStep::Continue(STARTUP_TICK)
        } else if has_size {
            SplashStep::Finished
        } else {
            debug!("startup: splash done, waiting for the first window size");
            SplashStep::Waiting
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let banner_w = BANNER[0].chars().count() as u16;
        let top = (area.height / 2).saturating_sub(3);

        let mut lines: Vec<Line> = BANNER
            .iter()
            .map(|row| Line::from(Span::styled(*row, style_accent())))
            .collect();
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("loading…", style_secondary())));
        let banner_area = Rect {
            x: area.x,
            y: area.y + top,
            width: area.width,
            height: (lines.len() as u16).min(area.height.saturating_sub(top)),
        };
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), banner_area);

        let bar_w = banner_w.max(20).min(area.width);
        let bar_y = banner_area.y + banner_area.height + 1;
        if bar_y < area.y + area.height {
            let bar_area = Rect {
                x: area.x + (area.width - bar_w) / 2,
                y: bar_y,
                width: bar_w,
                height: 1,
            };
            draw_progress(frame, bar_area, self.progress());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Event = Event::Tick(TickTarget::Startup);

    #[test]
    fn test_ticks_until_duration() {
        let mut splash = Splash::new(STARTUP_TICK * 3);
        assert_eq!(splash.update(&TICK, true), SplashStep::Continue(STARTUP_TICK));
        assert_eq!(splash.update(&TICK, true), SplashStep::Continue(STARTUP_TICK));
        assert_eq!(splash.update(&TICK, true), SplashStep::Finished);
        assert!((splash.progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_waits_for_size_then_finishes_on_resize() {
        let mut splash = Splash::new(STARTUP_TICK);
        assert_eq!(splash.update(&TICK, false), SplashStep::Waiting);
        assert_eq!(splash.update(&Event::Resize(80, 24), true), SplashStep::Finished);
    }

    #[test]
    fn test_resize_before_time_is_ignored() {
        let mut splash = Splash::new(Duration::from_secs(1));
        assert_eq!(splash.update(&Event::Resize(80, 24), true), SplashStep::Ignored);
        assert_eq!(splash.update(&Event::Tick(TickTarget::Main), true), SplashStep::Ignored);
    }
}
