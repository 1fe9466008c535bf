//! Events fed into the controller and the follow-up actions it asks for.

use std::time::Duration;

use ratatui::crossterm::event::KeyEvent;

/// Delay used for "re-render as soon as possible" ticks.
pub const RERENDER_DELAY: Duration = Duration::from_millis(1);

/// Which mode a timer tick was scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickTarget {
    Startup,
    Login,
    Main,
    /// Free-running cursor blink, driven by the run loop.
    Cursor,
}

/// Everything the controller consumes, in arrival order.
#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick(TickTarget),
}

/// Follow-up work returned from `Controller::init` / `Controller::update`.
/// The run loop executes these; the controller never spawns anything itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Deliver `Event::Tick(target)` after the delay.
    Tick(TickTarget, Duration),
    /// Launch the one-shot session restore.
    RestoreSession,
    Quit,
}
