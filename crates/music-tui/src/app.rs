//! App — terminal setup and the event loop around the [`Controller`].
//!
//! - A `tokio::mpsc` channel carries `AppMessage`s in from the terminal
//!   reader, timer sleepers and the restore worker.
//! - The loop draws, then awaits the next message and feeds it to the
//!   controller; the `Action`s it returns are executed here.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event as TermEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::action::{Action, Event, TickTarget};
use crate::controller::{AppMode, Controller};
use crate::session::{self, RestoredSession};

/// Cursor blink period for the login fields.
const CURSOR_BLINK: Duration = Duration::from_millis(500);

enum AppMessage {
    Event(TermEvent),
    Tick(TickTarget),
    SessionRestored(RestoredSession),
}

pub struct App {
    controller: Controller,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        Self { controller }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);

        // ── Background task: terminal events ──────────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("terminal event reader stopped: {}", e);
                    break;
                }
            }
        });

        let actions = self.controller.init();
        let mut quit = self.perform(actions, &tx);

        // The first layout pass needs a size before any resize event arrives.
        match terminal.size() {
            Ok(size) => {
                let actions = self.controller.update(Event::Resize(size.width, size.height));
                quit |= self.perform(actions, &tx);
            }
            Err(e) => warn!("could not read terminal size: {}", e),
        }

        let mut cursor_blink = tokio::time::interval(CURSOR_BLINK);
        cursor_blink.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        loop {
            terminal.draw(|f| self.controller.draw(f))?;

            if quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    let actions = self.handle_message(msg);
                    quit |= self.perform(actions, &tx);
                }

                _ = cursor_blink.tick() => {
                    if self.controller.mode() == AppMode::Login {
                        let actions = self.controller.update(Event::Tick(TickTarget::Cursor));
                        quit |= self.perform(actions, &tx);
                    }
                }
            }
        }

        info!("event loop finished");
        Ok(())
    }

    fn handle_message(&mut self, msg: AppMessage) -> Vec<Action> {
        match msg {
            AppMessage::Event(TermEvent::Key(key)) => {
                if key.kind == KeyEventKind::Release {
                    return Vec::new();
                }
                self.controller.update(Event::Key(key))
            }
            AppMessage::Event(TermEvent::Resize(w, h)) => self.controller.update(Event::Resize(w, h)),
            AppMessage::Event(_) => Vec::new(),
            AppMessage::Tick(target) => self.controller.update(Event::Tick(target)),
            AppMessage::SessionRestored(restored) => {
                self.controller.apply_restored(restored);
                Vec::new()
            }
        }
    }

    /// Execute controller actions. Returns `true` once a quit was requested.
    fn perform(&self, actions: Vec<Action>, tx: &mpsc::Sender<AppMessage>) -> bool {
        let mut quit = false;
        for action in actions {
            match action {
                Action::Tick(target, delay) => {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = tx.send(AppMessage::Tick(target)).await;
                    });
                }
                Action::RestoreSession => {
                    let store = self.controller.store();
                    let tx = tx.clone();
                    tokio::task::spawn_blocking(move || {
                        let restored = session::restore(store.as_ref());
                        debug!("restore: finished");
                        let _ = tx.blocking_send(AppMessage::SessionRestored(restored));
                    });
                }
                Action::Quit => quit = true,
            }
        }
        quit
    }
}
