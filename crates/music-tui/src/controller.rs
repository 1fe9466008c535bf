//! Controller: owns the session and decides which mode sees each event.
//!
//! Exactly one of Startup, Login and Main is active at a time. The controller
//! never spawns work itself: `init` and `update` return [`Action`]s and the
//! run loop in `app.rs` carries them out.

use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{style::Style, widgets::Block, Frame};
use tracing::{debug, info};

use music_proto::auth::AuthService;
use music_proto::config::Config;
use music_proto::store::SessionStore;

use crate::action::{Action, Event, TickTarget, RERENDER_DELAY};
use crate::login::{AfterLogin, LoginContext, LoginForm, LoginStep};
use crate::main_ui::{MainStep, MainUi};
use crate::session::{RestoredSession, Session};
use crate::startup::{Splash, SplashStep};
use crate::theme::C_BG;

enum Mode {
    Startup(Splash),
    Login(LoginForm),
    Main,
}

/// Which mode is active, without its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Startup,
    Login,
    Main,
}

enum Transition {
    Stay,
    ToMain,
    ToLogin(Option<AfterLogin>),
}

pub struct Controller {
    session: Session,
    main: MainUi,
    mode: Mode,
    width: u16,
    height: u16,
    quitting: bool,
    show_startup: bool,
    startup_duration: Duration,
    auth: Arc<dyn AuthService>,
    store: Arc<dyn SessionStore>,
}

impl Controller {
    pub fn new(config: &Config, auth: Arc<dyn AuthService>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            session: Session::default(),
            main: MainUi::new(&config.main),
            mode: Mode::Main,
            width: 0,
            height: 0,
            quitting: false,
            show_startup: config.startup.show,
            startup_duration: config.startup.duration(),
            auth,
            store,
        }
    }

    /// Enter the first mode and ask for the session restore.
    pub fn init(&mut self) -> Vec<Action> {
        let first_tick = if self.show_startup {
            self.mode = Mode::Startup(Splash::new(self.startup_duration));
            Action::Tick(TickTarget::Startup, RERENDER_DELAY)
        } else {
            self.mode = Mode::Main;
            Action::Tick(TickTarget::Main, RERENDER_DELAY)
        };
        vec![Action::RestoreSession, first_tick]
    }

    pub fn update(&mut self, event: Event) -> Vec<Action> {
        if let Event::Resize(w, h) = event {
            self.width = w;
            self.height = h;
        }

        if !matches!(self.mode, Mode::Login(_)) && is_quit_key(&event) {
            info!("controller: quit requested");
            self.quitting = true;
            return vec![Action::Quit];
        }

        // The main UI keeps its layout current while another mode is on screen.
        if matches!(event, Event::Resize(..)) && !matches!(self.mode, Mode::Main) {
            self.main
                .update(&event, &mut self.session, self.store.as_ref());
        }

        let mut actions = Vec::new();
        let has_size = self.width > 0 && self.height > 0;
        let transition = match &mut self.mode {
            Mode::Startup(splash) => {
                match splash.update(&event, has_size) {
                    SplashStep::Continue(delay) => {
                        actions.push(Action::Tick(TickTarget::Startup, delay));
                        Transition::Stay
                    }
                    SplashStep::Finished => Transition::ToMain,
                    SplashStep::Waiting | SplashStep::Ignored => Transition::Stay,
                }
            }
            Mode::Login(form) => {
                let ctx = LoginContext {
                    auth: self.auth.as_ref(),
                    store: self.store.as_ref(),
                    session: &mut self.session,
                };
                match form.update(&event, ctx) {
                    LoginStep::Stay(more) => {
                        actions.extend(more);
                        Transition::Stay
                    }
                    LoginStep::LoggedIn(after_login) => {
                        if let Some(after_login) = after_login {
                            after_login(&mut self.main, &self.session);
                        }
                        Transition::ToMain
                    }
                    LoginStep::Cancelled => {
                        self.main.on_login_cancelled();
                        Transition::ToMain
                    }
                }
            }
            Mode::Main => match self.main.update(&event, &mut self.session, self.store.as_ref()) {
                MainStep::Idle => Transition::Stay,
                MainStep::NeedLogin(after_login) => Transition::ToLogin(after_login),
            },
        };

        match transition {
            Transition::Stay => {}
            Transition::ToMain => {
                debug!("controller: switching to main");
                self.mode = Mode::Main;
                actions.push(Action::Tick(TickTarget::Main, RERENDER_DELAY));
            }
            Transition::ToLogin(after_login) => actions.extend(self.request_login(after_login)),
        }
        actions
    }

    /// Replace the active mode with a fresh login form.
    pub fn request_login(&mut self, after_login: Option<AfterLogin>) -> Vec<Action> {
        debug!("controller: switching to login");
        self.mode = Mode::Login(LoginForm::new(after_login));
        vec![Action::Tick(TickTarget::Login, RERENDER_DELAY)]
    }

    pub fn apply_restored(&mut self, restored: RestoredSession) {
        self.session.merge_restored(restored);
    }

    pub fn draw(&self, frame: &mut Frame) {
        if self.quitting || self.width == 0 || self.height == 0 {
            return;
        }
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);
        match &self.mode {
            Mode::Startup(splash) => splash.draw(frame, area),
            Mode::Login(form) => form.draw(frame, area, &self.main),
            Mode::Main => self.main.draw(frame, area, &self.session),
        }
    }

    pub fn mode(&self) -> AppMode {
        match self.mode {
            Mode::Startup(_) => AppMode::Startup,
            Mode::Login(_) => AppMode::Login,
            Mode::Main => AppMode::Main,
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[cfg(test)]
    pub fn main_ui(&self) -> &MainUi {
        &self.main
    }

    pub fn store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.store)
    }

    #[cfg(test)]
    pub fn is_quitting(&self) -> bool {
        self.quitting
    }
}

fn is_quit_key(event: &Event) -> bool {
    let Event::Key(key) = event else {
        return false;
    };
    match key.code {
        KeyCode::Char('q') => key.modifiers.is_empty(),
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
