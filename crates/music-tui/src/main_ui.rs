//! Main UI: account line, play mode and the restored playlist.
//!
//! Browsing menus and playback live elsewhere; this mode exposes the session
//! and the few actions that change it (login, logout, play mode, track
//! cursor). Every change is written through to the session store.

use ratatui::crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::{info, warn};

use music_proto::config::MainConfig;
use music_proto::model::RecordKind;
use music_proto::store::{save_record, SessionStore};

use crate::action::{Event, TickTarget};
use crate::login::AfterLogin;
use crate::session::Session;
use crate::theme::{style_default, style_muted, style_playing, style_secondary, style_selected};
use crate::widgets::title_bar::{indent, menu_start_column, title_line};

/// What the main UI wants from the controller after an event.
pub enum MainStep {
    Idle,
    /// Switch to the login form; run the continuation once logged in.
    NeedLogin(Option<AfterLogin>),
}

pub struct MainUi {
    show_title: bool,
    title: String,
    menu_start_column: u16,
    notice: Option<String>,
}

impl MainUi {
    pub fn new(config: &MainConfig) -> Self {
        Self {
            show_title: config.show_title,
            title: config.title.clone(),
            menu_start_column: 0,
            notice: None,
        }
    }

    pub fn menu_start_column(&self) -> u16 {
        self.menu_start_column
    }

    #[cfg(test)]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn on_login_cancelled(&mut self) {
        self.set_notice("login cancelled");
    }

    /// Title row plus spacing, shared with the login view.
    pub fn header_lines(&self, width: u16) -> Vec<Line<'static>> {
        if self.show_title {
            vec![title_line(&self.title, width), Line::default()]
        } else {
            vec![Line::default()]
        }
    }

    pub fn update(
        &mut self,
        event: &Event,
        session: &mut Session,
        store: &dyn SessionStore,
    ) -> MainStep {
        // A notice lasts until the next key.
        if let Event::Key(_) = event {
            self.notice = None;
        }
        match event {
            Event::Resize(w, _) => {
                self.menu_start_column = menu_start_column(*w);
                MainStep::Idle
            }
            Event::Tick(TickTarget::Main) => MainStep::Idle,
            Event::Key(key) if key.modifiers.difference(KeyModifiers::SHIFT).is_empty() => {
                match key.code {
                    KeyCode::Char('L') => self.request_login(session),
                    KeyCode::Char('O') => {
                        self.logout(session, store);
                        MainStep::Idle
                    }
                    KeyCode::Char('m') => {
                        self.cycle_play_mode(session, store);
                        MainStep::Idle
                    }
                    KeyCode::Char('j') | KeyCode::Down => {
                        self.move_cursor(session, store, 1);
                        MainStep::Idle
                    }
                    KeyCode::Char('k') | KeyCode::Up => {
                        self.move_cursor(session, store, -1);
                        MainStep::Idle
                    }
                    _ => MainStep::Idle,
                }
            }
            _ => MainStep::Idle,
        }
    }

    fn request_login(&mut self, session: &Session) -> MainStep {
        if let Some(user) = &session.user {
            self.set_notice(format!("already logged in as {}", user.display_name()));
            return MainStep::Idle;
        }
        MainStep::NeedLogin(Some(Box::new(|main: &mut MainUi, session: &Session| {
            if let Some(user) = &session.user {
                main.set_notice(format!("welcome, {}", user.display_name()));
            }
        })))
    }

    fn logout(&mut self, session: &mut Session, store: &dyn SessionStore) {
        let Some(user) = session.user.take() else {
            return;
        };
        info!("main: logging out user {}", user.user_id);
        if let Err(e) = store.remove(RecordKind::User) {
            warn!("main: failed to forget stored user: {}", e);
        }
        self.set_notice("logged out");
    }

    fn cycle_play_mode(&mut self, session: &mut Session, store: &dyn SessionStore) {
        let mode = session.play_mode().next();
        session.set_play_mode(mode);
        if let Err(e) = save_record(store, RecordKind::PlayMode, &mode) {
            warn!("main: failed to persist play mode: {}", e);
        }
        self.set_notice(format!("play mode: {}", mode.label()));
    }

    fn move_cursor(&mut self, session: &mut Session, store: &dyn SessionStore, delta: isize) {
        let len = session.playlist.len();
        if len == 0 {
            return;
        }
        session.current_index = (session.current_index as isize + delta).rem_euclid(len as isize) as usize;
        if let Err(e) = save_record(store, RecordKind::PlayerSnapshot, &session.snapshot()) {
            warn!("main: failed to persist player snapshot: {}", e);
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, session: &Session) {
        let col = self.menu_start_column;
        let mut lines = self.header_lines(area.width);

        let account = match &session.user {
            Some(user) => Span::styled(user.display_name(), style_playing()),
            None => Span::styled("not logged in", style_muted()),
        };
        lines.push(Line::from(vec![
            indent(col),
            Span::styled("account    ", style_secondary()),
            account,
        ]));
        lines.push(Line::from(vec![
            indent(col),
            Span::styled("play mode  ", style_secondary()),
            Span::styled(session.play_mode().label(), style_default()),
        ]));
        lines.push(Line::default());

        let heading = if session.playing_menu_key.is_empty() {
            "playlist".to_string()
        } else {
            format!("playlist · {}", session.playing_menu_key)
        };
        lines.push(Line::from(vec![
            indent(col),
            Span::styled(heading, style_secondary()),
        ]));

        // Rows left for tracks after header, notice and key hints.
        let reserved = lines.len() as u16 + 4;
        let rows = area.height.saturating_sub(reserved).max(1) as usize;
        if session.playlist.is_empty() {
            lines.push(Line::from(vec![
                indent(col),
                Span::styled("  (empty)", style_muted()),
            ]));
        } else {
            let first = session.current_index.saturating_sub(rows / 2);
            for (i, track) in session.playlist.iter().enumerate().skip(first).take(rows) {
                let line = if i == session.current_index {
                    Line::from(vec![
                        indent(col),
                        Span::styled(format!("▶ {}", track.display()), style_selected()),
                    ])
                } else {
                    Line::from(vec![
                        indent(col),
                        Span::styled(format!("  {}", track.display()), style_default()),
                    ])
                };
                lines.push(line);
            }
        }

        lines.push(Line::default());
        if let Some(notice) = &self.notice {
            lines.push(Line::from(vec![
                indent(col),
                Span::styled(notice.clone(), style_secondary()),
            ]));
        }

        frame.render_widget(Paragraph::new(lines), area);

        if area.height > 0 {
            let hints = Rect {
                y: area.y + area.height - 1,
                height: 1,
                ..area
            };
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    indent(col),
                    Span::styled(
                        "L login · O logout · m play mode · j/k track · q quit",
                        style_muted(),
                    ),
                ])),
                hints,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use music_proto::model::{PlayMode, PlayerSnapshot, TrackRef, UserIdentity};
    use music_proto::store::{load_record, MemoryStore};
    use ratatui::crossterm::event::KeyEvent;

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn main_ui() -> MainUi {
        MainUi::new(&MainConfig::default())
    }

    #[test]
    fn test_resize_sets_layout() {
        let mut main = main_ui();
        let store = MemoryStore::new();
        let mut session = Session::default();
        main.update(&Event::Resize(100, 30), &mut session, &store);
        assert_eq!(main.menu_start_column(), 20);
    }

    #[test]
    fn test_play_mode_change_is_persisted() {
        let mut main = main_ui();
        let store = MemoryStore::new();
        let mut session = Session::default();

        main.update(&key('m'), &mut session, &store);
        assert_eq!(session.play_mode(), PlayMode::Order);
        let stored: Option<PlayMode> = load_record(&store, RecordKind::PlayMode).unwrap();
        assert_eq!(stored, Some(PlayMode::Order));
        assert_eq!(main.notice(), Some("play mode: in order"));
    }

    #[test]
    fn test_notice_clears_on_next_key() {
        let mut main = main_ui();
        let store = MemoryStore::new();
        let mut session = Session::default();

        main.on_login_cancelled();
        main.update(&Event::Tick(TickTarget::Main), &mut session, &store);
        assert_eq!(main.notice(), Some("login cancelled"));

        main.update(&key('x'), &mut session, &store);
        assert_eq!(main.notice(), None);
    }

    #[test]
    fn test_login_request_only_when_logged_out() {
        let mut main = main_ui();
        let store = MemoryStore::new();
        let mut session = Session::default();

        assert!(matches!(
            main.update(&key('L'), &mut session, &store),
            MainStep::NeedLogin(Some(_))
        ));

        session.user = Some(UserIdentity {
            user_id: 1,
            nickname: "fox".into(),
            ..Default::default()
        });
        assert!(matches!(
            main.update(&key('L'), &mut session, &store),
            MainStep::Idle
        ));
        assert_eq!(main.notice(), Some("already logged in as fox"));
    }

    #[test]
    fn test_logout_forgets_stored_user() {
        let mut main = main_ui();
        let store = MemoryStore::new().with_record(RecordKind::User, r#"{"user_id":1}"#);
        let mut session = Session::default();
        session.user = Some(UserIdentity {
            user_id: 1,
            ..Default::default()
        });

        main.update(&key('O'), &mut session, &store);
        assert!(session.user.is_none());
        assert!(store.get(RecordKind::User).unwrap().is_none());
    }

    #[test]
    fn test_track_cursor_wraps_and_persists() {
        let mut main = main_ui();
        let store = MemoryStore::new();
        let mut session = Session::default();
        session.playlist = vec![
            TrackRef {
                id: 1,
                name: "a".into(),
                ..Default::default()
            },
            TrackRef {
                id: 2,
                name: "b".into(),
                ..Default::default()
            },
        ];

        main.update(&key('k'), &mut session, &store);
        assert_eq!(session.current_index, 1);
        main.update(&key('j'), &mut session, &store);
        assert_eq!(session.current_index, 0);

        let snap: Option<PlayerSnapshot> =
            load_record(&store, RecordKind::PlayerSnapshot).unwrap();
        assert_eq!(snap.map(|s| s.current_index), Some(0));
        assert_eq!(store.set_count(RecordKind::PlayerSnapshot), 2);
    }
}
