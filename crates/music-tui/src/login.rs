//! Login form: account + password fields, a submit button and a tip line.
//!
//! Focus cycles account → password → submit. Submitting calls the
//! [`AuthService`] synchronously; the event loop is parked until the service
//! answers.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::{info, warn};

use music_proto::auth::{AuthOutcome, AuthService};
use music_proto::model::{RecordKind, UserIdentity};
use music_proto::store::{save_record, SessionStore};

use crate::action::{Action, Event, TickTarget, RERENDER_DELAY};
use crate::focus::FocusRing;
use crate::main_ui::MainUi;
use crate::session::Session;
use crate::theme::{style_accent, style_error, style_muted, style_secondary};
use crate::widgets::text_field::TextField;
use crate::widgets::title_bar::indent;

/// Continuation run once after a successful login, before the main UI shows.
pub type AfterLogin = Box<dyn FnOnce(&mut MainUi, &Session) + Send>;

pub const FIELD_CHAR_LIMIT: usize = 32;
pub const PASSWORD_MASK: char = '•';

const SUBMIT_LABEL: &str = "[ Log in ]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Account,
    Password,
    Submit,
}

/// Status line shown after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tip {
    UnknownError,
    NetworkError,
    Rejected,
    /// The service accepted the credentials but the reply had no usable identity.
    UnreadableReply,
}

impl Tip {
    pub fn message(self) -> &'static str {
        match self {
            Tip::UnknownError => "unknown error, please retry later",
            Tip::NetworkError => "network error, please retry later",
            Tip::Rejected => "wrong account or password",
            Tip::UnreadableReply => "login response could not be read, please retry later",
        }
    }

    fn line(self, col: u16) -> Line<'static> {
        let mut spans = vec![indent(col), Span::styled(self.message(), style_error())];
        if self == Tip::Rejected {
            spans.push(Span::styled("  (check the account and try again)", style_muted()));
        }
        Line::from(spans)
    }
}

/// What a login attempt is allowed to touch.
pub struct LoginContext<'a> {
    pub auth: &'a dyn AuthService,
    pub store: &'a dyn SessionStore,
    pub session: &'a mut Session,
}

pub enum LoginStep {
    /// Remain in the form.
    Stay(Vec<Action>),
    /// Identity stored in the session; hand back the continuation.
    LoggedIn(Option<AfterLogin>),
    Cancelled,
}

pub struct LoginForm {
    account: TextField,
    password: TextField,
    focus: FocusRing<LoginField>,
    tip: Option<Tip>,
    after_login: Option<AfterLogin>,
}

impl LoginForm {
    pub fn new(after_login: Option<AfterLogin>) -> Self {
        let mut account = TextField::new("phone or email").with_char_limit(FIELD_CHAR_LIMIT);
        account.focus();
        Self {
            account,
            password: TextField::new("password")
                .masked(PASSWORD_MASK)
                .with_char_limit(FIELD_CHAR_LIMIT),
            focus: FocusRing::new(vec![LoginField::Account, LoginField::Password, LoginField::Submit]),
            tip: None,
            after_login,
        }
    }

    #[cfg(test)]
    pub fn focus_index(&self) -> usize {
        self.focus.position()
    }

    #[cfg(test)]
    pub fn tip(&self) -> Option<Tip> {
        self.tip
    }

    #[cfg(test)]
    pub fn account_value(&self) -> &str {
        self.account.value()
    }

    pub fn submit_focused(&self) -> bool {
        self.focus.is_focused(LoginField::Submit)
    }

    pub fn update(&mut self, event: &Event, ctx: LoginContext<'_>) -> LoginStep {
        match event {
            Event::Key(key) => self.handle_key(*key, ctx),
            Event::Tick(TickTarget::Login | TickTarget::Cursor) => {
                self.account.blink();
                self.password.blink();
                LoginStep::Stay(Vec::new())
            }
            _ => LoginStep::Stay(Vec::new()),
        }
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: LoginContext<'_>) -> LoginStep {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.cancel(),
            KeyCode::Char('c') if ctrl => self.cancel(),
            KeyCode::BackTab | KeyCode::Up => {
                self.focus.prev();
                self.sync_focus();
                LoginStep::Stay(Vec::new())
            }
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.focus.prev();
                self.sync_focus();
                LoginStep::Stay(Vec::new())
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus.next();
                self.sync_focus();
                LoginStep::Stay(Vec::new())
            }
            KeyCode::Enter if self.submit_focused() => self.submit(ctx),
            KeyCode::Enter => {
                self.focus.next();
                self.sync_focus();
                LoginStep::Stay(Vec::new())
            }
            _ => {
                self.account.handle_key(key);
                self.password.handle_key(key);
                LoginStep::Stay(Vec::new())
            }
        }
    }

    fn cancel(&mut self) -> LoginStep {
        self.tip = None;
        info!("login: cancelled");
        LoginStep::Cancelled
    }

    fn sync_focus(&mut self) {
        match self.focus.current() {
            Some(LoginField::Account) => {
                self.account.focus();
                self.password.blur();
            }
            Some(LoginField::Password) => {
                self.account.blur();
                self.password.focus();
            }
            _ => {
                self.account.blur();
                self.password.blur();
            }
        }
    }

    fn submit(&mut self, ctx: LoginContext<'_>) -> LoginStep {
        if self.account.is_empty() || self.password.is_empty() {
            return LoginStep::Stay(Vec::new());
        }
        let account = self.account.value();
        let password = self.password.value();

        let reply = if account.contains('@') {
            info!("login: submitting email account");
            ctx.auth.login_by_email(account, password)
        } else {
            info!("login: submitting phone account");
            ctx.auth.login_by_phone(account, password)
        };

        let tip = match ctx.auth.classify(reply.code) {
            AuthOutcome::Success => match UserIdentity::from_login_response(&reply.body) {
                Ok(user) => {
                    info!("login: signed in as user {}", user.user_id);
                    if let Err(e) = save_record(ctx.store, RecordKind::User, &user) {
                        warn!("login: failed to persist user: {}", e);
                    }
                    ctx.session.user = Some(user);
                    self.tip = None;
                    return LoginStep::LoggedIn(self.after_login.take());
                }
                Err(e) => {
                    warn!("login: accepted but reply unreadable: {}", e);
                    Tip::UnreadableReply
                }
            },
            AuthOutcome::NetworkError => Tip::NetworkError,
            AuthOutcome::UnknownError => Tip::UnknownError,
            AuthOutcome::Rejected => Tip::Rejected,
        };
        info!("login: attempt failed with code {}", reply.code);
        self.tip = Some(tip);
        LoginStep::Stay(vec![Action::Tick(TickTarget::Login, RERENDER_DELAY)])
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, main: &MainUi) {
        let col = main.menu_start_column();
        let mut lines = main.header_lines(area.width);

        lines.push(Line::from(vec![
            indent(col),
            Span::styled("Log in (phone or email)", style_secondary()),
        ]));
        lines.push(Line::default());

        let mut account = self.account.line();
        account.spans.insert(0, indent(col));
        lines.push(account);
        let mut password = self.password.line();
        password.spans.insert(0, indent(col));
        lines.push(password);
        lines.push(Line::default());

        if let Some(tip) = self.tip {
            lines.push(tip.line(col));
            lines.push(Line::default());
        }

        let button_style = if self.submit_focused() {
            style_accent()
        } else {
            style_muted()
        };
        lines.push(Line::from(vec![
            indent(col),
            Span::styled(SUBMIT_LABEL, button_style),
        ]));

        frame.render_widget(Paragraph::new(lines), area);
    }
}
