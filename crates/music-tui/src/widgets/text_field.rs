//! TextField — wraps tui-input as a single-line form field with a prompt,
//! optional masking and a blinking block cursor.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    style::Modifier,
    text::{Line, Span},
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{style_accent, style_cursor, style_default, style_focused, style_muted};

pub const PROMPT: &str = "> ";

pub struct TextField {
    input: Input,
    focused: bool,
    placeholder: String,
    mask: Option<char>,
    char_limit: usize,
    cursor_on: bool,
}

impl TextField {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            focused: false,
            placeholder: placeholder.into(),
            mask: None,
            char_limit: usize::MAX,
            cursor_on: true,
        }
    }

    /// Echo `ch` instead of the typed characters.
    pub fn masked(mut self, ch: char) -> Self {
        self.mask = Some(ch);
        self
    }

    pub fn with_char_limit(mut self, limit: usize) -> Self {
        self.char_limit = limit;
        self
    }

    pub fn focus(&mut self) {
        self.focused = true;
        self.cursor_on = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn is_empty(&self) -> bool {
        self.input.value().is_empty()
    }

    /// Edit the field. Blurred fields ignore every key; returns whether the
    /// value or cursor changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if !self.focused {
            return false;
        }
        if let KeyCode::Char(_) = key.code {
            let plain = !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
            if plain && self.input.value().chars().count() >= self.char_limit {
                return false;
            }
        }
        self.cursor_on = true;
        self.input.handle_event(&Event::Key(key)).is_some()
    }

    /// Advance the cursor blink. No-op while blurred.
    pub fn blink(&mut self) {
        if self.focused {
            self.cursor_on = !self.cursor_on;
        }
    }

    pub fn line(&self) -> Line<'static> {
        let prompt_style = if self.focused {
            style_focused()
        } else {
            style_default()
        };
        let mut spans = vec![Span::styled(PROMPT.to_string(), prompt_style)];
        let show_cursor = self.focused && self.cursor_on;

        let value = self.input.value();
        if value.is_empty() {
            let mut chars = self.placeholder.chars();
            if show_cursor {
                let first = chars.next().map(String::from).unwrap_or_else(|| " ".into());
                spans.push(Span::styled(first, style_muted().patch(style_cursor())));
            }
            spans.push(Span::styled(chars.collect::<String>(), style_muted()));
            return Line::from(spans);
        }

        let shown: Vec<char> = match self.mask {
            Some(m) => value.chars().map(|_| m).collect(),
            None => value.chars().collect(),
        };
        let text_style = if self.focused {
            style_accent()
        } else {
            style_default()
        };
        let cursor = self.input.cursor().min(shown.len());
        spans.push(Span::styled(
            shown[..cursor].iter().collect::<String>(),
            text_style,
        ));
        if show_cursor {
            let at = shown
                .get(cursor)
                .map(|c| c.to_string())
                .unwrap_or_else(|| " ".to_string());
            spans.push(Span::styled(at, text_style.add_modifier(Modifier::REVERSED)));
            spans.push(Span::styled(
                shown.iter().skip(cursor + 1).collect::<String>(),
                text_style,
            ));
        } else {
            spans.push(Span::styled(
                shown[cursor..].iter().collect::<String>(),
                text_style,
            ));
        }
        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(field: &mut TextField, c: char) -> bool {
        field.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_blurred_field_ignores_keys() {
        let mut field = TextField::new("account");
        assert!(!press(&mut field, 'a'));
        assert!(field.is_empty());

        field.focus();
        assert!(press(&mut field, 'a'));
        assert_eq!(field.value(), "a");
    }

    #[test]
    fn test_char_limit() {
        let mut field = TextField::new("").with_char_limit(2);
        field.focus();
        press(&mut field, 'a');
        press(&mut field, 'b');
        assert!(!press(&mut field, 'c'));
        assert_eq!(field.value(), "ab");

        field.handle_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
        assert_eq!(field.value(), "a");
    }

    #[test]
    fn test_mask_hides_value() {
        let mut field = TextField::new("password").masked('•');
        field.focus();
        for c in "pwd".chars() {
            press(&mut field, c);
        }
        field.blur();
        let rendered = text(&field.line());
        assert_eq!(rendered, "> •••");
    }

    #[test]
    fn test_placeholder_when_empty() {
        let field = TextField::new("phone or email");
        assert_eq!(text(&field.line()), "> phone or email");
    }

    #[test]
    fn test_blink_only_when_focused() {
        let mut field = TextField::new("x");
        field.focus();
        press(&mut field, 'a');
        let with_cursor = text(&field.line());
        field.blink();
        let without_cursor = text(&field.line());
        // The cursor cell is a trailing space when it sits past the end.
        assert_eq!(with_cursor, "> a ");
        assert_eq!(without_cursor, "> a");

        field.blur();
        field.blink();
        assert_eq!(text(&field.line()), "> a");
    }
}
