//! Key bindings from terminal key codes to control inputs.

use crate::types::ControlInput;
use arrayvec::ArrayVec;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::warn;

/// Most physical keys a binding table holds.
///
/// Release sweeps return one edge per held key, so this also bounds them.
pub const MAX_BINDINGS: usize = 16;

/// Ordered physical-key to control-input table.
///
/// Character keys are stored lowercased, so `W` and `w` are the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    entries: ArrayVec<(KeyCode, ControlInput), MAX_BINDINGS>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::empty()
            .bind(KeyCode::Up, ControlInput::Forward)
            .bind(KeyCode::Down, ControlInput::Backward)
            .bind(KeyCode::Left, ControlInput::Left)
            .bind(KeyCode::Right, ControlInput::Right)
            .bind(KeyCode::Char(' '), ControlInput::Fire)
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            entries: ArrayVec::new(),
        }
    }

    /// Bind `code` to `input`, replacing any earlier binding of the same key.
    ///
    /// A new key beyond [`MAX_BINDINGS`] is not bound.
    pub fn bind(mut self, code: KeyCode, input: ControlInput) -> Self {
        let code = normalize(code);
        match self.entries.iter_mut().find(|(c, _)| *c == code) {
            Some(entry) => entry.1 = input,
            None => {
                if self.entries.try_push((code, input)).is_err() {
                    warn!(key = ?code, "binding table full, key left unbound");
                }
            }
        }
        self
    }

    pub fn lookup(&self, code: KeyCode) -> Option<ControlInput> {
        let code = normalize(code);
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, input)| *input)
    }

    pub fn iter(&self) -> impl Iterator<Item = (KeyCode, ControlInput)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fold character keys to lowercase so shifted letters hit the same binding.
pub fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Check if key should quit the client.
pub fn should_quit(key: KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_cover_every_control() {
        let b = KeyBindings::default();
        assert_eq!(b.lookup(KeyCode::Up), Some(ControlInput::Forward));
        assert_eq!(b.lookup(KeyCode::Down), Some(ControlInput::Backward));
        assert_eq!(b.lookup(KeyCode::Left), Some(ControlInput::Left));
        assert_eq!(b.lookup(KeyCode::Right), Some(ControlInput::Right));
        assert_eq!(b.lookup(KeyCode::Char(' ')), Some(ControlInput::Fire));
        assert_eq!(b.lookup(KeyCode::Char('x')), None);
        assert_eq!(b.len(), ControlInput::ALL.len());
    }

    #[test]
    fn character_bindings_ignore_case() {
        let b = KeyBindings::default().bind(KeyCode::Char('W'), ControlInput::Forward);
        assert_eq!(b.lookup(KeyCode::Char('w')), Some(ControlInput::Forward));
        assert_eq!(b.lookup(KeyCode::Char('W')), Some(ControlInput::Forward));
    }

    #[test]
    fn rebinding_replaces() {
        let b = KeyBindings::default().bind(KeyCode::Up, ControlInput::Fire);
        assert_eq!(b.lookup(KeyCode::Up), Some(ControlInput::Fire));
        assert_eq!(b.len(), 5);
    }

    #[test]
    fn table_stops_at_capacity() {
        let b = (1..=MAX_BINDINGS as u8 + 4).fold(KeyBindings::empty(), |b, n| {
            b.bind(KeyCode::F(n), ControlInput::Fire)
        });
        assert_eq!(b.len(), MAX_BINDINGS);
        assert_eq!(b.lookup(KeyCode::F(MAX_BINDINGS as u8)), Some(ControlInput::Fire));
        assert_eq!(b.lookup(KeyCode::F(MAX_BINDINGS as u8 + 1)), None);

        // Rebinding an existing key still works when full.
        let b = b.bind(KeyCode::F(1), ControlInput::Left);
        assert_eq!(b.lookup(KeyCode::F(1)), Some(ControlInput::Left));
    }

    #[test]
    fn quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
        assert!(!should_quit(KeyEvent::new_with_kind(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
            KeyEventKind::Release
        )));
    }
}
