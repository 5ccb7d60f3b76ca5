use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use iev_tui::input::{ControlEdge, InputController, KeyBindings};
use iev_tui::types::{ClientServerMessage, ControlInput};

#[test]
fn down_down_down_up_emits_two_messages() {
    let mut input = InputController::default();
    let t0 = Instant::now();
    let mut sent = Vec::new();
    for (i, kind) in [
        KeyEventKind::Press,
        KeyEventKind::Repeat,
        KeyEventKind::Repeat,
        KeyEventKind::Release,
    ]
    .into_iter()
    .enumerate()
    {
        let key = KeyEvent::new_with_kind(KeyCode::Up, KeyModifiers::NONE, kind);
        if let Some(edge) = input.handle_key_event(key, t0 + Duration::from_millis(30 * i as u64)) {
            sent.push(edge.into_message());
        }
    }
    assert_eq!(
        sent,
        vec![
            ClientServerMessage::ControlInput {
                input: ControlInput::Forward,
                pressed: true
            },
            ClientServerMessage::ControlInput {
                input: ControlInput::Forward,
                pressed: false
            },
        ]
    );
}

#[test]
fn press_only_terminals_release_through_timeout() {
    let mut input = InputController::default().with_key_release_timeout_ms(150);
    let t0 = Instant::now();
    // Key-repeat arrives as presses on these terminals.
    for ms in [0u64, 40, 80] {
        input.key_down_at(KeyCode::Left, t0 + Duration::from_millis(ms));
    }
    assert!(input.release_stale(t0 + Duration::from_millis(200)).is_empty());
    let released = input.release_stale(t0 + Duration::from_millis(260));
    assert_eq!(
        released.as_slice(),
        &[ControlEdge {
            input: ControlInput::Left,
            pressed: false
        }]
    );
}

#[test]
fn custom_bindings_are_case_insensitive() {
    let bindings = KeyBindings::empty()
        .bind(KeyCode::Char('w'), ControlInput::Forward)
        .bind(KeyCode::Char('f'), ControlInput::Fire);
    let mut input = InputController::new(bindings);
    assert!(input.key_down(KeyCode::Char('W')).is_some());
    assert!(input.key_down(KeyCode::Char('w')).is_none());
    assert_eq!(
        input.key_up(KeyCode::Char('w')),
        Some(ControlEdge {
            input: ControlInput::Forward,
            pressed: false
        })
    );
    assert!(input.key_down(KeyCode::Up).is_none());
}
