//! Edge-triggered input controller.
//!
//! Each bound key is a two-state machine (`Released`, `Pressed`) that emits a
//! [`ControlEdge`] only when it changes state. OS key-repeat therefore never
//! produces duplicate messages.
//!
//! Terminals that do not report key releases get an optional timeout: a key
//! with no down/repeat event for longer than the timeout is released as if a
//! key-up had arrived.

use std::time::{Duration, Instant};

use arrayvec::ArrayVec;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use tracing::trace;

use crate::map::{normalize, KeyBindings, MAX_BINDINGS};
use crate::types::{ClientServerMessage, ControlInput};

/// Upper bound on edges produced by one sweep (timeout release or reset).
pub const MAX_EDGES: usize = MAX_BINDINGS;

/// One control-state transition to send to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlEdge {
    pub input: ControlInput,
    pub pressed: bool,
}

impl ControlEdge {
    pub fn into_message(self) -> ClientServerMessage {
        ClientServerMessage::ControlInput {
            input: self.input,
            pressed: self.pressed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStatus {
    Released,
    /// `last_seen` is the latest down or repeat event for the key.
    Pressed { last_seen: Instant },
}

#[derive(Debug, Clone)]
struct KeySlot {
    code: KeyCode,
    input: ControlInput,
    status: KeyStatus,
}

#[derive(Debug, Clone)]
pub struct InputController {
    slots: Vec<KeySlot>,
    key_release_timeout: Option<Duration>,
}

impl Default for InputController {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

impl InputController {
    pub fn new(bindings: KeyBindings) -> Self {
        let slots = bindings
            .iter()
            .map(|(code, input)| KeySlot {
                code,
                input,
                status: KeyStatus::Released,
            })
            .collect();
        Self {
            slots,
            key_release_timeout: None,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout = Some(Duration::from_millis(u64::from(timeout_ms)));
        self
    }

    pub fn key_release_timeout(&self) -> Option<Duration> {
        self.key_release_timeout
    }

    /// Disable the release timeout once the terminal is known to send key-ups.
    pub fn set_key_release_timeout(&mut self, timeout: Option<Duration>) {
        self.key_release_timeout = timeout;
    }

    pub fn status(&self, code: KeyCode) -> Option<KeyStatus> {
        self.slot(code).map(|s| self.slots[s].status)
    }

    pub fn is_pressed(&self, input: ControlInput) -> bool {
        self.slots
            .iter()
            .any(|s| s.input == input && matches!(s.status, KeyStatus::Pressed { .. }))
    }

    fn slot(&self, code: KeyCode) -> Option<usize> {
        let code = normalize(code);
        self.slots.iter().position(|s| s.code == code)
    }

    /// Feed a crossterm key event. Press and repeat are key-downs.
    pub fn handle_key_event(&mut self, key: KeyEvent, now: Instant) -> Option<ControlEdge> {
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.key_down_at(key.code, now),
            KeyEventKind::Release => self.key_up(key.code),
        }
    }

    pub fn key_down(&mut self, code: KeyCode) -> Option<ControlEdge> {
        self.key_down_at(code, Instant::now())
    }

    pub fn key_down_at(&mut self, code: KeyCode, now: Instant) -> Option<ControlEdge> {
        let index = self.slot(code)?;
        let slot = &mut self.slots[index];
        let was_released = slot.status == KeyStatus::Released;
        slot.status = KeyStatus::Pressed { last_seen: now };
        if !was_released {
            return None;
        }
        trace!(input = slot.input.as_str(), "control pressed");
        Some(ControlEdge {
            input: slot.input,
            pressed: true,
        })
    }

    pub fn key_up(&mut self, code: KeyCode) -> Option<ControlEdge> {
        let index = self.slot(code)?;
        let slot = &mut self.slots[index];
        if slot.status == KeyStatus::Released {
            return None;
        }
        slot.status = KeyStatus::Released;
        trace!(input = slot.input.as_str(), "control released");
        Some(ControlEdge {
            input: slot.input,
            pressed: false,
        })
    }

    /// Release keys whose last down/repeat is older than the timeout.
    pub fn release_stale(&mut self, now: Instant) -> ArrayVec<ControlEdge, MAX_EDGES> {
        let mut edges = ArrayVec::new();
        let Some(timeout) = self.key_release_timeout else {
            return edges;
        };
        for slot in &mut self.slots {
            if let KeyStatus::Pressed { last_seen } = slot.status {
                let stale = now.saturating_duration_since(last_seen) > timeout;
                if stale && release_into(&mut edges, slot) {
                    trace!(input = slot.input.as_str(), "control release timed out");
                }
            }
        }
        edges
    }

    /// Release every pressed key, e.g. on focus loss or shutdown.
    pub fn reset(&mut self) -> ArrayVec<ControlEdge, MAX_EDGES> {
        let mut edges = ArrayVec::new();
        for slot in &mut self.slots {
            if slot.status != KeyStatus::Released {
                release_into(&mut edges, slot);
            }
        }
        edges
    }
}

/// Queue a release edge and only then mark the slot released, so a key never
/// goes up locally without its message.
fn release_into(edges: &mut ArrayVec<ControlEdge, MAX_EDGES>, slot: &mut KeySlot) -> bool {
    let edge = ControlEdge {
        input: slot.input,
        pressed: false,
    };
    if edges.try_push(edge).is_err() {
        return false;
    }
    slot.status = KeyStatus::Released;
    true
}
