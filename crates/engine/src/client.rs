//! Client: one logical thread driving the core from discrete events.
//!
//! Adapter events, key events and ticks are handled one at a time, each to
//! completion. The client never talks to the network itself; outbound messages
//! are returned to the caller, which forwards them to the adapter.

use std::time::Instant;

use anyhow::Result;
use arrayvec::ArrayVec;
use crossterm::event::KeyEvent;
use tracing::{debug, info};

use crate::adapter::AdapterEvent;
use crate::core::Reconciler;
use crate::input::{should_quit, InputController, MAX_EDGES};
use crate::render_loop::RenderLoop;
use crate::surface::Surface;
use crate::term::LinkStatus;
use crate::types::ClientServerMessage;

/// What the caller should do after a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Send(ClientServerMessage),
    Quit,
}

pub struct Client<S: Surface> {
    world: Reconciler,
    input: InputController,
    render: RenderLoop,
    surface: S,
    link: LinkStatus,
    show_hud: bool,
}

impl<S: Surface> Client<S> {
    pub fn new(world: Reconciler, input: InputController, render: RenderLoop, surface: S) -> Self {
        Self {
            world,
            input,
            render,
            surface,
            link: LinkStatus::Offline,
            show_hud: true,
        }
    }

    pub fn with_hud(mut self, show_hud: bool) -> Self {
        self.show_hud = show_hud;
        self
    }

    pub fn world(&self) -> &Reconciler {
        &self.world
    }

    pub fn input(&self) -> &InputController {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputController {
        &mut self.input
    }

    pub fn render_loop(&self) -> &RenderLoop {
        &self.render
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn link(&self) -> LinkStatus {
        self.link
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn handle_event(&mut self, event: AdapterEvent) {
        match event {
            AdapterEvent::Connected => self.link = LinkStatus::Connected,
            AdapterEvent::Message(msg) => {
                self.world.apply(&msg);
            }
            AdapterEvent::AssetLoaded { asset_id, result } => {
                let fired = self.world.asset_loaded(asset_id, result);
                debug!(asset_id, fired, "asset load settled");
            }
            AdapterEvent::Closed => {
                if self.link != LinkStatus::Closed {
                    info!("server link closed");
                }
                self.link = LinkStatus::Closed;
                // Nobody is listening for the releases any more.
                self.input.reset();
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> KeyOutcome {
        if should_quit(key) {
            return KeyOutcome::Quit;
        }
        match self.input.handle_key_event(key, now) {
            Some(edge) => KeyOutcome::Send(edge.into_message()),
            None => KeyOutcome::Ignored,
        }
    }

    /// Run one frame, returning any key releases synthesized by the timeout.
    pub fn tick(&mut self, now: Instant) -> Result<ArrayVec<ClientServerMessage, MAX_EDGES>> {
        let released = self
            .input
            .release_stale(now)
            .into_iter()
            .map(|edge| edge.into_message())
            .collect();
        let link = self.show_hud.then_some(self.link);
        self.render.tick(&mut self.world, &mut self.surface, link)?;
        Ok(released)
    }

    /// Messages to send before shutting down: releases for held keys, then
    /// `Disconnect`.
    pub fn shutdown_messages(&mut self) -> Vec<ClientServerMessage> {
        let mut out: Vec<_> = self
            .input
            .reset()
            .into_iter()
            .map(|edge| edge.into_message())
            .collect();
        out.push(ClientServerMessage::Disconnect);
        out
    }
}
