//! Terminal client for Infinite Escape Velocity (default binary).
//!
//! Loads configuration and the asset index, connects to the game server and
//! renders the followed ship and its surroundings until `q`, `Esc` or Ctrl+C.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use iev_tui::adapter::{load_asset_index, Adapter, ClientConfig};
use iev_tui::core::{AssetCache, AssetIndex, Reconciler};
use iev_tui::engine::{Client, FrameClock, KeyOutcome, RenderLoop, TerminalSurface};
use iev_tui::input::InputController;
use iev_tui::term::TerminalRenderer;
use iev_tui::types::DEFAULT_KEY_RELEASE_TIMEOUT_MS;

fn main() -> Result<()> {
    let config = ClientConfig::from_env();
    init_tracing(config.log_path.as_deref())?;

    let index = if config.offline {
        AssetIndex::new()
    } else {
        load_asset_index(&config.asset_index)?
    };
    let mut adapter = Adapter::start(&config)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;
    let key_release = term.supports_key_release();
    info!(key_release, "terminal ready");

    let loader = adapter.image_fetcher(config.asset_dir.clone());
    let world = Reconciler::new(AssetCache::new(index, Box::new(loader)));
    let mut input = InputController::default();
    if !key_release {
        input = input.with_key_release_timeout_ms(DEFAULT_KEY_RELEASE_TIMEOUT_MS);
    }
    let mut client = Client::new(
        world,
        input,
        RenderLoop::default(),
        TerminalSurface::new(term),
    );

    let result = run(&mut client, &mut adapter, &config);

    for msg in client.shutdown_messages() {
        adapter.send(msg);
    }
    adapter.close(Duration::from_millis(500));

    // Always try to restore terminal state.
    let mut term = client.into_surface().into_renderer();
    let _ = term.exit();
    if let Err(err) = &result {
        error!(error = %err, "client stopped");
    }
    result
}

fn run(
    client: &mut Client<TerminalSurface>,
    adapter: &mut Adapter,
    config: &ClientConfig,
) -> Result<()> {
    let mut clock = FrameClock::new(
        Duration::from_millis(u64::from(config.tick_ms)),
        Instant::now(),
    );

    loop {
        while let Some(ev) = adapter.try_recv() {
            client.handle_event(ev);
        }

        // Input with timeout until next tick.
        if event::poll(clock.poll_timeout(Instant::now()))? {
            if let Event::Key(key) = event::read()? {
                match client.handle_key(key, Instant::now()) {
                    KeyOutcome::Send(msg) => adapter.send(msg),
                    KeyOutcome::Quit => return Ok(()),
                    KeyOutcome::Ignored => {}
                }
            }
        }

        let now = Instant::now();
        if clock.is_due(now) {
            for msg in client.tick(now)? {
                adapter.send(msg);
            }
            clock.advance(now);
        }
    }
}

/// Log to `path` when given; the terminal itself is busy with the scene.
fn init_tracing(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("iev_tui=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
