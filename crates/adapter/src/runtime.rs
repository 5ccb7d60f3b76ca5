//! Adapter runtime integration.
//!
//! Bridges the sync client loop with the async transport and image fetches.
//! Everything the runtime produces arrives through one channel that the
//! client loop drains with [`Adapter::try_recv`].

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::info;

use crate::config::ClientConfig;
use crate::core::{AssetError, LoadedImage};
use crate::fetch::FsImageFetcher;
use crate::transport;
use crate::types::{AssetId, ClientServerMessage, ServerClientMessage};

/// Event delivered to the client loop.
#[derive(Debug)]
pub enum AdapterEvent {
    Connected,
    Message(ServerClientMessage),
    AssetLoaded {
        asset_id: AssetId,
        result: Result<LoadedImage, AssetError>,
    },
    /// The server connection ended or could not be established.
    Closed,
}

/// Running adapter instance.
pub struct Adapter {
    rt: Runtime,
    events_tx: mpsc::UnboundedSender<AdapterEvent>,
    events_rx: mpsc::UnboundedReceiver<AdapterEvent>,
    out_tx: Option<mpsc::UnboundedSender<ClientServerMessage>>,
}

impl Adapter {
    /// Start the runtime and, unless offline, connect to the server.
    pub fn start(config: &ClientConfig) -> Result<Self> {
        let rt = Runtime::new().context("failed to create tokio runtime")?;
        let (events_tx, events_rx) = mpsc::unbounded_channel::<AdapterEvent>();

        let out_tx = if config.offline {
            info!("offline mode, not connecting");
            None
        } else {
            let (out_tx, out_rx) = mpsc::unbounded_channel::<ClientServerMessage>();
            rt.spawn(transport::connect(
                config.server_addr(),
                events_tx.clone(),
                out_rx,
            ));
            Some(out_tx)
        };

        Ok(Self {
            rt,
            events_tx,
            events_rx,
            out_tx,
        })
    }

    pub fn is_offline(&self) -> bool {
        self.out_tx.is_none()
    }

    pub fn try_recv(&mut self) -> Option<AdapterEvent> {
        self.events_rx.try_recv().ok()
    }

    pub fn send(&self, msg: ClientServerMessage) {
        if let Some(tx) = self.out_tx.as_ref() {
            let _ = tx.send(msg);
        }
    }

    /// Image loader running on this adapter's runtime.
    pub fn image_fetcher(&self, root: PathBuf) -> FsImageFetcher {
        FsImageFetcher::new(self.rt.handle().clone(), root, self.events_tx.clone())
    }

    /// Flush queued outbound messages and wait (bounded) for the session to end.
    pub fn close(mut self, timeout: Duration) {
        let Some(out_tx) = self.out_tx.take() else {
            return;
        };
        drop(out_tx);
        let events_rx = &mut self.events_rx;
        let _ = self.rt.block_on(async {
            tokio::time::timeout(timeout, async {
                while let Some(ev) = events_rx.recv().await {
                    if matches!(ev, AdapterEvent::Closed) {
                        break;
                    }
                }
            })
            .await
        });
        self.rt.shutdown_timeout(Duration::from_millis(100));
    }
}
