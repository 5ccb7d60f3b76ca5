//! Image fetching from the asset directory.

use std::io;
use std::path::{Component, Path, PathBuf};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::debug;

use crate::core::{AssetError, AssetLoader, LoadedImage};
use crate::runtime::AdapterEvent;
use crate::types::AssetId;

/// Reads images by display name on the adapter runtime and posts the result
/// back as [`AdapterEvent::AssetLoaded`].
#[derive(Debug, Clone)]
pub struct FsImageFetcher {
    handle: Handle,
    root: PathBuf,
    events_tx: mpsc::UnboundedSender<AdapterEvent>,
}

impl FsImageFetcher {
    pub fn new(
        handle: Handle,
        root: PathBuf,
        events_tx: mpsc::UnboundedSender<AdapterEvent>,
    ) -> Self {
        Self {
            handle,
            root,
            events_tx,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Names come from the index and must stay inside the asset directory.
fn is_plain_relative(name: &str) -> bool {
    let path = Path::new(name);
    !name.is_empty() && path.components().all(|c| matches!(c, Component::Normal(_)))
}

pub async fn read_image(root: &Path, name: &str) -> Result<LoadedImage, AssetError> {
    if !is_plain_relative(name) {
        return Err(AssetError::Io {
            name: name.to_string(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "asset name escapes asset dir"),
        });
    }
    let text = tokio::fs::read_to_string(root.join(name))
        .await
        .map_err(|source| AssetError::Io {
            name: name.to_string(),
            source,
        })?;
    LoadedImage::from_text(name, &text)
}

impl AssetLoader for FsImageFetcher {
    fn begin_load(&mut self, asset_id: AssetId, name: &str) {
        debug!(asset_id, name, "fetching image");
        let root = self.root.clone();
        let name = name.to_string();
        let tx = self.events_tx.clone();
        self.handle.spawn(async move {
            let result = read_image(&root, &name).await;
            let _ = tx.send(AdapterEvent::AssetLoaded { asset_id, result });
        });
    }
}
