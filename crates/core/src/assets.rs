//! Asset resolver and cache.
//!
//! Maps opaque asset ids to loaded images. Each id gets exactly one entry for
//! the session: the first [`AssetCache::resolve`] looks the id up in the
//! [`AssetIndex`] and asks the [`AssetLoader`] to fetch it; later calls reuse
//! the entry. Consumers that need the image dimensions register a one-shot
//! callback with [`AssetCache::on_loaded`]; callbacks registered before the
//! load completes are queued and fired in registration order, callbacks
//! registered afterwards run immediately.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, warn};

use crate::types::{AssetId, AssetIndexValue};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset id {0} is not in the asset index")]
    UnknownAsset(AssetId),
    #[error("failed to read asset `{name}`")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("asset `{0}` has no drawable content")]
    Empty(String),
}

/// A terminal sprite: one glyph per cell, spaces are transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    rows: Vec<Vec<char>>,
    width: usize,
}

impl LoadedImage {
    pub fn from_text(name: &str, text: &str) -> Result<Self, AssetError> {
        let mut rows: Vec<Vec<char>> = text
            .lines()
            .map(|line| line.trim_end().chars().collect())
            .collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return Err(AssetError::Empty(name.to_string()));
        }
        Ok(Self { rows, width })
    }

    /// Width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Opaque glyph at a cell, `None` for transparent or out of range.
    pub fn glyph(&self, col: usize, row: usize) -> Option<char> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .filter(|ch| *ch != ' ')
    }
}

/// Read access to loaded images, used by rasterizers.
pub trait ImageLookup {
    fn image(&self, id: AssetId) -> Option<&LoadedImage>;
}

impl ImageLookup for HashMap<AssetId, LoadedImage> {
    fn image(&self, id: AssetId) -> Option<&LoadedImage> {
        self.get(&id)
    }
}

/// Starts an asynchronous fetch of an image by display name.
///
/// Implementations must eventually report the outcome through
/// [`AssetCache::complete`]; they must not call back synchronously.
pub trait AssetLoader {
    fn begin_load(&mut self, asset_id: AssetId, name: &str);
}

/// Asset id to display name, supplied externally.
#[derive(Debug, Clone, Default)]
pub struct AssetIndex {
    names: HashMap<AssetId, String>,
}

impl AssetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: impl IntoIterator<Item = AssetIndexValue>) -> Self {
        let mut index = Self::new();
        index.extend(values);
        index
    }

    pub fn extend(&mut self, values: impl IntoIterator<Item = AssetIndexValue>) {
        for value in values {
            self.names.insert(value.id, value.name);
        }
    }

    pub fn name(&self, id: AssetId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    Pending,
    Loaded,
    Failed,
}

/// One-shot callback fired with the loaded image and the caller's context.
pub type OnLoaded<C> = Box<dyn FnOnce(&LoadedImage, &mut C)>;

enum AssetEntry<C> {
    Pending(Vec<OnLoaded<C>>),
    Loaded(LoadedImage),
    Failed,
}

impl<C> AssetEntry<C> {
    fn status(&self) -> AssetStatus {
        match self {
            AssetEntry::Pending(_) => AssetStatus::Pending,
            AssetEntry::Loaded(_) => AssetStatus::Loaded,
            AssetEntry::Failed => AssetStatus::Failed,
        }
    }
}

/// Deduplicating image cache. Entries are never evicted.
///
/// `C` is the context handed to load callbacks (the scene, in the client).
pub struct AssetCache<C> {
    index: AssetIndex,
    entries: HashMap<AssetId, AssetEntry<C>>,
    loader: Box<dyn AssetLoader>,
    loads_started: usize,
}

impl<C> AssetCache<C> {
    pub fn new(index: AssetIndex, loader: Box<dyn AssetLoader>) -> Self {
        Self {
            index,
            entries: HashMap::new(),
            loader,
            loads_started: 0,
        }
    }

    pub fn index(&self) -> &AssetIndex {
        &self.index
    }

    /// Add index pairs that arrived after construction.
    pub fn extend_index(&mut self, values: impl IntoIterator<Item = AssetIndexValue>) {
        self.index.extend(values);
    }

    /// Make sure an entry exists for `asset_id`, starting its load on first sight.
    pub fn resolve(&mut self, asset_id: AssetId) -> Result<AssetStatus, AssetError> {
        if let Some(entry) = self.entries.get(&asset_id) {
            return Ok(entry.status());
        }
        let name = self
            .index
            .name(asset_id)
            .ok_or(AssetError::UnknownAsset(asset_id))?;
        debug!(asset_id, name, "loading asset");
        self.loader.begin_load(asset_id, name);
        self.loads_started += 1;
        self.entries.insert(asset_id, AssetEntry::Pending(Vec::new()));
        Ok(AssetStatus::Pending)
    }

    /// Run `callback` once the image is loaded; immediately if it already is.
    ///
    /// Callbacks for failed or never-resolved assets are dropped.
    pub fn on_loaded(&mut self, asset_id: AssetId, ctx: &mut C, callback: OnLoaded<C>) {
        match self.entries.get_mut(&asset_id) {
            Some(AssetEntry::Loaded(image)) => callback(image, ctx),
            Some(AssetEntry::Pending(waiters)) => waiters.push(callback),
            Some(AssetEntry::Failed) | None => {
                debug!(asset_id, "dropping load callback for unavailable asset");
            }
        }
    }

    /// Settle a pending load. Returns how many callbacks fired.
    pub fn complete(
        &mut self,
        asset_id: AssetId,
        result: Result<LoadedImage, AssetError>,
        ctx: &mut C,
    ) -> usize {
        let Some(entry) = self.entries.get_mut(&asset_id) else {
            debug!(asset_id, "load completion for unrequested asset");
            return 0;
        };
        let AssetEntry::Pending(waiters) = &mut *entry else {
            debug!(asset_id, "duplicate load completion ignored");
            return 0;
        };
        let waiters = std::mem::take(waiters);

        match result {
            Ok(image) => {
                let fired = waiters.len();
                for callback in waiters {
                    callback(&image, ctx);
                }
                *entry = AssetEntry::Loaded(image);
                fired
            }
            Err(err) => {
                warn!(asset_id, error = %err, "asset failed to load");
                *entry = AssetEntry::Failed;
                0
            }
        }
    }

    pub fn status(&self, asset_id: AssetId) -> Option<AssetStatus> {
        self.entries.get(&asset_id).map(AssetEntry::status)
    }

    /// Number of loads handed to the loader so far.
    pub fn loads_started(&self) -> usize {
        self.loads_started
    }
}

impl<C> ImageLookup for AssetCache<C> {
    fn image(&self, id: AssetId) -> Option<&LoadedImage> {
        match self.entries.get(&id) {
            Some(AssetEntry::Loaded(image)) => Some(image),
            _ => None,
        }
    }
}

impl<C> std::fmt::Debug for AssetCache<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCache")
            .field("index", &self.index)
            .field("entries", &self.entries.len())
            .field("loads_started", &self.loads_started)
            .finish()
    }
}
