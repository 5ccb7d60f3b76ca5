//! Loading the external asset index.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::core::AssetIndex;
use crate::types::{AssetIndexResponse, AssetIndexValue};

#[derive(Debug, Error)]
pub enum AssetIndexError {
    #[error("failed to read asset index {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid asset index {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Either the server's response envelope or a bare list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IndexDocument {
    Response(AssetIndexResponse),
    List(Vec<AssetIndexValue>),
}

pub fn parse_asset_index(json: &str) -> Result<Vec<AssetIndexValue>, serde_json::Error> {
    Ok(match serde_json::from_str::<IndexDocument>(json)? {
        IndexDocument::Response(r) => r.asset_index_list,
        IndexDocument::List(values) => values,
    })
}

/// Read and parse the index once at startup.
pub fn load_asset_index(path: &Path) -> Result<AssetIndex, AssetIndexError> {
    let text = std::fs::read_to_string(path).map_err(|source| AssetIndexError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let values = parse_asset_index(&text).map_err(|source| AssetIndexError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let index = AssetIndex::from_values(values);
    info!(path = %path.display(), assets = index.len(), "asset index loaded");
    Ok(index)
}
