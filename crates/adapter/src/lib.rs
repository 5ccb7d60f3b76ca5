//! Adapter module - server connection, asset fetching and configuration
//!
//! Everything async lives here. The client loop stays synchronous: it owns an
//! [`Adapter`], drains [`AdapterEvent`]s with `try_recv` once per iteration and
//! hands outbound messages back with `send`.
//!
//! # Protocol Overview
//!
//! One JSON document per line over TCP:
//!
//! ```text
//! Server -> Client: {"type":"DynamicObjectCreation","data":{"id":7,"object_asset":1,"display_radius":24.0,"view_layer":"Ships"}}
//! Server -> Client: {"type":"DynamicObjectUpdate","data":{"id":7,"x":10.0,"y":-4.5,"rotation":{"rotation":1.57}}}
//! Server -> Client: {"type":"ViewportFollow","data":{"subtype":"Entity","id":7}}
//! Client -> Server: {"type":"ControlInput","input":"Forward","pressed":true}
//! Client -> Server: {"type":"Disconnect"}
//! ```
//!
//! # Environment Variables
//!
//! - `IEV_SERVER_HOST` / `IEV_SERVER_PORT`: server address (default `127.0.0.1:7878`)
//! - `IEV_ASSET_DIR`: image directory (default `assets`)
//! - `IEV_ASSET_INDEX`: index file (default `<asset dir>/index.json`)
//! - `IEV_TICK_MS`: render interval in milliseconds (default 16)
//! - `IEV_LOG_PATH`: log file; logging is off when unset
//! - `IEV_OFFLINE`: `1` or `true` to skip the server connection

pub mod asset_index;
pub mod config;
pub mod fetch;
pub mod protocol;
pub mod runtime;
pub mod transport;

pub use iev_tui_core as core;
pub use iev_tui_types as types;

pub use asset_index::{load_asset_index, parse_asset_index, AssetIndexError};
pub use config::ClientConfig;
pub use fetch::FsImageFetcher;
pub use protocol::{decode_server_line, encode_client_line, ProtocolError};
pub use runtime::{Adapter, AdapterEvent};
