//! Line-delimited JSON codec for the game server protocol.
//!
//! Server to client messages are adjacently tagged (`{"type":..,"data":..}`);
//! client to server messages are internally tagged by `type`. Anything that
//! does not decode is reported as a [`ProtocolError`] and never reaches the
//! reconciler.

use serde::Deserialize;
use thiserror::Error;

use crate::types::{ClientServerMessage, ServerClientMessage};

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("message has no `type` discriminant")]
    MissingType,
    #[error("unknown message type `{0}`")]
    UnknownType(String),
}

/// Decode one inbound line.
pub fn decode_server_line(line: &str) -> Result<ServerClientMessage, ProtocolError> {
    let err = match serde_json::from_str::<ServerClientMessage>(line) {
        Ok(msg) => return Ok(msg),
        Err(err) => err,
    };

    // Tell a missing or unknown discriminant apart from a bad payload.
    #[derive(Debug, Deserialize)]
    struct TypeOnly {
        #[serde(rename = "type")]
        msg_type: Option<String>,
    }
    let Ok(probe) = serde_json::from_str::<TypeOnly>(line) else {
        return Err(ProtocolError::Json(err));
    };
    match probe.msg_type {
        None => Err(ProtocolError::MissingType),
        Some(t) if !ServerClientMessage::TYPE_NAMES.contains(&t.as_str()) => {
            Err(ProtocolError::UnknownType(t))
        }
        Some(_) => Err(ProtocolError::Json(err)),
    }
}

/// Encode one outbound message as a newline-terminated line.
pub fn encode_client_line(msg: &ClientServerMessage) -> Result<String, ProtocolError> {
    let mut line = serde_json::to_string(msg)?;
    line.push('\n');
    Ok(line)
}
