//! Server connection: line-delimited JSON over a byte stream.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::protocol::{decode_server_line, encode_client_line};
use crate::runtime::AdapterEvent;
use crate::types::ClientServerMessage;

/// Connect to `addr` and run the session until either side closes.
///
/// Always ends by posting [`AdapterEvent::Closed`], including when the
/// connection cannot be established.
pub async fn connect(
    addr: String,
    events_tx: mpsc::UnboundedSender<AdapterEvent>,
    out_rx: mpsc::UnboundedReceiver<ClientServerMessage>,
) {
    match TcpStream::connect(&addr).await {
        Ok(stream) => {
            let _ = stream.set_nodelay(true);
            info!(%addr, "connected to game server");
            let _ = events_tx.send(AdapterEvent::Connected);
            run_stream(stream, events_tx, out_rx).await;
        }
        Err(err) => {
            warn!(%addr, error = %err, "failed to connect to game server");
            let _ = events_tx.send(AdapterEvent::Closed);
        }
    }
}

/// Pump one established stream.
///
/// Inbound lines are decoded in arrival order; malformed lines are logged and
/// dropped. Outbound messages are written as they arrive. The session ends on
/// EOF, a read or write error, or when the outbound sender is dropped (after
/// everything already queued has been written).
pub async fn run_stream<S>(
    stream: S,
    events_tx: mpsc::UnboundedSender<AdapterEvent>,
    mut out_rx: mpsc::UnboundedReceiver<ClientServerMessage>,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut lines = BufReader::new(reader).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match decode_server_line(&line) {
                        Ok(msg) => {
                            if events_tx.send(AdapterEvent::Message(msg)).is_err() {
                                break;
                            }
                        }
                        Err(err) => warn!(error = %err, "dropping server message"),
                    }
                }
                Ok(None) => {
                    info!("server closed the connection");
                    break;
                }
                Err(err) => {
                    warn!(error = %err, "server read failed");
                    break;
                }
            },
            out = out_rx.recv() => {
                let Some(msg) = out else {
                    debug!("outbound channel closed");
                    break;
                };
                let line = match encode_client_line(&msg) {
                    Ok(line) => line,
                    Err(err) => {
                        warn!(error = %err, "failed to encode client message");
                        continue;
                    }
                };
                if let Err(err) = writer.write_all(line.as_bytes()).await {
                    warn!(error = %err, "server write failed");
                    break;
                }
            }
        }
    }

    let _ = writer.flush().await;
    let _ = writer.shutdown().await;
    let _ = events_tx.send(AdapterEvent::Closed);
}
