use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use iev_tui::adapter::transport::connect;
use iev_tui::adapter::AdapterEvent;
use iev_tui::types::*;

async fn next_event(rx: &mut mpsc::UnboundedReceiver<AdapterEvent>) -> AdapterEvent {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timeout waiting for adapter event")
        .expect("event channel closed")
}

#[tokio::test]
async fn session_over_loopback() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let client = tokio::spawn(connect(addr.to_string(), events_tx, out_rx));

    let (socket, _) = listener.accept().await.unwrap();
    let (read_half, mut write_half) = socket.into_split();
    let mut lines = BufReader::new(read_half).lines();

    assert!(matches!(next_event(&mut events_rx).await, AdapterEvent::Connected));

    write_half
        .write_all(
            concat!(
                r#"{"type":"DynamicObjectCreation","data":{"id":4,"object_asset":1,"display_radius":20.0,"view_layer":"Planetoids"}}"#,
                "\n",
                r#"{"type":"Warp","data":{}}"#,
                "\n",
                r#"{"type":"DynamicObjectUpdate","data":{"id":4,"x":3.0,"y":4.0,"rotation":{"rotation":0.5}}}"#,
                "\n",
            )
            .as_bytes(),
        )
        .await
        .unwrap();

    match next_event(&mut events_rx).await {
        AdapterEvent::Message(ServerClientMessage::DynamicObjectCreation(data)) => {
            assert_eq!(data.id, 4);
            assert_eq!(data.view_layer, ViewLayer::Planetoids);
        }
        other => panic!("unexpected event {other:?}"),
    }
    match next_event(&mut events_rx).await {
        AdapterEvent::Message(ServerClientMessage::DynamicObjectUpdate(data)) => {
            assert_eq!(data.rotation, Some(RotationData { rotation: 0.5 }));
        }
        other => panic!("unexpected event {other:?}"),
    }

    out_tx
        .send(ClientServerMessage::ControlInput {
            input: ControlInput::Backward,
            pressed: true,
        })
        .unwrap();
    let line = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
        .await
        .expect("timeout waiting for client line")
        .unwrap()
        .expect("client closed early");
    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"type":"ControlInput","input":"Backward","pressed":true})
    );

    drop(write_half);
    drop(lines);
    assert!(matches!(next_event(&mut events_rx).await, AdapterEvent::Closed));
    client.await.unwrap();
}

#[tokio::test]
async fn refused_connection_reports_closed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let (_out_tx, out_rx) = mpsc::unbounded_channel();
    connect(addr.to_string(), events_tx, out_rx).await;

    assert!(matches!(next_event(&mut events_rx).await, AdapterEvent::Closed));
    assert!(events_rx.try_recv().is_err());
}
