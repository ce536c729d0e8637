mod support;

use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::time::timeout;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

async fn create_session(base_url: &str) -> String {
    let session_id = format!("ws-{}", uuid::Uuid::new_v4());
    let res = reqwest::Client::new()
        .post(format!("{base_url}/sessions"))
        .json(&serde_json::json!({ "session_id": session_id }))
        .send()
        .await
        .expect("request should succeed");
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    session_id
}

async fn connect(base_url: &str, session_id: &str) -> Socket {
    let url = format!("{}/ws?session_id={session_id}", support::ws_url(base_url));
    let (socket, _) = connect_async(url).await.expect("websocket connect");
    socket
}

// Reads text frames until one has the given `type`, returning its `data`.
async fn next_of_type(socket: &mut Socket, kind: &str) -> serde_json::Value {
    timeout(Duration::from_secs(5), async {
        loop {
            let msg = socket
                .next()
                .await
                .expect("socket open")
                .expect("websocket frame");
            let Ok(text) = msg.to_text() else { continue };
            let Ok(value) = serde_json::from_str::<serde_json::Value>(text) else {
                continue;
            };
            if value["type"] == kind {
                return value["data"].clone();
            }
        }
    })
    .await
    .unwrap_or_else(|_| panic!("no {kind} message in time"))
}

#[tokio::test]
async fn when_client_attaches_then_it_gets_identity_state_and_world_updates() {
    let base_url = support::ensure_server();
    let session_id = create_session(base_url).await;
    let mut socket = connect(base_url, &session_id).await;

    let attached = next_of_type(&mut socket, "Attached").await;
    assert_eq!(attached["session_id"], session_id.as_str());
    assert_eq!(attached["level_count"], 3);

    let state = next_of_type(&mut socket, "SessionState").await;
    assert_eq!(state["Ready"]["level"], 1);
    assert!(state["Ready"]["tutorial_text"].as_array().is_some_and(|t| !t.is_empty()));

    let update = next_of_type(&mut socket, "WorldUpdate").await;
    assert_eq!(update["scroll"], 0.0);
    assert_eq!(update["session"]["paused"], true);
    assert_eq!(update["player"]["x"], 100.0);
    assert_eq!(update["portal"]["kind"], "ring");
}

#[tokio::test]
async fn when_client_commits_then_countdown_starts() {
    let base_url = support::ensure_server();
    let session_id = create_session(base_url).await;
    let mut socket = connect(base_url, &session_id).await;
    next_of_type(&mut socket, "SessionState").await;

    socket
        .send(Message::text(r#"{"type":"Commit"}"#))
        .await
        .expect("send commit");

    let state = next_of_type(&mut socket, "SessionState").await;
    assert_eq!(state["Countdown"]["level"], 1);
}

#[tokio::test]
async fn when_session_is_unknown_then_upgrade_is_refused() {
    let base_url = support::ensure_server();
    let url = format!("{}/ws?session_id=missing", support::ws_url(base_url));

    let result = connect_async(url).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn when_client_sends_binary_then_connection_is_closed() {
    let base_url = support::ensure_server();
    let session_id = create_session(base_url).await;
    let mut socket = connect(base_url, &session_id).await;
    next_of_type(&mut socket, "Attached").await;

    socket
        .send(Message::binary(vec![1, 2, 3]))
        .await
        .expect("send binary");

    let closed = timeout(Duration::from_secs(5), async {
        while let Some(Ok(msg)) = socket.next().await {
            if let Message::Close(frame) = msg {
                return frame.map(|f| u16::from(f.code));
            }
        }
        None
    })
    .await
    .expect("close in time");
    assert_eq!(closed, Some(1003));
}

#[tokio::test]
async fn when_session_is_deleted_then_attached_clients_are_closed() {
    let base_url = support::ensure_server();
    let session_id = create_session(base_url).await;
    let mut socket = connect(base_url, &session_id).await;
    next_of_type(&mut socket, "Attached").await;

    let res = reqwest::Client::new()
        .delete(format!("{base_url}/sessions/{session_id}"))
        .send()
        .await
        .expect("request should succeed");
    assert_eq!(res.status(), reqwest::StatusCode::NO_CONTENT);

    let closed = timeout(Duration::from_secs(3), async {
        while let Some(Ok(msg)) = socket.next().await {
            if let Message::Close(frame) = msg {
                return frame.map(|f| u16::from(f.code));
            }
        }
        None
    })
    .await
    .expect("client of a deleted session should be closed");
    assert_eq!(closed, Some(1001));
}
