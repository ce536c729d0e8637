use crate::domain::systems::control::ClassifierFrame;
use crate::interface_adapters::http::error_response;
use crate::interface_adapters::protocol::{
    ClientMessage, FormantsDto, ServerMessage, SoundDto, WorldUpdateDto,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{GameEvent, SessionHandle, SessionState, WorldUpdate};

use axum::{
    Error,
    extract::{
        Query, State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::SinkExt;
use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, error, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    InputClosed,
    WorldUpdatesClosed,
    SessionStateClosed,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct SessionQuery {
    // The session the client wants to attach to.
    #[serde(default)]
    session_id: Option<String>,
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const MAX_INVALID_JSON: u32 = 10;
const MAX_LABEL_LEN: usize = 64;

static NEXT_CONN_ID: AtomicU64 = AtomicU64::new(1);

// Log correlation id for one WebSocket connection.
fn next_conn_id() -> u64 {
    NEXT_CONN_ID.fetch_add(1, Ordering::Relaxed)
}

pub async fn world_update_serializer(
    mut world_rx: broadcast::Receiver<WorldUpdate>,
    world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    world_latest_tx: watch::Sender<Utf8Bytes>,
) {
    // Serialize each world update once and broadcast the shared bytes.
    loop {
        match world_rx.recv().await {
            Ok(update) => {
                let msg = ServerMessage::WorldUpdate(WorldUpdateDto::from(update));
                let txt = match serde_json::to_string(&msg) {
                    Ok(txt) => txt,
                    Err(e) => {
                        error!(error = ?e, "failed to serialize world update");
                        continue;
                    }
                };

                let bytes = Utf8Bytes::from(txt);
                // Latest bytes are kept for lag recovery.
                let _ = world_latest_tx.send(bytes.clone());
                let _ = world_bytes_tx.send(bytes);
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(
                    missed = n,
                    "world serializer lagged; skipping to latest update"
                );
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("world updates channel closed; serializer exiting");
                break;
            }
        }
    }
}

pub fn spawn_session_serializer(session: &SessionHandle) {
    tokio::spawn(world_update_serializer(
        session.world_tx.subscribe(),
        session.world_bytes_tx.clone(),
        session.world_latest_tx.clone(),
    ));
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionQuery>,
) -> impl IntoResponse {
    let session_id = query
        .session_id
        .unwrap_or_else(|| state.default_session_id.to_string());

    let Some(session) = state.session_registry.get_session(&session_id).await else {
        return error_response(StatusCode::NOT_FOUND, "session not found");
    };

    ws.on_upgrade(move |socket| handle_socket(socket, session))
}

async fn handle_socket(mut socket: WebSocket, session: SessionHandle) {
    let conn_id = next_conn_id();
    let span = info_span!("conn", conn_id, session_id = %session.session_id);
    let _enter = span.enter();

    let bootstrapped = bootstrap_connection(&mut socket, &session).await;
    // Only receivers and inbound senders outlive bootstrap, so removing the session
    // closes its channels and ends this connection.
    drop(session);

    let mut ctx = match bootstrapped {
        Ok(ctx) => ctx,
        Err(e) => {
            error!(error = ?e, "failed to bootstrap connection");
            let _ = socket
                .send(Message::Close(Some(CloseFrame {
                    code: close_code::POLICY,
                    reason: "bootstrap failed".into(),
                })))
                .await;
            let _ = socket.close().await;
            return;
        }
    };

    info!("client connected");

    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<usize, NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    let bytes = txt.len();
    socket.send(Message::Text(txt.into())).await?;
    Ok(bytes)
}

struct ConnCtx {
    pub inbound: Inbound,
    pub world_bytes_rx: broadcast::Receiver<Utf8Bytes>,
    pub world_latest_rx: watch::Receiver<Utf8Bytes>,
    pub session_state_rx: watch::Receiver<SessionState>,
    // Count lag recovery snapshots sent to this client.
    pub lag_recovery_count: u64,

    pub msgs_out: u64,
    pub bytes_out: u64,

    pub last_world_lag_log: Instant,

    pub close_frame: Option<CloseFrame>,
}

// Per-connection state touched by inbound messages.
struct Inbound {
    pub input_tx: mpsc::Sender<GameEvent>,
    pub classifier_tx: watch::Sender<Option<ClassifierFrame>>,

    pub msgs_in: u64,
    pub bytes_in: u64,
    pub invalid_json: u32,
    pub frames_in: u64,

    pub last_input_full_log: Instant,
    pub last_invalid_input_log: Instant,
}

async fn bootstrap_connection(
    socket: &mut WebSocket,
    session: &SessionHandle,
) -> Result<ConnCtx, NetError> {
    // Subscribe before any await so no update is missed.
    let world_bytes_rx = session.world_bytes_tx.subscribe();
    let world_latest_rx = session.world_latest_tx.subscribe();
    let mut session_state_rx = session.session_state_tx.subscribe();

    let attached = ServerMessage::Attached {
        session_id: session.session_id.to_string(),
        level_count: session.level_count,
    };
    let mut bytes_out = send_message(socket, &attached).await?;

    // Clone out of the borrow so the watch lock is not held across the send.
    let initial_state = session_state_rx.borrow_and_update().clone();
    bytes_out += send_message(socket, &ServerMessage::SessionState(initial_state.into())).await?;

    let now = Instant::now() - LOG_THROTTLE;
    Ok(ConnCtx {
        inbound: Inbound {
            input_tx: session.input_tx.clone(),
            classifier_tx: session.classifier_tx.clone(),
            msgs_in: 0,
            bytes_in: 0,
            invalid_json: 0,
            frames_in: 0,
            last_input_full_log: now,
            last_invalid_input_log: now,
        },
        world_bytes_rx,
        world_latest_rx,
        session_state_rx,
        lag_recovery_count: 0,

        msgs_out: 2,
        bytes_out: bytes_out as u64,

        last_world_lag_log: now,

        close_frame: None,
    })
}

fn session_closed_frame() -> CloseFrame {
    CloseFrame {
        code: close_code::AWAY,
        reason: "session closed".into(),
    }
}

enum LoopControl {
    Continue,
    Disconnect,
}

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

fn sanitize_sound(sound: SoundDto) -> Option<ClassifierFrame> {
    let label = sound.label.trim();
    if label.is_empty() || label.len() > MAX_LABEL_LEN || !sound.confidence.is_finite() {
        return None;
    }
    Some(ClassifierFrame::Discrete {
        label: label.to_string(),
        confidence: sound.confidence.clamp(0.0, 1.0),
    })
}

fn sanitize_formants(formants: FormantsDto) -> Option<ClassifierFrame> {
    let FormantsDto {
        f1,
        f2,
        confidence,
        amplitude,
    } = formants;
    if ![f1, f2, confidence, amplitude].iter().all(|v| v.is_finite()) {
        return None;
    }
    Some(ClassifierFrame::Continuous {
        f1,
        f2,
        confidence: confidence.clamp(0.0, 1.0),
        amplitude: amplitude.max(0.0),
    })
}

impl Inbound {
    // Commands are never awaited; a full queue drops them.
    fn forward(&mut self, event: GameEvent) -> Result<LoopControl, NetError> {
        match self.input_tx.try_send(event) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(mpsc::error::TrySendError::Full(_evt)) => {
                if should_log(&mut self.last_input_full_log) {
                    warn!("input channel full; dropping command");
                }
                Ok(LoopControl::Continue)
            }
            Err(mpsc::error::TrySendError::Closed(_evt)) => Err(NetError::InputClosed),
        }
    }
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    // Split borrows so `tokio::select!` can hold them concurrently.
    let ConnCtx {
        inbound,
        world_bytes_rx,
        world_latest_rx,
        session_state_rx,
        lag_recovery_count,
        msgs_out,
        bytes_out,
        last_world_lag_log,
        close_frame,
    } = ctx;

    let mut fatal: Option<NetError> = None;

    loop {
        let disconnect: bool = tokio::select! {
            incoming = socket.recv() => {
                match handle_incoming_ws(incoming, inbound, close_frame) {
                    Ok(LoopControl::Continue) => false,
                    Ok(LoopControl::Disconnect) => true,
                    Err(e) => {
                        fatal = Some(e);
                        true
                    }
                }
            }

            world_msg = world_bytes_rx.recv() => {
                match world_msg {
                    Ok(bytes) => match forward_world_bytes(bytes, socket, msgs_out, bytes_out).await {
                        LoopControl::Continue => false,
                        LoopControl::Disconnect => true,
                    },
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        if should_log(last_world_lag_log) {
                            warn!(missed = n, "world updates lagged; sending snapshot");
                        }

                        // Resync with the latest world snapshot.
                        let latest = world_latest_rx.borrow().clone();
                        if latest.is_empty() {
                            false
                        } else {
                            *lag_recovery_count += 1;
                            match forward_world_bytes(latest, socket, msgs_out, bytes_out).await {
                                LoopControl::Continue => false,
                                LoopControl::Disconnect => true,
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        *close_frame = Some(session_closed_frame());
                        fatal = Some(NetError::WorldUpdatesClosed);
                        true
                    }
                }
            }

            changed_state = session_state_rx.changed() => {
                match changed_state {
                    Ok(()) => match forward_session_state(session_state_rx, socket, msgs_out, bytes_out).await {
                        LoopControl::Continue => false,
                        LoopControl::Disconnect => true,
                    },
                    Err(_) => {
                        // The session was removed; its world task dropped the sender.
                        *close_frame = Some(session_closed_frame());
                        fatal = Some(NetError::SessionStateClosed);
                        true
                    }
                }
            }
        };

        if disconnect {
            if let Some(frame) = close_frame.take() {
                let _ = socket.send(Message::Close(Some(frame))).await;
            }
            if let Err(err) = socket.close().await.map_err(NetError::Ws) {
                debug!(error = ?err, "socket close error");
            }
            break;
        }
    }

    debug!(
        msgs_in = inbound.msgs_in,
        msgs_out = *msgs_out,
        bytes_in = inbound.bytes_in,
        bytes_out = *bytes_out,
        frames_in = inbound.frames_in,
        invalid_json = inbound.invalid_json,
        lag_recovery_count = *lag_recovery_count,
        "connection stats"
    );
    info!("client disconnected");

    match fatal {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn handle_incoming_ws(
    incoming: Option<Result<Message, Error>>,
    inbound: &mut Inbound,
    close_frame: &mut Option<CloseFrame>,
) -> Result<LoopControl, NetError> {
    match incoming {
        Some(Ok(Message::Text(text))) => {
            inbound.msgs_in += 1;
            inbound.bytes_in += text.len() as u64;

            let msg = match serde_json::from_str::<ClientMessage>(&text) {
                Ok(msg) => msg,
                Err(parse_err) => {
                    inbound.invalid_json += 1;
                    if should_log(&mut inbound.last_invalid_input_log) {
                        warn!(
                            bytes = text.len(),
                            error = %parse_err,
                            "failed to parse client message"
                        );
                    }

                    if inbound.invalid_json > MAX_INVALID_JSON {
                        *close_frame = Some(CloseFrame {
                            code: close_code::POLICY,
                            reason: "too many invalid messages".into(),
                        });
                        return Ok(LoopControl::Disconnect);
                    }
                    return Ok(LoopControl::Continue);
                }
            };

            let frame = match msg {
                ClientMessage::Commit => return inbound.forward(GameEvent::Commit),
                ClientMessage::Restart => return inbound.forward(GameEvent::Restart),
                ClientMessage::SelectLevel { level } => {
                    return inbound.forward(GameEvent::SelectLevel { level, reply: None });
                }
                ClientMessage::Sound(sound) => sanitize_sound(sound),
                ClientMessage::Formants(formants) => sanitize_formants(formants),
            };

            match frame {
                Some(frame) => {
                    inbound.frames_in += 1;
                    // Last value wins; the tick loop picks it up on its next step.
                    inbound.classifier_tx.send_replace(Some(frame));
                }
                None => {
                    if should_log(&mut inbound.last_invalid_input_log) {
                        warn!("invalid classifier values; dropping");
                    }
                }
            }
            Ok(LoopControl::Continue)
        }
        Some(Ok(Message::Binary(_))) => {
            *close_frame = Some(CloseFrame {
                code: close_code::UNSUPPORTED,
                reason: "binary messages not supported".into(),
            });
            Ok(LoopControl::Disconnect)
        }
        Some(Ok(Message::Ping(_) | Message::Pong(_))) => Ok(LoopControl::Continue),
        Some(Ok(Message::Close(_))) => Ok(LoopControl::Disconnect),
        Some(Err(e)) => {
            warn!(error = %e, "websocket recv error");
            Ok(LoopControl::Disconnect)
        }
        None => {
            info!("websocket closed");
            Ok(LoopControl::Disconnect)
        }
    }
}

async fn forward_world_bytes(
    world_msg: Utf8Bytes,
    socket: &mut WebSocket,
    msgs_out: &mut u64,
    bytes_out: &mut u64,
) -> LoopControl {
    let bytes_len = world_msg.len();
    match socket.send(Message::Text(world_msg)).await {
        Ok(()) => {
            *msgs_out += 1;
            *bytes_out += bytes_len as u64;
            LoopControl::Continue
        }
        Err(err) => {
            warn!(error = ?err, "failed to send world update");
            LoopControl::Disconnect
        }
    }
}

async fn forward_session_state(
    session_state_rx: &mut watch::Receiver<SessionState>,
    socket: &mut WebSocket,
    msgs_out: &mut u64,
    bytes_out: &mut u64,
) -> LoopControl {
    let st = session_state_rx.borrow_and_update().clone();
    match send_message(socket, &ServerMessage::SessionState(st.into())).await {
        Ok(bytes) => {
            *msgs_out += 1;
            *bytes_out += bytes as u64;
            LoopControl::Continue
        }
        Err(err) => {
            warn!(error = ?err, "failed to send session state");
            LoopControl::Disconnect
        }
    }
}
