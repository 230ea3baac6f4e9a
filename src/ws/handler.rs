//! WebSocket upgrade handler

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::util::rate_limit::ClientRateLimiter;
use crate::util::time::unix_millis;
use crate::ws::protocol::{ClientMsg, ServerMsg};

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let connection_id = Uuid::new_v4();
    info!(connection_id = %connection_id, "WebSocket upgrade");
    ws.on_upgrade(move |socket| handle_socket(socket, connection_id, state))
}

/// Handle the upgraded WebSocket connection
async fn handle_socket(socket: WebSocket, connection_id: Uuid, state: AppState) {
    info!(connection_id = %connection_id, "New WebSocket connection");

    let (mut ws_sink, ws_stream) = socket.split();

    // Subscribe before the welcome so no event slips between them
    let events_rx = state.orchestrator.subscribe();
    let snapshot_rx = state.orchestrator.subscribe_snapshots();

    let welcome = ServerMsg::Welcome {
        connection_id,
        server_time: unix_millis(),
        snapshot: state.orchestrator.snapshot(),
    };

    if let Err(e) = send_msg(&mut ws_sink, &welcome).await {
        error!(connection_id = %connection_id, error = %e, "Failed to send welcome");
        return;
    }

    run_session(connection_id, state, ws_sink, ws_stream, events_rx, snapshot_rx).await;

    info!(connection_id = %connection_id, "WebSocket connection closed");
}

/// Run the WebSocket session with read/write split
async fn run_session(
    connection_id: Uuid,
    state: AppState,
    mut ws_sink: futures::stream::SplitSink<WebSocket, Message>,
    mut ws_stream: futures::stream::SplitStream<WebSocket>,
    mut events_rx: broadcast::Receiver<crate::game::DuelEvent>,
    mut snapshot_rx: broadcast::Receiver<crate::game::DuelSnapshot>,
) {
    let rate_limiter = ClientRateLimiter::new();
    let (reply_tx, mut reply_rx) = mpsc::channel::<ServerMsg>(16);

    // Writer task: events, snapshots and direct replies -> WebSocket
    let writer_handle = tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                event = events_rx.recv() => match event {
                    Ok(event) => ServerMsg::Event { event },
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(connection_id = %connection_id, lagged_count = n, "Client lagged on events");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                snapshot = snapshot_rx.recv() => match snapshot {
                    Ok(snapshot) => ServerMsg::Snapshot { snapshot },
                    // Stale frames are worthless, skip ahead
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                reply = reply_rx.recv() => match reply {
                    Some(reply) => reply,
                    None => break,
                },
            };

            if let Err(e) = send_msg(&mut ws_sink, &msg).await {
                debug!(connection_id = %connection_id, error = %e, "WebSocket send failed");
                break;
            }
        }
    });

    // Reader loop: WebSocket -> orchestrator
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if !rate_limiter.check_control() {
                    warn!(connection_id = %connection_id, "Rate limited control message");
                    continue;
                }

                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(client_msg) => {
                        if let Some(reply) = handle_client_msg(&state, client_msg) {
                            if reply_tx.send(reply).await.is_err() {
                                debug!(connection_id = %connection_id, "Writer closed");
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        warn!(connection_id = %connection_id, error = %e, "Failed to parse client message");
                    }
                }
            }
            Ok(Message::Binary(_)) => {
                warn!(connection_id = %connection_id, "Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) => {
                debug!(connection_id = %connection_id, "Received ping");
            }
            Ok(Message::Pong(_)) => {
                debug!(connection_id = %connection_id, "Received pong");
            }
            Ok(Message::Close(_)) => {
                info!(connection_id = %connection_id, "Client initiated close");
                break;
            }
            Err(e) => {
                error!(connection_id = %connection_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    writer_handle.abort();
}

/// Apply a control message, returning a direct reply if one is due
fn handle_client_msg(state: &AppState, msg: ClientMsg) -> Option<ServerMsg> {
    match msg {
        ClientMsg::StartDuel { names } => match state.orchestrator.start(&names) {
            Ok(_) => None,
            Err(e) => Some(ServerMsg::Error {
                code: "invalid_roster".to_string(),
                message: e.to_string(),
            }),
        },
        ClientMsg::Reset => {
            state.orchestrator.reset();
            None
        }
        ClientMsg::Ping { t } => Some(ServerMsg::Pong { t }),
    }
}

/// Send a message over WebSocket
async fn send_msg(
    sink: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMsg,
) -> Result<(), String> {
    let json = serde_json::to_string(msg).map_err(|e| e.to_string())?;
    sink.send(Message::Text(json))
        .await
        .map_err(|e| e.to_string())
}
