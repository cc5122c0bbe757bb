//! Connection manager — owns the websocket lifecycle.
//!
//! One task dials the daemon, pumps inbound frames into the event channel
//! as `PlayerEvent`s, and writes queued outbound calls.  On any close or
//! error it emits `Disconnected` and re-dials forever; the consuming side
//! only ever sees the binary connectivity flag, never the cause.

use futures_util::{SinkExt, StreamExt};
use piano_proto::config::ServerConfig;
use piano_proto::rpc::{decode_server_message, Notification, RpcRequest, ServerMessage};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

/// Delay between reconnect attempts.  Attempts are uncapped.
pub const RECONNECT_DELAY: std::time::Duration = std::time::Duration::from_secs(3);

/// Run the connection loop until the event channel closes.
pub async fn run(
    server: ServerConfig,
    event_tx: mpsc::Sender<crate::store::PlayerEvent>,
    mut call_rx: mpsc::Receiver<RpcRequest>,
) {
    let url = server.ws_url();

    loop {
        // Calls issued while we have no socket fail silently at this layer.
        drop_pending_calls(&mut call_rx);

        let ws = match connect_async(url.as_str()).await {
            Ok((ws, _response)) => ws,
            Err(err) => {
                debug!("connect to {} failed: {}", url, err);
                tokio::time::sleep(RECONNECT_DELAY).await;
                continue;
            }
        };

        info!("connected to {}", url);
        if event_tx
            .send(crate::store::PlayerEvent::Connected)
            .await
            .is_err()
        {
            return;
        }

        let (mut write, mut read) = ws.split();

        loop {
            tokio::select! {
                frame = read.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            handle_text_frame(&text, &event_tx).await;
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            info!("server closed connection");
                            break;
                        }
                        Some(Ok(_)) => {
                            // Ping/pong handled by the transport; binary
                            // frames are not part of the protocol.
                        }
                        Some(Err(err)) => {
                            warn!("websocket read error: {}", err);
                            break;
                        }
                    }
                }
                request = call_rx.recv() => {
                    let Some(request) = request else { return };
                    match request.encode() {
                        Ok(text) => {
                            debug!("calling `{}` (id {})", request.method, request.id);
                            if let Err(err) = write.send(Message::Text(text)).await {
                                warn!("websocket send failed: {}", err);
                                break;
                            }
                        }
                        Err(err) => warn!("failed to encode `{}`: {}", request.method, err),
                    }
                }
            }
        }

        if event_tx
            .send(crate::store::PlayerEvent::Disconnected)
            .await
            .is_err()
        {
            return;
        }
        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

async fn handle_text_frame(text: &str, event_tx: &mpsc::Sender<crate::store::PlayerEvent>) {
    match decode_server_message(text) {
        Ok(ServerMessage::Notification(Notification::UiEvent { command, state })) => {
            let _ = event_tx
                .send(crate::store::PlayerEvent::UiEvent { command, state })
                .await;
        }
        Ok(ServerMessage::Notification(Notification::PlayerState(state))) => {
            let _ = event_tx
                .send(crate::store::PlayerEvent::PlayerState(state))
                .await;
        }
        Ok(ServerMessage::Response { id }) => {
            // The client never consumes call results.
            debug!("response to call id {}", id);
        }
        Ok(ServerMessage::Unknown { method }) => {
            debug!("ignoring unknown notification `{}`", method);
        }
        Err(err) => {
            // One malformed frame must not take the connection down.
            warn!("dropping malformed frame: {}", err);
        }
    }
}

fn drop_pending_calls(call_rx: &mut mpsc::Receiver<RpcRequest>) {
    while let Ok(request) = call_rx.try_recv() {
        debug!("dropping `{}` call while disconnected", request.method);
    }
}
