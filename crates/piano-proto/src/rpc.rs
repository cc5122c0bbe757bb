use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Open mapping pushed wholesale by the daemon on every `ui_event`.
/// Values are whatever pianobar's event hook produced — no shape guarantee.
pub type UiState = serde_json::Map<String, Value>;

/// Fixed-shape playback record pushed on every `player_state` notification.
///
/// The daemon promises `song_time_played <= song_time_total`, but the client
/// does not enforce it — the two can disagree transiently during a track
/// change, and display code must tolerate that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub paused: bool,
    pub song_time_played: u64,
    pub song_time_total: u64,
}

impl Default for PlayerState {
    fn default() -> Self {
        // Matches the daemon's initial broadcast: paused, nothing played.
        Self {
            paused: true,
            song_time_played: 0,
            song_time_total: 0,
        }
    }
}

/// Decoded application-level push from the daemon.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    UiEvent { command: String, state: UiState },
    PlayerState(PlayerState),
}

/// Any inbound JSON-RPC frame: a push notification, a response to one of our
/// own calls, or a notification we don't know.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    Notification(Notification),
    Response { id: u64 },
    Unknown { method: String },
}

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid JSON frame: {0}")]
    Json(#[from] serde_json::Error),
    #[error("frame is not a JSON object")]
    NotAnObject,
    #[error("notification frame has no method")]
    MissingMethod,
    #[error("bad params for `{method}`: {source}")]
    BadParams {
        method: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct UiEventParams {
    command: String,
    state: UiState,
}

#[derive(Debug, Deserialize)]
struct PlayerStateParams {
    state: PlayerState,
}

/// Decode one inbound text frame.
///
/// Frames carrying an `id` are responses to our fire-and-forget calls; we
/// only surface the id so the connection can log it.  Frames without an `id`
/// are notifications, dispatched by method name.
pub fn decode_server_message(text: &str) -> Result<ServerMessage, RpcError> {
    let value: Value = serde_json::from_str(text)?;
    let obj = value.as_object().ok_or(RpcError::NotAnObject)?;

    if obj.contains_key("id") {
        let id = obj.get("id").and_then(Value::as_u64).unwrap_or(0);
        return Ok(ServerMessage::Response { id });
    }

    let method = obj
        .get("method")
        .and_then(Value::as_str)
        .ok_or(RpcError::MissingMethod)?;
    let params = obj.get("params").cloned().unwrap_or(Value::Null);

    match method {
        "ui_event" => {
            let p: UiEventParams =
                serde_json::from_value(params).map_err(|source| RpcError::BadParams {
                    method: method.to_string(),
                    source,
                })?;
            Ok(ServerMessage::Notification(Notification::UiEvent {
                command: p.command,
                state: p.state,
            }))
        }
        "player_state" => {
            let p: PlayerStateParams =
                serde_json::from_value(params).map_err(|source| RpcError::BadParams {
                    method: method.to_string(),
                    source,
                })?;
            Ok(ServerMessage::Notification(Notification::PlayerState(
                p.state,
            )))
        }
        other => Ok(ServerMessage::Unknown {
            method: other.to_string(),
        }),
    }
}

/// Outbound JSON-RPC request.  The daemon sends a response, but this client
/// never consumes it — success shows up indirectly as a later state push.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest {
    jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RpcRequest {
    pub fn new(id: u64, method: &'static str, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
