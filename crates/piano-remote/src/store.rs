//! CanonicalStore — the single in-process snapshot of daemon truth.
//!
//! Exactly one task (the reconcile loop) applies events; everything else
//! reads through the projection functions.  Because writer and readers run
//! on the same loop, a reader can never observe a half-applied update.

use piano_proto::rpc::{PlayerState, UiState};

/// Binary connectivity flag.  No "connecting" state is modeled — the only
/// question the store answers is "can the snapshot be trusted right now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Disconnected,
}

/// All inputs into the reconcile loop, in arrival order on one channel.
/// Carrying connectivity transitions on the same channel as pushes keeps
/// ordering between them explicit.
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// Full UI-state snapshot from pianobar's event hook.
    UiEvent { command: String, state: UiState },
    /// Fixed-shape playback record.
    PlayerState(PlayerState),
    /// Websocket opened.
    Connected,
    /// Websocket closed or errored.
    Disconnected,
}

#[derive(Debug, Clone, Default)]
pub struct CanonicalStore {
    ui: UiState,
    player: PlayerState,
    connection: ConnectionStatus,
}

impl CanonicalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the store.  Snapshots are replaced wholesale,
    /// never merged, so a stale key from an earlier push cannot survive
    /// into a newer one.  Replacement is inherently idempotent; there are
    /// no sequence numbers and the last write wins.
    pub fn apply(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::UiEvent { state, .. } => self.ui = state,
            PlayerEvent::PlayerState(state) => self.player = state,
            PlayerEvent::Connected => self.connection = ConnectionStatus::Connected,
            PlayerEvent::Disconnected => self.connection = ConnectionStatus::Disconnected,
        }
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.connection
    }
}
