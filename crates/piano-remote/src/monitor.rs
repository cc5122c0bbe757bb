//! Reconcile loop — the one writer of the CanonicalStore.
//!
//! Consumes `PlayerEvent`s strictly in arrival order and, after each
//! mutation, reports observable changes through the projection layer.  This
//! is the headless stand-in for a presentation layer: every derived value
//! the projections expose is read here.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::projection;
use crate::store::{CanonicalStore, PlayerEvent};

#[derive(Default)]
pub struct Monitor {
    store: CanonicalStore,
    last_now_playing: String,
    last_connected: bool,
}

impl Monitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns when the event channel closes (connection task exited).
    pub async fn run(mut self, mut event_rx: mpsc::Receiver<PlayerEvent>) {
        while let Some(event) = event_rx.recv().await {
            if let PlayerEvent::UiEvent { command, .. } = &event {
                debug!("ui_event `{}`", command);
            }
            self.store.apply(event);
            self.report();
        }
        info!("event channel closed, monitor exiting");
    }

    fn report(&mut self) {
        let connected = projection::connected(&self.store);
        if connected != self.last_connected {
            self.last_connected = connected;
            if connected {
                info!("daemon reachable");
            } else {
                warn!("daemon unreachable, snapshot may be stale");
            }
        }

        let line = self.now_playing_line();
        if line != self.last_now_playing {
            info!("now playing: {}", line);
            self.last_now_playing = line;
        }
    }

    /// `station — artist — title [played/total]`, omitting empty parts.
    fn now_playing_line(&self) -> String {
        let store = &self.store;
        let mut parts: Vec<String> = [
            projection::station_name(store),
            projection::artist(store),
            projection::title(store),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
        if parts.is_empty() {
            parts.push("(nothing)".to_string());
        }

        let state = if projection::paused(store) { "paused" } else { "playing" };
        format!(
            "{} [{} {}/{}]",
            parts.join(" — "),
            state,
            projection::song_time_played_display(store),
            projection::song_time_total_display(store),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use piano_proto::rpc::{PlayerState, UiState};
    use serde_json::json;

    #[test]
    fn test_now_playing_line_skips_empty_fields() {
        let mut monitor = Monitor::new();
        let mut state = UiState::new();
        state.insert("title".to_string(), json!("Aja"));
        state.insert("artist".to_string(), json!("Steely Dan"));
        monitor.store.apply(PlayerEvent::UiEvent {
            command: "songstart".to_string(),
            state,
        });
        monitor.store.apply(PlayerEvent::PlayerState(PlayerState {
            paused: false,
            song_time_played: 65,
            song_time_total: 125,
        }));
        assert_eq!(
            monitor.now_playing_line(),
            "Steely Dan — Aja [playing 1:05/2:05]"
        );
    }

    #[test]
    fn test_now_playing_line_before_first_push() {
        let monitor = Monitor::new();
        assert_eq!(monitor.now_playing_line(), "(nothing) [paused 0:00/0:00]");
    }
}
