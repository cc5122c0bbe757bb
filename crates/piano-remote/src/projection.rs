//! Pure read functions over the CanonicalStore.
//!
//! Every function here is total: raw UI fields arrive from the network with
//! no shape guarantee, so each selector degrades to a safe default (empty
//! string, empty list, NaN) instead of failing.  NaN is the legitimate
//! "unknown" sentinel for numeric fields and must be treated as
//! undisplayable by callers, never unwrapped.

use tracing::warn;

use crate::store::{CanonicalStore, ConnectionStatus};

/// Value at `key` iff it is present and is a string; `""` otherwise.
fn ui_string(store: &CanonicalStore, key: &str) -> String {
    match store.ui().get(key) {
        Some(serde_json::Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

/// Numeric field sourced from a string in the open mapping.
/// Absent, empty, or unparseable all yield NaN.
fn ui_number(store: &CanonicalStore, key: &str) -> f64 {
    let raw = ui_string(store, key);
    if raw.is_empty() {
        return f64::NAN;
    }
    raw.trim().parse().unwrap_or(f64::NAN)
}

pub fn title(store: &CanonicalStore) -> String {
    ui_string(store, "title")
}

pub fn artist(store: &CanonicalStore) -> String {
    ui_string(store, "artist")
}

pub fn album(store: &CanonicalStore) -> String {
    ui_string(store, "album")
}

pub fn station_name(store: &CanonicalStore) -> String {
    ui_string(store, "stationName")
}

pub fn cover_art_url(store: &CanonicalStore) -> String {
    ui_string(store, "coverArt")
}

pub fn rating(store: &CanonicalStore) -> f64 {
    ui_number(store, "rating")
}

/// Legacy duration sourced from the open mapping rather than the fixed
/// player record; pianobar reports it as a string.
pub fn song_duration_secs(store: &CanonicalStore) -> f64 {
    ui_number(store, "songDuration")
}

pub fn song_played_secs(store: &CanonicalStore) -> f64 {
    ui_number(store, "songPlayed")
}

/// The `stations` field as a list of names, validated all-or-nothing: any
/// non-string element invalidates the whole list so presentation never
/// renders a truncated list against a stale station index.
pub fn stations(store: &CanonicalStore) -> Vec<String> {
    let Some(value) = store.ui().get("stations") else {
        return Vec::new();
    };
    let Some(list) = value.as_array() else {
        warn!("`stations` field is not an array, ignoring it");
        return Vec::new();
    };
    let mut names = Vec::with_capacity(list.len());
    for entry in list {
        match entry.as_str() {
            Some(name) => names.push(name.to_string()),
            None => {
                warn!("non-string entry in `stations`, ignoring the whole list");
                return Vec::new();
            }
        }
    }
    names
}

/// Index of the currently tuned station within the validated station list,
/// matched by name.  None when the list is invalid or the name is unknown.
pub fn current_station_idx(store: &CanonicalStore) -> Option<usize> {
    let name = station_name(store);
    if name.is_empty() {
        return None;
    }
    stations(store).iter().position(|s| *s == name)
}

pub fn paused(store: &CanonicalStore) -> bool {
    store.player().paused
}

pub fn song_time_played_secs(store: &CanonicalStore) -> u64 {
    store.player().song_time_played
}

pub fn song_time_total_secs(store: &CanonicalStore) -> u64 {
    store.player().song_time_total
}

pub fn song_time_played_display(store: &CanonicalStore) -> String {
    format_track_time(store.player().song_time_played)
}

pub fn song_time_total_display(store: &CanonicalStore) -> String {
    format_track_time(store.player().song_time_total)
}

pub fn connected(store: &CanonicalStore) -> bool {
    store.connection() == ConnectionStatus::Connected
}

/// `M:SS` — minutes unpadded, seconds zero-padded to two digits.
pub fn format_track_time(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PlayerEvent;
    use piano_proto::rpc::{PlayerState, UiState};
    use serde_json::{json, Value};

    fn store_with_ui(pairs: &[(&str, Value)]) -> CanonicalStore {
        let mut state = UiState::new();
        for (k, v) in pairs {
            state.insert((*k).to_string(), v.clone());
        }
        let mut store = CanonicalStore::new();
        store.apply(PlayerEvent::UiEvent {
            command: "songstart".to_string(),
            state,
        });
        store
    }

    #[test]
    fn test_string_selectors_total_over_all_value_shapes() {
        // String value passes through; every other shape degrades to "".
        let cases = [
            (json!("Steely Dan"), "Steely Dan"),
            (json!(42), ""),
            (json!({"nested": true}), ""),
            (json!(["a", "b"]), ""),
            (Value::Null, ""),
        ];
        for (value, expected) in cases {
            let store = store_with_ui(&[("artist", value)]);
            assert_eq!(artist(&store), expected);
        }
        // Absent key.
        assert_eq!(artist(&CanonicalStore::new()), "");
    }

    #[test]
    fn test_cover_art_reads_cover_art_key() {
        let store = store_with_ui(&[("coverArt", json!("http://x/cover.jpg"))]);
        assert_eq!(cover_art_url(&store), "http://x/cover.jpg");
    }

    #[test]
    fn test_rating_coercion() {
        let store = store_with_ui(&[("rating", json!("5"))]);
        assert_eq!(rating(&store), 5.0);

        assert!(rating(&CanonicalStore::new()).is_nan());

        let store = store_with_ui(&[("rating", json!("not a number"))]);
        assert!(rating(&store).is_nan());
    }

    #[test]
    fn test_legacy_durations_from_open_mapping() {
        let store = store_with_ui(&[
            ("songDuration", json!("321")),
            ("songPlayed", json!("12")),
        ]);
        assert_eq!(song_duration_secs(&store), 321.0);
        assert_eq!(song_played_secs(&store), 12.0);
    }

    #[test]
    fn test_stations_all_strings_preserved_in_order() {
        let store = store_with_ui(&[("stations", json!(["QuickMix", "Jazz", "Ambient"]))]);
        assert_eq!(stations(&store), vec!["QuickMix", "Jazz", "Ambient"]);
    }

    #[test]
    fn test_stations_all_or_nothing() {
        let store = store_with_ui(&[("stations", json!(["QuickMix", 3, "Ambient"]))]);
        assert_eq!(stations(&store), Vec::<String>::new());

        let store = store_with_ui(&[("stations", json!("not a list"))]);
        assert_eq!(stations(&store), Vec::<String>::new());

        assert_eq!(stations(&CanonicalStore::new()), Vec::<String>::new());
    }

    #[test]
    fn test_current_station_idx() {
        let store = store_with_ui(&[
            ("stations", json!(["QuickMix", "Jazz"])),
            ("stationName", json!("Jazz")),
        ]);
        assert_eq!(current_station_idx(&store), Some(1));

        let store = store_with_ui(&[("stations", json!(["QuickMix", "Jazz"]))]);
        assert_eq!(current_station_idx(&store), None);
    }

    #[test]
    fn test_player_selectors() {
        let mut store = CanonicalStore::new();
        store.apply(PlayerEvent::PlayerState(PlayerState {
            paused: false,
            song_time_played: 125,
            song_time_total: 321,
        }));
        assert!(!paused(&store));
        assert_eq!(song_time_played_secs(&store), 125);
        assert_eq!(song_time_played_display(&store), "2:05");
        assert_eq!(song_time_total_display(&store), "5:21");
    }

    #[test]
    fn test_format_track_time() {
        assert_eq!(format_track_time(0), "0:00");
        assert_eq!(format_track_time(59), "0:59");
        assert_eq!(format_track_time(60), "1:00");
        assert_eq!(format_track_time(125), "2:05");
    }

    #[test]
    fn test_connected_selector() {
        let mut store = CanonicalStore::new();
        assert!(!connected(&store));
        store.apply(PlayerEvent::Connected);
        assert!(connected(&store));
    }
}
