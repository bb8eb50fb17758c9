//! Playlist persistence
//!
//! The playlist and current index are written as strings to a key/value
//! store (`localStorage` in the browser). Ephemeral sources are written as
//! `null` and dropped again on restore, since their handles die with the page.

use crate::config::StorageKeys;
use crate::error::{PlaybackError, Result};
use crate::types::{CreateTrack, Track, TrackSource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// String key/value durable store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store (non-persistent hosts, tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Persisted track record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTrack {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album_art: Option<String>,
    #[serde(default)]
    pub saved: bool,
    /// `None` when the source was ephemeral
    #[serde(default)]
    pub src: Option<String>,
}

impl From<&Track> for StoredTrack {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id.clone(),
            title: Some(track.title.clone()),
            artist: Some(track.artist.clone()),
            album_art: Some(track.album_art.clone()),
            saved: track.saved,
            src: track.source.durable_url().map(str::to_string),
        }
    }
}

impl StoredTrack {
    /// Rebuild a playable track; records without a source are unusable
    pub fn into_track(self) -> Option<Track> {
        let src = self.src?;
        let source = TrackSource::from_url(src);
        if source.is_ephemeral() {
            return None;
        }

        let create = CreateTrack {
            id: self.id,
            title: self.title,
            artist: self.artist,
            album_art: self.album_art,
            saved: self.saved,
            source,
        };
        Some(create.into())
    }
}

/// Playlist state recovered at startup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoredPlaylist {
    pub tracks: Vec<Track>,
    /// Always a valid index into `tracks` (0 when empty)
    pub current_index: usize,
    /// Records dropped because their source did not survive
    pub dropped: usize,
}

/// Serializes the playlist into a [`KeyValueStore`]
pub struct PlaylistStore {
    backend: Box<dyn KeyValueStore>,
    keys: StorageKeys,
}

impl PlaylistStore {
    pub fn new(backend: Box<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self { backend, keys }
    }

    /// Write the playlist and current index
    pub fn save(&mut self, tracks: &[Track], current_index: usize) -> Result<()> {
        let records: Vec<StoredTrack> = tracks.iter().map(StoredTrack::from).collect();
        let json = serde_json::to_string(&records)?;

        self.backend.set(&self.keys.playlist_key, &json)?;
        self.backend
            .set(&self.keys.current_index_key, &current_index.to_string())?;
        Ok(())
    }

    /// Read back the playlist, dropping tracks whose source did not persist
    ///
    /// The saved index counts the records as written, so it is mapped onto
    /// the surviving tracks: a dropped current track hands over to the next
    /// survivor, or to 0 when none follows. A missing playlist is not an
    /// error; malformed data is.
    pub fn load(&self) -> Result<RestoredPlaylist> {
        let Some(json) = self.backend.get(&self.keys.playlist_key)? else {
            return Ok(RestoredPlaylist::default());
        };

        let records: Vec<StoredTrack> = serde_json::from_str(&json)?;
        let total = records.len();

        // A bad index only loses the position, never the playlist
        let saved_index = self
            .backend
            .get(&self.keys.current_index_key)
            .ok()
            .flatten()
            .and_then(|raw| raw.trim().parse::<usize>().ok());

        let mut tracks = Vec::with_capacity(total);
        let mut current_index = None;
        for (position, record) in records.into_iter().enumerate() {
            let Some(track) = record.into_track() else {
                continue;
            };
            if current_index.is_none() && saved_index.is_some_and(|saved| position >= saved) {
                current_index = Some(tracks.len());
            }
            tracks.push(track);
        }
        let dropped = total - tracks.len();

        Ok(RestoredPlaylist {
            tracks,
            current_index: current_index.unwrap_or(0),
            dropped,
        })
    }
}

impl std::fmt::Debug for PlaylistStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaylistStore")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

/// Store that fails every call, for exercising degraded paths
#[cfg(test)]
pub(crate) struct FailingStore;

#[cfg(test)]
impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(PlaybackError::store("storage unavailable"))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
        Err(PlaybackError::store("quota exceeded"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str, src: &str) -> Track {
        CreateTrack::new(id, TrackSource::from_url(src))
            .title(format!("Title {}", id))
            .artist("Artist")
            .into()
    }

    fn store_with(entries: &[(&str, &str)]) -> PlaylistStore {
        let mut backend = MemoryStore::new();
        for (key, value) in entries {
            backend.set(key, value).unwrap();
        }
        PlaylistStore::new(Box::new(backend), StorageKeys::default())
    }

    #[test]
    fn stored_record_nulls_ephemeral_source() {
        let record = StoredTrack::from(&track("a", "blob:https://x/1"));
        assert_eq!(record.src, None);

        let json = serde_json::to_value(&record).unwrap();
        assert!(json["src"].is_null());
        assert_eq!(json["albumArt"], record.album_art.clone().unwrap());
    }

    #[test]
    fn round_trip_keeps_durable_tracks_only() {
        let mut store = store_with(&[]);
        let mut durable = track("a", "https://x/a.mp3");
        durable.saved = true;
        let ephemeral = track("b", "blob:https://x/2");

        store.save(&[durable.clone(), ephemeral], 1).unwrap();
        let restored = store.load().unwrap();

        assert_eq!(restored.tracks, vec![durable]);
        assert_eq!(restored.dropped, 1);
        // Current track was dropped and nothing follows it
        assert_eq!(restored.current_index, 0);
    }

    #[test]
    fn saved_index_follows_current_track_past_dropped_records() {
        let mut store = store_with(&[]);
        let tracks = vec![
            track("u", "blob:https://x/1"),
            track("a", "https://x/a.mp3"),
            track("b", "https://x/b.mp3"),
        ];

        store.save(&tracks, 1).unwrap();
        let restored = store.load().unwrap();

        assert_eq!(restored.tracks.len(), 2);
        assert_eq!(restored.tracks[restored.current_index].id, "a");
    }

    #[test]
    fn dropped_current_track_hands_over_to_next_survivor() {
        let mut store = store_with(&[]);
        let tracks = vec![
            track("a", "https://x/a.mp3"),
            track("u", "blob:https://x/1"),
            track("b", "https://x/b.mp3"),
        ];

        store.save(&tracks, 1).unwrap();
        let restored = store.load().unwrap();

        assert_eq!(restored.tracks[restored.current_index].id, "b");
    }

    #[test]
    fn out_of_range_index_falls_back_to_zero() {
        let json = r#"[{"id":"1","src":"https://x/1.mp3"},{"id":"2","src":"https://x/2.mp3"}]"#;
        let store = store_with(&[("playlist", json), ("currentIndex", "5")]);
        assert_eq!(store.load().unwrap().current_index, 0);
    }

    #[test]
    fn missing_data_is_empty() {
        let restored = store_with(&[]).load().unwrap();
        assert!(restored.tracks.is_empty());
        assert_eq!(restored.current_index, 0);
    }

    #[test]
    fn malformed_playlist_is_an_error() {
        let store = store_with(&[("playlist", "{not json")]);
        assert!(matches!(
            store.load(),
            Err(PlaybackError::Serialization(_))
        ));
    }

    #[test]
    fn restores_valid_index() {
        let json = r#"[
            {"id":"1","title":"One","artist":"A","albumArt":"x.png","saved":false,"src":"https://x/1.mp3"},
            {"id":"2","title":"Two","artist":"B","albumArt":"y.png","saved":true,"src":"https://x/2.mp3"}
        ]"#;
        let store = store_with(&[("playlist", json), ("currentIndex", "1")]);

        let restored = store.load().unwrap();
        assert_eq!(restored.tracks.len(), 2);
        assert_eq!(restored.current_index, 1);
        assert!(restored.tracks[1].saved);
    }

    #[test]
    fn garbage_index_falls_back_to_zero() {
        let json = r#"[{"id":"1","src":"https://x/1.mp3"}]"#;
        let store = store_with(&[("playlist", json), ("currentIndex", "seven")]);

        let restored = store.load().unwrap();
        assert_eq!(restored.current_index, 0);
        // Sparse records are normalized
        assert_eq!(restored.tracks[0].title, "Unknown Title");
        assert_eq!(restored.tracks[0].artist, "Unknown Artist");
    }

    #[test]
    fn stored_blob_url_is_never_restored() {
        let json = r#"[{"id":"1","src":"blob:https://x/1"}]"#;
        let restored = store_with(&[("playlist", json)]).load().unwrap();
        assert!(restored.tracks.is_empty());
        assert_eq!(restored.dropped, 1);
    }

    #[test]
    fn backend_failures_surface_as_errors() {
        let mut store = PlaylistStore::new(Box::new(FailingStore), StorageKeys::default());
        assert!(matches!(store.load(), Err(PlaybackError::Store(_))));
        assert!(matches!(
            store.save(&[track("a", "https://x/a.mp3")], 0),
            Err(PlaybackError::Store(_))
        ));
    }
}
