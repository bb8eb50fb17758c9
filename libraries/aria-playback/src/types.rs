//! Core types for playlist and playback management

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Title shown when a track carries none
pub const DEFAULT_TITLE: &str = "Unknown Title";

/// Artist shown when a track carries none
pub const DEFAULT_ARTIST: &str = "Unknown Artist";

/// Album art used for tracks without artwork
pub const DEFAULT_ALBUM_ART: &str = "https://via.placeholder.com/200x200/333333/ffffff?text=♪";

/// Album art shown while the playlist is empty
pub const EMPTY_ALBUM_ART: &str = "https://via.placeholder.com/200x200/000000/ffffff?text=♪";

/// URL scheme of session-local object URLs
const EPHEMERAL_SCHEME: &str = "blob:";

/// Reference to playable audio data
///
/// Ephemeral handles (object URLs minted for an imported file) are only valid
/// for the lifetime of the current page and must be released explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "url", rename_all = "lowercase")]
pub enum TrackSource {
    /// URL that survives a restart
    Durable(String),

    /// Session-local handle (e.g. `blob:` URL)
    Ephemeral(String),
}

impl TrackSource {
    /// Classify a raw source reference by its scheme
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        if url.starts_with(EPHEMERAL_SCHEME) {
            Self::Ephemeral(url)
        } else {
            Self::Durable(url)
        }
    }

    /// Raw reference handed to the media device
    pub fn as_str(&self) -> &str {
        match self {
            Self::Durable(url) | Self::Ephemeral(url) => url,
        }
    }

    pub fn is_ephemeral(&self) -> bool {
        matches!(self, Self::Ephemeral(_))
    }

    /// The reference worth persisting, if any
    pub fn durable_url(&self) -> Option<&str> {
        match self {
            Self::Durable(url) => Some(url),
            Self::Ephemeral(_) => None,
        }
    }
}

/// Track information for playlist management
///
/// All display fields are fully populated; defaults are applied once when
/// the track is built from a [`CreateTrack`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier, generated at import time
    pub id: String,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album art reference
    pub album_art: String,

    /// User-toggled "saved" flag
    pub saved: bool,

    /// Playable source
    pub source: TrackSource,
}

/// Raw track fields as they arrive from an import or from storage
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTrack {
    pub id: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album_art: Option<String>,
    pub saved: bool,
    pub source: TrackSource,
}

impl CreateTrack {
    pub fn new(id: impl Into<String>, source: TrackSource) -> Self {
        Self {
            id: id.into(),
            title: None,
            artist: None,
            album_art: None,
            saved: false,
            source,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn album_art(mut self, album_art: impl Into<String>) -> Self {
        self.album_art = Some(album_art.into());
        self
    }

    pub fn saved(mut self, saved: bool) -> Self {
        self.saved = saved;
        self
    }
}

impl From<CreateTrack> for Track {
    fn from(create: CreateTrack) -> Self {
        Self {
            id: create.id,
            title: non_empty_or(create.title, DEFAULT_TITLE),
            artist: non_empty_or(create.artist, DEFAULT_ARTIST),
            album_art: non_empty_or(create.album_art, DEFAULT_ALBUM_ART),
            saved: create.saved,
            source: create.source,
        }
    }
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Generate a collision-resistant track id from a timestamp and random suffix
///
/// Format: `track-<millis>-<9 base-36 chars>`
pub fn generate_track_id(now_ms: f64) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();

    format!("track-{}-{}", now_ms.max(0.0) as u64, suffix)
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// No playable track attached to the device
    Stopped,

    /// Track loaded, not playing
    Paused,

    /// Currently playing
    Playing,
}

/// Behaviour when advancing past the last track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop at the end of the playlist
    Off,

    /// Wrap around to the first track
    All,
}

impl RepeatMode {
    pub fn from_repeat_all(repeat_all: bool) -> Self {
        if repeat_all {
            Self::All
        } else {
            Self::Off
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::Off,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_classification() {
        let blob = TrackSource::from_url("blob:https://example.com/1234");
        assert!(blob.is_ephemeral());
        assert_eq!(blob.durable_url(), None);

        let remote = TrackSource::from_url("https://example.com/song.mp3");
        assert!(!remote.is_ephemeral());
        assert_eq!(remote.durable_url(), Some("https://example.com/song.mp3"));
        assert_eq!(remote.as_str(), "https://example.com/song.mp3");
    }

    #[test]
    fn create_track_applies_defaults() {
        let track: Track = CreateTrack::new("t1", TrackSource::from_url("a.mp3"))
            .title("   ")
            .into();

        assert_eq!(track.title, DEFAULT_TITLE);
        assert_eq!(track.artist, DEFAULT_ARTIST);
        assert_eq!(track.album_art, DEFAULT_ALBUM_ART);
        assert!(!track.saved);
    }

    #[test]
    fn create_track_keeps_given_fields() {
        let track: Track = CreateTrack::new("t1", TrackSource::from_url("a.mp3"))
            .title("Song")
            .artist("Band")
            .album_art("cover.png")
            .saved(true)
            .into();

        assert_eq!(track.title, "Song");
        assert_eq!(track.artist, "Band");
        assert_eq!(track.album_art, "cover.png");
        assert!(track.saved);
    }

    #[test]
    fn generated_ids_have_expected_shape() {
        let id = generate_track_id(1_700_000_000_123.0);
        let parts: Vec<&str> = id.split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "track");
        assert_eq!(parts[1], "1700000000123");
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(generate_track_id(1.0), generate_track_id(1.0));
    }

    #[test]
    fn repeat_toggle() {
        assert_eq!(RepeatMode::All.toggled(), RepeatMode::Off);
        assert_eq!(RepeatMode::Off.toggled(), RepeatMode::All);
        assert_eq!(RepeatMode::from_repeat_all(true), RepeatMode::All);
    }
}
