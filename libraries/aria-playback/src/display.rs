//! Now-playing panel state
//!
//! Everything the display surface renders for the current track lives here,
//! so it can be snapshotted and diffed independently of the device.

use crate::time::format_time;
use crate::types::{Track, DEFAULT_ALBUM_ART, EMPTY_ALBUM_ART};
use serde::{Deserialize, Serialize};

/// What the now-playing panel is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayStatus {
    /// No tracks to show
    Empty,
    /// A track is loaded
    Ready,
    /// The device refused the source
    LoadError,
    /// The device reported a playback/decoding error
    PlaybackError,
}

/// Snapshot of the now-playing panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    pub album_art: String,
    /// Elapsed time as `M:SS`
    pub elapsed: String,
    /// Duration as `M:SS`
    pub duration: String,
    /// Progress fraction in [0, 1]
    pub progress: f64,
    pub status: DisplayStatus,
}

impl NowPlaying {
    pub fn empty() -> Self {
        Self::with_text(
            "No songs in playlist",
            "Upload music to get started",
            EMPTY_ALBUM_ART,
            DisplayStatus::Empty,
        )
    }

    pub fn for_track(track: &Track) -> Self {
        Self::with_text(&track.title, &track.artist, &track.album_art, DisplayStatus::Ready)
    }

    pub fn load_error() -> Self {
        Self::with_text(
            "Error loading track",
            "Please try another file",
            DEFAULT_ALBUM_ART,
            DisplayStatus::LoadError,
        )
    }

    /// Switch to the device-error texts, keeping artwork and progress
    pub fn mark_playback_error(&mut self) {
        self.title = "Error playing audio".to_string();
        self.artist = "Please check the file format".to_string();
        self.status = DisplayStatus::PlaybackError;
    }

    /// Zero the progress bar, elapsed time and duration
    pub fn reset_progress(&mut self) {
        self.progress = 0.0;
        self.elapsed = format_time(0.0);
        self.duration = format_time(0.0);
    }

    pub fn set_progress(&mut self, elapsed_secs: f64, fraction: f64) {
        self.elapsed = format_time(elapsed_secs);
        self.progress = fraction.clamp(0.0, 1.0);
    }

    pub fn set_duration(&mut self, duration_secs: Option<f64>) {
        self.duration = format_time(duration_secs.unwrap_or(f64::NAN));
    }

    fn with_text(title: &str, artist: &str, album_art: &str, status: DisplayStatus) -> Self {
        Self {
            title: title.to_string(),
            artist: artist.to_string(),
            album_art: album_art.to_string(),
            elapsed: format_time(0.0),
            duration: format_time(0.0),
            progress: 0.0,
            status,
        }
    }
}

impl Default for NowPlaying {
    fn default() -> Self {
        Self::empty()
    }
}

/// One row of the playlist panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemView {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub active: bool,
    pub saved: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CreateTrack, TrackSource};

    #[test]
    fn empty_panel() {
        let panel = NowPlaying::empty();
        assert_eq!(panel.title, "No songs in playlist");
        assert_eq!(panel.artist, "Upload music to get started");
        assert_eq!(panel.album_art, EMPTY_ALBUM_ART);
        assert_eq!(panel.status, DisplayStatus::Empty);
        assert_eq!(panel.elapsed, "0:00");
    }

    #[test]
    fn track_panel_uses_track_fields() {
        let track: Track = CreateTrack::new("t", TrackSource::from_url("a.mp3"))
            .title("Song")
            .into();
        let panel = NowPlaying::for_track(&track);
        assert_eq!(panel.title, "Song");
        assert_eq!(panel.artist, "Unknown Artist");
        assert_eq!(panel.status, DisplayStatus::Ready);
    }

    #[test]
    fn playback_error_keeps_artwork() {
        let track: Track = CreateTrack::new("t", TrackSource::from_url("a.mp3"))
            .album_art("cover.png")
            .into();
        let mut panel = NowPlaying::for_track(&track);
        panel.mark_playback_error();

        assert_eq!(panel.title, "Error playing audio");
        assert_eq!(panel.album_art, "cover.png");
        assert_eq!(panel.status, DisplayStatus::PlaybackError);
    }

    #[test]
    fn progress_is_clamped_and_formatted() {
        let mut panel = NowPlaying::empty();
        panel.set_progress(75.4, 1.7);
        assert_eq!(panel.elapsed, "1:15");
        assert_eq!(panel.progress, 1.0);

        panel.set_duration(Some(200.0));
        assert_eq!(panel.duration, "3:20");
        panel.set_duration(None);
        assert_eq!(panel.duration, "0:00");

        panel.reset_progress();
        assert_eq!(panel.progress, 0.0);
        assert_eq!(panel.elapsed, "0:00");
    }
}
