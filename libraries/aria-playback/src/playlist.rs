//! Ordered track list with a current-track pointer
//!
//! Insertion order is playback order. Whenever the playlist is non-empty the
//! current index points at an existing track.

use crate::error::{PlaybackError, Result};
use crate::types::{RepeatMode, Track};

/// Result of asking for the next track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Move to this index
    To(usize),
    /// Already at the last track with repeat off
    EndOfPlaylist,
}

/// Outcome of a successful removal
#[derive(Debug, Clone, PartialEq)]
pub struct Removed {
    pub track: Track,
    /// The removed track was the current one; the new current must be loaded
    pub was_current: bool,
}

/// Track repository
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    current: usize,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from restored tracks, clamping the index into range
    pub fn from_tracks(tracks: Vec<Track>, current: usize) -> Self {
        let current = if current < tracks.len() { current } else { 0 };
        Self { tracks, current }
    }

    /// Append a track; returns true if it is the only track
    pub fn add(&mut self, track: Track) -> bool {
        self.tracks.push(track);
        self.tracks.len() == 1
    }

    /// Remove the track at `index`
    ///
    /// Refuses to remove the last remaining track. When a track before the
    /// current one is removed, the index shifts so the same track stays
    /// current. When the current track itself is removed, the index stays
    /// put (clamped to the new end) and `was_current` is set.
    pub fn remove_at(&mut self, index: usize) -> Result<Removed> {
        if self.tracks.len() <= 1 {
            return Err(PlaybackError::InvariantViolation(
                "Cannot remove the last track in the playlist".to_string(),
            ));
        }
        if index >= self.tracks.len() {
            return Err(PlaybackError::IndexOutOfBounds(index));
        }

        let track = self.tracks.remove(index);
        let was_current = index == self.current;

        if was_current {
            self.current = index.min(self.tracks.len() - 1);
        } else if index < self.current {
            self.current -= 1;
        }

        Ok(Removed { track, was_current })
    }

    /// Flip the saved flag; `None` if `index` is out of range
    pub fn toggle_saved(&mut self, index: usize) -> Option<bool> {
        let track = self.tracks.get_mut(index)?;
        track.saved = !track.saved;
        Some(track.saved)
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.current)
    }

    /// Make the track at `index` current and return it
    ///
    /// An index with no track leaves the pointer alone and returns `None`.
    pub fn select(&mut self, index: usize) -> Option<&Track> {
        let track = self.tracks.get(index)?;
        self.current = index;
        Some(track)
    }

    /// Index after the current one under `repeat`
    pub fn next_index(&self, repeat: RepeatMode) -> Option<Advance> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }

        let advance = match repeat {
            RepeatMode::All => Advance::To((self.current + 1) % len),
            RepeatMode::Off if self.current + 1 < len => Advance::To(self.current + 1),
            RepeatMode::Off => Advance::EndOfPlaylist,
        };
        Some(advance)
    }

    /// Index before the current one, always wrapping
    pub fn previous_index(&self) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        Some((self.current + len - 1) % len)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
