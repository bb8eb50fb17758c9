//! Aria Player - Playback Management
//!
//! Platform-agnostic playlist and playback state machine for Aria Player.
//!
//! This crate provides:
//! - Playlist management (import, remove, save flag) with persistence
//! - Play/pause, previous/next with repeat-all / repeat-off
//! - Seek and drag-to-scrub on the progress bar
//! - Volume control and keyboard shortcuts
//! - Display state (now-playing panel, playlist rows) as snapshots and events
//!
//! # Architecture
//!
//! `aria-playback` owns no platform resources. Everything it talks to is a
//! trait supplied by the host:
//! - [`MediaDevice`]: loads and plays sources (an `<audio>` element in the browser)
//! - [`KeyValueStore`]: durable string storage (`localStorage`)
//! - [`Clock`]: milliseconds for throttling and deferred auto-play
//!
//! The host feeds user actions and [`DeviceEvent`]s into one
//! [`PlaybackManager`] and renders the [`PlayerEvent`]s it drains.
//! With the `wasm` feature the crate ships ready-made browser bindings.
//!
//! # Example
//!
//! ```rust
//! use aria_playback::{
//!     CreateTrack, DeviceEvent, ManualClock, MediaDevice, MemoryStore, PlayOutcome,
//!     PlaybackManager, PlayerConfig, Result, TrackSource,
//! };
//!
//! // Implement MediaDevice for your platform
//! struct SilentDevice;
//!
//! impl MediaDevice for SilentDevice {
//!     fn load(&mut self, _source: &TrackSource) -> Result<()> { Ok(()) }
//!     fn play(&mut self) -> PlayOutcome { PlayOutcome::Started }
//!     fn pause(&mut self) {}
//!     fn current_time(&self) -> f64 { 0.0 }
//!     fn set_current_time(&mut self, _seconds: f64) {}
//!     fn duration(&self) -> Option<f64> { Some(180.0) }
//!     fn set_volume(&mut self, _gain: f64) {}
//! }
//!
//! let mut player = PlaybackManager::new(
//!     PlayerConfig::default(),
//!     Box::new(SilentDevice),
//!     Box::new(MemoryStore::new()),
//!     Box::new(ManualClock::new(0.0)),
//! );
//!
//! player.add_track(
//!     CreateTrack::new("track-1", TrackSource::from_url("https://example.com/song.mp3"))
//!         .title("My Song")
//!         .into(),
//! );
//! player.toggle_play_pause();
//! assert!(player.is_playing());
//!
//! // Device reports the end of the track: the player advances
//! player.handle_device_event(DeviceEvent::Ended);
//!
//! for event in player.drain_events() {
//!     // render
//!     let _ = event;
//! }
//! ```

mod clock;
mod config;
mod device;
mod display;
mod error;
mod events;
mod import;
mod input;
mod manager;
mod playlist;
mod seek;
mod store;
mod throttle;
mod time;
pub mod types;
mod volume;

pub mod wasm;

// Public exports
#[cfg(not(target_arch = "wasm32"))]
pub use clock::SystemClock;
pub use clock::{Clock, ManualClock};
pub use config::{PlayerConfig, StorageKeys};
pub use device::{MediaDevice, PlayOutcome};
pub use display::{DisplayStatus, NowPlaying, PlaylistItemView};
pub use error::{PlaybackError, Result};
pub use events::{DeviceEvent, PlayerEvent};
pub use import::{title_from_file_name, FileCandidate, ImportRejection, ImportReport};
pub use input::{map_key, KeyCode, KeyPress, PlayerAction};
pub use manager::PlaybackManager;
pub use playlist::{Advance, Playlist, Removed};
pub use seek::{PointerPosition, SeekController, TrackGeometry};
pub use store::{KeyValueStore, MemoryStore, PlaylistStore, RestoredPlaylist, StoredTrack};
pub use time::format_time;
pub use types::{CreateTrack, PlaybackState, RepeatMode, Track, TrackSource};
pub use volume::Volume;
