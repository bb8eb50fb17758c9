//! Playback manager - core orchestration
//!
//! Owns the playlist, playback state and now-playing display, and drives the
//! media device, key/value store and clock collaborators. All input arrives
//! as plain method calls (user actions) or [`DeviceEvent`]s, and everything
//! runs to completion on the caller's thread.

use crate::{
    clock::Clock,
    config::PlayerConfig,
    device::{known_duration, MediaDevice, PlayOutcome},
    display::{NowPlaying, PlaylistItemView},
    error::{PlaybackError, Result},
    events::{DeviceEvent, PlayerEvent},
    import::{self, FileCandidate, ImportRejection, ImportReport},
    input::{map_key, KeyPress, PlayerAction},
    playlist::{Advance, Playlist},
    seek::{seek_target, PointerPosition, SeekController, TrackGeometry},
    store::{KeyValueStore, PlaylistStore, RestoredPlaylist},
    throttle::Throttle,
    types::{
        generate_track_id, CreateTrack, PlaybackState, RepeatMode, Track, TrackSource,
        DEFAULT_ALBUM_ART, DEFAULT_ARTIST,
    },
    volume::Volume,
};
use tracing::{debug, info, warn};

/// Play request deferred after an automatic advance
#[derive(Debug, Clone, Copy, PartialEq)]
struct DeferredPlay {
    /// Load generation the request belongs to
    generation: u64,
    due_ms: f64,
}

/// Central playback management
///
/// Orchestrates:
/// - Playlist (track repository) and current-track pointer
/// - Play/pause state and repeat mode
/// - Seek and drag on the progress bar
/// - Volume
/// - Persistence of the playlist after every mutation
/// - Deferred auto-play after advancing to the next track
pub struct PlaybackManager {
    // State
    state: PlaybackState,
    repeat: RepeatMode,
    playlist: Playlist,
    volume: Volume,
    seek: SeekController,
    now_playing: NowPlaying,

    // Collaborators
    device: Box<dyn MediaDevice>,
    store: PlaylistStore,
    clock: Box<dyn Clock>,

    config: PlayerConfig,
    progress_throttle: Throttle,

    // Bumped on every load; a deferred play from an older load is dropped
    load_generation: u64,
    deferred_play: Option<DeferredPlay>,

    // Event queue for the display surface
    pending_events: Vec<PlayerEvent>,
}

impl PlaybackManager {
    /// Create the player and restore the persisted playlist
    ///
    /// A missing or unreadable playlist starts the player empty. If tracks
    /// survive, the restored current track is loaded (paused).
    pub fn new(
        config: PlayerConfig,
        device: Box<dyn MediaDevice>,
        store: Box<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let store = PlaylistStore::new(store, config.storage.clone());

        let restored = store.load().unwrap_or_else(|e| {
            warn!("Could not load saved playlist: {}", e);
            RestoredPlaylist::default()
        });
        if restored.dropped > 0 {
            info!(
                dropped = restored.dropped,
                "Dropped saved tracks whose source did not survive the restart"
            );
        }
        info!(tracks = restored.tracks.len(), "Restored playlist");

        let mut manager = Self {
            state: PlaybackState::Stopped,
            repeat: RepeatMode::from_repeat_all(config.repeat_all),
            playlist: Playlist::from_tracks(restored.tracks, restored.current_index),
            volume: Volume::new(config.initial_volume),
            seek: SeekController::new(),
            now_playing: NowPlaying::empty(),
            device,
            store,
            clock,
            progress_throttle: Throttle::new(config.progress_interval_ms),
            config,
            load_generation: 0,
            deferred_play: None,
            pending_events: Vec::new(),
        };

        manager.set_volume(manager.config.initial_volume);

        if manager.playlist.is_empty() {
            manager.pending_events.push(PlayerEvent::DisplayChanged);
        } else {
            manager.load_track(manager.playlist.current_index());
        }

        manager
    }

    // ===== Playback Control =====

    /// Make the track at `index` current and attach it to the device
    ///
    /// Playback is paused and progress reset. An index with no track shows
    /// the empty panel and leaves the device alone. A source the device
    /// refuses shows the load-error panel; nothing is returned to the caller.
    pub fn load_track(&mut self, index: usize) {
        let Some(track) = self.playlist.select(index).cloned() else {
            debug!(index, "No track at index, showing empty state");
            self.now_playing = NowPlaying::empty();
            self.set_state(PlaybackState::Stopped);
            self.pending_events.push(PlayerEvent::DisplayChanged);
            return;
        };

        self.pause();
        self.load_generation += 1;

        match self.device.load(&track.source) {
            Ok(()) => {
                debug!(track_id = %track.id, index, "Loaded track");
                self.now_playing = NowPlaying::for_track(&track);
                self.set_state(PlaybackState::Paused);
            }
            Err(e) => {
                warn!("Failed to load track {}: {}", track.title, e);
                self.now_playing = NowPlaying::load_error();
                self.set_state(PlaybackState::Stopped);
            }
        }

        self.reset_progress();
        self.pending_events.push(PlayerEvent::TrackChanged {
            track_id: Some(track.id),
            index: Some(index),
        });
        self.pending_events.push(PlayerEvent::DisplayChanged);
        self.persist();
    }

    /// Request playback from the device
    ///
    /// A synchronous rejection is logged and leaves the player not playing.
    /// A pending request completes through `DeviceEvent::PlayResolved` or
    /// `DeviceEvent::PlayRejected`.
    pub fn play(&mut self) {
        self.deferred_play = None;
        match self.device.play() {
            PlayOutcome::Started => self.set_state(PlaybackState::Playing),
            PlayOutcome::Pending => debug!("Play request pending"),
            PlayOutcome::Rejected(reason) => self.play_rejected(&reason),
        }
    }

    /// Pause playback, cancelling any deferred auto-play
    pub fn pause(&mut self) {
        self.deferred_play = None;
        self.device.pause();
        self.mark_not_playing();
    }

    /// Play if paused, pause if playing; nothing happens on an empty playlist
    pub fn toggle_play_pause(&mut self) {
        if self.playlist.is_empty() {
            return;
        }

        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Go to the previous track, wrapping to the end regardless of repeat mode
    ///
    /// Playback resumes on the new track if the player was playing.
    pub fn previous_track(&mut self) {
        let Some(index) = self.playlist.previous_index() else {
            return;
        };

        let was_playing = self.is_playing();
        self.load_track(index);
        if was_playing {
            self.play();
        }
    }

    /// Advance to the next track
    ///
    /// With repeat off, advancing past the last track pauses and keeps the
    /// current index. If the player was playing, the new track starts after
    /// `autoplay_delay_ms` (see [`tick`](Self::tick)).
    pub fn next_track(&mut self) {
        let Some(advance) = self.playlist.next_index(self.repeat) else {
            return;
        };

        let was_playing = self.is_playing();
        match advance {
            Advance::EndOfPlaylist => {
                debug!("Reached end of playlist with repeat off");
                self.pause();
            }
            Advance::To(index) => {
                self.load_track(index);
                if was_playing {
                    self.schedule_play();
                }
            }
        }
    }

    /// Flip between repeat-all and repeat-off
    pub fn toggle_repeat(&mut self) {
        self.repeat = self.repeat.toggled();
        debug!(repeat = ?self.repeat, "Repeat mode changed");
        self.pending_events
            .push(PlayerEvent::RepeatChanged { repeat: self.repeat });
    }

    /// Fire due timers
    ///
    /// Hosts call this after the delay announced by
    /// `PlayerEvent::AutoplayScheduled` (calling early or often is harmless).
    pub fn tick(&mut self) {
        let Some(deferred) = self.deferred_play else {
            return;
        };
        if self.clock.now_ms() < deferred.due_ms {
            return;
        }

        self.deferred_play = None;
        if deferred.generation != self.load_generation {
            debug!("Dropping deferred play for a track that is no longer loaded");
            return;
        }
        self.play();
    }

    fn schedule_play(&mut self) {
        let delay_ms = self.config.autoplay_delay_ms;
        if delay_ms == 0 {
            self.play();
            return;
        }

        self.deferred_play = Some(DeferredPlay {
            generation: self.load_generation,
            due_ms: self.clock.now_ms() + f64::from(delay_ms),
        });
        self.pending_events
            .push(PlayerEvent::AutoplayScheduled { delay_ms });
    }

    // ===== Device Events =====

    /// Single entry point for everything the media device reports
    pub fn handle_device_event(&mut self, event: DeviceEvent) {
        match event {
            DeviceEvent::Ended => {
                debug!("Track ended");
                self.next_track();
            }
            DeviceEvent::Error(message) => {
                warn!("Audio error: {}", message);
                self.now_playing.mark_playback_error();
                self.set_state(PlaybackState::Stopped);
                self.pending_events.push(PlayerEvent::DisplayChanged);
            }
            DeviceEvent::LoadedMetadata => {
                let duration = known_duration(self.device.as_ref());
                self.now_playing.set_duration(duration);
                self.pending_events.push(PlayerEvent::DurationChanged {
                    duration_secs: duration,
                });
            }
            DeviceEvent::LoadStart => self.reset_progress(),
            DeviceEvent::TimeUpdate => {
                if self.progress_throttle.ready(self.clock.now_ms()) {
                    self.update_progress();
                }
            }
            DeviceEvent::PlayResolved => self.set_state(PlaybackState::Playing),
            DeviceEvent::PlayRejected(reason) => self.play_rejected(&reason),
        }
    }

    fn play_rejected(&mut self, reason: &str) {
        warn!("Playback failed: {}", reason);
        self.mark_not_playing();
    }

    // ===== Seek =====

    /// Update the progress track's bounding box
    pub fn set_track_geometry(&mut self, geometry: TrackGeometry) {
        self.seek.set_geometry(geometry);
    }

    /// One-shot seek to the pointer position; ignored until the duration is known
    pub fn seek_to(&mut self, pointer: &PointerPosition) {
        let Some(duration) = known_duration(self.device.as_ref()) else {
            debug!("Ignoring seek before metadata is loaded");
            return;
        };
        let Some(fraction) = self.seek.fraction(pointer) else {
            return;
        };

        self.device
            .set_current_time(seek_target(fraction, duration));
        self.update_progress();
    }

    /// Begin a drag on the progress bar and jump to the pointer
    pub fn start_drag(&mut self, pointer: &PointerPosition) {
        self.seek.start_drag();
        self.drag_to(pointer);
    }

    /// Follow the pointer during a drag, scrubbing the device as it moves
    pub fn drag_to(&mut self, pointer: &PointerPosition) {
        if !self.seek.is_dragging() {
            return;
        }
        let Some(duration) = known_duration(self.device.as_ref()) else {
            return;
        };
        let Some(fraction) = self.seek.fraction(pointer) else {
            return;
        };

        let target = seek_target(fraction, duration);
        self.now_playing.set_progress(target, fraction);
        self.device.set_current_time(target);
        self.pending_events.push(PlayerEvent::ProgressChanged {
            elapsed_secs: target,
            fraction,
        });
    }

    /// End the drag; device-driven progress updates resume
    pub fn stop_drag(&mut self) {
        self.seek.stop_drag();
    }

    /// Copy the device position into the display (skipped while dragging)
    fn update_progress(&mut self) {
        if self.seek.is_dragging() {
            return;
        }

        let current = self.device.current_time();
        let current = if current.is_finite() { current } else { 0.0 };
        let fraction = known_duration(self.device.as_ref())
            .map_or(self.now_playing.progress, |duration| {
                (current / duration).clamp(0.0, 1.0)
            });

        self.now_playing.set_progress(current, fraction);
        self.pending_events.push(PlayerEvent::ProgressChanged {
            elapsed_secs: current,
            fraction,
        });
    }

    fn reset_progress(&mut self) {
        self.now_playing.reset_progress();
        self.progress_throttle.reset();
        self.pending_events.push(PlayerEvent::ProgressChanged {
            elapsed_secs: 0.0,
            fraction: 0.0,
        });
        self.pending_events
            .push(PlayerEvent::DurationChanged { duration_secs: None });
    }

    // ===== Volume =====

    /// Set volume (0-100)
    pub fn set_volume(&mut self, level: u8) {
        self.volume.set_level(level);
        self.apply_volume();
    }

    /// Move the volume by `delta`, clamped to 0-100
    pub fn adjust_volume(&mut self, delta: i16) {
        self.volume.adjust(delta);
        self.apply_volume();
    }

    fn apply_volume(&mut self) {
        self.device.set_volume(self.volume.gain());
        self.pending_events.push(PlayerEvent::VolumeChanged {
            level: self.volume.level(),
        });
    }

    // ===== Input =====

    /// Apply a keyboard shortcut
    ///
    /// Returns true when the key is bound; the host must then suppress the
    /// key's default handling.
    pub fn handle_key(&mut self, key: &KeyPress) -> bool {
        match map_key(key) {
            Some(action) => {
                self.apply_action(action);
                true
            }
            None => false,
        }
    }

    pub fn apply_action(&mut self, action: PlayerAction) {
        let step = i16::from(self.config.volume_step);
        match action {
            PlayerAction::TogglePlayPause => self.toggle_play_pause(),
            PlayerAction::PreviousTrack => self.previous_track(),
            PlayerAction::NextTrack => self.next_track(),
            PlayerAction::VolumeUp => self.adjust_volume(step),
            PlayerAction::VolumeDown => self.adjust_volume(-step),
        }
    }

    // ===== Playlist Management =====

    /// Append a track; the first track of an empty playlist is loaded
    pub fn add_track(&mut self, track: Track) {
        debug!(track_id = %track.id, "Adding track");
        let first = self.playlist.add(track);
        self.emit_playlist_changed();

        if first {
            self.load_track(0);
        } else {
            self.persist();
        }
    }

    /// Import a batch of picked files
    ///
    /// Each accepted file is opened with `open` (which turns the host's file
    /// handle into a playable source) and appended as a track titled after
    /// the file name. Rejected files are reported individually; oversized
    /// files also raise a user notice.
    pub fn import_files<F, O>(&mut self, files: Vec<FileCandidate<F>>, mut open: O) -> ImportReport
    where
        O: FnMut(F) -> Result<TrackSource>,
    {
        let mut report = ImportReport::default();

        for candidate in files {
            if let Err(rejection) = import::validate(&candidate, self.config.max_import_bytes) {
                if let ImportRejection::TooLarge { .. } = rejection {
                    self.notice(format!(
                        "File \"{}\" is too large. Maximum size is {}.",
                        candidate.name,
                        self.config.max_import_label()
                    ));
                }
                debug!(file = %candidate.name, ?rejection, "Rejected file");
                report.rejected.push((candidate.name, rejection));
                continue;
            }

            let FileCandidate { name, file, .. } = candidate;
            match open(file) {
                Ok(source) => {
                    let id = generate_track_id(self.clock.now_ms());
                    let track = CreateTrack::new(id.clone(), source)
                        .title(import::title_from_file_name(&name))
                        .artist(DEFAULT_ARTIST)
                        .album_art(DEFAULT_ALBUM_ART)
                        .into();
                    self.add_track(track);
                    report.imported.push(id);
                }
                Err(e) => {
                    warn!("Failed to load file {}: {}", name, e);
                    report.rejected.push((
                        name,
                        ImportRejection::Unreadable {
                            message: e.to_string(),
                        },
                    ));
                }
            }
        }

        info!(
            imported = report.imported.len(),
            rejected = report.rejected.len(),
            "Import finished"
        );
        report
    }

    /// Remove the track at `index`
    ///
    /// The last remaining track cannot be removed: a notice is raised and
    /// `InvariantViolation` returned with nothing changed. Asking the user
    /// for confirmation is the caller's job. Ephemeral sources are released.
    pub fn remove_track(&mut self, index: usize) -> Result<Track> {
        let removed = match self.playlist.remove_at(index) {
            Ok(removed) => removed,
            Err(e) => {
                if let PlaybackError::InvariantViolation(message) = &e {
                    self.notice(message.clone());
                }
                return Err(e);
            }
        };

        if removed.track.source.is_ephemeral() {
            self.device.release(&removed.track.source);
        }
        debug!(track_id = %removed.track.id, index, "Removed track");
        self.emit_playlist_changed();

        if removed.was_current {
            self.load_track(self.playlist.current_index());
        } else {
            self.persist();
        }

        Ok(removed.track)
    }

    /// Remove a track by id
    pub fn remove_track_by_id(&mut self, id: &str) -> Result<Track> {
        let index = self.index_of(id)?;
        self.remove_track(index)
    }

    /// Flip the saved flag of the track at `index`
    ///
    /// Returns the new flag, or `None` (and does nothing) for a bad index.
    pub fn toggle_saved(&mut self, index: usize) -> Option<bool> {
        let saved = self.playlist.toggle_saved(index)?;
        self.emit_playlist_changed();
        self.persist();
        Some(saved)
    }

    /// Flip the saved flag of a track by id
    pub fn toggle_saved_by_id(&mut self, id: &str) -> Option<bool> {
        let index = self.playlist.position(id)?;
        self.toggle_saved(index)
    }

    /// Make a track current (playlist click), resuming playback if playing
    pub fn select_track(&mut self, id: &str) -> Result<()> {
        let index = self.index_of(id)?;
        let was_playing = self.is_playing();
        self.load_track(index);
        if was_playing {
            self.play();
        }
        Ok(())
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.playlist
            .position(id)
            .ok_or_else(|| PlaybackError::TrackNotFound(id.to_string()))
    }

    // ===== State Queries =====

    pub fn get_state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn get_repeat(&self) -> RepeatMode {
        self.repeat
    }

    /// Current volume level (0-100)
    pub fn get_volume(&self) -> u8 {
        self.volume.level()
    }

    /// Index of the current track, `None` when the playlist is empty
    pub fn get_current_index(&self) -> Option<usize> {
        if self.playlist.is_empty() {
            None
        } else {
            Some(self.playlist.current_index())
        }
    }

    pub fn get_current_track(&self) -> Option<&Track> {
        self.playlist.current()
    }

    pub fn get_tracks(&self) -> &[Track] {
        self.playlist.tracks()
    }

    pub fn playlist_len(&self) -> usize {
        self.playlist.len()
    }

    pub fn is_dragging(&self) -> bool {
        self.seek.is_dragging()
    }

    pub fn now_playing(&self) -> &NowPlaying {
        &self.now_playing
    }

    /// Rows for the playlist panel
    pub fn playlist_view(&self) -> Vec<PlaylistItemView> {
        let current = self.get_current_index();
        self.playlist
            .tracks()
            .iter()
            .enumerate()
            .map(|(index, track)| PlaylistItemView {
                id: track.id.clone(),
                title: track.title.clone(),
                artist: track.artist.clone(),
                active: Some(index) == current,
                saved: track.saved,
            })
            .collect()
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    // ===== Events =====

    /// Drain all pending events
    ///
    /// Returns all events that have been emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "Playback state changed");
            self.state = state;
            self.pending_events.push(PlayerEvent::StateChanged { state });
        }
    }

    fn mark_not_playing(&mut self) {
        if self.state == PlaybackState::Playing {
            self.set_state(PlaybackState::Paused);
        }
    }

    fn emit_playlist_changed(&mut self) {
        self.pending_events.push(PlayerEvent::PlaylistChanged {
            length: self.playlist.len(),
        });
    }

    fn notice(&mut self, message: String) {
        info!("{}", message);
        self.pending_events.push(PlayerEvent::Notice { message });
    }

    /// Write the playlist; failures are logged and otherwise ignored
    fn persist(&mut self) {
        if let Err(e) = self
            .store
            .save(self.playlist.tracks(), self.playlist.current_index())
        {
            warn!("Could not save playlist: {}", e);
        }
    }
}

impl std::fmt::Debug for PlaybackManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackManager")
            .field("state", &self.state)
            .field("repeat", &self.repeat)
            .field("playlist", &self.playlist)
            .field("volume", &self.volume)
            .field("now_playing", &self.now_playing)
            .finish_non_exhaustive()
    }
}
