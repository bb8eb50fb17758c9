//! Shared test doubles for integration tests
//!
//! Every double hands out clones that share state, so a test keeps one
//! handle while the player owns the boxed other.

#![allow(dead_code)]

use aria_playback::{
    CreateTrack, KeyValueStore, ManualClock, MediaDevice, PlayOutcome, PlaybackError,
    PlaybackManager, PlayerConfig, Result, Track, TrackSource,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// How the mock device answers `play()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayMode {
    #[default]
    Immediate,
    Deferred,
    Refuse,
}

#[derive(Debug, Default)]
pub struct DeviceState {
    pub loaded: Option<TrackSource>,
    pub load_count: usize,
    pub playing: bool,
    pub current_time: f64,
    pub duration: Option<f64>,
    pub gain: f64,
    pub released: Vec<TrackSource>,
    pub play_mode: PlayMode,
    /// Sources containing this text fail to load
    pub fail_loads_matching: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MockDevice {
    pub state: Rc<RefCell<DeviceState>>,
}

impl MockDevice {
    pub fn with_duration(duration: f64) -> Self {
        let device = Self::default();
        device.state.borrow_mut().duration = Some(duration);
        device
    }

    /// Simulate the element's position moving during playback
    pub fn set_position(&self, seconds: f64) {
        self.state.borrow_mut().current_time = seconds;
    }

    pub fn position(&self) -> f64 {
        self.state.borrow().current_time
    }

    pub fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }
}

impl MediaDevice for MockDevice {
    fn load(&mut self, source: &TrackSource) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if let Some(pattern) = &state.fail_loads_matching {
            if source.as_str().contains(pattern.as_str()) {
                return Err(PlaybackError::device("unsupported source"));
            }
        }
        state.loaded = Some(source.clone());
        state.load_count += 1;
        state.playing = false;
        state.current_time = 0.0;
        Ok(())
    }

    fn play(&mut self) -> PlayOutcome {
        let mut state = self.state.borrow_mut();
        match state.play_mode {
            PlayMode::Immediate => {
                state.playing = true;
                PlayOutcome::Started
            }
            PlayMode::Deferred => PlayOutcome::Pending,
            PlayMode::Refuse => PlayOutcome::Rejected("NotAllowedError".to_string()),
        }
    }

    fn pause(&mut self) {
        self.state.borrow_mut().playing = false;
    }

    fn current_time(&self) -> f64 {
        self.state.borrow().current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.state.borrow_mut().current_time = seconds;
    }

    fn duration(&self) -> Option<f64> {
        self.state.borrow().duration
    }

    fn set_volume(&mut self, gain: f64) {
        self.state.borrow_mut().gain = gain;
    }

    fn release(&mut self, source: &TrackSource) {
        self.state.borrow_mut().released.push(source.clone());
    }
}

#[derive(Debug, Default)]
pub struct StoreState {
    pub entries: HashMap<String, String>,
    /// Number of `set` calls per key
    pub writes: HashMap<String, usize>,
    pub fail: bool,
}

/// Key/value store that counts writes
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    pub state: Rc<RefCell<StoreState>>,
}

impl MockStore {
    pub fn writes(&self, key: &str) -> usize {
        self.state.borrow().writes.get(key).copied().unwrap_or(0)
    }

    pub fn reset_writes(&self) {
        self.state.borrow_mut().writes.clear();
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.state.borrow().entries.get(key).cloned()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.state
            .borrow_mut()
            .entries
            .insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStore for MockStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let state = self.state.borrow();
        if state.fail {
            return Err(PlaybackError::store("storage unavailable"));
        }
        Ok(state.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail {
            return Err(PlaybackError::store("quota exceeded"));
        }
        *state.writes.entry(key.to_string()).or_default() += 1;
        state.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Player wired to fresh doubles
pub struct Harness {
    pub player: PlaybackManager,
    pub device: MockDevice,
    pub store: MockStore,
    pub clock: ManualClock,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(PlayerConfig::default(), MockDevice::default(), MockStore::default())
    }

    pub fn with(config: PlayerConfig, device: MockDevice, store: MockStore) -> Self {
        let clock = ManualClock::new(1_000.0);
        let player = PlaybackManager::new(
            config,
            Box::new(device.clone()),
            Box::new(store.clone()),
            Box::new(clock.clone()),
        );
        Self {
            player,
            device,
            store,
            clock,
        }
    }

    /// Player with `n` tracks ("0", "1", ...) and an empty event queue
    pub fn with_tracks(n: usize) -> Self {
        let mut harness = Self::new();
        harness.add_tracks(n);
        harness
    }

    pub fn add_tracks(&mut self, n: usize) {
        for i in 0..n {
            self.player.add_track(create_test_track(&i.to_string()));
        }
        self.player.drain_events();
    }
}

pub fn create_test_track(id: &str) -> Track {
    CreateTrack::new(id, TrackSource::from_url(format!("https://music.test/{}.mp3", id)))
        .title(format!("Track {}", id))
        .artist("Test Artist")
        .into()
}

pub fn create_ephemeral_track(id: &str) -> Track {
    CreateTrack::new(id, TrackSource::from_url(format!("blob:https://app.test/{}", id)))
        .title(format!("Upload {}", id))
        .into()
}
