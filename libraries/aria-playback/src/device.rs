//! Media device abstraction
//!
//! The player never decodes audio itself. Loading, playing and seeking are
//! delegated to a [`MediaDevice`] (an `<audio>` element in the browser, a
//! native output elsewhere), which reports back through
//! [`DeviceEvent`](crate::events::DeviceEvent)s.

use crate::error::Result;
use crate::types::TrackSource;

/// Immediate answer to a play request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Playback started synchronously
    Started,

    /// Outcome arrives later as `DeviceEvent::PlayResolved` / `PlayRejected`
    Pending,

    /// Playback refused (autoplay policy, nothing loaded, decode failure)
    Rejected(String),
}

/// Platform audio playback primitive
pub trait MediaDevice {
    /// Attach a new source, replacing the current one
    fn load(&mut self, source: &TrackSource) -> Result<()>;

    /// Request playback of the attached source
    fn play(&mut self) -> PlayOutcome;

    /// Stop playback, keeping the position
    fn pause(&mut self);

    /// Current position in seconds
    fn current_time(&self) -> f64;

    /// Move the playback position (seconds)
    fn set_current_time(&mut self, seconds: f64);

    /// Duration in seconds, `None` until metadata has loaded
    fn duration(&self) -> Option<f64>;

    /// Output gain in [0, 1]
    fn set_volume(&mut self, gain: f64);

    /// Free a source handle that is no longer referenced
    ///
    /// Only ephemeral handles need releasing; durable URLs are left alone.
    fn release(&mut self, source: &TrackSource) {
        let _ = source;
    }
}

/// Duration usable for seeking: finite and positive
pub(crate) fn known_duration(device: &dyn MediaDevice) -> Option<f64> {
    device.duration().filter(|d| d.is_finite() && *d > 0.0)
}

/// Dummy device for testing
///
/// Plays synchronously and records what it was asked to do. Clones share
/// state so a test can keep a handle after boxing one into the player.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct DummyDevice {
    pub state: std::rc::Rc<std::cell::RefCell<DummyDeviceState>>,
}

#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct DummyDeviceState {
    pub loaded: Option<TrackSource>,
    pub playing: bool,
    pub current_time: f64,
    pub duration: Option<f64>,
    pub gain: f64,
    pub released: Vec<TrackSource>,
}

#[cfg(test)]
impl MediaDevice for DummyDevice {
    fn load(&mut self, source: &TrackSource) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.loaded = Some(source.clone());
        state.playing = false;
        state.current_time = 0.0;
        Ok(())
    }

    fn play(&mut self) -> PlayOutcome {
        let mut state = self.state.borrow_mut();
        if state.loaded.is_none() {
            return PlayOutcome::Rejected("no source".to_string());
        }
        state.playing = true;
        PlayOutcome::Started
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
