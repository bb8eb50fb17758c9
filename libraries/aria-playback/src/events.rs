//! Playback Events
//!
//! Two message streams keep control flow explicit:
//! - [`DeviceEvent`]: reported by the media device, consumed by
//!   [`PlaybackManager::handle_device_event`](crate::PlaybackManager::handle_device_event)
//! - [`PlayerEvent`]: queued by the player for the display surface and
//!   drained with [`PlaybackManager::drain_events`](crate::PlaybackManager::drain_events)

use crate::types::{PlaybackState, RepeatMode};
use serde::{Deserialize, Serialize};

/// Events reported by the media device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeviceEvent {
    /// Device started loading a new source
    LoadStart,

    /// Duration is now known
    LoadedMetadata,

    /// Playback position moved
    TimeUpdate,

    /// Current source played to the end
    Ended,

    /// Source could not be decoded or played
    Error(String),

    /// A pending play request succeeded
    PlayResolved,

    /// A pending play request was rejected (autoplay policy, decode failure)
    PlayRejected(String),
}

impl DeviceEvent {
    /// Parse a DOM media event name (`"ended"`, `"loadedmetadata"`, ...)
    pub fn from_dom_name(name: &str) -> Option<Self> {
        match name {
            "loadstart" => Some(Self::LoadStart),
            "loadedmetadata" => Some(Self::LoadedMetadata),
            "timeupdate" => Some(Self::TimeUpdate),
            "ended" => Some(Self::Ended),
            "error" => Some(Self::Error("media element error".to_string())),
            _ => None,
        }
    }
}

/// Events emitted by the player for the display surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlayerEvent {
    /// Playback state changed (playing, paused, stopped)
    StateChanged { state: PlaybackState },

    /// Current track changed (`None` when the playlist is empty)
    TrackChanged {
        track_id: Option<String>,
        index: Option<usize>,
    },

    /// Title/artist/art or status of the now-playing panel changed
    DisplayChanged,

    /// Progress bar and elapsed time moved
    ProgressChanged { elapsed_secs: f64, fraction: f64 },

    /// Duration became known (or was reset)
    DurationChanged { duration_secs: Option<f64> },

    /// Volume changed
    VolumeChanged { level: u8 },

    /// Repeat mode toggled
    RepeatChanged { repeat: RepeatMode },

    /// Tracks added, removed or flagged
    PlaylistChanged { length: usize },

    /// Host should call `tick()` once `delay_ms` has elapsed
    AutoplayScheduled { delay_ms: u32 },

    /// User-visible message (rejected import, refused removal)
    Notice { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_event_names() {
        assert_eq!(DeviceEvent::from_dom_name("ended"), Some(DeviceEvent::Ended));
        assert_eq!(
            DeviceEvent::from_dom_name("loadedmetadata"),
            Some(DeviceEvent::LoadedMetadata)
        );
        assert_eq!(
            DeviceEvent::from_dom_name("timeupdate"),
            Some(DeviceEvent::TimeUpdate)
        );
        assert_eq!(
            DeviceEvent::from_dom_name("loadstart"),
            Some(DeviceEvent::LoadStart)
        );
        assert!(matches!(
            DeviceEvent::from_dom_name("error"),
            Some(DeviceEvent::Error(_))
        ));
        assert_eq!(DeviceEvent::from_dom_name("progress"), None);
    }

    #[test]
    fn player_events_serialize_with_type_tag() {
        let json = serde_json::to_value(PlayerEvent::VolumeChanged { level: 60 }).unwrap();
        assert_eq!(json["type"], "volumeChanged");
        assert_eq!(json["level"], 60);

        let json = serde_json::to_value(PlayerEvent::StateChanged {
            state: PlaybackState::Playing,
        })
        .unwrap();
        assert_eq!(json["state"], "playing");
    }
}
