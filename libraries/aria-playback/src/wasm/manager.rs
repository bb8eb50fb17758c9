//! WASM-compatible PlaybackManager wrapper

use super::browser::{js_error_message, AudioElementDevice, DateClock, LocalStorageStore};
use super::types::WasmTrack;
use crate::{
    format_time, DeviceEvent, FileCandidate, KeyCode, KeyPress, MemoryStore, PlaybackError,
    PlaybackManager, PlaybackState, PlayerConfig, PointerPosition, RepeatMode, TrackGeometry,
    TrackSource,
};
use js_sys::{Array, Promise};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{File, HtmlAudioElement, Url};

/// WASM-compatible player
///
/// Wraps the core PlaybackManager with a JavaScript-friendly API. The host
/// forwards `<audio>` events through `handleMediaEvent`, awaits the promise
/// from `takePlayRequest` after any call that may start playback, and
/// renders whatever `drainEvents` returns.
#[wasm_bindgen]
pub struct WasmPlayer {
    inner: PlaybackManager,
    pending_play: Rc<RefCell<Option<Promise>>>,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Create a player on top of an `<audio>` element
    ///
    /// `config` is an optional object with `PlayerConfig` fields.
    #[wasm_bindgen(constructor)]
    pub fn new(audio: HtmlAudioElement, config: JsValue) -> Result<WasmPlayer, JsValue> {
        // Enable panic hooks for better error messages in console
        console_error_panic_hook::set_once();

        let config: PlayerConfig = if config.is_undefined() || config.is_null() {
            PlayerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };
        config.validate().map_err(to_js_error)?;

        let pending_play = Rc::new(RefCell::new(None));
        let device = AudioElementDevice::new(audio, Rc::clone(&pending_play));
        let inner = match LocalStorageStore::open() {
            Ok(store) => {
                PlaybackManager::new(config, Box::new(device), Box::new(store), Box::new(DateClock))
            }
            Err(e) => {
                tracing::warn!("Persistence disabled: {}", e);
                PlaybackManager::new(
                    config,
                    Box::new(device),
                    Box::new(MemoryStore::new()),
                    Box::new(DateClock),
                )
            }
        };

        Ok(Self {
            inner,
            pending_play,
        })
    }

    // ===== Playback Control =====

    pub fn play(&mut self) {
        self.inner.play();
    }

    pub fn pause(&mut self) {
        self.inner.pause();
    }

    #[wasm_bindgen(js_name = togglePlayPause)]
    pub fn toggle_play_pause(&mut self) {
        self.inner.toggle_play_pause();
    }

    #[wasm_bindgen(js_name = previousTrack)]
    pub fn previous_track(&mut self) {
        self.inner.previous_track();
    }

    #[wasm_bindgen(js_name = nextTrack)]
    pub fn next_track(&mut self) {
        self.inner.next_track();
    }

    #[wasm_bindgen(js_name = loadTrack)]
    pub fn load_track(&mut self, index: usize) {
        self.inner.load_track(index);
    }

    #[wasm_bindgen(js_name = toggleRepeat)]
    pub fn toggle_repeat(&mut self) {
        self.inner.toggle_repeat();
    }

    /// Fire due timers (schedule after an `autoplayScheduled` event)
    pub fn tick(&mut self) {
        self.inner.tick();
    }

    /// Promise of the last play request, if one is outstanding
    #[wasm_bindgen(js_name = takePlayRequest)]
    pub fn take_play_request(&mut self) -> Option<Promise> {
        self.pending_play.borrow_mut().take()
    }

    // ===== Media Element Events =====

    /// Forward a DOM media event by name (`"ended"`, `"timeupdate"`, ...)
    #[wasm_bindgen(js_name = handleMediaEvent)]
    pub fn handle_media_event(&mut self, name: &str) {
        if let Some(event) = DeviceEvent::from_dom_name(name) {
            self.inner.handle_device_event(event);
        }
    }

    #[wasm_bindgen(js_name = playResolved)]
    pub fn play_resolved(&mut self) {
        self.inner.handle_device_event(DeviceEvent::PlayResolved);
    }

    #[wasm_bindgen(js_name = playRejected)]
    pub fn play_rejected(&mut self, reason: JsValue) {
        self.inner
            .handle_device_event(DeviceEvent::PlayRejected(js_error_message(&reason)));
    }

    // ===== Seeking =====

    /// Update the progress bar's bounding box
    #[wasm_bindgen(js_name = setTrackGeometry)]
    pub fn set_track_geometry(&mut self, left: f64, width: f64) {
        self.inner.set_track_geometry(TrackGeometry::new(left, width));
    }

    /// Click on the progress bar at the mouse's `clientX`
    #[wasm_bindgen(js_name = seekTo)]
    pub fn seek_to(&mut self, client_x: f64) {
        self.inner.seek_to(&PointerPosition::mouse(client_x));
    }

    /// Tap on the progress bar; `touches` are the `clientX` of each touch point
    #[wasm_bindgen(js_name = seekToTouch)]
    pub fn seek_to_touch(&mut self, touches: Vec<f64>) {
        self.inner.seek_to(&PointerPosition::Touch { touches });
    }

    /// `mousedown` on the progress bar
    #[wasm_bindgen(js_name = startDrag)]
    pub fn start_drag(&mut self, client_x: f64) {
        self.inner.start_drag(&PointerPosition::mouse(client_x));
    }

    /// `touchstart` on the progress bar
    #[wasm_bindgen(js_name = startDragTouch)]
    pub fn start_drag_touch(&mut self, touches: Vec<f64>) {
        self.inner.start_drag(&PointerPosition::Touch { touches });
    }

    /// `mousemove` during a drag
    #[wasm_bindgen(js_name = dragTo)]
    pub fn drag_to(&mut self, client_x: f64) {
        self.inner.drag_to(&PointerPosition::mouse(client_x));
    }

    /// `touchmove` during a drag
    #[wasm_bindgen(js_name = dragToTouch)]
    pub fn drag_to_touch(&mut self, touches: Vec<f64>) {
        self.inner.drag_to(&PointerPosition::Touch { touches });
    }

    #[wasm_bindgen(js_name = stopDrag)]
    pub fn stop_drag(&mut self) {
        self.inner.stop_drag();
    }

    // ===== Volume & Keyboard =====

    /// Set volume (0-100)
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&mut self, level: u8) {
        self.inner.set_volume(level);
    }

    /// Get current volume (0-100)
    #[wasm_bindgen(js_name = getVolume)]
    pub fn get_volume(&self) -> u8 {
        self.inner.get_volume()
    }

    /// Apply a `keydown`; returns true if the host should `preventDefault()`
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, code: &str, ctrl: bool, in_editable: bool) -> bool {
        let mut key = KeyPress::new(KeyCode::from_dom_code(code));
        if ctrl {
            key = key.with_ctrl();
        }
        if in_editable {
            key = key.in_editable();
        }
        self.inner.handle_key(&key)
    }

    // ===== Playlist Management =====

    #[wasm_bindgen(js_name = addTrack)]
    pub fn add_track(&mut self, track: WasmTrack) {
        self.inner.add_track(track.into());
    }

    /// Import an array of `File`s; returns the import report
    #[wasm_bindgen(js_name = importFiles)]
    pub fn import_files(&mut self, files: Array) -> Result<JsValue, JsValue> {
        let candidates: Vec<FileCandidate<File>> = files
            .iter()
            .filter_map(|value| value.dyn_into::<File>().ok())
            .map(|file| FileCandidate::new(file.name(), file.type_(), file.size() as u64, file))
            .collect();

        let report = self.inner.import_files(candidates, |file| {
            Url::create_object_url_with_blob(&file)
                .map(TrackSource::from_url)
                .map_err(|e| PlaybackError::import(js_error_message(&e)))
        });

        to_js(&report)
    }

    /// Remove a track by id
    #[wasm_bindgen(js_name = removeTrack)]
    pub fn remove_track(&mut self, id: &str) -> Result<WasmTrack, JsValue> {
        self.inner
            .remove_track_by_id(id)
            .map(|track| WasmTrack::from(&track))
            .map_err(to_js_error)
    }

    /// Flip a track's saved flag; returns the new flag
    #[wasm_bindgen(js_name = toggleSaved)]
    pub fn toggle_saved(&mut self, id: &str) -> Option<bool> {
        self.inner.toggle_saved_by_id(id)
    }

    /// Playlist row click
    #[wasm_bindgen(js_name = selectTrack)]
    pub fn select_track(&mut self, id: &str) -> Result<(), JsValue> {
        self.inner.select_track(id).map_err(to_js_error)
    }

    // ===== State Queries =====

    /// Get current playback state as string
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        match self.inner.get_state() {
            PlaybackState::Stopped => "stopped".to_string(),
            PlaybackState::Paused => "paused".to_string(),
            PlaybackState::Playing => "playing".to_string(),
        }
    }

    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.inner.is_playing()
    }

    /// Get current repeat mode ("off" | "all")
    #[wasm_bindgen(js_name = getRepeat)]
    pub fn get_repeat(&self) -> String {
        match self.inner.get_repeat() {
            RepeatMode::Off => "off".to_string(),
            RepeatMode::All => "all".to_string(),
        }
    }

    #[wasm_bindgen(js_name = getCurrentIndex)]
    pub fn get_current_index(&self) -> Option<usize> {
        self.inner.get_current_index()
    }

    #[wasm_bindgen(js_name = getCurrentTrack)]
    pub fn get_current_track(&self) -> Option<WasmTrack> {
        self.inner.get_current_track().map(WasmTrack::from)
    }

    /// Now-playing panel snapshot
    #[wasm_bindgen(js_name = nowPlaying)]
    pub fn now_playing(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.now_playing())
    }

    /// Playlist rows
    #[wasm_bindgen(js_name = getPlaylist)]
    pub fn get_playlist(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.playlist_view())
    }

    /// All events since the last call
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.drain_events())
    }
}

/// Format seconds as `M:SS`
#[wasm_bindgen(js_name = formatTime)]
pub fn format_time_js(seconds: f64) -> String {
    format_time(seconds)
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn to_js_error(error: PlaybackError) -> JsValue {
    JsValue::from_str(&error.to_string())
}
