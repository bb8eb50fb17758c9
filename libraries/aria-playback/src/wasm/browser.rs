//! Browser collaborators: `<audio>` element, `localStorage`, `Date.now()`

use crate::{Clock, KeyValueStore, MediaDevice, PlayOutcome, PlaybackError, Result, TrackSource};
use js_sys::Promise;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use web_sys::{HtmlAudioElement, Storage, Url};

/// Readable message for a thrown JS value
pub(crate) fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

/// Media device backed by an `HtmlAudioElement`
///
/// `play()` on a media element returns a promise; it is parked in
/// `pending_play` for the JS host, which awaits it and reports the result
/// back as `playResolved` / `playRejected`.
pub struct AudioElementDevice {
    element: HtmlAudioElement,
    pending_play: Rc<RefCell<Option<Promise>>>,
}

impl AudioElementDevice {
    pub fn new(element: HtmlAudioElement, pending_play: Rc<RefCell<Option<Promise>>>) -> Self {
        Self {
            element,
            pending_play,
        }
    }
}

impl MediaDevice for AudioElementDevice {
    fn load(&mut self, source: &TrackSource) -> Result<()> {
        self.element.set_src(source.as_str());
        self.element.load();
        Ok(())
    }

    fn play(&mut self) -> PlayOutcome {
        match self.element.play() {
            Ok(promise) => {
                *self.pending_play.borrow_mut() = Some(promise);
                PlayOutcome::Pending
            }
            Err(e) => PlayOutcome::Rejected(js_error_message(&e)),
        }
    }

    fn pause(&mut self) {
        self.element.pause().ok();
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.element.set_current_time(seconds);
    }

    // NaN until metadata has loaded, +Infinity for streams
    fn duration(&self) -> Option<f64> {
        let duration = self.element.duration();
        if duration.is_finite() {
            Some(duration)
        } else {
            None
        }
    }

    fn set_volume(&mut self, gain: f64) {
        self.element.set_volume(gain);
    }

    fn release(&mut self, source: &TrackSource) {
        if let TrackSource::Ephemeral(url) = source {
            if let Err(e) = Url::revoke_object_url(url) {
                tracing::warn!("Failed to revoke object URL: {}", js_error_message(&e));
            }
        }
    }
}

/// `window.localStorage`
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn open() -> Result<Self> {
        let window =
            web_sys::window().ok_or_else(|| PlaybackError::store("no window available"))?;
        let storage = window
            .local_storage()
            .map_err(|e| PlaybackError::store(js_error_message(&e)))?
            .ok_or_else(|| PlaybackError::store("localStorage is disabled"))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| PlaybackError::store(js_error_message(&e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| PlaybackError::store(js_error_message(&e)))
    }
}

/// Wall clock from `Date.now()`
#[derive(Debug, Clone, Copy, Default)]
pub struct DateClock;

impl Clock for DateClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}
