//! Keyboard shortcut mapping
//!
//! | Key            | Action                    |
//! |----------------|---------------------------|
//! | Space          | play / pause              |
//! | Ctrl+Left      | previous track            |
//! | Ctrl+Right     | next track                |
//! | Ctrl+Up / Down | volume up / down one step |
//!
//! Space is ignored while focus is inside an editable control so typing is
//! never hijacked. A mapped key must have its default browser handling
//! suppressed.

use serde::{Deserialize, Serialize};

/// Keys the dispatcher cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyCode {
    Space,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Other,
}

impl KeyCode {
    /// Parse a DOM `KeyboardEvent.code`
    pub fn from_dom_code(code: &str) -> Self {
        match code {
            "Space" => Self::Space,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            _ => Self::Other,
        }
    }
}

/// A key press with its modifier and focus context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    pub code: KeyCode,
    pub ctrl: bool,
    /// Focus is inside a text field or other editable control
    pub in_editable: bool,
}

impl KeyPress {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            ctrl: false,
            in_editable: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn in_editable(mut self) -> Self {
        self.in_editable = true;
        self
    }
}

/// Player operation bound to a shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    TogglePlayPause,
    PreviousTrack,
    NextTrack,
    VolumeUp,
    VolumeDown,
}

/// Map a key press to an action
///
/// `Some` means the shortcut is bound and the default handling must be
/// suppressed.
pub fn map_key(key: &KeyPress) -> Option<PlayerAction> {
    match (key.code, key.ctrl) {
        (KeyCode::Space, _) if !key.in_editable => Some(PlayerAction::TogglePlayPause),
        (KeyCode::ArrowLeft, true) => Some(PlayerAction::PreviousTrack),
        (KeyCode::ArrowRight, true) => Some(PlayerAction::NextTrack),
        (KeyCode::ArrowUp, true) => Some(PlayerAction::VolumeUp),
        (KeyCode::ArrowDown, true) => Some(PlayerAction::VolumeDown),
        _ => None,
    }
}
