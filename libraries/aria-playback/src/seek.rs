//! Seek and drag handling for the progress bar
//!
//! Pointer positions are normalized against the progress track's geometry
//! into a fraction in [0, 1]. While a drag is active the player stops
//! writing device-reported progress so the bar follows the pointer.

use serde::{Deserialize, Serialize};

/// Horizontal extent of the progress track in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackGeometry {
    pub left: f64,
    pub width: f64,
}

impl TrackGeometry {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Fraction of the track at `client_x`, clamped to [0, 1]
    ///
    /// A collapsed track (zero or negative width) maps everything to 0.
    pub fn fraction_at(&self, client_x: f64) -> f64 {
        if self.width.is_nan() || self.width <= 0.0 || !client_x.is_finite() {
            return 0.0;
        }
        ((client_x - self.left) / self.width).clamp(0.0, 1.0)
    }
}

impl Default for TrackGeometry {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Pointer input from either a mouse or a touch screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerPosition {
    Mouse { client_x: f64 },
    /// Active touch points; the first one drives the seek
    Touch { touches: Vec<f64> },
}

impl PointerPosition {
    pub fn mouse(client_x: f64) -> Self {
        Self::Mouse { client_x }
    }

    pub fn touch(client_x: f64) -> Self {
        Self::Touch {
            touches: vec![client_x],
        }
    }

    /// Horizontal position, `None` for a touch event without touch points
    pub fn client_x(&self) -> Option<f64> {
        match self {
            Self::Mouse { client_x } => Some(*client_x),
            Self::Touch { touches } => touches.first().copied(),
        }
    }
}

/// Drag session state and geometry
#[derive(Debug, Clone, Default)]
pub struct SeekController {
    geometry: TrackGeometry,
    dragging: bool,
}

impl SeekController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the progress track's bounding box (after layout changes)
    pub fn set_geometry(&mut self, geometry: TrackGeometry) {
        self.geometry = geometry;
    }

    /// Fraction under the pointer, `None` if the pointer has no position
    pub fn fraction(&self, pointer: &PointerPosition) -> Option<f64> {
        pointer.client_x().map(|x| self.geometry.fraction_at(x))
    }

    pub fn start_drag(&mut self) {
        self.dragging = true;
    }

    pub fn stop_drag(&mut self) {
        self.dragging = false;
    }

    /// A drag is in progress; device-driven progress writes are suppressed
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

/// Target position in seconds for `fraction` of `duration`
pub fn seek_target(fraction: f64, duration: f64) -> f64 {
    fraction.clamp(0.0, 1.0) * duration
}
