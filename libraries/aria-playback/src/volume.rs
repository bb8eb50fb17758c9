//! Volume control
//!
//! Volume is a 0-100 level; the media device receives it as a linear
//! gain in [0, 1].

/// Upper bound of the volume level
pub const MAX_VOLUME: u8 = 100;

/// Volume controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Volume {
    /// Volume level (0-100)
    level: u8,
}

impl Volume {
    /// Create new volume controller, clamping `level` to 0-100
    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(MAX_VOLUME),
        }
    }

    /// Set volume level (0-100)
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(MAX_VOLUME);
    }

    /// Get current volume level (0-100)
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Move the level by `delta`, clamped to 0-100
    pub fn adjust(&mut self, delta: i16) {
        let level = (i16::from(self.level) + delta).clamp(0, i16::from(MAX_VOLUME));
        self.level = level as u8;
    }

    /// Linear gain for the media device
    pub fn gain(&self) -> f64 {
        f64::from(self.level) / f64::from(MAX_VOLUME)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_volume() {
        let vol = Volume::new(80);
        assert_eq!(vol.level(), 80);
        assert_eq!(Volume::default().level(), 50);
    }

    #[test]
    fn set_volume_level() {
        let mut vol = Volume::new(50);

        vol.set_level(75);
        assert_eq!(vol.level(), 75);

        // Clamp to 100
        vol.set_level(150);
        assert_eq!(vol.level(), 100);
    }

    #[test]
    fn adjust_clamps_at_both_ends() {
        let mut vol = Volume::new(95);
        vol.adjust(10);
        assert_eq!(vol.level(), 100);

        let mut vol = Volume::new(5);
        vol.adjust(-10);
        assert_eq!(vol.level(), 0);

        let mut vol = Volume::new(50);
        vol.adjust(-10);
        assert_eq!(vol.level(), 40);
    }

    #[test]
    fn gain_is_linear() {
        assert_eq!(Volume::new(0).gain(), 0.0);
        assert_eq!(Volume::new(50).gain(), 0.5);
        assert_eq!(Volume::new(100).gain(), 1.0);
    }
}
