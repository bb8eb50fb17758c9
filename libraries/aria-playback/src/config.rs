//! Player configuration
use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix (`ARIA_AUTOPLAY_DELAY_MS`, `ARIA_STORAGE__PLAYLIST_KEY`)
const ENV_PREFIX: &str = "ARIA";

/// Tunables for the player
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// Files at or above this size are rejected on import
    #[serde(default = "default_max_import_bytes")]
    pub max_import_bytes: u64,

    /// Delay before auto-playing the next track after an advance
    #[serde(default = "default_autoplay_delay_ms")]
    pub autoplay_delay_ms: u32,

    /// Minimum spacing of device-driven progress updates
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u32,

    /// Volume applied at startup (0-100)
    #[serde(default = "default_initial_volume")]
    pub initial_volume: u8,

    /// Volume change per keyboard step
    #[serde(default = "default_volume_step")]
    pub volume_step: u8,

    /// Start with repeat-all enabled
    #[serde(default = "default_repeat_all")]
    pub repeat_all: bool,

    #[serde(default)]
    pub storage: StorageKeys,
}

/// Keys used in the key/value store
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageKeys {
    #[serde(default = "default_playlist_key")]
    pub playlist_key: String,

    #[serde(default = "default_current_index_key")]
    pub current_index_key: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            playlist_key: default_playlist_key(),
            current_index_key: default_current_index_key(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_import_bytes: default_max_import_bytes(),
            autoplay_delay_ms: default_autoplay_delay_ms(),
            progress_interval_ms: default_progress_interval_ms(),
            initial_volume: default_initial_volume(),
            volume_step: default_volume_step(),
            repeat_all: default_repeat_all(),
            storage: StorageKeys::default(),
        }
    }
}

impl PlayerConfig {
    /// Load configuration from an optional TOML file and the environment
    ///
    /// Environment variables (prefixed with `ARIA_`) override the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            settings = settings.add_source(config::File::from(path).required(false));
        }

        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.initial_volume > 100 {
            return Err(PlaybackError::Config(format!(
                "initial_volume must be 0-100, got {}",
                self.initial_volume
            )));
        }

        if self.volume_step == 0 || self.volume_step > 100 {
            return Err(PlaybackError::Config(format!(
                "volume_step must be 1-100, got {}",
                self.volume_step
            )));
        }

        if self.max_import_bytes == 0 {
            return Err(PlaybackError::Config(
                "max_import_bytes must be greater than zero".to_string(),
            ));
        }

        let keys = &self.storage;
        if keys.playlist_key.is_empty() || keys.current_index_key.is_empty() {
            return Err(PlaybackError::Config(
                "storage keys must not be empty".to_string(),
            ));
        }
        if keys.playlist_key == keys.current_index_key {
            return Err(PlaybackError::Config(format!(
                "storage keys must differ (both are {:?})",
                keys.playlist_key
            )));
        }

        Ok(())
    }

    /// Import cap rendered for user-facing notices (e.g. "50MB")
    pub fn max_import_label(&self) -> String {
        const MIB: u64 = 1024 * 1024;
        if self.max_import_bytes % MIB == 0 {
            format!("{}MB", self.max_import_bytes / MIB)
        } else {
            format!("{} bytes", self.max_import_bytes)
        }
    }
}

// Default values
fn default_max_import_bytes() -> u64 {
    50 * 1024 * 1024
}

fn default_autoplay_delay_ms() -> u32 {
    100
}

fn default_progress_interval_ms() -> u32 {
    100
}

fn default_initial_volume() -> u8 {
    50
}

fn default_volume_step() -> u8 {
    10
}

fn default_repeat_all() -> bool {
    true
}

fn default_playlist_key() -> String {
    "playlist".to_string()
}

fn default_current_index_key() -> String {
    "currentIndex".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let config = PlayerConfig::default();
        assert_eq!(config.max_import_bytes, 50 * 1024 * 1024);
        assert_eq!(config.autoplay_delay_ms, 100);
        assert_eq!(config.progress_interval_ms, 100);
        assert_eq!(config.initial_volume, 50);
        assert_eq!(config.volume_step, 10);
        assert!(config.repeat_all);
        assert_eq!(config.storage.playlist_key, "playlist");
        assert_eq!(config.storage.current_index_key, "currentIndex");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_from_toml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("Failed to create temp file");
        writeln!(
            file,
            "autoplay_delay_ms = 250\nrepeat_all = false\n\n[storage]\nplaylist_key = \"aria.playlist\""
        )
        .expect("Failed to write config");

        let config = PlayerConfig::load(Some(file.path())).expect("config should load");

        assert_eq!(config.autoplay_delay_ms, 250);
        assert!(!config.repeat_all);
        assert_eq!(config.storage.playlist_key, "aria.playlist");
        // Untouched fields keep their defaults
        assert_eq!(config.storage.current_index_key, "currentIndex");
        assert_eq!(config.max_import_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = PlayerConfig::load(Some(&dir.path().join("absent.toml")))
            .expect("missing file is optional");
        assert_eq!(config.autoplay_delay_ms, 100);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("Failed to create temp file");
        writeln!(file, "volume_step = 0").expect("Failed to write config");

        let err = PlayerConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, PlaybackError::Config(_)));
    }

    #[test]
    fn validate_rejects_shared_storage_keys() {
        let mut config = PlayerConfig::default();
        config.storage.current_index_key = config.storage.playlist_key.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn import_label() {
        assert_eq!(PlayerConfig::default().max_import_label(), "50MB");

        let config = PlayerConfig {
            max_import_bytes: 1000,
            ..PlayerConfig::default()
        };
        assert_eq!(config.max_import_label(), "1000 bytes");
    }
}
