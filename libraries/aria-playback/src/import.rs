//! File import validation
//!
//! The file picker hands over candidates with a name, MIME type and size.
//! Only audio files under the size cap become tracks; every other file is
//! rejected on its own without stopping the rest of the batch.

use serde::{Deserialize, Serialize};

/// MIME type prefix accepted for import
const AUDIO_MIME_PREFIX: &str = "audio/";

/// A file offered by the file picker
///
/// `file` is the host's handle to the bytes (e.g. a browser `File`); it is
/// only turned into a playable source once the candidate has been accepted.
#[derive(Debug, Clone)]
pub struct FileCandidate<F> {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub file: F,
}

impl<F> FileCandidate<F> {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size_bytes: u64, file: F) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
            file,
        }
    }
}

/// Why a file was not imported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum ImportRejection {
    /// MIME type is not `audio/*`
    NotAudio { mime_type: String },
    /// File is at or above the size cap
    TooLarge { size_bytes: u64, max_bytes: u64 },
    /// The host could not create a playable source
    Unreadable { message: String },
}

/// Per-file result of an import batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Ids of the tracks created, in import order
    pub imported: Vec<String>,
    /// Rejected file names with the reason
    pub rejected: Vec<(String, ImportRejection)>,
}

impl ImportReport {
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }
}

/// Check type and size of a candidate
pub fn validate<F>(candidate: &FileCandidate<F>, max_bytes: u64) -> Result<(), ImportRejection> {
    if candidate.size_bytes >= max_bytes {
        return Err(ImportRejection::TooLarge {
            size_bytes: candidate.size_bytes,
            max_bytes,
        });
    }

    if !candidate.mime_type.starts_with(AUDIO_MIME_PREFIX) {
        return Err(ImportRejection::NotAudio {
            mime_type: candidate.mime_type.clone(),
        });
    }

    Ok(())
}

/// Title derived from a file name: the last extension is stripped
///
/// `"song.mp3"` → `"song"`, `"a.b.flac"` → `"a.b"`. Names without an
/// extension (or ending in a dot) are kept as they are.
pub fn title_from_file_name(name: &str) -> String {
    match name.rfind('.') {
        Some(dot) => {
            let extension = &name[dot + 1..];
            if extension.is_empty() || extension.contains('/') {
                name.to_string()
            } else {
                name[..dot].to_string()
            }
        }
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    fn candidate(name: &str, mime: &str, size: u64) -> FileCandidate<()> {
        FileCandidate::new(name, mime, size, ())
    }

    #[test]
    fn accepts_small_audio() {
        assert!(validate(&candidate("a.mp3", "audio/mpeg", 3 * MIB), 50 * MIB).is_ok());
    }

    #[test]
    fn rejects_at_size_cap() {
        let err = validate(&candidate("a.flac", "audio/flac", 50 * MIB), 50 * MIB).unwrap_err();
        assert_eq!(
            err,
            ImportRejection::TooLarge {
                size_bytes: 50 * MIB,
                max_bytes: 50 * MIB
            }
        );
        assert!(validate(&candidate("a.flac", "audio/flac", 50 * MIB - 1), 50 * MIB).is_ok());
    }

    #[test]
    fn rejects_non_audio() {
        let err = validate(&candidate("a.png", "image/png", 10), 50 * MIB).unwrap_err();
        assert!(matches!(err, ImportRejection::NotAudio { .. }));

        let err = validate(&candidate("a.mp3", "", 10), 50 * MIB).unwrap_err();
        assert!(matches!(err, ImportRejection::NotAudio { .. }));
    }

    #[test]
    fn title_strips_last_extension() {
        assert_eq!(title_from_file_name("song.mp3"), "song");
        assert_eq!(title_from_file_name("my.best.song.flac"), "my.best.song");
        assert_eq!(title_from_file_name("README"), "README");
        assert_eq!(title_from_file_name("trailing."), "trailing.");
        assert_eq!(title_from_file_name(".hidden"), "");
    }
}
