//! WASM-compatible type definitions

use crate::{CreateTrack, Track, TrackSource};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// WASM-compatible track
///
/// Flattened version of [`Track`] with the source as a plain URL string.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
#[wasm_bindgen]
pub struct WasmTrack {
    id: String,
    title: String,
    artist: String,
    album_art: String,
    saved: bool,
    src: String,
}

#[wasm_bindgen]
impl WasmTrack {
    /// Create a track from a URL; empty fields fall back to the defaults
    #[wasm_bindgen(constructor)]
    pub fn new(id: String, src: String, title: String, artist: String, album_art: String) -> Self {
        Self::from(&Track::from(
            CreateTrack::new(id, TrackSource::from_url(src))
                .title(title)
                .artist(artist)
                .album_art(album_art),
        ))
    }

    #[wasm_bindgen(getter)]
    pub fn id(&self) -> String {
        self.id.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn title(&self) -> String {
        self.title.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn artist(&self) -> String {
        self.artist.clone()
    }

    #[wasm_bindgen(getter, js_name = albumArt)]
    pub fn album_art(&self) -> String {
        self.album_art.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn saved(&self) -> bool {
        self.saved
    }

    #[wasm_bindgen(getter)]
    pub fn src(&self) -> String {
        self.src.clone()
    }
}

impl From<&Track> for WasmTrack {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            album_art: track.album_art.clone(),
            saved: track.saved,
            src: track.source.as_str().to_string(),
        }
    }
}

impl From<WasmTrack> for Track {
    fn from(track: WasmTrack) -> Self {
        CreateTrack::new(track.id, TrackSource::from_url(track.src))
            .title(track.title)
            .artist(track.artist)
            .album_art(track.album_art)
            .saved(track.saved)
            .into()
    }
}
