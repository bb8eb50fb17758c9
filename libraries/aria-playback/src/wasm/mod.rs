//! WASM bindings for aria-playback
//!
//! This module provides WebAssembly bindings for the PlaybackManager,
//! backed by an `<audio>` element, `localStorage` and `Date.now()`.

#[cfg(feature = "wasm")]
pub mod browser;

#[cfg(feature = "wasm")]
pub mod manager;

#[cfg(feature = "wasm")]
pub mod types;

#[cfg(feature = "wasm")]
pub use manager::WasmPlayer;

#[cfg(feature = "wasm")]
pub use types::WasmTrack;
