//! WASM bindings for cassette-playback
//!
//! Browser implementations of the output device (`<audio>`) and the
//! now-playing surface (`navigator.mediaSession`), plus the `WasmPlayer`
//! handle exported to JavaScript.

pub mod media_session;
pub mod output;
pub mod player;
pub mod types;

pub use media_session::MediaSessionSurface;
pub use output::HtmlAudioOutput;
pub use player::WasmPlayer;
pub use types::{WasmSnapshot, WasmTrack};
