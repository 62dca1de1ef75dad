//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keyboard, touch) decoded into intents
//! - Device detection (touch vs desktop layout)

pub mod input;

pub use input::{KeyCommand, TouchDecoder, key_command};

use crate::settings::Layout;

/// Media query matching phones and tablets
pub const TOUCH_MEDIA_QUERY: &str = "(hover: none) and (pointer: coarse)";

/// Layout for the current device
#[cfg(target_arch = "wasm32")]
pub fn detect_layout() -> Layout {
    let is_touch = web_sys::window()
        .and_then(|w| w.match_media(TOUCH_MEDIA_QUERY).ok().flatten())
        .map(|mq| mq.matches())
        .unwrap_or(false);
    if is_touch { Layout::Touch } else { Layout::Desktop }
}

/// Native builds have no touch screen
#[cfg(not(target_arch = "wasm32"))]
pub fn detect_layout() -> Layout {
    Layout::Desktop
}
