//! Input decoding
//!
//! Turns raw keyboard and touch events into intents. Gesture timing lives
//! here so the simulation only ever sees discrete intents.

use crate::sim::Intent;

/// Two taps closer than this (ms) make a jump
pub const DOUBLE_TAP_MS: f64 = 300.0;

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Intent(Intent),
    /// Toggle the autopilot
    ToggleIdle,
    /// Cycle the player's character look
    SwitchCharacter,
}

/// Map a `KeyboardEvent.key` value
pub fn key_command(key: &str) -> Option<KeyCommand> {
    let intent = match key {
        "ArrowLeft" | "a" | "A" => Intent::MoveLeft,
        "ArrowRight" | "d" | "D" => Intent::MoveRight,
        " " | "ArrowUp" | "w" | "W" => Intent::Jump,
        "Escape" | "p" | "P" => Intent::TogglePause,
        "r" | "R" => Intent::Restart,
        "i" | "I" => return Some(KeyCommand::ToggleIdle),
        "c" | "C" => return Some(KeyCommand::SwitchCharacter),
        _ => return None,
    };
    Some(KeyCommand::Intent(intent))
}

/// Touch gestures: left/right half moves, double tap jumps, double tap
/// on the player switches character
#[derive(Debug, Clone, Default)]
pub struct TouchDecoder {
    last_tap_ms: Option<f64>,
    last_player_tap_ms: Option<f64>,
    moving: bool,
}

impl TouchDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finger down at `x` inside a container `width` wide
    pub fn touch_start(&mut self, x: f32, width: f32) -> Intent {
        self.moving = true;
        side_intent(x, width)
    }

    /// Finger dragged; keeps moving toward the touched side
    pub fn touch_move(&mut self, x: f32, width: f32) -> Option<Intent> {
        self.moving.then(|| side_intent(x, width))
    }

    /// Finger lifted at `now_ms`; a quick second tap jumps
    pub fn touch_end(&mut self, now_ms: f64) -> Option<Intent> {
        self.moving = false;
        double_tap(&mut self.last_tap_ms, now_ms).then_some(Intent::Jump)
    }

    /// Finger lifted on the player itself; true on a double tap
    ///
    /// These taps are kept apart from the field taps so they never jump.
    pub fn player_tap(&mut self, now_ms: f64) -> bool {
        self.moving = false;
        double_tap(&mut self.last_player_tap_ms, now_ms)
    }
}

/// Record a tap at `now_ms`; a double tap consumes both taps
fn double_tap(last_tap_ms: &mut Option<f64>, now_ms: f64) -> bool {
    let hit = last_tap_ms
        .map(|last| {
            let gap = now_ms - last;
            gap > 0.0 && gap < DOUBLE_TAP_MS
        })
        .unwrap_or(false);
    *last_tap_ms = if hit { None } else { Some(now_ms) };
    hit
}

fn side_intent(x: f32, width: f32) -> Intent {
    if x < width / 2.0 {
        Intent::MoveLeft
    } else {
        Intent::MoveRight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_command("ArrowLeft"), Some(KeyCommand::Intent(Intent::MoveLeft)));
        assert_eq!(key_command("ArrowRight"), Some(KeyCommand::Intent(Intent::MoveRight)));
        assert_eq!(key_command(" "), Some(KeyCommand::Intent(Intent::Jump)));
        assert_eq!(key_command("Escape"), Some(KeyCommand::Intent(Intent::TogglePause)));
        assert_eq!(key_command("R"), Some(KeyCommand::Intent(Intent::Restart)));
        assert_eq!(key_command("i"), Some(KeyCommand::ToggleIdle));
        assert_eq!(key_command("c"), Some(KeyCommand::SwitchCharacter));
        assert_eq!(key_command("Shift"), None);
    }

    #[test]
    fn test_touch_sides() {
        let mut touch = TouchDecoder::new();
        assert_eq!(touch.touch_start(10.0, 400.0), Intent::MoveLeft);
        assert_eq!(touch.touch_move(300.0, 400.0), Some(Intent::MoveRight));
        touch.touch_end(1000.0);
        assert_eq!(touch.touch_move(300.0, 400.0), None);
    }

    #[test]
    fn test_double_tap_jumps() {
        let mut touch = TouchDecoder::new();
        assert_eq!(touch.touch_end(1000.0), None);
        assert_eq!(touch.touch_end(1200.0), Some(Intent::Jump));
        // Third tap starts a new pair
        assert_eq!(touch.touch_end(1350.0), None);
        // Too slow
        assert_eq!(touch.touch_end(1800.0), None);
    }

    #[test]
    fn test_player_double_tap_is_separate() {
        let mut touch = TouchDecoder::new();
        assert!(!touch.player_tap(1000.0));
        // A field tap in between does not pair with the player tap
        assert_eq!(touch.touch_end(1100.0), None);
        assert!(touch.player_tap(1200.0));
        assert!(!touch.player_tap(1250.0));
    }
}
