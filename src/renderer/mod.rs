//! Rendering adapters
//!
//! The simulation never draws anything. The driver pushes sprites and
//! position updates through `RenderAdapter`; it never reads layout back.

use std::collections::BTreeMap;

use glam::Vec2;

#[cfg(target_arch = "wasm32")]
pub mod dom;

#[cfg(target_arch = "wasm32")]
pub use dom::DomRenderer;

/// Something the adapter can draw, in simulation units
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sprite {
    /// x: percent of field width, y: bottom-anchored player-frame pixels
    Player { pos: Vec2, width: f32 },
    /// x: percent of field width, y: top edge in percent; size in percent
    Platform { pos: Vec2, size: Vec2 },
}

impl Sprite {
    pub fn pos(&self) -> Vec2 {
        match self {
            Sprite::Player { pos, .. } | Sprite::Platform { pos, .. } => *pos,
        }
    }
}

/// Render collaborator
pub trait RenderAdapter {
    type Handle: Copy + Eq + std::fmt::Debug;

    /// Create the visual for a sprite
    fn render(&mut self, sprite: &Sprite) -> Self::Handle;

    /// Move an existing visual (same units as the sprite it was created from)
    fn update_position(&mut self, handle: Self::Handle, pos: Vec2);

    /// Drop a visual
    fn remove(&mut self, handle: Self::Handle);

    /// One-shot spin animation (wall bump)
    fn spin(&mut self, _handle: Self::Handle) {}

    /// Long spinning fall played before the game-over screen
    fn fall_spin(&mut self, handle: Self::Handle) {
        self.spin(handle);
    }

    /// Switch the player's look to character `character`
    fn set_character(&mut self, _handle: Self::Handle, _character: usize) {}
}

/// Renderer that only keeps sprites in memory
///
/// Used by the native build and by tests.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    sprites: BTreeMap<u32, Sprite>,
    next_handle: u32,
    /// Spin requests received, per handle
    pub spins: BTreeMap<u32, u32>,
    /// Current character per handle
    pub characters: BTreeMap<u32, usize>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sprite(&self, handle: u32) -> Option<&Sprite> {
        self.sprites.get(&handle)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

impl RenderAdapter for HeadlessRenderer {
    type Handle = u32;

    fn render(&mut self, sprite: &Sprite) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.sprites.insert(handle, *sprite);
        handle
    }

    fn update_position(&mut self, handle: u32, new_pos: Vec2) {
        if let Some(sprite) = self.sprites.get_mut(&handle) {
            match sprite {
                Sprite::Player { pos, .. } | Sprite::Platform { pos, .. } => *pos = new_pos,
            }
        }
    }

    fn remove(&mut self, handle: u32) {
        self.sprites.remove(&handle);
        self.characters.remove(&handle);
    }

    fn spin(&mut self, handle: u32) {
        *self.spins.entry(handle).or_default() += 1;
    }

    fn set_character(&mut self, handle: u32, character: usize) {
        self.characters.insert(handle, character);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_lifecycle() {
        let mut renderer = HeadlessRenderer::new();
        let player = renderer.render(&Sprite::Player {
            pos: Vec2::new(10.0, 0.0),
            width: 5.0,
        });
        let platform = renderer.render(&Sprite::Platform {
            pos: Vec2::new(20.0, 0.0),
            size: Vec2::new(15.0, 5.0),
        });
        assert_ne!(player, platform);
        assert_eq!(renderer.len(), 2);

        renderer.update_position(player, Vec2::new(15.0, 30.0));
        assert_eq!(renderer.sprite(player).map(Sprite::pos), Some(Vec2::new(15.0, 30.0)));

        renderer.spin(player);
        renderer.spin(player);
        assert_eq!(renderer.spins.get(&player), Some(&2));

        renderer.remove(platform);
        assert!(renderer.sprite(platform).is_none());
        assert_eq!(renderer.len(), 1);
    }
}
