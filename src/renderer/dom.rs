//! DOM renderer
//!
//! Every sprite is an absolutely positioned element inside the game
//! container. Platforms are laid out in percent of the container; the player
//! is bottom-anchored in pixels scaled from the field height.

use std::collections::BTreeMap;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use super::{RenderAdapter, Sprite};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Player,
    Platform,
}

pub struct DomRenderer {
    document: Document,
    container: Element,
    field_height: f32,
    elements: BTreeMap<usize, (Kind, HtmlElement)>,
    next_handle: usize,
}

impl DomRenderer {
    /// Attach to the element with the given id
    pub fn new(document: Document, container_id: &str, field_height: f32) -> Result<Self> {
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| Error::MissingElement(container_id.to_string()))?;
        Ok(Self {
            document,
            container,
            field_height,
            elements: BTreeMap::new(),
            next_handle: 0,
        })
    }

    /// Player-frame pixels to container pixels
    fn scale(&self) -> f32 {
        let height = self.container.client_height() as f32;
        if height > 0.0 {
            height / self.field_height
        } else {
            1.0
        }
    }

    fn place(&self, kind: Kind, element: &HtmlElement, pos: Vec2) {
        let style = element.style();
        let _ = style.set_property("left", &format!("{}%", pos.x));
        match kind {
            Kind::Player => {
                let _ = style.set_property("bottom", &format!("{}px", pos.y * self.scale()));
            }
            Kind::Platform => {
                let _ = style.set_property("top", &format!("{}%", pos.y));
            }
        }
    }

    /// Restart a CSS animation on the element
    fn animate(&self, handle: usize, animation: &str) {
        if let Some((_, element)) = self.elements.get(&handle) {
            let style = element.style();
            let _ = style.set_property("animation", "none");
            let _ = element.offset_width();
            let _ = style.set_property("animation", animation);
        }
    }

    fn create(&self, class: &str) -> Option<HtmlElement> {
        let element = self.document.create_element("div").ok()?;
        element.set_class_name(class);
        self.container.append_child(&element).ok()?;
        element.dyn_into::<HtmlElement>().ok()
    }
}

impl RenderAdapter for DomRenderer {
    type Handle = usize;

    fn render(&mut self, sprite: &Sprite) -> usize {
        let (kind, class) = match sprite {
            Sprite::Player { .. } => (Kind::Player, "player"),
            Sprite::Platform { .. } => (Kind::Platform, "stepDesign"),
        };

        let handle = self.next_handle;
        self.next_handle += 1;
        let Some(element) = self.create(class) else {
            log::warn!("Failed to create {} element", class);
            return handle;
        };

        let style = element.style();
        let _ = style.set_property("position", "absolute");
        match sprite {
            Sprite::Player { width, .. } => {
                let _ = style.set_property("width", &format!("{}%", width));
            }
            Sprite::Platform { size, .. } => {
                let _ = style.set_property("width", &format!("{}%", size.x));
                let _ = style.set_property("height", &format!("{}%", size.y));
            }
        }
        self.place(kind, &element, sprite.pos());
        self.elements.insert(handle, (kind, element));
        handle
    }

    fn update_position(&mut self, handle: usize, pos: Vec2) {
        if let Some((kind, element)) = self.elements.get(&handle) {
            self.place(*kind, element, pos);
        }
    }

    fn remove(&mut self, handle: usize) {
        if let Some((_, element)) = self.elements.remove(&handle) {
            element.remove();
        }
    }

    fn spin(&mut self, handle: usize) {
        self.animate(handle, "spin 0.5s ease-in-out");
    }

    fn fall_spin(&mut self, handle: usize) {
        self.animate(handle, "spinFall 2s ease-in forwards");
    }

    fn set_character(&mut self, handle: usize, character: usize) {
        if let Some((Kind::Player, element)) = self.elements.get(&handle) {
            element.set_class_name(&format!("player character-{}", character));
        }
    }
}
