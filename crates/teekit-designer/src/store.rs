//! Canonical store of design elements.
//!
//! All layer mutation passes through `ElementStore`. Operations are
//! synchronous, idempotent given identical inputs, and totally ordered by
//! call order; there is no concurrent mutation path. The element list's
//! order is paint order.

use tracing::{debug, warn};

use teekit_core::constants::{
    CANVAS_HEIGHT, CANVAS_WIDTH, TEXT_DEFAULT_HEIGHT, TEXT_DEFAULT_WIDTH, TEXT_DEFAULT_X,
    TEXT_DEFAULT_Y,
};
use teekit_core::Color;

use crate::ingest::FittedImage;
use crate::model::{
    normalize_degrees, DesignElement, ElementId, ElementKind, Placement, TextStyle,
};
use crate::selection::SelectionState;

/// Partial update applied by [`ElementStore::update`]. Fields left `None`
/// are untouched.
#[derive(Debug, Clone, Default)]
pub struct ElementPatch {
    pub content: Option<String>,
    pub color: Option<Color>,
    pub font_size: Option<f32>,
    pub rotation: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

/// Ordered collection of layers plus the single-selection state.
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: Vec<DesignElement>,
    selection: SelectionState,
    next_id: u64,
    revision: u64,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a text layer at the fixed default placement and returns its id.
    pub fn add_text(&mut self, content: &str, color: Color, font_size: f32) -> ElementId {
        let id = self.generate_id();
        let element = DesignElement {
            id,
            placement: Placement::new(
                TEXT_DEFAULT_X,
                TEXT_DEFAULT_Y,
                TEXT_DEFAULT_WIDTH,
                TEXT_DEFAULT_HEIGHT,
            ),
            kind: ElementKind::Text {
                content: content.to_string(),
                style: TextStyle {
                    font_size,
                    font_family: "Sans".to_string(),
                    color,
                },
            },
        };
        debug!(%id, content, "adding text layer");
        self.elements.push(element);
        self.bump();
        id
    }

    /// Appends an ingested image layer as fitted by asset ingestion.
    /// Paint order is upload order.
    pub fn add_image(&mut self, fitted: FittedImage) -> ElementId {
        let id = self.generate_id();
        let (w, h) = fitted.payload.intrinsic_size();
        debug!(%id, intrinsic_width = w, intrinsic_height = h, "adding image layer");
        self.elements.push(DesignElement {
            id,
            placement: fitted.placement,
            kind: ElementKind::Image(fitted.payload),
        });
        self.bump();
        id
    }

    /// Generic patch for content, color, font size, rotation, and extent.
    ///
    /// An unknown id is a logged no-op: the UI never offers stale ids, but
    /// the store must not crash if one arrives anyway. Style fields on an
    /// image layer are ignored.
    pub fn update(&mut self, id: ElementId, patch: ElementPatch) {
        let Some(element) = self.elements.iter_mut().find(|e| e.id == id) else {
            warn!(%id, "update for unknown element ignored");
            return;
        };

        if let ElementKind::Text { content, style } = &mut element.kind {
            if let Some(new_content) = patch.content {
                *content = new_content;
            }
            if let Some(color) = patch.color {
                style.color = color;
            }
            if let Some(font_size) = patch.font_size {
                style.font_size = font_size.max(1.0);
            }
        }

        if let Some(rotation) = patch.rotation {
            element.placement.rotation = normalize_degrees(rotation);
        }
        if let Some(width) = patch.width {
            element.placement.width = width.clamp(1.0, CANVAS_WIDTH);
        }
        if let Some(height) = patch.height {
            element.placement.height = height.clamp(1.0, CANVAS_HEIGHT);
        }
        // A grown layer may now hang over the canvas edge.
        element.placement.clamp_position();
        self.bump();
    }

    /// Moves a layer's top-left corner, clamped so the layer stays inside
    /// the canvas.
    pub fn move_to(&mut self, id: ElementId, x: f32, y: f32) {
        let Some(element) = self.elements.iter_mut().find(|e| e.id == id) else {
            warn!(%id, "move for unknown element ignored");
            return;
        };
        element.placement.x = x;
        element.placement.y = y;
        element.placement.clamp_position();
        self.bump();
    }

    /// Stores `degrees` normalized to `[0, 360)`.
    pub fn rotate(&mut self, id: ElementId, degrees: f32) {
        let Some(element) = self.elements.iter_mut().find(|e| e.id == id) else {
            warn!(%id, "rotate for unknown element ignored");
            return;
        };
        element.placement.rotation = normalize_degrees(degrees);
        self.bump();
    }

    /// Deletes a layer. Clears the selection if it referenced the layer.
    pub fn remove(&mut self, id: ElementId) {
        let before = self.elements.len();
        self.elements.retain(|e| e.id != id);
        if self.elements.len() != before {
            debug!(%id, "removed layer");
            self.selection.forget(id);
            self.bump();
        } else {
            warn!(%id, "remove for unknown element ignored");
        }
    }

    /// Selects a layer exclusively, or clears the selection with `None`.
    /// Selecting an id not present in the store is rejected: the current
    /// selection is left unchanged.
    pub fn select(&mut self, id: Option<ElementId>) {
        match id {
            None => {
                self.selection.clear();
                self.bump();
            }
            Some(id) => {
                if self.elements.iter().any(|e| e.id == id) {
                    self.selection.set(id);
                    self.bump();
                } else {
                    warn!(%id, "select for unknown element rejected");
                }
            }
        }
    }

    /// Drops every layer and the selection. Used after a successful order
    /// submission and when a new configuration is loaded.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.selection.clear();
        self.bump();
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selected_id(&self) -> Option<ElementId> {
        self.selection.selected_id()
    }

    pub fn get(&self, id: ElementId) -> Option<&DesignElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Layers in paint order (first element is painted first, i.e. at the
    /// bottom of the stack).
    pub fn iter(&self) -> impl Iterator<Item = &DesignElement> {
        self.elements.iter()
    }

    /// Topmost layer whose rotated bounds contain the design-space point.
    pub fn topmost_at(&self, x: f32, y: f32) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.placement.contains(x, y))
            .map(|e| e.id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Monotonic counter bumped on every mutation. Lets the viewport detect
    /// that a re-composite is due without a callback channel.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn generate_id(&mut self) -> ElementId {
        self.next_id += 1;
        ElementId(self.next_id)
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_text() -> (ElementStore, ElementId) {
        let mut store = ElementStore::new();
        let id = store.add_text("HELLO", Color::parse("#FF0000").unwrap(), 24.0);
        (store, id)
    }

    #[test]
    fn add_text_uses_fixed_defaults() {
        let (store, id) = store_with_text();
        let element = store.get(id).unwrap();
        assert_eq!(element.placement.x, 150.0);
        assert_eq!(element.placement.y, 200.0);
        assert_eq!(element.placement.width, 200.0);
        assert_eq!(element.placement.height, 50.0);
        assert_eq!(element.placement.rotation, 0.0);
        match &element.kind {
            ElementKind::Text { content, style } => {
                assert_eq!(content, "HELLO");
                assert_eq!(style.color.to_hex(), "#FF0000");
                assert_eq!(style.font_size, 24.0);
            }
            _ => panic!("expected a text layer"),
        }
    }

    #[test]
    fn rotate_normalizes_into_range() {
        let (mut store, id) = store_with_text();
        store.rotate(id, 450.0);
        assert_eq!(store.get(id).unwrap().placement.rotation, 90.0);

        store.rotate(id, 350.0);
        store.rotate(id, 350.0 + 90.0);
        assert_eq!(store.get(id).unwrap().placement.rotation, 80.0);
    }

    #[test]
    fn move_clamps_to_canvas() {
        let (mut store, id) = store_with_text();
        store.move_to(id, -50.0, 700.0);
        let p = store.get(id).unwrap().placement;
        assert_eq!((p.x, p.y), (0.0, 550.0));
    }

    #[test]
    fn removing_selected_clears_selection() {
        let (mut store, id) = store_with_text();
        store.select(Some(id));
        assert_eq!(store.selected_id(), Some(id));
        store.remove(id);
        assert_eq!(store.selected_id(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn selecting_unknown_id_is_rejected() {
        let (mut store, id) = store_with_text();
        store.select(Some(id));
        store.select(Some(ElementId(999)));
        assert_eq!(store.selected_id(), Some(id));
    }

    #[test]
    fn unknown_id_mutations_are_noops() {
        let (mut store, id) = store_with_text();
        let revision = store.revision();
        store.move_to(ElementId(999), 10.0, 10.0);
        store.rotate(ElementId(999), 45.0);
        store.update(ElementId(999), ElementPatch::default());
        store.remove(ElementId(999));
        assert_eq!(store.revision(), revision);
        assert!(store.get(id).is_some());
    }

    #[test]
    fn ids_are_never_reused() {
        let mut store = ElementStore::new();
        let a = store.add_text("a", Color::BLACK, 12.0);
        store.remove(a);
        let b = store.add_text("b", Color::BLACK, 12.0);
        assert_ne!(a, b);
    }

    #[test]
    fn topmost_hit_prefers_later_layers() {
        let mut store = ElementStore::new();
        let bottom = store.add_text("bottom", Color::BLACK, 12.0);
        let top = store.add_text("top", Color::BLACK, 12.0);
        // Both share the default placement; the later layer wins.
        assert_eq!(store.topmost_at(250.0, 225.0), Some(top));
        store.remove(top);
        assert_eq!(store.topmost_at(250.0, 225.0), Some(bottom));
    }
}
