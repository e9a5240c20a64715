//! The design session's root aggregate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use teekit_core::Color;

use crate::store::ElementStore;

/// Reference to a garment model asset, as handed out by the model
/// catalogue. `path` is either a `builtin:` token or a mesh file path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRef {
    pub path: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
}

impl ModelRef {
    /// The single built-in entry used when the catalogue is unreachable.
    pub fn builtin() -> Self {
        Self {
            path: "builtin:classic-tee".to_string(),
            display_name: "Classic Tee".to_string(),
        }
    }

    pub fn is_builtin(&self) -> bool {
        self.path.starts_with("builtin:")
    }
}

/// A design session: base color, chosen garment model, and the ordered
/// layer store. Loading a new configuration starts from a fresh store, so
/// selection is naturally null.
#[derive(Debug, Clone)]
pub struct GarmentConfiguration {
    pub design_id: Uuid,
    pub base_color: Color,
    pub model: ModelRef,
    pub store: ElementStore,
}

impl GarmentConfiguration {
    pub fn new(model: ModelRef, base_color: Color) -> Self {
        Self {
            design_id: Uuid::new_v4(),
            base_color,
            model,
            store: ElementStore::new(),
        }
    }

    pub fn set_base_color(&mut self, color: Color) {
        self.base_color = color;
    }

    /// Switches the garment model, keeping the placed layers. The design
    /// space is the same 500×600 canvas for every model.
    pub fn set_model(&mut self, model: ModelRef) {
        self.model = model;
    }
}

impl Default for GarmentConfiguration {
    fn default() -> Self {
        Self::new(ModelRef::builtin(), Color::WHITE)
    }
}
