//! Single-selection state.
//!
//! At most one element is selected at a time. The selection is a non-owning
//! reference into the element list: removing the referenced element, loading
//! a new configuration, or an explicit deselect all reset it to `None`.

use crate::model::ElementId;

/// Tracks which element, if any, is currently selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<ElementId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_id(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected == Some(id)
    }

    /// Selects `id` exclusively; any previous selection is replaced.
    pub(crate) fn set(&mut self, id: ElementId) {
        self.selected = Some(id);
    }

    pub(crate) fn clear(&mut self) {
        self.selected = None;
    }

    /// Drops the selection if it references `id`.
    pub(crate) fn forget(&mut self, id: ElementId) {
        if self.selected == Some(id) {
            self.selected = None;
        }
    }
}
