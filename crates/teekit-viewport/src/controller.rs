//! Gesture state machine.
//!
//! One active gesture at a time: Idle → Orbiting → Idle and
//! Idle → Dragging-Element → Idle, driven by pointer events. Scroll zoom is
//! independent of the current gesture. Rotation and resizing of the
//! selected element are explicit control calls, not surface gestures.

use tracing::debug;

use teekit_designer::{ElementId, ElementPatch, ElementStore};

use crate::camera::OrbitCamera;
use crate::mapper::screen_to_design;
use crate::mesh::GarmentMesh;

/// Radians of orbit per pixel of drag.
const ORBIT_SENSITIVITY: f32 = 0.008;

/// Zoom distance per scroll step.
const ZOOM_STEP: f32 = 0.25;

/// Design units moved per key nudge (ten with the fast modifier).
const NUDGE_STEP: f32 = 1.0;

/// The single active gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GesturePhase {
    Idle,
    Orbiting {
        last: (f32, f32),
    },
    DraggingElement {
        id: ElementId,
        /// Offset from the grabbed design point to the element's top-left,
        /// so the element does not jump to the cursor on the first move.
        grab_offset: (f32, f32),
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Translates pointer, scroll, and keyboard input into camera motion and
/// store mutations.
#[derive(Debug)]
pub struct ViewportController {
    camera: OrbitCamera,
    gesture: GesturePhase,
    viewport_size: (u32, u32),
}

impl ViewportController {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            camera: OrbitCamera::new(),
            gesture: GesturePhase::Idle,
            viewport_size: (width, height),
        }
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn gesture(&self) -> GesturePhase {
        self.gesture
    }

    pub fn gesture_active(&self) -> bool {
        self.gesture != GesturePhase::Idle
    }

    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        self.viewport_size = (width, height);
    }

    pub fn viewport_size(&self) -> (u32, u32) {
        self.viewport_size
    }

    /// Pointer press. On a projected element: select it exclusively and
    /// begin dragging. Anywhere else: clear the selection and begin
    /// orbiting.
    pub fn pointer_down(
        &mut self,
        x: f32,
        y: f32,
        store: &mut ElementStore,
        mesh: &GarmentMesh,
    ) {
        if let Some((dx, dy)) = screen_to_design((x, y), &self.camera, self.viewport_size, mesh) {
            if let Some((id, placement)) = store
                .topmost_at(dx, dy)
                .and_then(|id| store.get(id).map(|e| (id, e.placement)))
            {
                store.select(Some(id));
                self.gesture = GesturePhase::DraggingElement {
                    id,
                    grab_offset: (dx - placement.x, dy - placement.y),
                };
                debug!(%id, "begin element drag");
                return;
            }
        }

        if store.selected_id().is_some() {
            store.select(None);
        }
        self.gesture = GesturePhase::Orbiting { last: (x, y) };
        debug!("begin orbit");
    }

    /// Pointer motion for the active gesture.
    pub fn pointer_move(
        &mut self,
        x: f32,
        y: f32,
        store: &mut ElementStore,
        mesh: &GarmentMesh,
    ) {
        match self.gesture {
            GesturePhase::Idle => {}
            GesturePhase::Orbiting { last } => {
                let (lx, ly) = last;
                self.camera
                    .orbit((x - lx) * ORBIT_SENSITIVITY, (y - ly) * ORBIT_SENSITIVITY);
                self.gesture = GesturePhase::Orbiting { last: (x, y) };
            }
            GesturePhase::DraggingElement { id, grab_offset } => {
                // The grabbed point tracks the cursor across the curved
                // surface at whatever angle the camera currently has.
                if let Some((dx, dy)) =
                    screen_to_design((x, y), &self.camera, self.viewport_size, mesh)
                {
                    store.move_to(id, dx - grab_offset.0, dy - grab_offset.1);
                }
            }
        }
    }

    /// Pointer release ends any gesture.
    pub fn pointer_up(&mut self) {
        if self.gesture != GesturePhase::Idle {
            debug!("gesture ended");
        }
        self.gesture = GesturePhase::Idle;
    }

    /// Scroll zoom, clamped, independent of the active gesture.
    pub fn scroll(&mut self, steps: f32) {
        self.camera.zoom(steps * ZOOM_STEP);
    }

    /// Arrow-key nudge of the selected element.
    pub fn nudge_selected(
        &mut self,
        direction: NudgeDirection,
        fast: bool,
        store: &mut ElementStore,
    ) {
        let Some(id) = store.selected_id() else {
            return;
        };
        let Some(element) = store.get(id) else {
            return;
        };
        let step = if fast { NUDGE_STEP * 10.0 } else { NUDGE_STEP };
        let (dx, dy) = match direction {
            NudgeDirection::Left => (-step, 0.0),
            NudgeDirection::Right => (step, 0.0),
            NudgeDirection::Up => (0.0, -step),
            NudgeDirection::Down => (0.0, step),
        };
        let p = element.placement;
        store.move_to(id, p.x + dx, p.y + dy);
    }

    /// Control-driven rotation: adds `delta` degrees to the selected
    /// element's rotation (slider and increment buttons both land here).
    pub fn rotate_selected(&mut self, delta_degrees: f32, store: &mut ElementStore) {
        if let Some(id) = store.selected_id() {
            if let Some(element) = store.get(id) {
                store.rotate(id, element.placement.rotation + delta_degrees);
            }
        }
    }

    /// Control-driven absolute rotation.
    pub fn set_selected_rotation(&mut self, degrees: f32, store: &mut ElementStore) {
        if let Some(id) = store.selected_id() {
            store.rotate(id, degrees);
        }
    }

    /// Control-driven resize of the selected element.
    pub fn resize_selected(&mut self, width: f32, height: f32, store: &mut ElementStore) {
        if let Some(id) = store.selected_id() {
            store.update(
                id,
                ElementPatch {
                    width: Some(width),
                    height: Some(height),
                    ..Default::default()
                },
            );
        }
    }
}
