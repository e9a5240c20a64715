//! Design element model.
//!
//! A design is an ordered list of `DesignElement` layers placed on the fixed
//! 500×600 logical design space. List order is paint order: later entries
//! render above earlier ones. There is no separate z-index.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use teekit_core::constants::{CANVAS_HEIGHT, CANVAS_WIDTH};
use teekit_core::Color;

/// Opaque, stable identifier of a placed layer. Assigned by the store at
/// creation and never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub(crate) u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "element-{}", self.0)
    }
}

/// Position and extent of a layer in design space, plus its rotation about
/// its own center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Top-left X in design units. Invariant: `0 ≤ x` and `x + width ≤ 500`.
    pub x: f32,
    /// Top-left Y in design units. Invariant: `0 ≤ y` and `y + height ≤ 600`.
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Degrees, always normalized to `[0, 360)`.
    pub rotation: f32,
}

impl Placement {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        let mut p = Self {
            x,
            y,
            width,
            height,
            rotation: 0.0,
        };
        p.clamp_position();
        p
    }

    /// Center of the layer in design space; the rotation pivot.
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Clamps the top-left corner so the layer stays inside the canvas.
    pub fn clamp_position(&mut self) {
        self.x = self.x.min(CANVAS_WIDTH - self.width).max(0.0);
        self.y = self.y.min(CANVAS_HEIGHT - self.height).max(0.0);
    }

    /// Rotation-aware point test in design space.
    ///
    /// The point is rotated into the layer's local frame, then tested
    /// against the unrotated half extents.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        let (cx, cy) = self.center();
        let angle = -self.rotation.to_radians();
        let (sin, cos) = angle.sin_cos();
        let dx = px - cx;
        let dy = py - cy;
        let local_x = dx * cos - dy * sin;
        let local_y = dx * sin + dy * cos;
        local_x.abs() <= self.width / 2.0 && local_y.abs() <= self.height / 2.0
    }
}

/// Normalizes an angle in degrees to the half-open range `[0, 360)`.
pub fn normalize_degrees(degrees: f32) -> f32 {
    let normalized = degrees.rem_euclid(360.0);
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Visual style of a text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size: f32,
    pub font_family: String,
    pub color: Color,
}

/// An uploaded image: the encoded payload as received, plus the pixels
/// decoded once at ingestion. Compositing never re-decodes.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub encoded: Vec<u8>,
    pub pixels: RgbaImage,
}

impl ImagePayload {
    /// Intrinsic pixel dimensions of the decoded image.
    pub fn intrinsic_size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

/// The closed set of layer kinds. There are no other kinds.
#[derive(Debug, Clone)]
pub enum ElementKind {
    Text { content: String, style: TextStyle },
    Image(ImagePayload),
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Text { .. } => "text",
            ElementKind::Image(_) => "image",
        }
    }
}

/// One placed layer of the design.
#[derive(Debug, Clone)]
pub struct DesignElement {
    pub id: ElementId,
    pub placement: Placement,
    pub kind: ElementKind,
}

impl DesignElement {
    pub fn is_text(&self) -> bool {
        matches!(self.kind, ElementKind::Text { .. })
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, ElementKind::Image(_))
    }
}
