//! Fixed dimensions and limits shared across the workspace.

use crate::color::Color;

/// Width of the printable design space in logical units.
pub const CANVAS_WIDTH: f32 = 500.0;

/// Height of the printable design space in logical units.
pub const CANVAS_HEIGHT: f32 = 600.0;

/// Uploaded images are aspect-fitted into this square bounding box.
pub const IMAGE_FIT_BOX: f32 = 200.0;

/// Default placement for a freshly ingested image, identical across garment
/// styles. Deliberate simplification: not derived from model geometry.
pub const IMAGE_DEFAULT_X: f32 = 50.0;
pub const IMAGE_DEFAULT_Y: f32 = 150.0;

/// Default placement and extent for a freshly added text element.
pub const TEXT_DEFAULT_X: f32 = 150.0;
pub const TEXT_DEFAULT_Y: f32 = 200.0;
pub const TEXT_DEFAULT_WIDTH: f32 = 200.0;
pub const TEXT_DEFAULT_HEIGHT: f32 = 50.0;

/// Upload size ceiling in bytes (10 MiB).
pub const UPLOAD_SIZE_LIMIT: u64 = 10 * 1024 * 1024;

/// Orbit camera zoom distance clamp.
pub const MIN_ZOOM_DISTANCE: f32 = 1.6;
pub const MAX_ZOOM_DISTANCE: f32 = 8.0;

/// Square pixel size of the canonical export raster.
pub const EXPORT_SIZE: u32 = 1024;

/// Built-in garment base color swatches offered by the UI.
pub const BASE_COLOR_SWATCHES: [Color; 6] = [
    Color::WHITE,
    Color::BLACK,
    Color::new(0xE6, 0x39, 0x46), // red
    Color::new(0x45, 0x7B, 0x9D), // steel blue
    Color::new(0x2A, 0x9D, 0x8F), // teal
    Color::new(0xF4, 0xA2, 0x61), // sand
];
