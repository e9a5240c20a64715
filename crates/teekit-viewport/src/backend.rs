//! Pluggable viewport rendering backends.
//!
//! The gesture controller and coordinate mapper are backend-agnostic; only
//! the final pixels differ by rendering technology. Backends implement one
//! trait so the capability contract (render a scene to a frame) is fixed
//! regardless of how the pixels are produced.

use image::RgbaImage;
use tiny_skia::Pixmap;
use tracing::trace;

use teekit_core::{Color, RenderError};

use crate::camera::CameraPose;
use crate::mesh::GarmentMesh;
use crate::render::rasterize_scene;

/// Everything a backend needs to draw one frame.
pub struct SceneParams<'a> {
    pub mesh: &'a GarmentMesh,
    pub texture: &'a Pixmap,
    pub base_color: Color,
    pub pose: CameraPose,
    pub width: u32,
    pub height: u32,
}

/// A rendering technology behind the viewport.
pub trait ViewportBackend: Send {
    fn name(&self) -> &'static str;

    /// Draws one frame of the scene.
    fn render(&mut self, scene: &SceneParams<'_>) -> Result<RgbaImage, RenderError>;
}

/// CPU rasterizer backend. Always available; also the reference
/// implementation any accelerated backend must match.
#[derive(Debug, Default)]
pub struct SoftwareBackend;

impl SoftwareBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ViewportBackend for SoftwareBackend {
    fn name(&self) -> &'static str {
        "software"
    }

    fn render(&mut self, scene: &SceneParams<'_>) -> Result<RgbaImage, RenderError> {
        trace!(width = scene.width, height = scene.height, "software frame");
        Ok(rasterize_scene(
            scene.mesh,
            scene.texture,
            scene.base_color,
            &scene.pose,
            scene.width,
            scene.height,
        ))
    }
}

/// Headless backend for tests: produces blank frames and counts them.
#[derive(Debug, Default)]
pub struct NullBackend {
    pub frames_rendered: usize,
}

impl NullBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ViewportBackend for NullBackend {
    fn name(&self) -> &'static str {
        "null"
    }

    fn render(&mut self, scene: &SceneParams<'_>) -> Result<RgbaImage, RenderError> {
        self.frames_rendered += 1;
        Ok(RgbaImage::new(scene.width, scene.height))
    }
}
