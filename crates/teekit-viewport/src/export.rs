//! Deterministic export rendering.
//!
//! Both entry points — PNG bytes for order submission and a writer sink
//! for downloads — share one implementation, so given identical
//! `(base color, elements, model reference)` they produce byte-identical
//! output. The camera pose is the canonical constant; live viewport state
//! cannot reach this path.
//!
//! Exports are logically exclusive: a second request while one is in
//! flight fails fast with [`RenderError::ExportInFlight`] instead of
//! queueing. An export either completes or fails; no partial image is ever
//! handed out, and the design store is never touched here.

use std::io::Write;
use std::sync::Arc;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use parking_lot::Mutex;
use tracing::info;

use teekit_core::constants::EXPORT_SIZE;
use teekit_core::RenderError;
use teekit_designer::{Compositor, GarmentConfiguration};

use crate::camera::CameraPose;
use crate::mapper::design_to_export_frame;
use crate::mesh::GarmentMesh;
use crate::render::rasterize_scene;

/// Renders the finished design to a reproducible image.
pub struct ExportRenderer {
    compositor: Arc<Compositor>,
    in_flight: Mutex<()>,
}

impl ExportRenderer {
    /// The compositor is shared with the live viewport: one compositing
    /// implementation for both paths.
    pub fn new(compositor: Arc<Compositor>) -> Self {
        Self {
            compositor,
            in_flight: Mutex::new(()),
        }
    }

    /// Renders the canonical export image and returns the PNG bytes.
    pub fn render_png_bytes(&self, config: &GarmentConfiguration) -> Result<Vec<u8>, RenderError> {
        let _guard = self
            .in_flight
            .try_lock()
            .ok_or(RenderError::ExportInFlight)?;

        info!(design = %config.design_id, model = %config.model.path, "export started");

        let instructions = design_to_export_frame(&self.compositor, config)?;
        let mesh = GarmentMesh::load(&config.model)?;
        let frame = rasterize_scene(
            &mesh,
            &instructions.texture,
            instructions.base_color,
            &CameraPose::canonical(),
            EXPORT_SIZE,
            EXPORT_SIZE,
        );

        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes)
            .write_image(
                frame.as_raw(),
                frame.width(),
                frame.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| RenderError::Encode {
                reason: e.to_string(),
            })?;

        info!(design = %config.design_id, size = bytes.len(), "export finished");
        Ok(bytes)
    }

    /// Streams the export image into `out` (the download path). Identical
    /// bytes to [`Self::render_png_bytes`] by construction.
    pub fn write_png(
        &self,
        config: &GarmentConfiguration,
        out: &mut impl Write,
    ) -> Result<(), RenderError> {
        let bytes = self.render_png_bytes(config)?;
        out.write_all(&bytes).map_err(|e| RenderError::Encode {
            reason: e.to_string(),
        })
    }
}

impl std::fmt::Debug for ExportRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportRenderer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teekit_core::Color;
    use teekit_designer::{FontStore, ModelRef};

    fn exporter() -> ExportRenderer {
        ExportRenderer::new(Arc::new(Compositor::new(FontStore::empty())))
    }

    #[test]
    fn export_of_empty_design_is_a_valid_png() {
        let config = GarmentConfiguration::new(ModelRef::builtin(), Color::WHITE);
        let bytes = exporter().render_png_bytes(&config).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), EXPORT_SIZE);
        assert_eq!(decoded.height(), EXPORT_SIZE);
    }

    #[test]
    fn both_entry_points_are_byte_identical() {
        let config = GarmentConfiguration::new(ModelRef::builtin(), Color::BLACK);
        let exporter = exporter();

        let direct = exporter.render_png_bytes(&config).unwrap();
        let mut streamed = Vec::new();
        exporter.write_png(&config, &mut streamed).unwrap();
        assert_eq!(direct, streamed);

        // Idempotence: unchanged inputs, unchanged bytes.
        let again = exporter.render_png_bytes(&config).unwrap();
        assert_eq!(direct, again);
    }

    #[test]
    fn missing_model_fails_without_partial_output() {
        let model = ModelRef {
            path: "/nonexistent/tee.stl".to_string(),
            display_name: "Missing".to_string(),
        };
        let config = GarmentConfiguration::new(model, Color::WHITE);
        let err = exporter().render_png_bytes(&config).unwrap_err();
        assert!(matches!(err, RenderError::ModelLoad { .. }));
    }

    #[test]
    fn concurrent_export_is_refused() {
        let exporter = exporter();
        let config = GarmentConfiguration::default();
        let _held = exporter.in_flight.lock();
        let err = exporter.render_png_bytes(&config).unwrap_err();
        assert!(matches!(err, RenderError::ExportInFlight));
    }
}
