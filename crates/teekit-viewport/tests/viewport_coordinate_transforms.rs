//! Tests for viewport coordinate transformations and export determinism.

use std::io::Write;
use std::sync::Arc;

use glam::Vec3;
use teekit_core::Color;
use teekit_designer::{Compositor, FontStore, GarmentConfiguration, ModelRef};
use teekit_viewport::{
    screen_to_design, ExportRenderer, GarmentMesh, NullBackend, OrbitCamera, ViewportSession,
};

fn head_on_camera() -> OrbitCamera {
    OrbitCamera {
        azimuth: 0.0,
        elevation: 0.0,
        distance: 3.0,
        target: Vec3::ZERO,
    }
}

#[test]
fn screen_mapping_is_stable_under_zoom() {
    let mesh = GarmentMesh::builtin();
    let mut camera = head_on_camera();

    let at_default = screen_to_design((400.0, 300.0), &camera, (800, 600), &mesh).unwrap();
    camera.zoom(1.0);
    let zoomed = screen_to_design((400.0, 300.0), &camera, (800, 600), &mesh).unwrap();

    // The viewport center keeps pointing at the same spot on the garment.
    assert!((at_default.0 - zoomed.0).abs() < 1.0);
    assert!((at_default.1 - zoomed.1).abs() < 1.0);
}

#[test]
fn screen_mapping_moves_with_the_pointer() {
    let mesh = GarmentMesh::builtin();
    let camera = head_on_camera();

    let left = screen_to_design((330.0, 300.0), &camera, (800, 600), &mesh).unwrap();
    let right = screen_to_design((470.0, 300.0), &camera, (800, 600), &mesh).unwrap();
    let up = screen_to_design((400.0, 240.0), &camera, (800, 600), &mesh).unwrap();

    assert!(right.0 > left.0, "design x grows with screen x");
    assert!(up.1 < left.1, "design y shrinks toward the top of the screen");
}

#[test]
fn export_ignores_the_live_camera_entirely() {
    let compositor = Arc::new(Compositor::new(FontStore::empty()));
    let exporter = ExportRenderer::new(Arc::clone(&compositor));
    let mut config = GarmentConfiguration::new(ModelRef::builtin(), Color::parse("#457B9D").unwrap());
    config.store.add_image(teekit_designer::FittedImage {
        placement: teekit_designer::Placement::new(50.0, 150.0, 200.0, 100.0),
        payload: teekit_designer::ImagePayload {
            encoded: Vec::new(),
            pixels: image::RgbaImage::from_pixel(8, 4, image::Rgba([250, 210, 30, 255])),
        },
    });

    let before = exporter.render_png_bytes(&config).unwrap();

    // Thrash the live viewport: orbit, zoom, drag attempts.
    let mut session = ViewportSession::begin(
        Box::new(NullBackend::new()),
        compositor,
        &config.model,
        640,
        480,
    )
    .unwrap();
    session.pointer_down(3.0, 3.0, &mut config.store);
    session.pointer_move(200.0, 150.0, &mut config.store);
    session.pointer_up();
    session.scroll(-3.0);

    let after = exporter.render_png_bytes(&config).unwrap();
    assert_eq!(before, after, "live camera state leaked into the export");
}

#[test]
fn download_sink_receives_the_submission_bytes() {
    let exporter = ExportRenderer::new(Arc::new(Compositor::new(FontStore::empty())));
    let config = GarmentConfiguration::default();

    let bytes = exporter.render_png_bytes(&config).unwrap();
    let mut sink = Vec::new();
    exporter.write_png(&config, &mut sink).unwrap();
    sink.flush().unwrap();
    assert_eq!(bytes, sink);
}

#[test]
fn stl_model_round_trips_through_the_mapper() {
    // A unit quad facing +Z, written as a minimal binary STL.
    let path = write_quad_stl();
    let mesh = GarmentMesh::from_stl(path.path().to_str().unwrap()).unwrap();
    assert!(mesh.printable_triangles().count() == 2);

    let camera = head_on_camera();
    let hit = screen_to_design((400.0, 300.0), &camera, (800, 600), &mesh);
    assert!(hit.is_some(), "flat front plate should be hit head-on");
}

fn write_quad_stl() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();

    let tri = |a: [f32; 3], b: [f32; 3], c: [f32; 3]| {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0f32.to_le_bytes()); // normal, recomputed on load
        buf.extend_from_slice(&0f32.to_le_bytes());
        buf.extend_from_slice(&1f32.to_le_bytes());
        for v in [a, b, c] {
            for coord in v {
                buf.extend_from_slice(&coord.to_le_bytes());
            }
        }
        buf.extend_from_slice(&0u16.to_le_bytes());
        buf
    };

    let mut bytes = vec![0u8; 80]; // header
    bytes.extend_from_slice(&2u32.to_le_bytes());
    bytes.extend(tri([-0.5, -0.6, 0.0], [0.5, -0.6, 0.0], [0.5, 0.6, 0.0]));
    bytes.extend(tri([-0.5, -0.6, 0.0], [0.5, 0.6, 0.0], [-0.5, 0.6, 0.0]));

    file.write_all(&bytes).unwrap();
    file.flush().unwrap();
    file
}
