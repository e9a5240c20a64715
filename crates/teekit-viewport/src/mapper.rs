//! Coordinate mapping between screen, design, and export frames.
//!
//! Two transforms live here and they are deliberately kept apart:
//!
//! - [`screen_to_design`] serves live dragging and hit-testing. It takes
//!   the live [`OrbitCamera`] because the pointer's meaning depends on the
//!   current view.
//! - [`design_to_export_frame`] feeds the export renderer. It is a pure
//!   function of the garment configuration; its signature has no way to
//!   receive camera state, which is what guarantees export determinism.

use glam::Vec3;
use tiny_skia::Pixmap;

use teekit_core::constants::{CANVAS_HEIGHT, CANVAS_WIDTH};
use teekit_core::{Color, RenderError};
use teekit_designer::{Compositor, GarmentConfiguration};

use crate::camera::{CameraPose, OrbitCamera};
use crate::mesh::GarmentMesh;

/// A ray hit on the printable surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Distance along the ray.
    pub t: f32,
    /// Interpolated design-space UV, 0→1 each axis, v from the top.
    pub uv: [f32; 2],
}

/// Everything the export renderer needs that derives from the design
/// itself: the composited texture and the garment base color. Camera
/// state cannot appear here.
#[derive(Debug)]
pub struct RasterInstructions {
    pub texture: Pixmap,
    pub base_color: Color,
}

/// Maps a pointer position on the live viewport to design-space
/// coordinates by casting a ray through the current camera and
/// intersecting the printable surface.
///
/// Returns `None` when the pointer misses the printable area entirely;
/// the caller treats that as empty-canvas interaction (orbit).
pub fn screen_to_design(
    pointer: (f32, f32),
    camera: &OrbitCamera,
    viewport_size: (u32, u32),
    mesh: &GarmentMesh,
) -> Option<(f32, f32)> {
    let (width, height) = viewport_size;
    if width == 0 || height == 0 {
        return None;
    }
    let aspect = width as f32 / height as f32;
    let pose = CameraPose::from_orbit(camera, aspect);

    let ndc_x = 2.0 * pointer.0 / width as f32 - 1.0;
    let ndc_y = 1.0 - 2.0 * pointer.1 / height as f32;

    let inverse = pose.view_projection().inverse();
    let far = inverse.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
    let origin = pose.eye;
    let direction = (far - origin).normalize_or_zero();
    if direction == Vec3::ZERO {
        return None;
    }

    let hit = intersect_printable(mesh, origin, direction)?;
    Some((hit.uv[0] * CANVAS_WIDTH, hit.uv[1] * CANVAS_HEIGHT))
}

/// Nearest printable-triangle intersection along the ray.
pub fn intersect_printable(mesh: &GarmentMesh, origin: Vec3, direction: Vec3) -> Option<SurfaceHit> {
    let mut nearest: Option<SurfaceHit> = None;
    for triangle in mesh.printable_triangles() {
        let [ia, ib, ic] = triangle.indices;
        let a = mesh.vertices[ia];
        let b = mesh.vertices[ib];
        let c = mesh.vertices[ic];
        let Some((t, u, v)) = ray_triangle(origin, direction, a.position, b.position, c.position)
        else {
            continue;
        };
        if nearest.map_or(true, |n| t < n.t) {
            let w = 1.0 - u - v;
            let uv = [
                w * a.uv[0] + u * b.uv[0] + v * c.uv[0],
                w * a.uv[1] + u * b.uv[1] + v * c.uv[1],
            ];
            nearest = Some(SurfaceHit { t, uv });
        }
    }
    nearest
}

/// Produces the export renderer's input from the configuration alone.
///
/// This is the load-bearing determinism boundary: live camera state cannot
/// flow through here, and live dragging never calls this function.
pub fn design_to_export_frame(
    compositor: &Compositor,
    config: &GarmentConfiguration,
) -> Result<RasterInstructions, RenderError> {
    Ok(RasterInstructions {
        texture: compositor.compose(&config.store)?,
        base_color: config.base_color,
    })
}

/// Möller–Trumbore ray/triangle intersection. Returns `(t, u, v)` with
/// barycentric coordinates relative to vertices `b` and `c`.
fn ray_triangle(origin: Vec3, direction: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<(f32, f32, f32)> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < 1e-8 {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(q) * inv_det;
    if t <= 1e-6 {
        return None;
    }
    Some((t, u, v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head_on_camera() -> OrbitCamera {
        OrbitCamera {
            azimuth: 0.0,
            elevation: 0.0,
            distance: 3.0,
            target: Vec3::ZERO,
        }
    }

    #[test]
    fn viewport_center_maps_to_canvas_center() {
        let mesh = GarmentMesh::builtin();
        let camera = head_on_camera();
        let (x, y) = screen_to_design((400.0, 300.0), &camera, (800, 600), &mesh).unwrap();
        assert!((x - 250.0).abs() < 5.0, "x = {x}");
        assert!((y - 300.0).abs() < 5.0, "y = {y}");
    }

    #[test]
    fn pointer_off_the_garment_misses() {
        let mesh = GarmentMesh::builtin();
        let camera = head_on_camera();
        assert!(screen_to_design((5.0, 5.0), &camera, (800, 600), &mesh).is_none());
    }

    #[test]
    fn mapping_tracks_the_view_angle() {
        let mesh = GarmentMesh::builtin();
        let mut camera = head_on_camera();
        let straight = screen_to_design((400.0, 300.0), &camera, (800, 600), &mesh).unwrap();

        camera.orbit(0.4, 0.0);
        let turned = screen_to_design((400.0, 300.0), &camera, (800, 600), &mesh).unwrap();

        // From a rotated view the same pixel lands on a different part of
        // the design.
        assert!((straight.0 - turned.0).abs() > 1.0);
    }

    #[test]
    fn left_edge_of_view_is_left_edge_of_design() {
        let mesh = GarmentMesh::builtin();
        let camera = head_on_camera();
        // March from the left of the viewport until we hit the panel.
        let mut first_hit = None;
        for px in 0..800 {
            if let Some(hit) = screen_to_design((px as f32, 300.0), &camera, (800, 600), &mesh) {
                first_hit = Some(hit);
                break;
            }
        }
        let (x, _) = first_hit.expect("panel must be visible head-on");
        assert!(x < 15.0, "first visible column should be near design x=0, got {x}");
    }
}
