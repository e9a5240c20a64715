//! Software scene rasterizer.
//!
//! CPU rendering of the garment mesh with the composited texture applied
//! to its printable surface. Used by the software viewport backend and by
//! the export renderer; the only inputs are mesh, texture, base color, and
//! a camera pose, so identical inputs always produce identical pixels.

use glam::Vec3;
use image::{Rgba, RgbaImage};
use tiny_skia::Pixmap;

use teekit_core::Color;

use crate::camera::CameraPose;
use crate::mesh::{face_normal, GarmentMesh};

/// Neutral studio backdrop behind the garment.
const BACKDROP: Color = Color::new(0xE9, 0xEA, 0xEC);

/// Fixed key light, normalized at use.
const LIGHT_DIR: Vec3 = Vec3::new(0.35, 0.55, 0.75);

const AMBIENT: f32 = 0.35;

/// Triangles closer to the eye than this are rejected rather than clipped.
const NEAR_W: f32 = 0.05;

struct ProjectedVertex {
    screen: Vec3, // x, y in pixels, z is NDC depth
    inv_w: f32,
    uv_over_w: [f32; 2],
}

/// Renders the garment into an RGBA frame of the requested size.
pub fn rasterize_scene(
    mesh: &GarmentMesh,
    texture: &Pixmap,
    base_color: Color,
    pose: &CameraPose,
    width: u32,
    height: u32,
) -> RgbaImage {
    let mut frame = RgbaImage::from_pixel(width, height, Rgba(BACKDROP.to_rgba8()));
    let mut depth_buffer = vec![f32::INFINITY; (width * height) as usize];

    let view_projection = pose.view_projection();
    let light = LIGHT_DIR.normalize();

    for triangle in &mesh.triangles {
        let [ia, ib, ic] = triangle.indices;
        let corners = [mesh.vertices[ia], mesh.vertices[ib], mesh.vertices[ic]];

        let mut projected = Vec::with_capacity(3);
        let mut rejected = false;
        for vertex in &corners {
            let clip = view_projection * vertex.position.extend(1.0);
            if clip.w <= NEAR_W {
                rejected = true;
                break;
            }
            let ndc = clip.truncate() / clip.w;
            projected.push(ProjectedVertex {
                screen: Vec3::new(
                    (ndc.x + 1.0) * 0.5 * width as f32,
                    (1.0 - ndc.y) * 0.5 * height as f32,
                    ndc.z,
                ),
                inv_w: 1.0 / clip.w,
                uv_over_w: [vertex.uv[0] / clip.w, vertex.uv[1] / clip.w],
            });
        }
        if rejected {
            continue;
        }

        // Two-sided flat shading: flip the normal toward the eye so the
        // inside of the shell does not render black.
        let mut normal = face_normal(
            corners[0].position,
            corners[1].position,
            corners[2].position,
        );
        let centroid =
            (corners[0].position + corners[1].position + corners[2].position) / 3.0;
        if normal.dot(pose.eye - centroid) < 0.0 {
            normal = -normal;
        }
        let intensity = AMBIENT + (1.0 - AMBIENT) * normal.dot(light).max(0.0);

        fill_triangle(
            &mut frame,
            &mut depth_buffer,
            &projected,
            triangle.printable.then_some(texture),
            base_color,
            intensity,
        );
    }

    frame
}

fn fill_triangle(
    frame: &mut RgbaImage,
    depth_buffer: &mut [f32],
    v: &[ProjectedVertex],
    texture: Option<&Pixmap>,
    base_color: Color,
    intensity: f32,
) {
    let width = frame.width();
    let height = frame.height();

    let (a, b, c) = (v[0].screen, v[1].screen, v[2].screen);
    let mut area = edge(a, b, c.x, c.y);
    if area.abs() < 1e-6 {
        return;
    }
    // Normalize orientation so the inside test is sign-independent.
    let flip = if area < 0.0 { -1.0 } else { 1.0 };
    area *= flip;

    let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as u32;
    let max_x = (a.x.max(b.x).max(c.x).ceil() as i64).clamp(0, width as i64 - 1) as u32;
    let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as u32;
    let max_y = (a.y.max(b.y).max(c.y).ceil() as i64).clamp(0, height as i64 - 1) as u32;

    for py in min_y..=max_y {
        for px in min_x..=max_x {
            let sx = px as f32 + 0.5;
            let sy = py as f32 + 0.5;
            let w0 = edge(b, c, sx, sy) * flip;
            let w1 = edge(c, a, sx, sy) * flip;
            let w2 = edge(a, b, sx, sy) * flip;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }
            let (l0, l1, l2) = (w0 / area, w1 / area, w2 / area);

            let depth = l0 * a.z + l1 * b.z + l2 * c.z;
            let depth_index = (py * width + px) as usize;
            if depth >= depth_buffer[depth_index] {
                continue;
            }
            depth_buffer[depth_index] = depth;

            let shaded = base_color.scaled(intensity);
            let rgb = match texture {
                Some(texture) => {
                    let inv_w = l0 * v[0].inv_w + l1 * v[1].inv_w + l2 * v[2].inv_w;
                    let u = (l0 * v[0].uv_over_w[0] + l1 * v[1].uv_over_w[0] + l2 * v[2].uv_over_w[0])
                        / inv_w;
                    let vv = (l0 * v[0].uv_over_w[1] + l1 * v[1].uv_over_w[1] + l2 * v[2].uv_over_w[1])
                        / inv_w;
                    sample_over(texture, u, vv, shaded, intensity)
                }
                None => [shaded.r, shaded.g, shaded.b],
            };
            frame.put_pixel(px, py, Rgba([rgb[0], rgb[1], rgb[2], 0xFF]));
        }
    }
}

/// Signed double-area of triangle (a, b, p).
fn edge(a: Vec3, b: Vec3, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

/// Nearest-neighbour texture sample composited over the shaded base. The
/// printed ink is lit by the same intensity as the cloth under it.
fn sample_over(texture: &Pixmap, u: f32, v: f32, shaded_base: Color, intensity: f32) -> [u8; 3] {
    let tw = texture.width();
    let th = texture.height();
    let tx = ((u * tw as f32) as i64).clamp(0, tw as i64 - 1) as u32;
    let ty = ((v * th as f32) as i64).clamp(0, th as i64 - 1) as u32;
    let texel = texture.pixels()[(ty * tw + tx) as usize];

    let inv_alpha = (255 - texel.alpha()) as u16;
    let lit = |ink: u8, base: u8| {
        let over = ink as f32 * intensity + base as f32 * inv_alpha as f32 / 255.0;
        over.round().min(255.0) as u8
    };
    [
        lit(texel.red(), shaded_base.r),
        lit(texel.green(), shaded_base.g),
        lit(texel.blue(), shaded_base.b),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraPose;

    fn blank_texture() -> Pixmap {
        Pixmap::new(500, 600).unwrap()
    }

    #[test]
    fn renders_garment_over_backdrop() {
        let mesh = GarmentMesh::builtin();
        let frame = rasterize_scene(
            &mesh,
            &blank_texture(),
            Color::new(0xE6, 0x39, 0x46),
            &CameraPose::canonical(),
            128,
            128,
        );

        let backdrop = Rgba(BACKDROP.to_rgba8());
        // Corners show backdrop, the center shows the garment.
        assert_eq!(*frame.get_pixel(2, 2), backdrop);
        let center = frame.get_pixel(64, 64);
        assert_ne!(*center, backdrop);
        assert!(center[0] > center[2], "red garment should read red");
    }

    #[test]
    fn identical_inputs_give_identical_frames() {
        let mesh = GarmentMesh::builtin();
        let a = rasterize_scene(
            &mesh,
            &blank_texture(),
            Color::WHITE,
            &CameraPose::canonical(),
            96,
            96,
        );
        let b = rasterize_scene(
            &mesh,
            &blank_texture(),
            Color::WHITE,
            &CameraPose::canonical(),
            96,
            96,
        );
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn empty_design_still_renders_the_bare_garment() {
        let mesh = GarmentMesh::builtin();
        let frame = rasterize_scene(
            &mesh,
            &blank_texture(),
            Color::WHITE,
            &CameraPose::canonical(),
            64,
            64,
        );
        // No crash, and the garment occupies pixels.
        let backdrop = Rgba(BACKDROP.to_rgba8());
        assert!(frame.pixels().any(|p| *p != backdrop));
    }
}
