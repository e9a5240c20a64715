//! Garment surface geometry.
//!
//! A [`GarmentMesh`] is a triangle soup with per-vertex UVs. Triangles
//! flagged `printable` carry UVs into the 500×600 design space and receive
//! the composited texture; everything else renders in the base color.
//!
//! Models come from two places: the procedural built-in tee (always
//! available, used when the catalogue is unreachable) and STL assets named
//! by catalogue entries. STL carries no texture coordinates, so print-area
//! UVs are derived by a deterministic planar projection of the
//! front-facing triangles.

use std::fs::File;
use std::io::BufReader;

use glam::Vec3;
use tracing::{debug, warn};

use teekit_core::RenderError;
use teekit_designer::ModelRef;

/// Mesh vertex: world position plus design-space UV. `uv` is only
/// meaningful when referenced by a printable triangle; `u` and `v` run 0→1
/// left→right and top→bottom of the design canvas.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Vec3,
    pub uv: [f32; 2],
}

#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub indices: [usize; 3],
    pub printable: bool,
}

/// The garment surface a design session renders against.
#[derive(Debug, Clone)]
pub struct GarmentMesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

/// Grid resolution of the built-in front panel.
const PANEL_COLS: usize = 8;
const PANEL_ROWS: usize = 10;

/// Horizontal half-arc of the curved front panel, radians.
const PANEL_HALF_ARC: f32 = 0.55;

/// STL faces whose outward normal leans this far toward +Z are treated as
/// the printable front.
const FRONT_NORMAL_THRESHOLD: f32 = 0.3;

impl GarmentMesh {
    /// Resolves a catalogue model reference to a mesh. `builtin:` tokens
    /// use the procedural tee; anything else is an STL path.
    pub fn load(model: &ModelRef) -> Result<Self, RenderError> {
        if model.is_builtin() {
            Ok(Self::builtin())
        } else {
            Self::from_stl(&model.path)
        }
    }

    /// The procedural classic tee: a cylindrically curved, fully printable
    /// front panel (aspect matched to the 500×600 canvas) backed by a flat
    /// rear panel.
    pub fn builtin() -> Self {
        let mut vertices = Vec::new();
        let mut triangles = Vec::new();

        // Chord width 1.0 across the arc; canvas aspect gives height 1.2.
        let radius = 0.5 / PANEL_HALF_ARC.sin();
        let half_height = 0.6;

        for row in 0..=PANEL_ROWS {
            let v = row as f32 / PANEL_ROWS as f32;
            let y = half_height - v * (2.0 * half_height);
            for col in 0..=PANEL_COLS {
                let u = col as f32 / PANEL_COLS as f32;
                let phi = (u * 2.0 - 1.0) * PANEL_HALF_ARC;
                let x = radius * phi.sin();
                let z = 0.12 + radius * (phi.cos() - PANEL_HALF_ARC.cos());
                vertices.push(Vertex {
                    position: Vec3::new(x, y, z),
                    uv: [u, v],
                });
            }
        }

        let stride = PANEL_COLS + 1;
        for row in 0..PANEL_ROWS {
            for col in 0..PANEL_COLS {
                let a = row * stride + col;
                let b = a + 1;
                let c = a + stride;
                let d = c + 1;
                triangles.push(Triangle {
                    indices: [a, c, b],
                    printable: true,
                });
                triangles.push(Triangle {
                    indices: [b, c, d],
                    printable: true,
                });
            }
        }

        // Flat rear panel, slightly oversized so the silhouette reads as a
        // body rather than a floating sheet.
        let base = vertices.len();
        for &(x, y) in &[(-0.55, 0.62), (0.55, 0.62), (-0.55, -0.62), (0.55, -0.62)] {
            vertices.push(Vertex {
                position: Vec3::new(x, y, -0.15),
                uv: [0.0, 0.0],
            });
        }
        triangles.push(Triangle {
            indices: [base, base + 2, base + 1],
            printable: false,
        });
        triangles.push(Triangle {
            indices: [base + 1, base + 2, base + 3],
            printable: false,
        });

        Self {
            vertices,
            triangles,
        }
    }

    /// Loads an STL asset, recenters and rescales it to the viewport's
    /// working size, and derives print-area UVs for front-facing triangles.
    pub fn from_stl(path: &str) -> Result<Self, RenderError> {
        let model_err = |reason: String| RenderError::ModelLoad {
            path: path.to_string(),
            reason,
        };

        let file = File::open(path).map_err(|e| model_err(e.to_string()))?;
        let stl = stl_io::read_stl(&mut BufReader::new(file)).map_err(|e| model_err(e.to_string()))?;
        if stl.faces.is_empty() {
            return Err(model_err("mesh contains no faces".to_string()));
        }

        let mut vertices: Vec<Vertex> = stl
            .vertices
            .iter()
            .map(|v| Vertex {
                position: Vec3::new(v[0], v[1], v[2]),
                uv: [0.0, 0.0],
            })
            .collect();

        // Recenter on the bounding-box center and scale to height 1.2 so
        // every asset orbits and frames the same way.
        let (min, max) = bounds(vertices.iter().map(|v| v.position));
        let center = (min + max) * 0.5;
        let extent_y = (max.y - min.y).max(1e-6);
        let scale = 1.2 / extent_y;
        for vertex in &mut vertices {
            vertex.position = (vertex.position - center) * scale;
        }

        let mut triangles = Vec::with_capacity(stl.faces.len());
        for face in &stl.faces {
            let [a, b, c] = face.vertices;
            let normal = face_normal(
                vertices[a].position,
                vertices[b].position,
                vertices[c].position,
            );
            triangles.push(Triangle {
                indices: [a, b, c],
                printable: normal.z > FRONT_NORMAL_THRESHOLD,
            });
        }

        if !triangles.iter().any(|t| t.printable) {
            warn!(path, "no front-facing surface found in model");
            return Err(RenderError::NoPrintableSurface {
                path: path.to_string(),
            });
        }

        assign_planar_uvs(&mut vertices, &triangles);
        debug!(
            path,
            vertices = vertices.len(),
            faces = triangles.len(),
            "loaded garment model"
        );

        Ok(Self {
            vertices,
            triangles,
        })
    }

    pub fn printable_triangles(&self) -> impl Iterator<Item = &Triangle> {
        self.triangles.iter().filter(|t| t.printable)
    }
}

/// Unit normal of a triangle, zero for degenerate faces.
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).normalize_or_zero()
}

fn bounds(points: impl Iterator<Item = Vec3>) -> (Vec3, Vec3) {
    let mut min = Vec3::splat(f32::MAX);
    let mut max = Vec3::splat(f32::MIN);
    for p in points {
        min = min.min(p);
        max = max.max(p);
    }
    (min, max)
}

/// Projects printable vertices onto the XY plane and maps the resulting
/// bounding box to the full design canvas, top edge at v = 0.
fn assign_planar_uvs(vertices: &mut [Vertex], triangles: &[Triangle]) {
    let printable_points = triangles
        .iter()
        .filter(|t| t.printable)
        .flat_map(|t| t.indices)
        .collect::<std::collections::BTreeSet<_>>();

    let (min, max) = bounds(printable_points.iter().map(|&i| vertices[i].position));
    let width = (max.x - min.x).max(1e-6);
    let height = (max.y - min.y).max(1e-6);

    for &index in &printable_points {
        let p = vertices[index].position;
        vertices[index].uv = [(p.x - min.x) / width, (max.y - p.y) / height];
    }
}
