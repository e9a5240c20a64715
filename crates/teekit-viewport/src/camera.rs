//! Orbit camera and camera poses.
//!
//! The live viewport orbits a fixed look-at point on the garment with
//! azimuth/elevation/zoom-distance state driven by drag and scroll
//! gestures. The canonical export pose is a constant and deliberately has
//! no connection to any [`OrbitCamera`] instance.

use glam::{Mat4, Vec3};

use teekit_core::constants::{MAX_ZOOM_DISTANCE, MIN_ZOOM_DISTANCE};

/// Vertical field of view in degrees, shared by live and export poses.
const FOV_Y_DEGREES: f32 = 40.0;
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 100.0;

/// Elevation clamp keeps the camera off the poles.
const ELEVATION_LIMIT: f32 = 1.396; // ~80 degrees in radians

/// Canonical export pose: straight-on front view, slight downward tilt.
const EXPORT_AZIMUTH: f32 = 0.0;
const EXPORT_ELEVATION: f32 = 0.10;
const EXPORT_DISTANCE: f32 = 3.0;

/// Ephemeral live camera state. Never persisted, never an input to export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    /// Horizontal angle around the look-at point, radians.
    pub azimuth: f32,
    /// Vertical angle, radians, clamped to avoid gimbal flip.
    pub elevation: f32,
    /// Distance from the look-at point, clamped to the zoom range.
    pub distance: f32,
    pub target: Vec3,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            azimuth: 0.0,
            elevation: 0.12,
            distance: 3.0,
            target: Vec3::ZERO,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a drag delta to azimuth and elevation.
    pub fn orbit(&mut self, delta_azimuth: f32, delta_elevation: f32) {
        self.azimuth += delta_azimuth;
        self.elevation = (self.elevation + delta_elevation).clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
    }

    /// Moves the camera along its view ray, clamped to the zoom range.
    /// Positive delta zooms in.
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance - delta).clamp(MIN_ZOOM_DISTANCE, MAX_ZOOM_DISTANCE);
    }

    /// Camera position in world space, Y-up.
    pub fn eye_position(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        let offset = Vec3::new(cos_el * sin_az, sin_el, cos_el * cos_az) * self.distance;
        self.target + offset
    }
}

/// Resolved view and projection matrices for one frame.
///
/// Built either from the live orbit state ([`CameraPose::from_orbit`]) or
/// from the fixed export constants ([`CameraPose::canonical`]).
#[derive(Debug, Clone, Copy)]
pub struct CameraPose {
    pub view: Mat4,
    pub projection: Mat4,
    pub eye: Vec3,
}

impl CameraPose {
    pub fn from_orbit(camera: &OrbitCamera, aspect_ratio: f32) -> Self {
        let eye = camera.eye_position();
        Self {
            view: Mat4::look_at_rh(eye, camera.target, Vec3::Y),
            projection: Mat4::perspective_rh(
                FOV_Y_DEGREES.to_radians(),
                aspect_ratio.max(0.01),
                NEAR_PLANE,
                FAR_PLANE,
            ),
            eye,
        }
    }

    /// The fixed pose used for every export. A pure constant: changing the
    /// live camera can never change export output.
    pub fn canonical() -> Self {
        let fixed = OrbitCamera {
            azimuth: EXPORT_AZIMUTH,
            elevation: EXPORT_ELEVATION,
            distance: EXPORT_DISTANCE,
            target: Vec3::ZERO,
        };
        Self::from_orbit(&fixed, 1.0)
    }

    /// Combined view-projection matrix.
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_clamps_to_range() {
        let mut camera = OrbitCamera::new();
        camera.zoom(100.0);
        assert_eq!(camera.distance, MIN_ZOOM_DISTANCE);
        camera.zoom(-100.0);
        assert_eq!(camera.distance, MAX_ZOOM_DISTANCE);
    }

    #[test]
    fn elevation_clamps_off_the_poles() {
        let mut camera = OrbitCamera::new();
        camera.orbit(0.0, 10.0);
        assert!(camera.elevation <= ELEVATION_LIMIT);
        camera.orbit(0.0, -20.0);
        assert!(camera.elevation >= -ELEVATION_LIMIT);
    }

    #[test]
    fn canonical_pose_is_stable() {
        let a = CameraPose::canonical();
        let b = CameraPose::canonical();
        assert_eq!(a.view, b.view);
        assert_eq!(a.projection, b.projection);
    }

    #[test]
    fn eye_orbits_the_target() {
        let mut camera = OrbitCamera::new();
        camera.elevation = 0.0;
        camera.azimuth = 0.0;
        let front = camera.eye_position();
        camera.azimuth = std::f32::consts::PI;
        let back = camera.eye_position();
        assert!((front.z - camera.distance).abs() < 1e-4);
        assert!((back.z + camera.distance).abs() < 1e-4);
    }
}
