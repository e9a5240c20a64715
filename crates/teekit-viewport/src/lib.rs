//! # TeeKit Viewport
//!
//! The interactive 3D side of the customization engine: an orbit camera
//! around the garment, hit-testing and drag-to-move of placed layers via
//! the 2D-to-3D coordinate mapper, a pluggable rendering backend, and the
//! deterministic export renderer.
//!
//! ## Coordinate frames
//!
//! Three frames are in play and must never be confused:
//!
//! - **Design space**: the fixed 500×600 logical canvas the layers live in
//! - **Screen space**: pointer events against the live viewport surface
//! - **Canonical export frame**: a fixed camera pose used only for the
//!   final image, independent of whatever the live camera is doing
//!
//! [`mapper::screen_to_design`] bridges the first two and takes the live
//! camera. [`mapper::design_to_export_frame`] feeds the third and, by
//! signature, cannot see any camera state at all. That asymmetry is what
//! makes the export reproducible.

pub mod backend;
pub mod camera;
pub mod controller;
pub mod export;
pub mod mapper;
pub mod mesh;
pub mod render;
pub mod session;

pub use backend::{NullBackend, SceneParams, SoftwareBackend, ViewportBackend};
pub use camera::{CameraPose, OrbitCamera};
pub use controller::{GesturePhase, NudgeDirection, ViewportController};
pub use export::ExportRenderer;
pub use mapper::{design_to_export_frame, screen_to_design, RasterInstructions};
pub use mesh::GarmentMesh;
pub use session::{FrameScheduler, ViewportSession};
