//! # TeeKit Designer
//!
//! The design session core: the canonical store of placed text and image
//! layers, upload ingestion, and the compositor that flattens the layer
//! list into the garment's printable texture.
//!
//! ## Core Components
//!
//! - **Model**: `DesignElement` layers (text or image) with a clamped
//!   placement inside the fixed 500×600 design space
//! - **Store**: `ElementStore`, the single mutation path for layers and the
//!   single-selection state
//! - **Ingestion**: upload validation, asynchronous decode, and aspect-fit
//!   placement of image layers
//! - **Compositor**: paints the layer list, in paint order, into one
//!   design-space raster shared by live preview and export
//!
//! ## Architecture
//!
//! ```text
//! GarmentConfiguration (root aggregate)
//!   ├── base color + garment model reference
//!   └── ElementStore (paint-ordered layers, selection)
//!         ↑ ingest (uploads)        ↓ compose (every dirty frame)
//! ```
//!
//! All store mutation is synchronous and totally ordered by call order;
//! the only asynchronous step is image decoding, which never touches the
//! store itself.

pub mod compositor;
pub mod config;
pub mod fonts;
pub mod ingest;
pub mod model;
pub mod selection;
pub mod store;

pub use compositor::Compositor;
pub use config::{GarmentConfiguration, ModelRef};
pub use fonts::FontStore;
pub use ingest::{ingest_image, FittedImage};
pub use model::{DesignElement, ElementId, ElementKind, ImagePayload, Placement, TextStyle};
pub use selection::SelectionState;
pub use store::{ElementPatch, ElementStore};
