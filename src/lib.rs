//! # TeeKit
//!
//! A garment customization and texture compositing engine. Users place
//! text and image layers onto a garment's printable surface, manipulate
//! them through an orbiting 3D viewport, and produce a deterministic flat
//! raster of the final design for download or order submission.
//!
//! ## Architecture
//!
//! TeeKit is organized as a workspace with multiple crates:
//!
//! 1. **teekit-core** - Errors, colors, shared constants
//! 2. **teekit-designer** - Element store, upload ingestion, compositor
//! 3. **teekit-viewport** - Orbit camera, coordinate mapper, gesture
//!    controller, software renderer, deterministic export
//! 4. **teekit-shop** - Model catalogue and order submission glue
//! 5. **teekit** - This crate: re-exports and logging setup for embedders
//!
//! The embedding application owns the window, widgets, and navigation;
//! this workspace owns the design session itself.

pub use teekit_designer as designer;
pub use teekit_shop as shop;
pub use teekit_viewport as viewport;

pub use teekit_core::{
    Color, DecodeError, Error, RenderError, Result, SubmissionError, ValidationError,
};

pub use teekit_designer::{
    Compositor, DesignElement, ElementId, ElementKind, ElementPatch, ElementStore, FontStore,
    GarmentConfiguration, ModelRef, Placement, SelectionState, TextStyle,
};

pub use teekit_viewport::{
    CameraPose, ExportRenderer, FrameScheduler, GarmentMesh, GesturePhase, NullBackend,
    OrbitCamera, SoftwareBackend, ViewportBackend, ViewportController, ViewportSession,
};

pub use teekit_shop::{
    BillingInfo, CatalogClient, HttpTransport, OrderClient, OrderForm, ServiceResponse,
    ShippingAddress, TcpTransport,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with compact formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().compact())
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    Ok(())
}
