//! Error handling for TeeKit
//!
//! Provides error types for all layers of the customization pipeline:
//! - Validation errors (bad uploads, malformed order fields)
//! - Decode errors (corrupt or unsupported image data)
//! - Render errors (asset load or compositing failure, live or export)
//! - Submission errors (network or backend rejection of an order)
//!
//! All error types use `thiserror` for ergonomic error handling. Nothing in
//! this taxonomy is ever swallowed: every rejected step must reach a
//! user-visible message, so variants carry enough context to display.

use thiserror::Error;

/// Validation error type
///
/// Represents rejections that happen before any state is touched: an upload
/// that is not an acceptable image, or an order form that cannot be
/// submitted as entered. The triggering input is discarded and the design
/// store is left unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The uploaded file contained no data at all
    #[error("Uploaded file is empty")]
    EmptyUpload,

    /// The uploaded file is not an image format we accept
    #[error("Unsupported upload: {detail}")]
    NotAnImage {
        /// A short description of what was detected instead.
        detail: String,
    },

    /// The uploaded file exceeds the size ceiling
    #[error("Upload of {size} bytes exceeds the {limit} byte limit")]
    UploadTooLarge {
        /// The size of the rejected upload in bytes.
        size: u64,
        /// The configured ceiling in bytes.
        limit: u64,
    },

    /// A required order field was left empty
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// The email address does not look like an email address
    #[error("Malformed email address: {value}")]
    InvalidEmail {
        /// The rejected value.
        value: String,
    },

    /// A color literal could not be parsed as #RRGGBB
    #[error("Invalid color literal: {value}")]
    InvalidColor {
        /// The rejected literal.
        value: String,
    },
}

/// Decode error type
///
/// The upload passed validation (right type marker, acceptable size) but the
/// pixel data itself could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The image payload is corrupt or uses an unsupported encoding
    #[error("Image data could not be decoded: {reason}")]
    Undecodable {
        /// The decoder's failure message.
        reason: String,
    },

    /// The image decoded to a degenerate size
    #[error("Image decoded to {width}x{height}, which is unusable")]
    DegenerateImage {
        /// Decoded width in pixels.
        width: u32,
        /// Decoded height in pixels.
        height: u32,
    },
}

/// Render error type
///
/// Failures while producing pixels, either for the live preview or for the
/// canonical export. An export that fails must not leave a partial image
/// behind, and must not have touched the design store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The referenced garment model asset could not be loaded
    #[error("Failed to load garment model '{path}': {reason}")]
    ModelLoad {
        /// The model asset path that failed.
        path: String,
        /// The underlying failure.
        reason: String,
    },

    /// The garment model contains no printable surface to texture
    #[error("Garment model '{path}' has no printable surface")]
    NoPrintableSurface {
        /// The offending model asset path.
        path: String,
    },

    /// No usable font could be resolved for a text element
    #[error("No usable font for family '{family}'")]
    FontUnavailable {
        /// The requested font family.
        family: String,
    },

    /// A raster surface could not be allocated
    #[error("Failed to allocate a {width}x{height} raster surface")]
    SurfaceAllocation {
        /// Requested surface width.
        width: u32,
        /// Requested surface height.
        height: u32,
    },

    /// Encoding the finished raster to PNG failed
    #[error("Failed to encode export image: {reason}")]
    Encode {
        /// The encoder's failure message.
        reason: String,
    },

    /// An export or order submission is already running
    #[error("An export is already in flight")]
    ExportInFlight,
}

/// Submission error type
///
/// The order endpoint could not be reached or rejected the order. Previously
/// rendered export bytes are discarded on this error; a retry re-exports.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// Could not open a connection to the endpoint
    #[error("Could not connect to {endpoint}: {reason}")]
    Connect {
        /// The endpoint that was unreachable.
        endpoint: String,
        /// The connection failure message.
        reason: String,
    },

    /// The connection dropped mid-request
    #[error("I/O failure talking to the order service: {reason}")]
    Io {
        /// The underlying I/O failure message.
        reason: String,
    },

    /// The response was not a well-formed envelope
    #[error("Malformed response from the order service: {reason}")]
    Protocol {
        /// What was wrong with the response.
        reason: String,
    },

    /// The order service answered but refused the order
    #[error("Order rejected: {message}")]
    Rejected {
        /// The service's rejection message, surfaced verbatim.
        message: String,
    },
}

/// Top-level error wrapper for TeeKit
///
/// Aggregates all error types into a single enum for APIs that can fail in
/// more than one layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Validation error
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Decode error
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Render error
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Submission error
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// Result type alias using the TeeKit top-level error
pub type Result<T, E = Error> = std::result::Result<T, E>;
