//! # TeeKit Core
//!
//! Core types, errors, and constants shared by every TeeKit crate.
//! Provides the error taxonomy for the upload → compose → export → submit
//! pipeline, the sRGB color type used for garment bases and text fills,
//! and the fixed dimensions of the printable design space.

pub mod color;
pub mod constants;
pub mod error;

pub use color::Color;
pub use error::{DecodeError, Error, RenderError, Result, SubmissionError, ValidationError};
