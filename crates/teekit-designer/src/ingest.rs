//! Upload ingestion.
//!
//! Validates and decodes an uploaded image and computes its fitted
//! placement. Decoding runs on a blocking task so the event loop stays
//! responsive; the store is only touched by the caller appending the
//! returned element, so a slow decode can never corrupt unrelated layers.

use tracing::{debug, warn};

use teekit_core::constants::{IMAGE_DEFAULT_X, IMAGE_DEFAULT_Y, IMAGE_FIT_BOX, UPLOAD_SIZE_LIMIT};
use teekit_core::{DecodeError, Error, ValidationError};

use crate::model::{ImagePayload, Placement};

/// An image that passed ingestion: decoded pixels plus the fitted placement
/// it will occupy when appended to the store.
#[derive(Debug, Clone)]
pub struct FittedImage {
    pub placement: Placement,
    pub payload: ImagePayload,
}

/// Validates and decodes an uploaded file into a fitted image layer.
///
/// Rejections (`ValidationError` for type/size, `DecodeError` for corrupt
/// pixel data) leave no trace: nothing is mutated, the input is dropped.
pub async fn ingest_image(file_name: &str, bytes: Vec<u8>) -> Result<FittedImage, Error> {
    if bytes.is_empty() {
        warn!(file_name, "rejecting empty upload");
        return Err(ValidationError::EmptyUpload.into());
    }
    if bytes.len() as u64 > UPLOAD_SIZE_LIMIT {
        warn!(file_name, size = bytes.len(), "rejecting oversized upload");
        return Err(ValidationError::UploadTooLarge {
            size: bytes.len() as u64,
            limit: UPLOAD_SIZE_LIMIT,
        }
        .into());
    }
    // Sniff the magic bytes before handing anything to the decoder, so a
    // text file or PDF fails as a validation error rather than a decode one.
    if image::guess_format(&bytes).is_err() {
        warn!(file_name, "rejecting upload with unrecognized format");
        return Err(ValidationError::NotAnImage {
            detail: "unrecognized file format".to_string(),
        }
        .into());
    }

    let decoded = tokio::task::spawn_blocking(move || {
        let pixels = image::load_from_memory(&bytes)
            .map_err(|e| DecodeError::Undecodable {
                reason: e.to_string(),
            })?
            .to_rgba8();
        Ok::<_, DecodeError>((bytes, pixels))
    })
    .await
    .map_err(|e| DecodeError::Undecodable {
        reason: format!("decode task failed: {e}"),
    })?;

    let (encoded, pixels) = decoded?;
    let (iw, ih) = pixels.dimensions();
    if iw == 0 || ih == 0 {
        return Err(DecodeError::DegenerateImage {
            width: iw,
            height: ih,
        }
        .into());
    }

    let (width, height) = fitted_size(iw, ih);
    debug!(file_name, iw, ih, width, height, "upload ingested");

    Ok(FittedImage {
        placement: Placement::new(IMAGE_DEFAULT_X, IMAGE_DEFAULT_Y, width, height),
        payload: ImagePayload { encoded, pixels },
    })
}

/// Aspect-preserving fit of an intrinsic pixel size into the 200×200
/// placement box.
///
/// Landscape sources fit to width first and shrink to height if the fitted
/// height would still overflow the box; portrait and square sources do the
/// symmetric thing starting from height.
pub fn fitted_size(intrinsic_width: u32, intrinsic_height: u32) -> (f32, f32) {
    let aspect = intrinsic_width as f32 / intrinsic_height as f32;
    let (mut width, mut height);
    if aspect > 1.0 {
        width = IMAGE_FIT_BOX;
        height = IMAGE_FIT_BOX / aspect;
        if height > IMAGE_FIT_BOX {
            height = IMAGE_FIT_BOX;
            width = IMAGE_FIT_BOX * aspect;
        }
    } else {
        height = IMAGE_FIT_BOX;
        width = IMAGE_FIT_BOX * aspect;
        if width > IMAGE_FIT_BOX {
            width = IMAGE_FIT_BOX;
            height = IMAGE_FIT_BOX / aspect;
        }
    }
    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_fits_to_width() {
        assert_eq!(fitted_size(400, 200), (200.0, 100.0));
    }

    #[test]
    fn portrait_fits_to_height() {
        assert_eq!(fitted_size(200, 400), (100.0, 200.0));
    }

    #[test]
    fn square_fills_the_box() {
        assert_eq!(fitted_size(512, 512), (200.0, 200.0));
    }
}
