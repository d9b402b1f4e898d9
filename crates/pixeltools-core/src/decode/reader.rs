//! Raster decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, Orientation, RasterBuffer};

/// Decode image bytes (PNG, JPEG, WebP) into an RGBA raster.
///
/// The EXIF orientation is applied so the natural size of the result matches
/// the size the browser reports for the rendered element.
///
/// # Errors
///
/// Returns `DecodeError::DecodeFailed` if the format is not recognized or the
/// data is corrupted, and `DecodeError::InvalidDimensions` for an image with
/// a zero dimension.
pub fn decode_image(bytes: &[u8]) -> Result<RasterBuffer, DecodeError> {
    let orientation = extract_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::DecodeFailed(e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| DecodeError::DecodeFailed(e.to_string()))?;

    let oriented = apply_exif_orientation(img, orientation);
    let (width, height) = (oriented.width(), oriented.height());
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    log::debug!("decoded {width}x{height} image ({orientation:?})");
    Ok(RasterBuffer::from_rgba_image(oriented.into_rgba8()))
}

/// Returns `Orientation::Normal` when there is no EXIF data.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_exif_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
