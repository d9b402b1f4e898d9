//! End-to-end operations: crop-and-encode and format conversion.
//!
//! # Crop Pipeline
//!
//! ```text
//! SelectionRect (display) ──remap──▶ SourceRect (rotated canvas)
//! RasterBuffer (natural)  ──rotate─▶ canvas ──crop──▶ region ──encode──▶ bytes
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{decode_image, resize_with, DecodeError, RasterBuffer, ResizeOptions, CHANNELS};
use crate::encode::{encode, EncodeError, OutputFormat, DEFAULT_QUALITY};
use crate::geometry::{DisplayFrame, ImageSize, SelectionRect};
use crate::transform::{crop_buffer, remap_selection, render_rotated, Rotation, TransformError};

/// Errors from [`crop_and_encode`].
#[derive(Debug, Error)]
pub enum CropError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The buffer handed in is not the image the natural size describes.
    #[error("Image is {actual_width}x{actual_height} but the natural size is {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// The pixel vector does not hold `width * height * 4` bytes.
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },
}

/// Errors from [`convert`] and the compress tool.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Encoded bytes plus what they contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
}

/// Result of applying a crop.
pub type CropOutput = EncodedImage;

impl EncodedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Crop a natural image to a display-space selection and encode the result.
///
/// `image` must be the decoded natural image (stored orientation) whose size
/// is `natural`. The output holds exactly the remapped region of the image
/// as rotated by `rotation`.
///
/// # Errors
///
/// - `CropError::Transform` when the image is not ready or the frame is empty
/// - `CropError::SizeMismatch` when `image` does not match `natural`
/// - `CropError::InvalidPixelData` when the pixel vector has the wrong length
/// - `CropError::Encode` when the encoder cannot produce output
pub fn crop_and_encode(
    selection: &SelectionRect,
    frame: &DisplayFrame,
    natural: ImageSize,
    rotation: Rotation,
    image: &RasterBuffer,
    format: OutputFormat,
    quality: u8,
) -> Result<CropOutput, CropError> {
    let region = remap_selection(selection, frame, natural, rotation)?;

    if image.dimensions() != (natural.width, natural.height) {
        return Err(CropError::SizeMismatch {
            width: natural.width,
            height: natural.height,
            actual_width: image.width,
            actual_height: image.height,
        });
    }
    if !image.is_consistent() {
        return Err(CropError::InvalidPixelData {
            expected: image.width as usize * image.height as usize * CHANNELS,
            actual: image.pixels.len(),
        });
    }

    let canvas = render_rotated(image, rotation);
    let cropped = crop_buffer(&canvas, region)?;
    let bytes = encode(&cropped, format, quality)?;

    log::debug!(
        "cropped {}x{} region at {}° to {} bytes of {}",
        region.width,
        region.height,
        rotation.degrees(),
        bytes.len(),
        format.mime_type()
    );

    Ok(CropOutput {
        bytes,
        width: cropped.width,
        height: cropped.height,
        format,
    })
}

/// Options for the convert tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub format: OutputFormat,
    pub quality: u8,
    pub resize: Option<ResizeOptions>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            quality: DEFAULT_QUALITY,
            resize: None,
        }
    }
}

/// Decode `bytes`, optionally resize, and encode to another format.
pub fn convert(bytes: &[u8], options: &ConvertOptions) -> Result<EncodedImage, ConvertError> {
    let decoded = decode_image(bytes)?;
    let image = match &options.resize {
        Some(resize) => resize_with(&decoded, resize)?,
        None => decoded,
    };
    encode_image(&image, options.format, options.quality)
}

/// Encode a buffer into an [`EncodedImage`].
pub fn encode_image(
    image: &RasterBuffer,
    format: OutputFormat,
    quality: u8,
) -> Result<EncodedImage, ConvertError> {
    let bytes = encode(image, format, quality)?;
    Ok(EncodedImage {
        bytes,
        width: image.width,
        height: image.height,
        format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Fit;

    fn gradient(width: u32, height: u32) -> RasterBuffer {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 128, 255]);
            }
        }
        RasterBuffer::new(width, height, pixels)
    }

    #[test]
    fn test_unrotated_crop_reads_expected_region() {
        // 800x600 shown in an 800x600 frame at the origin.
        let image = gradient(800, 600);
        let frame = DisplayFrame::new(0.0, 0.0, 800.0, 600.0);
        let selection = SelectionRect::new(200.0, 100.0, 200.0, 200.0);

        let out = crop_and_encode(
            &selection,
            &frame,
            ImageSize::new(800, 600),
            Rotation::Deg0,
            &image,
            OutputFormat::Png,
            DEFAULT_QUALITY,
        )
        .unwrap();

        assert_eq!((out.width, out.height), (200, 200));
        assert_eq!(out.mime_type(), "image/png");

        let decoded = decode_image(&out.bytes).unwrap();
        assert_eq!(decoded.pixel(0, 0), Some([200, 100, 128, 255]));
        assert_eq!(decoded.pixel(199, 199), Some([143, 43, 128, 255]));
    }

    #[test]
    fn test_rotated_crop_dimensions() {
        // 600x800 displayed at half scale, rotated 90°.
        let image = gradient(600, 800);
        let frame = DisplayFrame::new(0.0, 0.0, 300.0, 400.0);
        let selection = SelectionRect::new(125.0, 175.0, 50.0, 50.0);

        let out = crop_and_encode(
            &selection,
            &frame,
            ImageSize::new(600, 800),
            Rotation::Deg90,
            &image,
            OutputFormat::Png,
            DEFAULT_QUALITY,
        )
        .unwrap();

        assert_eq!((out.width, out.height), (100, 100));
    }

    #[test]
    fn test_rotated_non_square_crop_reads_selected_pixels() {
        // Display (0, 0, 100, 50) covers stored x in 0..200, y in 0..100.
        let image = gradient(800, 600);
        let frame = DisplayFrame::new(0.0, 0.0, 400.0, 300.0);
        let selection = SelectionRect::new(0.0, 0.0, 100.0, 50.0);

        let out = crop_and_encode(
            &selection,
            &frame,
            ImageSize::new(800, 600),
            Rotation::Deg90,
            &image,
            OutputFormat::Png,
            DEFAULT_QUALITY,
        )
        .unwrap();
        assert_eq!((out.width, out.height), (100, 200));

        let decoded = decode_image(&out.bytes).unwrap();
        assert_eq!(decoded.pixel(0, 0), Some([0, 99, 128, 255]));
        assert_eq!(decoded.pixel(99, 199), Some([199, 0, 128, 255]));
        for px in decoded.pixels.chunks_exact(4) {
            assert!(px[0] < 200 && px[1] < 100, "pixel {px:?} is outside the selection");
        }
    }

    #[test]
    fn test_apply_is_idempotent() {
        let image = gradient(64, 48);
        let frame = DisplayFrame::new(10.0, 10.0, 128.0, 96.0);
        let selection = SelectionRect::new(30.0, 20.0, 40.0, 40.0);

        let run = || {
            crop_and_encode(
                &selection,
                &frame,
                ImageSize::new(64, 48),
                Rotation::Deg270,
                &image,
                OutputFormat::Jpeg,
                80,
            )
            .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_not_ready_image() {
        let image = gradient(4, 4);
        let result = crop_and_encode(
            &SelectionRect::new(0.0, 0.0, 20.0, 20.0),
            &DisplayFrame::new(0.0, 0.0, 100.0, 100.0),
            ImageSize::new(0, 0),
            Rotation::Deg0,
            &image,
            OutputFormat::Png,
            DEFAULT_QUALITY,
        );
        assert!(matches!(
            result,
            Err(CropError::Transform(TransformError::ImageNotReady))
        ));
    }

    #[test]
    fn test_size_mismatch() {
        let image = gradient(10, 10);
        let result = crop_and_encode(
            &SelectionRect::new(0.0, 0.0, 20.0, 20.0),
            &DisplayFrame::new(0.0, 0.0, 100.0, 100.0),
            ImageSize::new(20, 20),
            Rotation::Deg0,
            &image,
            OutputFormat::Png,
            DEFAULT_QUALITY,
        );
        assert!(matches!(result, Err(CropError::SizeMismatch { .. })));
    }

    #[test]
    fn test_inconsistent_buffer_is_rejected() {
        let image = RasterBuffer {
            width: 10,
            height: 10,
            pixels: vec![0; 12],
        };
        for rotation in Rotation::ALL {
            let result = crop_and_encode(
                &SelectionRect::new(0.0, 0.0, 50.0, 50.0),
                &DisplayFrame::new(0.0, 0.0, 100.0, 100.0),
                ImageSize::new(10, 10),
                rotation,
                &image,
                OutputFormat::Png,
                DEFAULT_QUALITY,
            );
            assert!(matches!(
                result,
                Err(CropError::InvalidPixelData {
                    expected: 400,
                    actual: 12
                })
            ));
        }
    }

    #[test]
    fn test_convert_png_to_jpeg_with_resize() {
        let png = encode(&gradient(40, 20), OutputFormat::Png, DEFAULT_QUALITY).unwrap();
        let options = ConvertOptions {
            format: OutputFormat::Jpeg,
            quality: 85,
            resize: Some(ResizeOptions::new(Some(20), None, Fit::Max)),
        };

        let out = convert(&png, &options).unwrap();
        assert_eq!(out.format, OutputFormat::Jpeg);
        assert_eq!((out.width, out.height), (20, 10));
        assert_eq!(&out.bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_convert_rejects_garbage() {
        let result = convert(&[1, 2, 3, 4], &ConvertOptions::default());
        assert!(matches!(result, Err(ConvertError::Decode(_))));
    }
}
