//! The compress tool: re-encode at a lower quality, optionally bounded by a
//! maximum dimension or a byte budget.

use serde::{Deserialize, Serialize};

use crate::decode::{resize_to_fit, FilterType, RasterBuffer};
use crate::encode::{encode, OutputFormat};
use crate::pipeline::{ConvertError, EncodedImage};

/// Quality used by the compress tool when none is given.
pub const DEFAULT_COMPRESS_QUALITY: u8 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompressOptions {
    pub format: OutputFormat,
    /// Starting (and highest) quality, 1-100.
    pub quality: u8,
    /// Longest edge after compression; larger images are scaled down.
    pub max_dimension: Option<u32>,
    /// Byte budget. Only lossy formats can trade quality for size.
    pub max_bytes: Option<usize>,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpeg,
            quality: DEFAULT_COMPRESS_QUALITY,
            max_dimension: None,
            max_bytes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    pub image: EncodedImage,
    /// Quality the bytes were encoded at.
    pub quality: u8,
}

impl CompressedImage {
    /// Fraction of `original_len` saved, e.g. `0.4` for 40% smaller.
    /// Negative when the output grew; `0.0` for an empty original.
    pub fn savings_ratio(&self, original_len: usize) -> f64 {
        if original_len == 0 {
            return 0.0;
        }
        1.0 - self.image.len() as f64 / original_len as f64
    }
}

/// Compress `image` according to `options`.
///
/// With `max_bytes` and a lossy format, the highest quality in
/// `1..=options.quality` that fits the budget is found by binary search. If
/// no tried quality fits, the smallest output is returned.
pub fn compress(image: &RasterBuffer, options: &CompressOptions) -> Result<CompressedImage, ConvertError> {
    let source = match options.max_dimension {
        Some(max_edge) => resize_to_fit(image, max_edge, FilterType::Lanczos3)?,
        None => image.clone(),
    };

    let format = options.format;
    let quality = options.quality.clamp(1, 100);
    let first = encode(&source, format, quality)?;

    let limit = match options.max_bytes {
        Some(limit) if first.len() > limit => limit,
        _ => return Ok(finish(&source, format, first, quality)),
    };
    if !format.is_lossy() {
        log::warn!(
            "{} output is {} bytes, over the {limit} byte budget; quality has no effect",
            format.mime_type(),
            first.len()
        );
        return Ok(finish(&source, format, first, quality));
    }

    let mut best: Option<(Vec<u8>, u8)> = None;
    let mut smallest = (first, quality);
    let (mut lo, mut hi) = (1u8, quality - 1);

    while lo <= hi {
        let mid = lo + (hi - lo) / 2;
        let bytes = encode(&source, format, mid)?;
        log::debug!("quality {mid}: {} bytes", bytes.len());

        if bytes.len() <= limit {
            best = Some((bytes, mid));
            lo = mid + 1;
        } else {
            if bytes.len() < smallest.0.len() {
                smallest = (bytes, mid);
            }
            if mid == 1 {
                break;
            }
            hi = mid - 1;
        }
    }

    let (bytes, quality) = match best {
        Some(found) => found,
        None => {
            log::warn!(
                "no quality fits {limit} bytes; returning {} bytes at quality {}",
                smallest.0.len(),
                smallest.1
            );
            smallest
        }
    };
    Ok(finish(&source, format, bytes, quality))
}

fn finish(source: &RasterBuffer, format: OutputFormat, bytes: Vec<u8>, quality: u8) -> CompressedImage {
    CompressedImage {
        image: EncodedImage {
            bytes,
            width: source.width,
            height: source.height,
            format,
        },
        quality,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Noisy content so JPEG size actually depends on quality.
    fn noisy(width: u32, height: u32) -> RasterBuffer {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        let mut state = 0x2545_f491u32;
        for _ in 0..width * height {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let [r, g, b, _] = state.to_le_bytes();
            pixels.extend_from_slice(&[r, g, b, 255]);
        }
        RasterBuffer::new(width, height, pixels)
    }

    #[test]
    fn test_plain_compress_keeps_size() {
        let out = compress(&noisy(32, 16), &CompressOptions::default()).unwrap();
        assert_eq!((out.image.width, out.image.height), (32, 16));
        assert_eq!(out.quality, DEFAULT_COMPRESS_QUALITY);
        assert_eq!(out.image.format, OutputFormat::Jpeg);
    }

    #[test]
    fn test_max_dimension_scales_down() {
        let options = CompressOptions {
            max_dimension: Some(16),
            ..CompressOptions::default()
        };
        let out = compress(&noisy(64, 32), &options).unwrap();
        assert_eq!((out.image.width, out.image.height), (16, 8));
    }

    #[test]
    fn test_byte_budget_lowers_quality() {
        let image = noisy(64, 64);
        let full = compress(&image, &CompressOptions { quality: 95, ..Default::default() }).unwrap();
        let budget = full.image.len() / 2;

        let options = CompressOptions {
            quality: 95,
            max_bytes: Some(budget),
            ..CompressOptions::default()
        };
        let out = compress(&image, &options).unwrap();
        assert!(out.quality < 95);
        assert!(out.image.len() <= budget || out.quality == 1);
        assert!(out.savings_ratio(full.image.len()) > 0.0);
    }

    #[test]
    fn test_budget_met_at_start_keeps_quality() {
        let options = CompressOptions {
            max_bytes: Some(usize::MAX),
            ..CompressOptions::default()
        };
        let out = compress(&noisy(16, 16), &options).unwrap();
        assert_eq!(out.quality, DEFAULT_COMPRESS_QUALITY);
    }

    #[test]
    fn test_lossless_format_ignores_budget() {
        let options = CompressOptions {
            format: OutputFormat::Png,
            max_bytes: Some(1),
            ..CompressOptions::default()
        };
        let out = compress(&noisy(16, 16), &options).unwrap();
        assert_eq!(out.image.format, OutputFormat::Png);
        assert!(out.image.len() > 1);
    }

    #[test]
    fn test_savings_ratio() {
        let out = CompressedImage {
            image: EncodedImage {
                bytes: vec![0; 60],
                width: 1,
                height: 1,
                format: OutputFormat::Jpeg,
            },
            quality: 50,
        };
        assert!((out.savings_ratio(100) - 0.4).abs() < 1e-12);
        assert!(out.savings_ratio(30) < 0.0);
        assert_eq!(out.savings_ratio(0), 0.0);
    }
}
