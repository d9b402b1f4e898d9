//! The collage tool: several images arranged on one canvas.
//!
//! Every image gets a cell of the same size. Cells are separated (and the
//! canvas is framed) by `spacing` pixels of background. Images larger than a
//! cell are scaled down to fit; smaller ones keep their size. Each image is
//! centered in its cell and blended over the background.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{resize_with, DecodeError, Fit, FilterType, RasterBuffer, ResizeOptions, CHANNELS};

/// Largest canvas side the collage tool will allocate.
pub const MAX_CANVAS_DIMENSION: u32 = 16384;

#[derive(Debug, Error)]
pub enum CollageError {
    #[error("No images to arrange")]
    NoImages,

    #[error("Grid layout needs at least one column")]
    InvalidColumns,

    #[error("Image {index} has no pixels")]
    EmptyImage { index: usize },

    #[error("Collage would be {width}x{height}, over the 16384 pixel limit")]
    CanvasTooLarge { width: u64, height: u64 },

    #[error(transparent)]
    Resize(#[from] DecodeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CollageLayout {
    /// One row.
    #[default]
    Horizontal,
    /// One column.
    Vertical,
    /// Row-major grid with a fixed column count.
    Grid { columns: u32 },
}

impl CollageLayout {
    /// `(columns, rows)` for `count` images.
    fn grid_shape(self, count: u32) -> Result<(u32, u32), CollageError> {
        match self {
            CollageLayout::Horizontal => Ok((count, 1)),
            CollageLayout::Vertical => Ok((1, count)),
            CollageLayout::Grid { columns: 0 } => Err(CollageError::InvalidColumns),
            CollageLayout::Grid { columns } => {
                Ok((columns.min(count), count.div_ceil(columns)))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollageOptions {
    pub layout: CollageLayout,
    /// Gap between cells and around the edge, in pixels.
    pub spacing: u32,
    /// RGBA background.
    pub background: [u8; 4],
    /// Cell size; defaults to the largest input on each axis.
    pub cell_width: Option<u32>,
    pub cell_height: Option<u32>,
    pub filter: FilterType,
}

impl Default for CollageOptions {
    fn default() -> Self {
        Self {
            layout: CollageLayout::Horizontal,
            spacing: 10,
            background: [255, 255, 255, 255],
            cell_width: None,
            cell_height: None,
            filter: FilterType::Lanczos3,
        }
    }
}

/// Arrange `images` into a single buffer.
///
/// # Errors
///
/// - `NoImages` for an empty slice
/// - `InvalidColumns` for a zero-column grid
/// - `EmptyImage` when an input has a zero dimension
/// - `CanvasTooLarge` when either side would exceed [`MAX_CANVAS_DIMENSION`]
pub fn build_collage(images: &[RasterBuffer], options: &CollageOptions) -> Result<RasterBuffer, CollageError> {
    if images.is_empty() {
        return Err(CollageError::NoImages);
    }
    if let Some(index) = images.iter().position(RasterBuffer::is_empty) {
        return Err(CollageError::EmptyImage { index });
    }

    let count = u32::try_from(images.len()).unwrap_or(u32::MAX);
    let (columns, rows) = options.layout.grid_shape(count)?;

    let cell_w = options
        .cell_width
        .filter(|&w| w > 0)
        .unwrap_or_else(|| images.iter().map(|i| i.width).max().unwrap_or(1));
    let cell_h = options
        .cell_height
        .filter(|&h| h > 0)
        .unwrap_or_else(|| images.iter().map(|i| i.height).max().unwrap_or(1));

    let spacing = u64::from(options.spacing);
    let width = u64::from(columns) * u64::from(cell_w) + (u64::from(columns) + 1) * spacing;
    let height = u64::from(rows) * u64::from(cell_h) + (u64::from(rows) + 1) * spacing;
    let limit = u64::from(MAX_CANVAS_DIMENSION);
    if width > limit || height > limit {
        return Err(CollageError::CanvasTooLarge { width, height });
    }

    log::debug!(
        "collage of {} images: {columns}x{rows} cells of {cell_w}x{cell_h}, canvas {width}x{height}",
        images.len()
    );

    // Both sides are at most MAX_CANVAS_DIMENSION here.
    let mut canvas = RasterBuffer::filled(width as u32, height as u32, options.background);
    let fit = ResizeOptions {
        width: Some(cell_w),
        height: Some(cell_h),
        fit: Fit::Max,
        filter: options.filter,
    };

    for (index, image) in images.iter().enumerate() {
        let index = index as u32;
        let (col, row) = (index % columns, index / columns);
        let fitted = resize_with(image, &fit)?;

        let cell_x = options.spacing + col * (cell_w + options.spacing);
        let cell_y = options.spacing + row * (cell_h + options.spacing);
        let x = cell_x + (cell_w - fitted.width) / 2;
        let y = cell_y + (cell_h - fitted.height) / 2;
        blend_onto(&mut canvas, &fitted, x, y);
    }

    Ok(canvas)
}

/// Source-over blend of `src` onto `dst` at `(x, y)`. `src` must fit.
fn blend_onto(dst: &mut RasterBuffer, src: &RasterBuffer, x: u32, y: u32) {
    let dst_stride = dst.width as usize * CHANNELS;
    let src_stride = src.width as usize * CHANNELS;

    for row in 0..src.height as usize {
        let d_start = (y as usize + row) * dst_stride + x as usize * CHANNELS;
        let s_start = row * src_stride;
        let d_row = &mut dst.pixels[d_start..d_start + src_stride];
        let s_row = &src.pixels[s_start..s_start + src_stride];

        for (d, s) in d_row.chunks_exact_mut(CHANNELS).zip(s_row.chunks_exact(CHANNELS)) {
            let alpha = u32::from(s[3]);
            if alpha == 255 {
                d.copy_from_slice(s);
                continue;
            }
            for c in 0..3 {
                let blended = (u32::from(s[c]) * alpha + u32::from(d[c]) * (255 - alpha) + 127) / 255;
                d[c] = blended as u8;
            }
            let out_alpha = alpha + u32::from(d[3]) * (255 - alpha) / 255;
            d[3] = out_alpha.min(255) as u8;
        }
    }
}
