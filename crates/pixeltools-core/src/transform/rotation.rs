//! Quarter-turn rotation and mirroring of raster buffers.
//!
//! Rotation is clockwise in the y-down raster coordinate system, matching a
//! canvas `rotate(θ)` call. Pixels move by exact index mapping, so there is
//! no interpolation and no loss.
//!
//! For a source of size `ow x oh`, output pixel `(dx, dy)` reads from:
//! ```text
//!   0°: (dx,          dy)
//!  90°: (dy,          oh - 1 - dx)
//! 180°: (ow - 1 - dx, oh - 1 - dy)
//! 270°: (ow - 1 - dy, dx)
//! ```

use serde::{Deserialize, Serialize};

use crate::decode::{RasterBuffer, CHANNELS};
use crate::geometry::ImageSize;

/// Rotation applied to the source before cropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::Deg0, Rotation::Deg90, Rotation::Deg180, Rotation::Deg270];

    /// Any multiple of 90, including negative and >= 360 values.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        if degrees % 90 != 0 {
            return None;
        }
        match degrees.rem_euclid(360) {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            _ => Some(Rotation::Deg270),
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    pub fn radians(self) -> f64 {
        f64::from(self.degrees()).to_radians()
    }

    /// `(r + 90) % 360`
    pub fn rotate_right(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    /// `(r + 270) % 360`
    pub fn rotate_left(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg270,
            Rotation::Deg90 => Rotation::Deg0,
            Rotation::Deg180 => Rotation::Deg90,
            Rotation::Deg270 => Rotation::Deg180,
        }
    }

    /// The rotation that undoes this one: `(360 - r) % 360`.
    pub fn inverse(self) -> Self {
        match self {
            Rotation::Deg90 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg90,
            other => other,
        }
    }

    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    /// Size of a canvas holding `size` after this rotation.
    pub fn rotated_size(self, size: ImageSize) -> ImageSize {
        if self.swaps_dimensions() {
            ImageSize::new(size.height, size.width)
        } else {
            size
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(format!("rotation must be 0, 90, 180 or 270, got {other}")),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// Mirroring applied by the rotate/flip tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Flip {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Flip {
    pub const NONE: Flip = Flip {
        horizontal: false,
        vertical: false,
    };

    pub fn is_none(&self) -> bool {
        !self.horizontal && !self.vertical
    }
}

/// Render `image` rotated clockwise by `rotation` into a new buffer sized
/// `(ow, oh)` for 0/180 and `(oh, ow)` for 90/270.
pub fn render_rotated(image: &RasterBuffer, rotation: Rotation) -> RasterBuffer {
    if rotation == Rotation::Deg0 {
        return image.clone();
    }

    let (ow, oh) = (image.width as usize, image.height as usize);
    let out_size = rotation.rotated_size(ImageSize::new(image.width, image.height));
    let (dw, dh) = (out_size.width as usize, out_size.height as usize);
    let mut output = vec![0u8; dw * dh * CHANNELS];

    for dy in 0..dh {
        for dx in 0..dw {
            let (sx, sy) = match rotation {
                Rotation::Deg0 => (dx, dy),
                Rotation::Deg90 => (dy, oh - 1 - dx),
                Rotation::Deg180 => (ow - 1 - dx, oh - 1 - dy),
                Rotation::Deg270 => (ow - 1 - dy, dx),
            };
            copy_pixel(&image.pixels, sy * ow + sx, &mut output, dy * dw + dx);
        }
    }

    RasterBuffer::new(out_size.width, out_size.height, output)
}

/// Mirror `image` horizontally and/or vertically.
pub fn render_flipped(image: &RasterBuffer, flip: Flip) -> RasterBuffer {
    if flip.is_none() {
        return image.clone();
    }

    let (w, h) = (image.width as usize, image.height as usize);
    let mut output = vec![0u8; w * h * CHANNELS];

    for y in 0..h {
        let sy = if flip.vertical { h - 1 - y } else { y };
        for x in 0..w {
            let sx = if flip.horizontal { w - 1 - x } else { x };
            copy_pixel(&image.pixels, sy * w + sx, &mut output, y * w + x);
        }
    }

    RasterBuffer::new(image.width, image.height, output)
}

/// Mirror, then rotate, as the rotate/flip tool draws it: the flip is applied
/// in the source's own orientation.
pub fn apply_orientation(image: &RasterBuffer, rotation: Rotation, flip: Flip) -> RasterBuffer {
    let flipped = render_flipped(image, flip);
    render_rotated(&flipped, rotation)
}

#[inline]
fn copy_pixel(src: &[u8], src_index: usize, dst: &mut [u8], dst_index: usize) {
    let s = src_index * CHANNELS;
    let d = dst_index * CHANNELS;
    dst[d..d + CHANNELS].copy_from_slice(&src[s..s + CHANNELS]);
}
