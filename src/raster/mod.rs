pub(crate) mod io;

use crate::foundation::core::{PixelRect, Rgba8};
use crate::foundation::error::{ViewgridError, ViewgridResult};

/// An RGBA8 raster with straight (non-premultiplied) alpha.
///
/// Pixels are row-major and tightly packed. The alpha channel is meaningful: renders are
/// produced on a transparent background and cropping keys off alpha.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// Wrap raw RGBA8 bytes. `data.len()` must equal `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> ViewgridResult<Self> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(ViewgridError::validation(format!(
                "raster {width}x{height} expects {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Raster filled with a single color.
    pub fn new_filled(width: u32, height: u32, color: Rgba8) -> ViewgridResult<Self> {
        let px_count = byte_len(width, height)? / 4;
        Ok(Self {
            width,
            height,
            data: color.to_array().repeat(px_count),
        })
    }

    /// Fully transparent raster.
    pub fn transparent(width: u32, height: u32) -> ViewgridResult<Self> {
        Self::new_filled(width, height, Rgba8::TRANSPARENT)
    }

    /// Take ownership of an `image` RGBA buffer.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    /// Convert into an `image` RGBA buffer.
    pub fn into_rgba_image(self) -> ViewgridResult<image::RgbaImage> {
        let (w, h) = (self.width, self.height);
        image::RgbaImage::from_raw(w, h, self.data)
            .ok_or_else(|| ViewgridError::validation(format!("raster buffer does not fit {w}x{h}")))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Return `true` when the raster has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    /// Overwrite the pixel at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = self.index(x, y);
        self.data[idx..idx + 4].copy_from_slice(&px);
    }

    /// Rows of RGBA8 bytes, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        let stride = (self.width as usize) * 4;
        self.data.chunks_exact(stride.max(4)).take(self.height as usize)
    }

    /// Copy out the pixels inside `rect`, which must lie within the raster.
    pub fn sub_raster(&self, rect: PixelRect) -> ViewgridResult<Raster> {
        if rect.x0 > rect.x1 || rect.y0 > rect.y1 || rect.x1 > self.width || rect.y1 > self.height
        {
            return Err(ViewgridError::validation(format!(
                "sub-raster {rect:?} is outside {}x{}",
                self.width, self.height
            )));
        }
        let (w, h) = (rect.width(), rect.height());
        let mut data = Vec::with_capacity(byte_len(w, h)?);
        for y in rect.y0..rect.y1 {
            let start = self.index(rect.x0, y);
            data.extend_from_slice(&self.data[start..start + (w as usize) * 4]);
        }
        Raster::from_rgba8(w, h, data)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }
}

fn byte_len(width: u32, height: u32) -> ViewgridResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| ViewgridError::validation("raster buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/raster.rs"]
mod tests;
