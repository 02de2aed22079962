use crate::foundation::core::PixelRect;
use crate::raster::Raster;

/// Inclusive pixel bounding box `(min_x, min_y)..=(max_x, max_y)`.
///
/// Always satisfies `min_x <= max_x` and `min_y <= max_y`; "no content" is expressed as `None` by
/// [`content_bbox`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    /// Leftmost content column.
    pub min_x: u32,
    /// Topmost content row.
    pub min_y: u32,
    /// Rightmost content column.
    pub max_x: u32,
    /// Bottommost content row.
    pub max_y: u32,
}

impl BoundingBox {
    /// Box width in pixels.
    pub fn width(self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// Box height in pixels.
    pub fn height(self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Grow by `padding` on every side and clamp to a `width x height` raster.
    pub fn padded_region(self, padding: u32, width: u32, height: u32) -> PixelRect {
        PixelRect {
            x0: self.min_x.saturating_sub(padding),
            y0: self.min_y.saturating_sub(padding),
            x1: self
                .max_x
                .saturating_add(1)
                .saturating_add(padding)
                .min(width),
            y1: self
                .max_y
                .saturating_add(1)
                .saturating_add(padding)
                .min(height),
        }
    }
}

/// Per-pixel test deciding what counts as content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContentRule {
    /// A pixel is content when its alpha is strictly greater than this.
    pub alpha_threshold: u8,
    /// Optional lower alpha bar for tinted pixels: a pixel whose RGB is neither `(0,0,0)` nor
    /// `(1,1,1)` also counts once its alpha exceeds this value.
    pub colored_alpha_threshold: Option<u8>,
}

impl ContentRule {
    /// Plain alpha threshold.
    pub fn alpha(threshold: u8) -> Self {
        Self {
            alpha_threshold: threshold,
            colored_alpha_threshold: None,
        }
    }

    /// Return `true` when `px` is content.
    pub fn is_content(&self, px: [u8; 4]) -> bool {
        let [r, g, b, a] = px;
        if a > self.alpha_threshold {
            return true;
        }
        match self.colored_alpha_threshold {
            Some(t) => a > t && [r, g, b] != [0, 0, 0] && [r, g, b] != [1, 1, 1],
            None => false,
        }
    }
}

/// Minimal box around every content pixel, or `None` when the raster has none.
pub fn content_bbox(raster: &Raster, rule: &ContentRule) -> Option<BoundingBox> {
    let mut bbox: Option<BoundingBox> = None;
    for (y, row) in raster.rows().enumerate() {
        let y = y as u32;
        let mut cols = row
            .chunks_exact(4)
            .enumerate()
            .filter(|(_, px)| rule.is_content([px[0], px[1], px[2], px[3]]))
            .map(|(x, _)| x as u32);
        let Some(first) = cols.next() else {
            continue;
        };
        let last = cols.last().unwrap_or(first);
        bbox = Some(match bbox {
            None => BoundingBox {
                min_x: first,
                min_y: y,
                max_x: last,
                max_y: y,
            },
            Some(b) => BoundingBox {
                min_x: b.min_x.min(first),
                min_y: b.min_y,
                max_x: b.max_x.max(last),
                max_y: y,
            },
        });
    }
    bbox
}

#[cfg(test)]
#[path = "../../tests/unit/crop/bbox.rs"]
mod tests;
