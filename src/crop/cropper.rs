use crate::crop::bbox::{BoundingBox, ContentRule, content_bbox};
use crate::foundation::core::PixelRect;
use crate::foundation::error::ViewgridResult;
use crate::raster::Raster;

/// Cropping parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CropOpts {
    /// Pixels with alpha strictly above this are content.
    pub alpha_threshold: u8,
    /// Optional lower alpha bar for tinted pixels, see [`ContentRule`].
    pub colored_alpha_threshold: Option<u8>,
    /// Extra pixels kept around the content on every side, clamped to the raster.
    pub padding: u32,
}

impl Default for CropOpts {
    fn default() -> Self {
        Self {
            alpha_threshold: 30,
            colored_alpha_threshold: None,
            padding: 0,
        }
    }
}

impl CropOpts {
    /// The per-pixel content test these options describe.
    pub fn rule(&self) -> ContentRule {
        ContentRule {
            alpha_threshold: self.alpha_threshold,
            colored_alpha_threshold: self.colored_alpha_threshold,
        }
    }
}

/// Result of [`crop_to_content`].
#[derive(Clone, Debug, PartialEq)]
pub enum CropOutcome {
    /// Content found; `raster` is the padded, clamped sub-raster.
    Cropped {
        /// Cropped pixels.
        raster: Raster,
        /// Content box in source coordinates.
        bbox: BoundingBox,
        /// Region of the source that was kept.
        region: PixelRect,
    },
    /// No pixel passed the content test. Nothing is produced and callers skip the image.
    Empty,
}

impl CropOutcome {
    /// Cropped raster, if any.
    pub fn raster(&self) -> Option<&Raster> {
        match self {
            Self::Cropped { raster, .. } => Some(raster),
            Self::Empty => None,
        }
    }

    /// Consume and return the cropped raster, if any.
    pub fn into_raster(self) -> Option<Raster> {
        match self {
            Self::Cropped { raster, .. } => Some(raster),
            Self::Empty => None,
        }
    }
}

/// Crop `raster` to its content box grown by `opts.padding`.
///
/// The padded region never leaves the source raster. With zero padding the operation is
/// idempotent: cropping the output again keeps it whole.
pub fn crop_to_content(raster: &Raster, opts: &CropOpts) -> ViewgridResult<CropOutcome> {
    let Some(bbox) = content_bbox(raster, &opts.rule()) else {
        tracing::debug!(
            width = raster.width(),
            height = raster.height(),
            "no content above threshold"
        );
        return Ok(CropOutcome::Empty);
    };
    let region = bbox.padded_region(opts.padding, raster.width(), raster.height());
    Ok(CropOutcome::Cropped {
        raster: raster.sub_raster(region)?,
        bbox,
        region,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/crop/cropper.rs"]
mod tests;
