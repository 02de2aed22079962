use image::imageops::FilterType;
use rayon::prelude::*;

use crate::foundation::core::{PixelRect, PixelSize, Rgba8};
use crate::foundation::error::{ViewgridError, ViewgridResult};
use crate::foundation::math::{
    mul_div255_u8, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place,
};
use crate::grid::layout::GridLayout;
use crate::raster::Raster;

/// How the grid cell size is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellSizing {
    /// Every cell has this size.
    Fixed(PixelSize),
    /// Cells are as large as the widest and tallest input.
    AutoFit,
}

/// Grid composite options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridOpts {
    /// Cell size.
    pub cell: CellSizing,
    /// Canvas fill behind the letterboxed images.
    pub background: Rgba8,
    /// Center a row shorter than the widest one instead of left-aligning it.
    pub center_short_rows: bool,
}

impl Default for GridOpts {
    fn default() -> Self {
        Self {
            cell: CellSizing::Fixed(PixelSize {
                width: 1920,
                height: 1080,
            }),
            background: Rgba8::WHITE,
            center_short_rows: true,
        }
    }
}

impl GridOpts {
    /// Reject zero-sized fixed cells.
    pub fn validate(&self) -> ViewgridResult<()> {
        if let CellSizing::Fixed(size) = self.cell {
            PixelSize::new(size.width, size.height)?;
        }
        Ok(())
    }
}

/// Where one input landed on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Input index.
    pub index: usize,
    /// Grid row.
    pub row: usize,
    /// Column within the row.
    pub col: usize,
    /// Full cell area.
    pub cell: PixelRect,
    /// Area covered by the resized image, centered inside `cell`.
    pub image: PixelRect,
}

/// Output of [`compose_grid`].
#[derive(Clone, Debug)]
pub struct Composite {
    /// Composited canvas, `max_cols * cell.width` by `rows * cell.height`.
    pub canvas: Raster,
    /// Row partition used.
    pub layout: GridLayout,
    /// Cell size used.
    pub cell: PixelSize,
    /// One entry per input, in input order.
    pub placements: Vec<Placement>,
}

/// Largest size with the aspect ratio of `src` that fits inside `cell`.
///
/// One side always matches the cell exactly; the other is rounded down and kept at least 1.
pub fn fit_within(src: PixelSize, cell: PixelSize) -> PixelSize {
    let (w, h) = (u64::from(src.width.max(1)), u64::from(src.height.max(1)));
    let (cw, ch) = (u64::from(cell.width), u64::from(cell.height));
    if cw * h <= ch * w {
        PixelSize {
            width: cell.width,
            height: ((h * cw) / w).clamp(1, ch) as u32,
        }
    } else {
        PixelSize {
            width: ((w * ch) / h).clamp(1, cw) as u32,
            height: cell.height,
        }
    }
}

/// Lay `images` out in a grid, each resized to fit its cell with the aspect ratio kept.
///
/// Images are resized in parallel (Lanczos3, premultiplied) and composited over the background
/// in input order.
#[tracing::instrument(skip(images, opts), fields(count = images.len()))]
pub fn compose_grid(images: &[Raster], opts: &GridOpts) -> ViewgridResult<Composite> {
    let layout = GridLayout::for_count(images.len())?;
    opts.validate()?;
    if let Some(i) = images.iter().position(Raster::is_empty) {
        return Err(ViewgridError::validation(format!(
            "grid input {i} has no pixels"
        )));
    }

    let cell = match opts.cell {
        CellSizing::Fixed(size) => size,
        CellSizing::AutoFit => PixelSize::new(
            images.iter().map(Raster::width).max().unwrap_or(1),
            images.iter().map(Raster::height).max().unwrap_or(1),
        )?,
    };
    let max_cols = layout.max_cols() as u32;
    let canvas_w = cell
        .width
        .checked_mul(max_cols)
        .ok_or_else(|| ViewgridError::validation("grid canvas width overflows"))?;
    let canvas_h = cell
        .height
        .checked_mul(layout.row_count() as u32)
        .ok_or_else(|| ViewgridError::validation("grid canvas height overflows"))?;

    let placements: Vec<Placement> = layout
        .cells()
        .zip(images)
        .enumerate()
        .map(|(index, ((row, col), img))| {
            let row_len = layout.rows()[row] as u32;
            let offset = if opts.center_short_rows {
                (max_cols - row_len) * cell.width / 2
            } else {
                0
            };
            let x0 = offset + col as u32 * cell.width;
            let y0 = row as u32 * cell.height;
            let fit = fit_within(
                PixelSize {
                    width: img.width(),
                    height: img.height(),
                },
                cell,
            );
            let ix = x0 + (cell.width - fit.width) / 2;
            let iy = y0 + (cell.height - fit.height) / 2;
            Placement {
                index,
                row,
                col,
                cell: PixelRect {
                    x0,
                    y0,
                    x1: x0 + cell.width,
                    y1: y0 + cell.height,
                },
                image: PixelRect {
                    x0: ix,
                    y0: iy,
                    x1: ix + fit.width,
                    y1: iy + fit.height,
                },
            }
        })
        .collect();

    let resized = images
        .par_iter()
        .zip(placements.par_iter())
        .map(|(img, p)| resize_premul(img, p.image.width(), p.image.height()))
        .collect::<ViewgridResult<Vec<_>>>()?;

    let bg = opts.background.to_premul();
    let mut canvas = bg.repeat((canvas_w as usize) * (canvas_h as usize));
    let stride = (canvas_w as usize) * 4;
    for (p, src) in placements.iter().zip(&resized) {
        let w = p.image.width() as usize;
        for (sy, src_row) in src.chunks_exact(w * 4).enumerate() {
            let start = (p.image.y0 as usize + sy) * stride + (p.image.x0 as usize) * 4;
            over_row(&mut canvas[start..start + w * 4], src_row);
        }
    }
    unpremultiply_rgba8_in_place(&mut canvas);

    tracing::debug!(
        rows = layout.row_count(),
        max_cols,
        width = canvas_w,
        height = canvas_h,
        "grid composed"
    );
    Ok(Composite {
        canvas: Raster::from_rgba8(canvas_w, canvas_h, canvas)?,
        layout,
        cell,
        placements,
    })
}

fn resize_premul(img: &Raster, width: u32, height: u32) -> ViewgridResult<Vec<u8>> {
    let mut premul = img.clone().into_rgba_image()?;
    premultiply_rgba8_in_place(&mut premul);
    if premul.dimensions() == (width, height) {
        return Ok(premul.into_raw());
    }
    Ok(image::imageops::resize(&premul, width, height, FilterType::Lanczos3).into_raw())
}

fn over_row(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
}

fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    if src[3] == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/grid/compositor.rs"]
mod tests;
