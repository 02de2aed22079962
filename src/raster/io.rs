use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{ViewgridError, ViewgridResult};
use crate::raster::Raster;

/// Decode encoded image bytes (PNG, JPEG, BMP, ...) into a straight-alpha RGBA8 raster.
pub fn decode_raster(bytes: &[u8]) -> ViewgridResult<Raster> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(Raster::from_rgba_image(dyn_img.to_rgba8()))
}

/// Read and decode an image file.
pub fn read_raster(path: &Path) -> ViewgridResult<Raster> {
    let dyn_img = image::open(path)
        .map_err(|e| ViewgridError::io(format!("read image '{}': {e}", path.display())))?;
    Ok(Raster::from_rgba_image(dyn_img.to_rgba8()))
}

/// Encode a raster as PNG bytes.
pub fn encode_png(raster: &Raster) -> ViewgridResult<Vec<u8>> {
    let mut buf = Vec::new();
    image::write_buffer_with_format(
        &mut std::io::Cursor::new(&mut buf),
        raster.data(),
        raster.width(),
        raster.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .context("encode png")?;
    Ok(buf)
}

/// Write a raster as PNG, creating parent directories as needed.
pub fn write_png(raster: &Raster, path: &Path) -> ViewgridResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            ViewgridError::io(format!("create output dir '{}': {e}", parent.display()))
        })?;
    }
    image::save_buffer_with_format(
        path,
        raster.data(),
        raster.width(),
        raster.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| ViewgridError::io(format!("write png '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/io.rs"]
mod tests;
