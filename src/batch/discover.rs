use std::path::{Path, PathBuf};

use crate::foundation::error::{ViewgridError, ViewgridResult};

/// File extensions accepted as render images (compared case-insensitively).
pub const RENDER_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

const RENDER_PREFIX: &str = "render_";
const RUN_PREFIX: &str = "_run_";

/// Angle encoded in a `render_<angle>.<ext>` file name.
pub fn render_angle(file_name: &str) -> Option<u32> {
    let rest = file_name.strip_prefix(RENDER_PREFIX)?;
    let stem = rest.split('.').next()?;
    stem.parse().ok()
}

/// Return `true` for `render_*` files with an image extension.
pub fn is_render_image(path: &Path) -> bool {
    let name_ok = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(RENDER_PREFIX));
    name_ok && has_extension(path, &RENDER_EXTENSIONS)
}

pub(crate) fn has_extension(path: &Path, exts: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| exts.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

/// Render images directly inside `dir`, ordered by angle.
///
/// Names without a parsable angle sort after all numbered ones, by name.
pub fn render_images(dir: &Path) -> ViewgridResult<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = list_dir(dir)?
        .into_iter()
        .filter(|p| p.is_file() && is_render_image(p))
        .collect();
    files.sort_by_key(|p| {
        let name = p
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        (render_angle(&name).map_or(u64::MAX, u64::from), name)
    });
    Ok(files)
}

/// Find directories holding render images below `root`.
///
/// Each child of `root` counts when it directly contains render images; otherwise its numbered
/// (`0`, `1`, ...) and `_run_<n>` children are checked. Results are sorted by path.
pub fn discover_render_dirs(root: &Path) -> ViewgridResult<Vec<PathBuf>> {
    let mut out = Vec::new();
    for child in list_dir(root)? {
        if !child.is_dir() {
            continue;
        }
        if has_render_images(&child)? {
            out.push(child);
            continue;
        }
        for grandchild in list_dir(&child)? {
            let Some(name) = grandchild.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let is_group = is_orientation_dir(name) || name.starts_with(RUN_PREFIX);
            if is_group && grandchild.is_dir() && has_render_images(&grandchild)? {
                out.push(grandchild);
            }
        }
    }
    out.sort();
    Ok(out)
}

/// Output file name of the composite for a render directory.
///
/// `<model>/<i>` becomes `<model>_rotation_<i>_composite.png`, `<model>/_run_<n>` becomes
/// `<model>__run_<n>_composite.png`, and any other directory `<dir>_composite.png`.
pub fn composite_name(render_dir: &Path) -> String {
    let dir = file_name_lossy(render_dir);
    let parent = render_dir.parent().map(file_name_lossy).unwrap_or_default();
    if is_orientation_dir(&dir) {
        format!("{parent}_rotation_{dir}_composite.png")
    } else if dir.starts_with(RUN_PREFIX) {
        format!("{parent}_{dir}_composite.png")
    } else {
        format!("{dir}_composite.png")
    }
}

fn is_orientation_dir(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

fn has_render_images(dir: &Path) -> ViewgridResult<bool> {
    Ok(list_dir(dir)?
        .iter()
        .any(|p| p.is_file() && is_render_image(p)))
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub(crate) fn list_dir(dir: &Path) -> ViewgridResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| ViewgridError::io(format!("read dir '{}': {e}", dir.display())))?;
    let mut out = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| ViewgridError::io(format!("read dir '{}': {e}", dir.display())))?;
        out.push(entry.path());
    }
    out.sort();
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/batch/discover.rs"]
mod tests;
