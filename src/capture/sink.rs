use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::capture::plan::ViewKey;
use crate::foundation::error::ViewgridResult;
use crate::raster::Raster;
use crate::raster::io::write_png;

/// Destination for captured views.
pub trait ViewSink {
    /// Store the raster produced for `key` of `asset`.
    fn accept(&mut self, asset: &str, key: ViewKey, view: &Raster) -> ViewgridResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemoryViewSink {
    views: BTreeMap<(String, ViewKey), Raster>,
    accepted: Vec<(String, ViewKey)>,
}

impl InMemoryViewSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored view for `(asset, key)`.
    pub fn get(&self, asset: &str, key: ViewKey) -> Option<&Raster> {
        self.views.get(&(asset.to_string(), key))
    }

    /// Keys in the order they were accepted.
    pub fn accepted(&self) -> &[(String, ViewKey)] {
        &self.accepted
    }

    /// Number of stored views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Return `true` when nothing was stored.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl ViewSink for InMemoryViewSink {
    fn accept(&mut self, asset: &str, key: ViewKey, view: &Raster) -> ViewgridResult<()> {
        self.views.insert((asset.to_string(), key), view.clone());
        self.accepted.push((asset.to_string(), key));
        Ok(())
    }
}

/// Writes `<root>/<asset>/<orientation>/render_<angle>.png`.
#[derive(Debug, Clone)]
pub struct PngDirSink {
    root: PathBuf,
}

impl PngDirSink {
    /// Sink rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Output root.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Deterministic output path of one view.
pub fn view_path(root: &Path, asset: &str, key: ViewKey) -> PathBuf {
    root.join(asset)
        .join(key.orientation_index.to_string())
        .join(format!("render_{}.png", key.angle_deg))
}

impl ViewSink for PngDirSink {
    fn accept(&mut self, asset: &str, key: ViewKey, view: &Raster) -> ViewgridResult<()> {
        let path = view_path(&self.root, asset, key);
        write_png(view, &path)?;
        tracing::debug!(path = %path.display(), "wrote view");
        Ok(())
    }
}
