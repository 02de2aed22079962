use std::path::Path;

use crate::capture::orchestrator::CaptureOpts;
use crate::capture::plan::OrientationPlan;
use crate::crop::cropper::CropOpts;
use crate::foundation::core::Vec3;
use crate::foundation::error::{ViewgridError, ViewgridResult};
use crate::geometry::align::GroundAlignOpts;
use crate::grid::compositor::GridOpts;
use crate::render::backend::RenderSettings;

/// Default capture step in degrees.
pub const DEFAULT_ROTATION_INCREMENT_DEG: u32 = 60;

/// Default base orientations: upright, tipped forward, tipped back, on its side.
pub fn default_orientations() -> Vec<Vec3> {
    vec![
        Vec3::ZERO,
        Vec3::new(90.0, 0.0, 0.0),
        Vec3::new(-90.0, 0.0, 0.0),
        Vec3::new(0.0, 90.0, 0.0),
    ]
}

/// Pipeline configuration, read from JSON.
///
/// Every field has a default, so `{}` is a valid configuration. Unknown keys are rejected.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Orientation planning, ground alignment and render settings.
    pub capture: CaptureConfig,
    /// Content cropping.
    pub crop: CropOpts,
    /// Grid compositing.
    pub grid: GridOpts,
}

/// `capture` section of [`PipelineConfig`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptureConfig {
    /// Spin step about the vertical axis, in degrees.
    pub rotation_increment_deg: u32,
    /// Base orientations as `[x, y, z]` Euler angles in degrees.
    pub orientations: Vec<Vec3>,
    /// Ground alignment.
    pub ground: GroundAlignOpts,
    /// Render settings for every view.
    pub render: RenderSettings,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            rotation_increment_deg: DEFAULT_ROTATION_INCREMENT_DEG,
            orientations: default_orientations(),
            ground: GroundAlignOpts::default(),
            render: RenderSettings::default(),
        }
    }
}

impl CaptureConfig {
    /// Orientation plan for these settings.
    pub fn plan(&self) -> ViewgridResult<OrientationPlan> {
        OrientationPlan::new(&self.orientations, self.rotation_increment_deg)
    }

    /// Options for the capture orchestrator.
    pub fn capture_opts(&self) -> CaptureOpts {
        CaptureOpts {
            ground: self.ground,
            render: self.render,
        }
    }
}

impl PipelineConfig {
    /// Parse JSON from a reader. The result is not validated.
    pub fn from_reader<R: std::io::Read>(r: R) -> ViewgridResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ViewgridError::serde(format!("parse pipeline config JSON: {e}")))
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: &Path) -> ViewgridResult<Self> {
        let f = std::fs::File::open(path)
            .map_err(|e| ViewgridError::io(format!("open config '{}': {e}", path.display())))?;
        let cfg = Self::from_reader(std::io::BufReader::new(f))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings no stage can run with.
    pub fn validate(&self) -> ViewgridResult<()> {
        let c = &self.capture;
        if c.rotation_increment_deg == 0 {
            return Err(ViewgridError::validation(
                "capture.rotation_increment_deg must be > 0",
            ));
        }
        if c.orientations.is_empty() {
            return Err(ViewgridError::validation(
                "capture.orientations must not be empty",
            ));
        }
        if let Some(bad) = c.orientations.iter().find(|o| !o.is_finite()) {
            return Err(ViewgridError::validation(format!(
                "capture.orientations contains a non-finite rotation {bad:?}"
            )));
        }
        c.ground.validate()?;
        c.render.validate()?;
        self.grid.validate()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
