use crate::capture::session::SceneSession;
use crate::foundation::error::{ViewgridError, ViewgridResult};
use crate::raster::Raster;

/// Render configuration handed to a [`RenderCollaborator`] for every view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Sample count for path-tracing collaborators. Rasterizers may ignore it.
    pub samples: u32,
    /// Render onto a transparent background.
    pub transparent_background: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            samples: 128,
            transparent_background: true,
        }
    }
}

impl RenderSettings {
    /// Check that the settings describe a non-empty image.
    pub fn validate(&self) -> ViewgridResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ViewgridError::validation(format!(
                "render resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples == 0 {
            return Err(ViewgridError::validation("render samples must be > 0"));
        }
        Ok(())
    }
}

/// External renderer: turns the current scene state into a raster.
///
/// Implementations may keep internal state between calls; capture never calls a collaborator
/// from two threads at once.
pub trait RenderCollaborator {
    /// Render the scene under its current placement.
    fn render_view(
        &mut self,
        scene: &SceneSession,
        settings: &RenderSettings,
    ) -> ViewgridResult<Raster>;
}

impl<F> RenderCollaborator for F
where
    F: FnMut(&SceneSession, &RenderSettings) -> ViewgridResult<Raster>,
{
    fn render_view(
        &mut self,
        scene: &SceneSession,
        settings: &RenderSettings,
    ) -> ViewgridResult<Raster> {
        self(scene, settings)
    }
}
