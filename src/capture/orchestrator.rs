use std::collections::BTreeMap;

use crate::capture::plan::{OrientationPlan, ViewKey};
use crate::capture::session::SceneSession;
use crate::capture::sink::ViewSink;
use crate::foundation::error::{ViewgridError, ViewgridResult};
use crate::geometry::align::{GroundAlignOpts, GroundAlignment, align_to_ground_or_lowest};
use crate::geometry::transform::Transform;
use crate::render::backend::{RenderCollaborator, RenderSettings};

/// Options for [`capture_asset`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CaptureOpts {
    /// Ground alignment applied after each base orientation.
    pub ground: GroundAlignOpts,
    /// Settings passed to the render collaborator for every view.
    pub render: RenderSettings,
}

/// A view whose render or storage failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewFailure {
    /// View key.
    pub key: ViewKey,
    /// Error message.
    pub message: String,
}

/// Per-asset outcome of a capture run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CaptureSummary {
    /// Asset name.
    pub asset: String,
    /// Views stored successfully, in plan order.
    pub succeeded: Vec<ViewKey>,
    /// Views that failed, in plan order.
    pub failed: Vec<ViewFailure>,
    /// Ground alignment used for each base orientation index.
    pub alignments: BTreeMap<usize, GroundAlignment>,
}

impl CaptureSummary {
    /// Total number of views attempted.
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Return `true` when every view succeeded.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Capture every view of `plan` for the asset held by `scene`.
///
/// For each view the mesh is placed as `spin(angle) * ground_align * base_orientation`, where the
/// ground alignment is computed once per base orientation from the rotated mesh. Render calls are
/// strictly sequential. A failing render or sink write is recorded and capture moves on; a
/// repeated view key aborts the asset before anything is rendered.
pub fn capture_asset(
    scene: &mut SceneSession,
    plan: &OrientationPlan,
    opts: &CaptureOpts,
    renderer: &mut dyn RenderCollaborator,
    sink: &mut dyn ViewSink,
) -> ViewgridResult<CaptureSummary> {
    opts.render.validate()?;
    if let Some(key) = plan.first_duplicate() {
        tracing::error!(asset = scene.asset(), %key, "orientation plan repeats a view key");
        return Err(ViewgridError::KeyCollision {
            asset: scene.asset().to_string(),
            key,
        });
    }

    let mut summary = CaptureSummary {
        asset: scene.asset().to_string(),
        ..CaptureSummary::default()
    };

    for view in plan.views() {
        let alignment = match summary.alignments.get(&view.key.orientation_index) {
            Some(a) => *a,
            None => {
                let base = Transform::rotation(view.base_rotation_deg);
                let rotated = scene.positions_under(&base);
                let a = align_to_ground_or_lowest(&rotated, &opts.ground)?;
                tracing::debug!(
                    asset = scene.asset(),
                    orientation = view.key.orientation_index,
                    pivot_height = a.pivot_height,
                    pivot = ?a.pivot,
                    "ground aligned"
                );
                summary.alignments.insert(view.key.orientation_index, a);
                a
            }
        };

        let spun_offset = alignment
            .transform()
            .then_spin_z(view.key.angle_deg as f32)
            .translation;
        scene.apply(view.transform.then_translate(spun_offset));

        let stored = renderer
            .render_view(scene, &opts.render)
            .and_then(|raster| sink.accept(scene.asset(), view.key, &raster));
        match stored {
            Ok(()) => {
                tracing::debug!(asset = scene.asset(), key = %view.key, "captured view");
                summary.succeeded.push(view.key);
            }
            Err(e) => {
                tracing::error!(asset = scene.asset(), key = %view.key, error = %e, "view failed");
                summary.failed.push(ViewFailure {
                    key: view.key,
                    message: e.to_string(),
                });
            }
        }
    }
    scene.reset();

    tracing::info!(
        asset = scene.asset(),
        succeeded = summary.succeeded.len(),
        failed = summary.failed.len(),
        "capture finished"
    );
    Ok(summary)
}

#[cfg(test)]
#[path = "../../tests/unit/capture/orchestrator.rs"]
mod tests;
