use crate::foundation::core::Vec3;
use crate::foundation::error::{ViewgridError, ViewgridResult};
use crate::geometry::transform::Transform;

/// Identity of one captured view: base orientation index plus spin angle.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ViewKey {
    /// Index into the base orientation list.
    pub orientation_index: usize,
    /// Spin about the vertical axis, in whole degrees within `[0, 360)`.
    pub angle_deg: u32,
}

impl std::fmt::Display for ViewKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.orientation_index, self.angle_deg)
    }
}

/// One entry of an [`OrientationPlan`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlannedView {
    /// Output key.
    pub key: ViewKey,
    /// Base orientation (XYZ degrees) this view starts from.
    pub base_rotation_deg: Vec3,
    /// Base orientation followed by the spin about the vertical axis.
    pub transform: Transform,
}

/// Ordered list of views to capture for one asset.
///
/// Order is base orientations in input order, then ascending spin angles. It drives output naming
/// and is identical for identical inputs.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OrientationPlan {
    views: Vec<PlannedView>,
}

/// Spin angles for an increment: every multiple of `increment_deg` in `[0, 360)`.
///
/// When the increment does not divide 360 the last, shorter interval is still covered by its
/// starting angle. Increments of 360 or more yield only `0`.
pub fn rotation_steps(increment_deg: u32) -> ViewgridResult<Vec<u32>> {
    if increment_deg == 0 {
        return Err(ViewgridError::validation(
            "rotation increment must be > 0 degrees",
        ));
    }
    Ok((0..360).step_by(increment_deg as usize).collect())
}

impl OrientationPlan {
    /// Enumerate `base_orientations x rotation_steps(increment_deg)`.
    pub fn new(base_orientations: &[Vec3], increment_deg: u32) -> ViewgridResult<Self> {
        let steps = rotation_steps(increment_deg)?;
        if let Some(bad) = base_orientations.iter().find(|r| !r.is_finite()) {
            return Err(ViewgridError::validation(format!(
                "base orientation {bad:?} must be finite"
            )));
        }

        let mut views = Vec::with_capacity(base_orientations.len() * steps.len());
        for (orientation_index, &base) in base_orientations.iter().enumerate() {
            let base_t = Transform::rotation(base);
            for &angle_deg in &steps {
                views.push(PlannedView {
                    key: ViewKey {
                        orientation_index,
                        angle_deg,
                    },
                    base_rotation_deg: base,
                    transform: base_t.then_spin_z(angle_deg as f32),
                });
            }
        }
        Ok(Self { views })
    }

    /// Wrap an existing view list, e.g. a plan loaded back from JSON for replay.
    ///
    /// Keys are not checked for uniqueness here; capture rejects repeated keys.
    pub fn from_views(views: Vec<PlannedView>) -> Self {
        Self { views }
    }

    /// Parse a plan previously written with `serde_json`.
    pub fn from_json_reader<R: std::io::Read>(r: R) -> ViewgridResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ViewgridError::serde(format!("parse orientation plan JSON: {e}")))
    }

    /// Views in capture order.
    pub fn views(&self) -> &[PlannedView] {
        &self.views
    }

    /// Number of views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Return `true` when the plan has no views.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// First repeated key, if any.
    pub fn first_duplicate(&self) -> Option<ViewKey> {
        let mut seen = std::collections::HashSet::with_capacity(self.views.len());
        self.views
            .iter()
            .map(|v| v.key)
            .find(|&k| !seen.insert(k))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/plan.rs"]
mod tests;
