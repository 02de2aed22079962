//! Ground alignment: rest a mesh on the ground plane and center it horizontally.
//!
//! The pivot is the second-lowest *distinct* vertex height. Heights within `tie_epsilon` of the
//! minimum collapse into one logical minimum first, so several vertices tied at the floor never
//! push the pivot above the real floor's neighbour. A single spiky outlier below the mesh is
//! skipped because it is the lowest distinct height.

use crate::foundation::core::Vec3;
use crate::foundation::error::{ViewgridError, ViewgridResult};
use crate::geometry::mesh::bounds;
use crate::geometry::transform::Transform;

/// Ground alignment parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GroundAlignOpts {
    /// Height the pivot vertex is moved to.
    pub ground_elevation: f32,
    /// Heights closer than this to the minimum count as the minimum.
    pub tie_epsilon: f32,
}

impl Default for GroundAlignOpts {
    fn default() -> Self {
        Self {
            ground_elevation: 0.0,
            tie_epsilon: 1e-6,
        }
    }
}

impl GroundAlignOpts {
    /// Check that the options are usable.
    pub fn validate(&self) -> ViewgridResult<()> {
        if !self.ground_elevation.is_finite() {
            return Err(ViewgridError::validation(
                "ground_elevation must be finite",
            ));
        }
        if !self.tie_epsilon.is_finite() || self.tie_epsilon < 0.0 {
            return Err(ViewgridError::validation(
                "tie_epsilon must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// Which vertex height ended up as the pivot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotRule {
    /// Second-lowest distinct height.
    SecondLowestDistinct,
    /// Absolute minimum, used when the mesh has fewer than two distinct heights.
    LowestFallback,
}

/// Result of ground alignment: a translation plus how the pivot was chosen.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GroundAlignment {
    /// Height of the pivot before alignment.
    pub pivot_height: f32,
    /// Rule that selected the pivot.
    pub pivot: PivotRule,
    /// Offset to add to every vertex.
    pub translation: Vec3,
}

impl GroundAlignment {
    /// The alignment as a translation-only transform.
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.translation)
    }
}

/// Second-lowest distinct value of `heights`.
///
/// Fails with [`ViewgridError::DegenerateMesh`] when fewer than two distinct heights exist.
pub fn second_lowest_distinct_height(heights: &[f32], tie_epsilon: f32) -> ViewgridResult<f32> {
    let (min, second) = lowest_two_distinct(heights, tie_epsilon)?;
    second.ok_or(ViewgridError::DegenerateMesh {
        distinct_heights: usize::from(min.is_some()),
    })
}

/// Align using the second-lowest distinct height; no fallback.
pub fn align_to_ground(points: &[Vec3], opts: &GroundAlignOpts) -> ViewgridResult<GroundAlignment> {
    opts.validate()?;
    let heights: Vec<f32> = points.iter().map(|p| p.z).collect();
    let pivot_height = second_lowest_distinct_height(&heights, opts.tie_epsilon)?;
    alignment_for(points, pivot_height, PivotRule::SecondLowestDistinct, opts)
}

/// Align using the second-lowest distinct height, falling back to the absolute minimum for
/// degenerate meshes. Only an empty point set is an error.
pub fn align_to_ground_or_lowest(
    points: &[Vec3],
    opts: &GroundAlignOpts,
) -> ViewgridResult<GroundAlignment> {
    match align_to_ground(points, opts) {
        Err(ViewgridError::DegenerateMesh { distinct_heights }) if distinct_heights > 0 => {
            let heights: Vec<f32> = points.iter().map(|p| p.z).collect();
            let (min, _) = lowest_two_distinct(&heights, opts.tie_epsilon)?;
            let min = min.ok_or_else(|| ViewgridError::validation("mesh has no vertices"))?;
            tracing::warn!(
                distinct_heights,
                pivot_height = min,
                "degenerate mesh, aligning on the lowest vertex instead"
            );
            alignment_for(points, min, PivotRule::LowestFallback, opts)
        }
        Err(ViewgridError::DegenerateMesh { .. }) => {
            Err(ViewgridError::validation("mesh has no vertices"))
        }
        other => other,
    }
}

fn lowest_two_distinct(
    heights: &[f32],
    tie_epsilon: f32,
) -> ViewgridResult<(Option<f32>, Option<f32>)> {
    if heights.iter().any(|h| !h.is_finite()) {
        return Err(ViewgridError::validation("vertex heights must be finite"));
    }
    let Some(min) = heights.iter().copied().reduce(f32::min) else {
        return Ok((None, None));
    };
    let second = heights
        .iter()
        .copied()
        .filter(|&h| h - min > tie_epsilon)
        .reduce(f32::min);
    Ok((Some(min), second))
}

fn alignment_for(
    points: &[Vec3],
    pivot_height: f32,
    pivot: PivotRule,
    opts: &GroundAlignOpts,
) -> ViewgridResult<GroundAlignment> {
    let (lo, hi) =
        bounds(points).ok_or_else(|| ViewgridError::validation("mesh has no vertices"))?;
    let center = (lo + hi) * 0.5;
    Ok(GroundAlignment {
        pivot_height,
        pivot,
        translation: Vec3::new(-center.x, -center.y, opts.ground_elevation - pivot_height),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/align.rs"]
mod tests;
