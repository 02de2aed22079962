use std::sync::Arc;

use crate::foundation::core::Vec3;
use crate::geometry::mesh::Mesh;
use crate::geometry::transform::Transform;

/// Explicit scene handle for one asset.
///
/// Holds the source mesh (never modified) and the placement currently applied to it. Each asset
/// gets its own session, so several assets can be captured side by side without sharing state.
#[derive(Clone, Debug)]
pub struct SceneSession {
    asset: String,
    mesh: Arc<Mesh>,
    placement: Transform,
    applied: u64,
}

impl SceneSession {
    /// Open a session for `mesh` under the output name `asset`.
    pub fn new(asset: impl Into<String>, mesh: Mesh) -> Self {
        Self::with_shared_mesh(asset, Arc::new(mesh))
    }

    /// Open a session over a mesh shared with other sessions.
    pub fn with_shared_mesh(asset: impl Into<String>, mesh: Arc<Mesh>) -> Self {
        Self {
            asset: asset.into(),
            mesh,
            placement: Transform::IDENTITY,
            applied: 0,
        }
    }

    /// Output name of the asset.
    pub fn asset(&self) -> &str {
        &self.asset
    }

    /// Source mesh in model space.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Currently applied placement.
    pub fn placement(&self) -> &Transform {
        &self.placement
    }

    /// Number of placements applied since the session was opened.
    pub fn applied_count(&self) -> u64 {
        self.applied
    }

    /// Replace the current placement.
    pub fn apply(&mut self, placement: Transform) {
        self.placement = placement;
        self.applied += 1;
    }

    /// Restore the identity placement.
    pub fn reset(&mut self) {
        self.placement = Transform::IDENTITY;
    }

    /// Vertex positions under the current placement.
    pub fn placed_positions(&self) -> Vec<Vec3> {
        self.mesh.placed_positions(&self.placement.to_affine())
    }

    /// Vertex positions under an arbitrary placement, without applying it.
    pub fn positions_under(&self, placement: &Transform) -> Vec<Vec3> {
        self.mesh.placed_positions(&placement.to_affine())
    }
}
