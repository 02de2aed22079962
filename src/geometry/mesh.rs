use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::{Affine3A, Vec3};
use crate::foundation::error::{ViewgridError, ViewgridResult};

/// Triangle mesh. Only vertex positions matter to alignment; triangles are used by the preview
/// renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
}

#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct MeshDoc {
    positions: Vec<[f32; 3]>,
    #[serde(default)]
    triangles: Vec<[u32; 3]>,
}

impl Mesh {
    /// Build a mesh, checking that every triangle index refers to an existing vertex.
    pub fn new(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> ViewgridResult<Self> {
        let n = positions.len();
        if let Some(bad) = triangles
            .iter()
            .flatten()
            .find(|&&i| (i as usize) >= n)
        {
            return Err(ViewgridError::validation(format!(
                "triangle index {bad} out of range for {n} vertices"
            )));
        }
        if positions.iter().any(|p| !p.is_finite()) {
            return Err(ViewgridError::validation(
                "mesh vertex positions must be finite",
            ));
        }
        Ok(Self {
            positions,
            triangles,
        })
    }

    /// Point cloud without topology.
    pub fn from_positions(positions: Vec<Vec3>) -> ViewgridResult<Self> {
        Self::new(positions, Vec::new())
    }

    /// Load a mesh from disk, choosing the format by extension (`.obj` or `.json`).
    pub fn from_path(path: impl AsRef<Path>) -> ViewgridResult<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("obj") => Self::from_obj_path(path),
            Some("json") => Self::from_json_path(path),
            _ => Err(ViewgridError::validation(format!(
                "unsupported mesh format '{}' (expected .obj or .json)",
                path.display()
            ))),
        }
    }

    /// Load a Wavefront OBJ file. All models are merged and faces are triangulated.
    pub fn from_obj_path(path: impl AsRef<Path>) -> ViewgridResult<Self> {
        let path = path.as_ref();
        let opts = tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        };
        let (models, _materials) = tobj::load_obj(path, &opts)
            .map_err(|e| ViewgridError::io(format!("load obj '{}': {e}", path.display())))?;

        let mut positions = Vec::new();
        let mut triangles = Vec::new();
        for model in &models {
            let base = positions.len() as u32;
            positions.extend(
                model
                    .mesh
                    .positions
                    .chunks_exact(3)
                    .map(|p| Vec3::new(p[0], p[1], p[2])),
            );
            triangles.extend(
                model
                    .mesh
                    .indices
                    .chunks_exact(3)
                    .map(|t| [base + t[0], base + t[1], base + t[2]]),
            );
        }
        Self::new(positions, triangles)
    }

    /// Parse a JSON mesh document `{"positions": [[x,y,z],...], "triangles": [[a,b,c],...]}`.
    pub fn from_json_reader<R: std::io::Read>(r: R) -> ViewgridResult<Self> {
        let doc: MeshDoc = serde_json::from_reader(r)
            .map_err(|e| ViewgridError::serde(format!("parse mesh JSON: {e}")))?;
        Self::new(
            doc.positions.into_iter().map(Vec3::from_array).collect(),
            doc.triangles,
        )
    }

    /// Parse a JSON mesh document from disk.
    pub fn from_json_path(path: impl AsRef<Path>) -> ViewgridResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .map_err(|e| ViewgridError::io(format!("open mesh JSON '{}': {e}", path.display())))?;
        Self::from_json_reader(BufReader::new(f))
    }

    /// Vertex positions in model space.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Triangle vertex indices.
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Return `true` when the mesh has no vertices.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Vertex positions after applying `placement`.
    pub fn placed_positions(&self, placement: &Affine3A) -> Vec<Vec3> {
        self.positions
            .iter()
            .map(|&p| placement.transform_point3(p))
            .collect()
    }
}

/// Axis-aligned bounds `(min, max)` of a point set, or `None` when empty.
pub fn bounds(points: &[Vec3]) -> Option<(Vec3, Vec3)> {
    let first = *points.first()?;
    Some(
        points
            .iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/mesh.rs"]
mod tests;
