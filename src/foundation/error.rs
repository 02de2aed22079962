use crate::capture::plan::ViewKey;

/// Crate-wide result alias.
pub type ViewgridResult<T> = Result<T, ViewgridError>;

/// Errors produced by the capture, crop and composite stages.
#[derive(thiserror::Error, Debug)]
pub enum ViewgridError {
    /// Invalid input or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Mesh has fewer than two distinct vertex heights.
    #[error("degenerate mesh: {distinct_heights} distinct vertex height(s), need at least 2")]
    DegenerateMesh {
        /// Number of distinct heights found.
        distinct_heights: usize,
    },

    /// A grid composite was requested for zero images.
    #[error("empty batch: grid composite needs at least one image")]
    EmptyBatch,

    /// The same `(orientation, angle)` key was captured twice for one asset.
    #[error("key collision: view {key} of asset '{asset}' was already captured")]
    KeyCollision {
        /// Asset name.
        asset: String,
        /// Repeated view key.
        key: ViewKey,
    },

    /// Failure reported by a render collaborator.
    #[error("render error: {0}")]
    Render(String),

    /// Filesystem or image codec failure.
    #[error("io error: {0}")]
    Io(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    /// Any other error, with its source preserved.
    Other(#[from] anyhow::Error),
}

impl ViewgridError {
    /// Build a [`ViewgridError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ViewgridError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ViewgridError::Io`].
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Build a [`ViewgridError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
