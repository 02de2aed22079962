//! Viewgrid captures a 3D asset from a fixed set of orientations and turns the renders into
//! contact-sheet composites.
//!
//! The pipeline has three stages:
//!
//! - Plan views with an [`OrientationPlan`] and capture them with [`capture_asset`], which
//!   ground-aligns the mesh per base orientation and drives a [`RenderCollaborator`]
//! - Trim each render to its visible content with [`crop_to_content`]
//! - Lay a set of renders out on a grid with [`compose_grid`]
//!
//! [`capture_assets`], [`crop_folder`] and [`composite_render_dirs`] run the stages over whole
//! directory trees in parallel. [`PipelineConfig`] holds every knob in one JSON document.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod batch;
pub(crate) mod capture;
/// JSON pipeline configuration.
pub mod config;
pub(crate) mod crop;
pub(crate) mod geometry;
pub(crate) mod grid;
pub(crate) mod raster;
pub(crate) mod render;

pub use crate::foundation::core::{Affine3A, PixelRect, PixelSize, Quat, Rgba8, Vec3};
pub use crate::foundation::error::{ViewgridError, ViewgridResult};

pub use crate::batch::discover::{
    RENDER_EXTENSIONS, composite_name, discover_render_dirs, is_render_image, render_angle,
    render_images,
};
pub use crate::batch::jobs::{Threading, capture_assets, composite_render_dirs, crop_folder};
pub use crate::batch::report::{BatchFailure, BatchReport};
pub use crate::capture::orchestrator::{CaptureOpts, CaptureSummary, ViewFailure, capture_asset};
pub use crate::capture::plan::{OrientationPlan, PlannedView, ViewKey, rotation_steps};
pub use crate::capture::session::SceneSession;
pub use crate::capture::sink::{InMemoryViewSink, PngDirSink, ViewSink, view_path};
pub use crate::config::{CaptureConfig, PipelineConfig};
pub use crate::crop::bbox::{BoundingBox, ContentRule, content_bbox};
pub use crate::crop::cropper::{CropOpts, CropOutcome, crop_to_content};
pub use crate::geometry::align::{
    GroundAlignOpts, GroundAlignment, PivotRule, align_to_ground, align_to_ground_or_lowest,
    second_lowest_distinct_height,
};
pub use crate::geometry::mesh::{Mesh, bounds};
pub use crate::geometry::transform::Transform;
pub use crate::grid::compositor::{
    CellSizing, Composite, GridOpts, Placement, compose_grid, fit_within,
};
pub use crate::grid::layout::{GridLayout, SINGLE_ROW_MAX};
pub use crate::raster::Raster;
pub use crate::raster::io::{decode_raster, encode_png, read_raster, write_png};
pub use crate::render::backend::{RenderCollaborator, RenderSettings};
pub use crate::render::preview::{PreviewOpts, PreviewRenderer};
