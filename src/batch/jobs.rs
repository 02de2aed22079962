use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::batch::discover::{
    composite_name, discover_render_dirs, has_extension, list_dir, render_images,
};
use crate::batch::report::BatchReport;
use crate::capture::orchestrator::{CaptureOpts, CaptureSummary, capture_asset};
use crate::capture::plan::OrientationPlan;
use crate::capture::session::SceneSession;
use crate::capture::sink::PngDirSink;
use crate::crop::cropper::{CropOpts, CropOutcome, crop_to_content};
use crate::foundation::error::{ViewgridError, ViewgridResult};
use crate::geometry::mesh::Mesh;
use crate::grid::compositor::{GridOpts, compose_grid};
use crate::raster::io::{read_raster, write_png};
use crate::render::backend::RenderCollaborator;

/// Worker pool settings shared by the batch jobs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Threading {
    /// Worker count; `None` lets rayon decide.
    pub threads: Option<usize>,
}

enum ItemOutcome {
    Done,
    Skipped,
    Failed(String),
}

impl ItemOutcome {
    fn from_result(r: ViewgridResult<Self>) -> Self {
        r.unwrap_or_else(|e| Self::Failed(e.to_string()))
    }
}

fn fold_report(items: Vec<(String, ItemOutcome)>) -> BatchReport {
    let mut report = BatchReport::default();
    for (item, outcome) in items {
        match outcome {
            ItemOutcome::Done => report.record_success(item),
            ItemOutcome::Skipped => report.record_skip(item),
            ItemOutcome::Failed(message) => report.record_failure(item, message),
        }
    }
    report
}

/// Crop every PNG in `input_dir` into `output_dir`, keeping file names.
///
/// Images without content are skipped; unreadable images are reported as failures.
#[tracing::instrument(skip(opts, threading))]
pub fn crop_folder(
    input_dir: &Path,
    output_dir: &Path,
    opts: &CropOpts,
    threading: Threading,
) -> ViewgridResult<BatchReport> {
    let inputs: Vec<PathBuf> = list_dir(input_dir)?
        .into_iter()
        .filter(|p| p.is_file() && has_extension(p, &["png"]))
        .collect();
    let pool = build_thread_pool(threading.threads)?;
    let items = pool.install(|| {
        inputs
            .par_iter()
            .map(|path| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let outcome =
                    ItemOutcome::from_result(crop_one(path, &output_dir.join(&name), opts));
                (name, outcome)
            })
            .collect::<Vec<_>>()
    });
    let report = fold_report(items);
    tracing::info!(dir = %input_dir.display(), %report, "crop finished");
    Ok(report)
}

fn crop_one(input: &Path, output: &Path, opts: &CropOpts) -> ViewgridResult<ItemOutcome> {
    let raster = read_raster(input)?;
    match crop_to_content(&raster, opts)? {
        CropOutcome::Cropped { raster, .. } => {
            write_png(&raster, output)?;
            Ok(ItemOutcome::Done)
        }
        CropOutcome::Empty => {
            tracing::warn!(path = %input.display(), "no content, skipping");
            Ok(ItemOutcome::Skipped)
        }
    }
}

/// Build one grid composite per render directory found under `input_root`.
///
/// Composites are written to `output_dir` under [`composite_name`]. With `crop` set, every render
/// is cropped to its content first and renders without content are left out. Directories are
/// processed in parallel; a failing directory never stops the others. A directory whose composite
/// name is already taken by an earlier one fails without writing.
#[tracing::instrument(skip(opts, crop, threading))]
pub fn composite_render_dirs(
    input_root: &Path,
    output_dir: &Path,
    opts: &GridOpts,
    crop: Option<&CropOpts>,
    threading: Threading,
) -> ViewgridResult<BatchReport> {
    opts.validate()?;
    let dirs = discover_render_dirs(input_root)?;
    let claims = claim_output_names(&dirs, composite_name);
    let pool = build_thread_pool(threading.threads)?;
    let items = pool.install(|| {
        dirs.par_iter()
            .zip(claims.par_iter())
            .map(|(dir, (name, owner))| {
                let outcome = match owner {
                    Some(owner) => {
                        ItemOutcome::Failed(name_collision(name, dir, owner).to_string())
                    }
                    None => ItemOutcome::from_result(composite_dir(
                        dir,
                        &output_dir.join(name),
                        opts,
                        crop,
                    )),
                };
                (name.clone(), outcome)
            })
            .collect::<Vec<_>>()
    });
    let report = fold_report(items);
    tracing::info!(root = %input_root.display(), %report, "composites finished");
    Ok(report)
}

fn composite_dir(
    dir: &Path,
    output: &Path,
    opts: &GridOpts,
    crop: Option<&CropOpts>,
) -> ViewgridResult<ItemOutcome> {
    let mut images = Vec::new();
    for path in render_images(dir)? {
        let raster = read_raster(&path)?;
        let Some(crop) = crop else {
            images.push(raster);
            continue;
        };
        match crop_to_content(&raster, crop)? {
            CropOutcome::Cropped { raster, .. } => images.push(raster),
            CropOutcome::Empty => {
                tracing::warn!(path = %path.display(), "no content, leaving out of composite");
            }
        }
    }
    let composite = compose_grid(&images, opts)?;
    write_png(&composite.canvas, output)?;
    tracing::debug!(dir = %dir.display(), output = %output.display(), "wrote composite");
    Ok(ItemOutcome::Done)
}

/// Capture every mesh in `meshes` into `output_root` with the hardbody layout.
///
/// Assets run in parallel, each with its own renderer from `make_renderer`; views of one asset
/// stay sequential. The asset name is the mesh file stem; a mesh whose name is already taken by an
/// earlier one in `meshes` fails without being captured.
pub fn capture_assets<R, F>(
    meshes: &[PathBuf],
    plan: &OrientationPlan,
    opts: &CaptureOpts,
    output_root: &Path,
    threading: Threading,
    make_renderer: F,
) -> ViewgridResult<(BatchReport, Vec<CaptureSummary>)>
where
    R: RenderCollaborator,
    F: Fn() -> R + Sync + Send,
{
    let claims = claim_output_names(meshes, asset_name);
    let pool = build_thread_pool(threading.threads)?;
    let results = pool.install(|| {
        meshes
            .par_iter()
            .zip(claims.par_iter())
            .map_init(&make_renderer, |renderer, (path, (asset, owner))| {
                let result = match owner {
                    Some(owner) => Err(name_collision(asset, path, owner)),
                    None => capture_one(asset, path, plan, opts, output_root, renderer),
                };
                (asset.clone(), result)
            })
            .collect::<Vec<_>>()
    });

    let mut report = BatchReport::default();
    let mut summaries = Vec::new();
    for (asset, result) in results {
        match result {
            Ok(summary) if summary.is_complete() => {
                report.record_success(asset);
                summaries.push(summary);
            }
            Ok(summary) => {
                let first = summary
                    .failed
                    .first()
                    .map(|f| format!(" (first: {} {})", f.key, f.message))
                    .unwrap_or_default();
                report.record_failure(
                    asset,
                    format!(
                        "{} of {} views failed{first}",
                        summary.failed.len(),
                        summary.total()
                    ),
                );
                summaries.push(summary);
            }
            Err(e) => report.record_failure(asset, e.to_string()),
        }
    }
    tracing::info!(%report, "capture batch finished");
    Ok((report, summaries))
}

fn capture_one<R: RenderCollaborator>(
    asset: &str,
    path: &Path,
    plan: &OrientationPlan,
    opts: &CaptureOpts,
    output_root: &Path,
    renderer: &mut R,
) -> ViewgridResult<CaptureSummary> {
    let mesh = Mesh::from_path(path)?;
    let mut scene = SceneSession::new(asset, mesh);
    let mut sink = PngDirSink::new(output_root);
    capture_asset(&mut scene, plan, opts, renderer, &mut sink)
}

fn asset_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Output name of each path, paired with the earlier path that already claimed the same name.
fn claim_output_names(
    paths: &[PathBuf],
    name_of: impl Fn(&Path) -> String,
) -> Vec<(String, Option<PathBuf>)> {
    let mut owners: HashMap<String, &Path> = HashMap::with_capacity(paths.len());
    paths
        .iter()
        .map(|path| {
            let name = name_of(path);
            let owner = match owners.entry(name.clone()) {
                Entry::Occupied(e) => Some(e.get().to_path_buf()),
                Entry::Vacant(e) => {
                    e.insert(path);
                    None
                }
            };
            (name, owner)
        })
        .collect()
}

fn name_collision(name: &str, path: &Path, owner: &Path) -> ViewgridError {
    tracing::error!(
        name,
        path = %path.display(),
        owner = %owner.display(),
        "output name collision"
    );
    ViewgridError::validation(format!(
        "output name '{name}' of '{}' is already used by '{}'",
        path.display(),
        owner.display()
    ))
}

fn build_thread_pool(threads: Option<usize>) -> ViewgridResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ViewgridError::validation(
            "batch threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ViewgridError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/batch/jobs.rs"]
mod tests;
