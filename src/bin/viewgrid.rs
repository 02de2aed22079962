use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "viewgrid", version)]
struct Cli {
    /// Pipeline config JSON. Flags below override individual values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Worker threads for batch jobs (default: one per core).
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the orientation plan as JSON.
    Plan(PlanArgs),
    /// Render every view of each mesh with the preview renderer.
    Capture(CaptureArgs),
    /// Crop every PNG in a folder to its content.
    Crop(CropArgs),
    /// Build a grid composite for every render directory under a root.
    Composite(CompositeArgs),
    /// Capture meshes, then composite the renders.
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct PlanOverrides {
    /// Spin step in degrees.
    #[arg(long)]
    increment: Option<u32>,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[command(flatten)]
    plan: PlanOverrides,

    /// Write the plan here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CaptureOverrides {
    #[command(flatten)]
    plan: PlanOverrides,

    /// Replay a plan written by `viewgrid plan`.
    #[arg(long)]
    plan_file: Option<PathBuf>,

    /// Render width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Render height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Height the pivot vertex is moved to.
    #[arg(long)]
    ground_elevation: Option<f32>,
}

#[derive(Args, Debug)]
struct CaptureArgs {
    /// Input meshes (.obj or .json).
    #[arg(required = true)]
    meshes: Vec<PathBuf>,

    /// Output root; views land in `<out>/<mesh>/<orientation>/render_<angle>.png`.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    capture: CaptureOverrides,
}

#[derive(Args, Debug)]
struct CropArgs {
    /// Folder of PNG images.
    #[arg(long = "in")]
    in_dir: PathBuf,

    /// Output folder.
    #[arg(long)]
    out: PathBuf,

    /// Pixels kept around the content.
    #[arg(long)]
    padding: Option<u32>,

    /// Alpha above which a pixel is content.
    #[arg(long)]
    alpha_threshold: Option<u8>,
}

#[derive(Args, Debug)]
struct GridOverrides {
    /// Cell width in pixels.
    #[arg(long, requires = "cell_height")]
    cell_width: Option<u32>,

    /// Cell height in pixels.
    #[arg(long, requires = "cell_width")]
    cell_height: Option<u32>,

    /// Background color (`#rrggbb`, `#rrggbbaa`, white, black, transparent).
    #[arg(long)]
    background: Option<String>,
}

#[derive(Args, Debug)]
struct CompositeArgs {
    /// Root holding render directories.
    #[arg(long = "in")]
    in_dir: PathBuf,

    /// Output folder for composites.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    grid: GridOverrides,

    /// Crop every render to its content before compositing.
    #[arg(long)]
    crop: bool,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Input meshes (.obj or .json).
    #[arg(required = true)]
    meshes: Vec<PathBuf>,

    /// Output root; renders go to `<out>/renders`, composites to `<out>/composites`.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    capture: CaptureOverrides,

    #[command(flatten)]
    grid: GridOverrides,

    /// Crop every render to its content before compositing.
    #[arg(long)]
    crop: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut cfg = load_config(cli.config.as_deref())?;
    let threading = viewgrid::Threading {
        threads: cli.threads,
    };
    match cli.cmd {
        Command::Plan(args) => cmd_plan(&mut cfg, args),
        Command::Capture(args) => cmd_capture(&mut cfg, args, threading),
        Command::Crop(args) => cmd_crop(&mut cfg, args, threading),
        Command::Composite(args) => cmd_composite(&mut cfg, args, threading),
        Command::Run(args) => cmd_run(&mut cfg, args, threading),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<viewgrid::PipelineConfig> {
    match path {
        Some(p) => viewgrid::PipelineConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(viewgrid::PipelineConfig::default()),
    }
}

fn apply_plan_overrides(cfg: &mut viewgrid::PipelineConfig, o: &PlanOverrides) {
    if let Some(inc) = o.increment {
        cfg.capture.rotation_increment_deg = inc;
    }
}

fn apply_capture_overrides(cfg: &mut viewgrid::PipelineConfig, o: &CaptureOverrides) {
    apply_plan_overrides(cfg, &o.plan);
    if let Some(w) = o.width {
        cfg.capture.render.width = w;
    }
    if let Some(h) = o.height {
        cfg.capture.render.height = h;
    }
    if let Some(z) = o.ground_elevation {
        cfg.capture.ground.ground_elevation = z;
    }
}

fn apply_grid_overrides(
    cfg: &mut viewgrid::PipelineConfig,
    o: &GridOverrides,
) -> anyhow::Result<()> {
    if let (Some(width), Some(height)) = (o.cell_width, o.cell_height) {
        cfg.grid.cell = viewgrid::CellSizing::Fixed(viewgrid::PixelSize { width, height });
    }
    if let Some(bg) = &o.background {
        cfg.grid.background =
            viewgrid::Rgba8::parse(bg).with_context(|| format!("parse background '{bg}'"))?;
    }
    Ok(())
}

fn build_plan(
    cfg: &viewgrid::PipelineConfig,
    plan_file: Option<&Path>,
) -> anyhow::Result<viewgrid::OrientationPlan> {
    match plan_file {
        Some(p) => {
            let f = File::open(p).with_context(|| format!("open plan '{}'", p.display()))?;
            Ok(viewgrid::OrientationPlan::from_json_reader(BufReader::new(f))?)
        }
        None => Ok(cfg.capture.plan()?),
    }
}

fn finish(stage: &str, report: &viewgrid::BatchReport) -> anyhow::Result<()> {
    println!("{stage}: {report}");
    if !report.is_success() {
        anyhow::bail!("{stage}: {} item(s) failed", report.failed.len());
    }
    Ok(())
}

fn cmd_plan(cfg: &mut viewgrid::PipelineConfig, args: PlanArgs) -> anyhow::Result<()> {
    apply_plan_overrides(cfg, &args.plan);
    cfg.validate()?;
    let plan = cfg.capture.plan()?;
    let json = serde_json::to_string_pretty(&plan).context("serialize plan")?;
    match args.out {
        Some(out) => {
            std::fs::write(&out, json).with_context(|| format!("write plan '{}'", out.display()))?;
            eprintln!("wrote {} ({} views)", out.display(), plan.len());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn capture(
    cfg: &viewgrid::PipelineConfig,
    meshes: &[PathBuf],
    out: &Path,
    plan_file: Option<&Path>,
    threading: viewgrid::Threading,
) -> anyhow::Result<viewgrid::BatchReport> {
    let plan = build_plan(cfg, plan_file)?;
    let (report, _summaries) = viewgrid::capture_assets(
        meshes,
        &plan,
        &cfg.capture.capture_opts(),
        out,
        threading,
        viewgrid::PreviewRenderer::default,
    )?;
    Ok(report)
}

fn cmd_capture(
    cfg: &mut viewgrid::PipelineConfig,
    args: CaptureArgs,
    threading: viewgrid::Threading,
) -> anyhow::Result<()> {
    apply_capture_overrides(cfg, &args.capture);
    cfg.validate()?;
    let report = capture(
        cfg,
        &args.meshes,
        &args.out,
        args.capture.plan_file.as_deref(),
        threading,
    )?;
    finish("capture", &report)
}

fn cmd_crop(
    cfg: &mut viewgrid::PipelineConfig,
    args: CropArgs,
    threading: viewgrid::Threading,
) -> anyhow::Result<()> {
    if let Some(p) = args.padding {
        cfg.crop.padding = p;
    }
    if let Some(t) = args.alpha_threshold {
        cfg.crop.alpha_threshold = t;
    }
    let report = viewgrid::crop_folder(&args.in_dir, &args.out, &cfg.crop, threading)?;
    finish("crop", &report)
}

fn cmd_composite(
    cfg: &mut viewgrid::PipelineConfig,
    args: CompositeArgs,
    threading: viewgrid::Threading,
) -> anyhow::Result<()> {
    apply_grid_overrides(cfg, &args.grid)?;
    cfg.validate()?;
    let report = viewgrid::composite_render_dirs(
        &args.in_dir,
        &args.out,
        &cfg.grid,
        args.crop.then_some(&cfg.crop),
        threading,
    )?;
    finish("composite", &report)
}

fn cmd_run(
    cfg: &mut viewgrid::PipelineConfig,
    args: RunArgs,
    threading: viewgrid::Threading,
) -> anyhow::Result<()> {
    apply_capture_overrides(cfg, &args.capture);
    apply_grid_overrides(cfg, &args.grid)?;
    cfg.validate()?;

    let renders = args.out.join("renders");
    let composites = args.out.join("composites");
    let mut report = capture(
        cfg,
        &args.meshes,
        &renders,
        args.capture.plan_file.as_deref(),
        threading,
    )?;
    println!("capture: {report}");

    if renders.is_dir() {
        report.merge(viewgrid::composite_render_dirs(
            &renders,
            &composites,
            &cfg.grid,
            args.crop.then_some(&cfg.crop),
            threading,
        )?);
    }
    finish("run", &report)
}
