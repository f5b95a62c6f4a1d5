use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use slash_compare::{
    AspectRatio, CompareSettings, Controller, DividerGeometry, DividerState, ExportFormat,
    PointerEvent, PointerTarget, SlotSide, SourceRect, Viewport, clamp_pan, displayed_height,
    map_view_to_source, read_bitmap, write_export_to,
};

#[derive(Parser, Debug)]
#[command(name = "slash-compare", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose two images into a slanted before/after comparison.
    Render(RenderArgs),
    /// Print the computed crop and divider geometry as JSON without rendering.
    Layout(LayoutArgs),
    /// Print the effective settings (defaults merged with `--config`) as JSON.
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
struct ConfigArgs {
    /// Settings JSON; missing fields take defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct ViewArgs {
    /// Vertical pan of the "before" crop view, in display pixels (<= 0).
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    before_pan: f64,

    /// Vertical pan of the "after" crop view, in display pixels (<= 0).
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    after_pan: f64,

    /// Width at which each crop view displays its image.
    #[arg(long)]
    viewport_width: Option<f64>,

    /// Visible height of each crop view.
    #[arg(long)]
    viewport_height: Option<f64>,

    /// Divider position as a fraction of the output width (clamped to 0.1..=0.9).
    #[arg(long)]
    divider: Option<f64>,

    /// Settings JSON; missing fields take defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// "Before" image (left side).
    #[arg(long)]
    before: PathBuf,

    /// "After" image (right side).
    #[arg(long)]
    after: PathBuf,

    /// Output file; defaults to the configured file name in the current directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Output format; inferred from `--out` when omitted.
    #[arg(long)]
    format: Option<ExportFormat>,

    /// JPEG quality (1-100).
    #[arg(long)]
    quality: Option<u8>,

    #[command(flatten)]
    view: ViewArgs,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Natural size of the "before" image, as WIDTHxHEIGHT.
    #[arg(long, value_parser = parse_size)]
    before_size: (u32, u32),

    /// Natural size of the "after" image, as WIDTHxHEIGHT.
    #[arg(long, value_parser = parse_size)]
    after_size: (u32, u32),

    #[command(flatten)]
    view: ViewArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Layout(args) => cmd_layout(args),
        Command::Config(args) => cmd_config(args),
    }
}

fn load_settings(view: &ViewArgs) -> anyhow::Result<CompareSettings> {
    match &view.config {
        Some(path) => Ok(CompareSettings::from_path(path)?),
        None => Ok(CompareSettings::default()),
    }
}

fn viewport_for(view: &ViewArgs) -> Viewport {
    let d = Viewport::default();
    Viewport::new(
        view.viewport_width.unwrap_or(d.display_width),
        view.viewport_height.unwrap_or(d.height),
    )
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut settings = load_settings(&args.view)?;
    if let Some(format) = args
        .format
        .or_else(|| args.out.as_deref().and_then(format_from_extension))
    {
        settings.export.format = format;
    }
    if let Some(quality) = args.quality {
        settings.export.quality = quality;
    }
    let export = settings.export.clone();

    let mut ctl = Controller::from_settings(settings)?;
    let viewport = viewport_for(&args.view);
    for (side, path, pan) in [
        (SlotSide::Before, &args.before, args.view.before_pan),
        (SlotSide::After, &args.after, args.view.after_pan),
    ] {
        let bitmap = read_bitmap(path)?;
        ctl.set_viewport(side, viewport);
        ctl.load(side, bitmap);
        drag_pan(&mut ctl, side, pan)?;
    }

    ctl.generate()?
        .context("both images must be loaded before generating")?;
    if let Some(ratio) = args.view.divider {
        ctl.set_divider(ratio);
        ctl.recompose()?;
    }

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(export.file_name()));
    write_export_to(&ctl.surface().frame(), &export, &out)?;

    eprintln!("wrote {} ({})", out.display(), export.format.mime());
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let settings = match &args.config {
        Some(path) => CompareSettings::from_path(path)?,
        None => CompareSettings::default(),
    };
    println!("{}", settings.to_json_string()?);
    Ok(())
}

/// Replay a pan as a press/move/release on the slot's crop view.
fn drag_pan(ctl: &mut Controller, side: SlotSide, pan: f64) -> anyhow::Result<()> {
    if pan == 0.0 {
        return Ok(());
    }
    ctl.handle(PointerEvent::Down {
        target: PointerTarget::Slot(side),
        x: 0.0,
        y: 0.0,
    })?;
    ctl.handle(PointerEvent::Move { x: 0.0, y: pan })?;
    ctl.handle(PointerEvent::Up)?;
    Ok(())
}

#[derive(serde::Serialize)]
struct SlotLayout {
    natural_size: (u32, u32),
    displayed_height: f64,
    pan_offset: f64,
    source: Option<SourceRect>,
}

#[derive(serde::Serialize)]
struct LayoutReport {
    canvas: slash_compare::Canvas,
    viewport: Viewport,
    before: SlotLayout,
    after: SlotLayout,
    divider: DividerGeometry,
    clip_quad: [slash_compare::Point; 4],
    seam: (slash_compare::Point, slash_compare::Point),
    label_anchors: (slash_compare::Point, slash_compare::Point),
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let settings = load_settings(&args.view)?;
    let viewport = viewport_for(&args.view);
    let aspect = AspectRatio::from(settings.canvas);

    let slot = |(w, h): (u32, u32), pan: f64| {
        let shown = displayed_height(w, h, viewport.display_width);
        let pan_offset = clamp_pan(pan, viewport.height, shown);
        SlotLayout {
            natural_size: (w, h),
            displayed_height: shown,
            pan_offset,
            source: map_view_to_source(w, h, viewport.display_width, pan_offset, aspect),
        }
    };

    let mut divider = DividerState::default();
    if let Some(ratio) = args.view.divider {
        divider.set_ratio(ratio);
    }
    let geometry = DividerGeometry::new(settings.canvas, divider.ratio(), settings.slant_offset);

    let report = LayoutReport {
        canvas: settings.canvas,
        viewport,
        before: slot(args.before_size, args.view.before_pan),
        after: slot(args.after_size, args.view.after_pan),
        divider: geometry,
        clip_quad: geometry.clip_quad(),
        seam: geometry.seam(),
        label_anchors: geometry.label_anchors(settings.labels.inset),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn format_from_extension(path: &Path) -> Option<ExportFormat> {
    path.extension()?.to_str()?.parse().ok()
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w = w.trim().parse::<u32>().map_err(|e| format!("width: {e}"))?;
    let h = h.trim().parse::<u32>().map_err(|e| format!("height: {e}"))?;
    Ok((w, h))
}
