use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use layercast::{ExportOptions, ExportTarget, Pipeline};

#[derive(Parser, Debug)]
#[command(name = "layercast", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite the configured layers into one PNG.
    Still(StillArgs),
    /// Render the configured animation to a GIF or MP4 (MP4 requires `ffmpeg` on PATH).
    Animate(AnimateArgs),
}

#[derive(Parser, Debug)]
struct StillArgs {
    /// Pipeline config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct AnimateArgs {
    /// Pipeline config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Output path; `.gif` or `.mp4` picks the format. Defaults to the config's `output`.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Frame count, overriding `animation.frame_count`.
    #[arg(long)]
    frames: Option<u64>,

    /// Fail instead of creating missing output directories.
    #[arg(long, default_value_t = false)]
    no_create_dirs: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Still(args) => cmd_still(args),
        Command::Animate(args) => cmd_animate(args),
    }
}

fn cmd_still(args: StillArgs) -> anyhow::Result<()> {
    let pipeline = Pipeline::from_path(&args.config)
        .with_context(|| format!("load pipeline '{}'", args.config.display()))?;
    pipeline.export_still(&args.out, ExportOptions::default())?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_animate(args: AnimateArgs) -> anyhow::Result<()> {
    let pipeline = Pipeline::from_path(&args.config)
        .with_context(|| format!("load pipeline '{}'", args.config.display()))?;

    // An explicit --out keeps the config's format settings when the format matches.
    let target = match args.out.as_ref() {
        Some(out) => {
            let inferred = ExportTarget::from_path(out)?;
            match pipeline.config().output.clone() {
                Some(mut cfg)
                    if std::mem::discriminant(&cfg) == std::mem::discriminant(&inferred) =>
                {
                    *cfg.path_mut() = out.clone();
                    Some(cfg)
                }
                _ => Some(inferred),
            }
        }
        None => None,
    };

    let opts = ExportOptions {
        create_dirs: !args.no_create_dirs,
    };
    pipeline.export_animation(args.frames, target.as_ref(), opts)?;
    let written = target
        .as_ref()
        .or(pipeline.config().output.as_ref())
        .map(|t| t.path().display().to_string())
        .unwrap_or_default();
    eprintln!("wrote {written}");
    Ok(())
}
