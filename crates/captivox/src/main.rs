//! captivox: animated dot pattern generator.
//!
//! Opens the egui window by default. With `--export` or `--snapshot` it
//! renders headlessly and exits.

mod app;

use app::CaptivoxApp;
use captivox_core::clock::INTERVAL_DEF;
use captivox_core::{Animation, AnimationClock, AnimationParameters};
use captivox_export::{export, render_frame, CancelToken, ExportConfig, ExportOutcome};
use clap::Parser;
use eframe::egui;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "captivox", version, about = "Animated dot pattern generator")]
struct Cli {
    /// Angular spread of the dots in degrees (0-1080)
    #[arg(long)]
    angle_factor: Option<u32>,

    /// Number of dots (2-300)
    #[arg(long)]
    dots: Option<u32>,

    /// Dot radius or line width (1-40)
    #[arg(long)]
    size: Option<u32>,

    /// Horizontal frequency multiplier (0-10)
    #[arg(long)]
    x_mult: Option<u32>,

    /// Vertical frequency multiplier (0-10)
    #[arg(long)]
    y_mult: Option<u32>,

    /// Half period of the motion in degrees (1-720)
    #[arg(long)]
    halfmax: Option<u32>,

    /// Animation speed, 0 pauses (0-12)
    #[arg(long)]
    speed: Option<u32>,

    /// Delay between frames in milliseconds, 0 pauses (0-100)
    #[arg(long, default_value_t = INTERVAL_DEF)]
    interval: u32,

    /// Spread the dots so the last one lands on the angle factor
    #[arg(long)]
    join_end_dots: bool,

    #[arg(long)]
    axes: bool,

    /// Draw lines from the center instead of dots
    #[arg(long)]
    lines: bool,

    /// Chain the line ends together (with --lines)
    #[arg(long)]
    connect: bool,

    /// Frame width for exports and snapshots
    #[arg(long, default_value_t = 400)]
    width: u32,

    /// Frame height for exports and snapshots
    #[arg(long, default_value_t = 400)]
    height: u32,

    /// Render one full cycle to this file (.mp4 or .gif) and exit
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Render a single frame to this PNG file and exit
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,

    /// Frame number drawn by --snapshot
    #[arg(long, default_value_t = 1)]
    frame: u64,
}

impl Cli {
    fn parameters(&self) -> AnimationParameters {
        let defaults = AnimationParameters::default();
        AnimationParameters {
            angle_factor: self.angle_factor.unwrap_or(defaults.angle_factor),
            num_dots: self.dots.unwrap_or(defaults.num_dots),
            dot_size: self.size.unwrap_or(defaults.dot_size),
            x_multiplier: self.x_mult.unwrap_or(defaults.x_multiplier),
            y_multiplier: self.y_mult.unwrap_or(defaults.y_multiplier),
            halfmax: self.halfmax.unwrap_or(defaults.halfmax),
            speed_mult: self.speed.unwrap_or(defaults.speed_mult),
            join_end_dots: self.join_end_dots,
            draw_axes: self.axes,
            draw_lines: self.lines,
            connect_lines: self.connect,
            ..defaults
        }
    }
}

type BoxError = Box<dyn std::error::Error>;

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), BoxError> {
    let params = cli.parameters();
    params.validate()?;
    if !captivox_core::clock::INTERVAL_RANGE.contains(&cli.interval) {
        return Err(format!("--interval {} is outside 0..=100", cli.interval).into());
    }

    if cli.snapshot.is_some() || cli.export.is_some() {
        if let Some(path) = &cli.snapshot {
            snapshot(&cli, &params, path)?;
        }
        if let Some(path) = &cli.export {
            export_headless(&cli, &params, path.clone())?;
        }
        return Ok(());
    }

    run_window(params, cli.interval)?;
    Ok(())
}

fn snapshot(cli: &Cli, params: &AnimationParameters, path: &Path) -> Result<(), BoxError> {
    let image = render_frame(params, cli.frame, cli.width, cli.height)?;
    image.save(path)?;
    log::info!("frame {} saved to {:?}", cli.frame, path);
    Ok(())
}

fn export_headless(cli: &Cli, params: &AnimationParameters, path: PathBuf) -> Result<(), BoxError> {
    let clock = AnimationClock::new(cli.interval, params.speed_mult);
    let total = params.export_frame_count();
    // Roughly ten progress lines per export
    let report_every = (total / 10).max(1);

    let outcome = export(
        path,
        params,
        &clock,
        ExportConfig::new(cli.width, cli.height),
        CancelToken::new(),
        |progress| {
            if progress.done % report_every == 0 || progress.done == progress.total {
                log::info!("exported {}/{} frames", progress.done, progress.total);
            }
        },
    )?;

    match outcome {
        ExportOutcome::Finished { path, frames } => {
            println!("{} frames saved to {}", frames, path.display());
        }
        ExportOutcome::Cancelled => println!("export cancelled"),
    }
    Ok(())
}

fn run_window(params: AnimationParameters, interval_ms: u32) -> Result<(), eframe::Error> {
    log::info!("Starting captivox");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 660.0])
            .with_min_inner_size([480.0, 360.0])
            .with_title("captivox"),
        ..Default::default()
    };

    eframe::run_native(
        "captivox",
        options,
        Box::new(move |cc| {
            let animation = Animation::new(params, interval_ms);
            Ok(Box::new(CaptivoxApp::new(cc, animation)))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_defaults() {
        let cli = Cli::parse_from(["captivox", "--dots", "4", "--lines", "--halfmax", "5"]);
        let params = cli.parameters();
        assert_eq!(params.num_dots, 4);
        assert_eq!(params.halfmax, 5);
        assert!(params.draw_lines);
        assert_eq!(params.angle_factor, AnimationParameters::default().angle_factor);
        assert_eq!(cli.interval, INTERVAL_DEF);
    }

    #[test]
    fn test_cli_out_of_range_rejected() {
        let cli = Cli::parse_from(["captivox", "--dots", "1"]);
        assert!(cli.parameters().validate().is_err());
    }

    #[test]
    fn test_headless_snapshot() {
        let path = std::env::temp_dir().join(format!("captivox-snapshot-{}.png", std::process::id()));
        let cli = Cli::parse_from([
            "captivox",
            "--width",
            "64",
            "--height",
            "64",
            "--snapshot",
            path.to_str().unwrap(),
        ]);
        run(cli).unwrap();
        let image = image::open(&path).unwrap();
        assert_eq!((image.width(), image.height()), (64, 64));
        std::fs::remove_file(&path).unwrap();
    }
}
