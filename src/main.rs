use anyhow::{Context, Result};
use clap::Parser;
use lightwatch_core::{Detection, Region, SignalColor};
use lightwatch_cv::{utils::ImageUtils, DetectionConfig, FrameAnnotator};
use log::{info, warn};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

mod frames;

use frames::FrameSource;

#[derive(Parser, Debug)]
#[command(author, version, about = "Traffic light color detection over a sequence of frames")]
struct Args {
    /// Frame directory or individual frame files, processed in sorted order.
    #[arg(required_unless_present = "dump_config")]
    inputs: Vec<PathBuf>,
    /// JSON detection config (defaults are used when omitted).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the green stabilizer history size.
    #[arg(long)]
    history_size: Option<usize>,
    /// Write annotated copies of every frame into this directory.
    #[arg(long)]
    annotate_dir: Option<PathBuf>,
    /// TrueType/OpenType font for the color captions on annotated frames.
    #[arg(long, requires = "annotate_dir")]
    font: Option<PathBuf>,
    /// Export all per-frame detections as JSON.
    #[arg(long)]
    report: Option<PathBuf>,
    /// Print the effective config as JSON and exit.
    #[arg(long)]
    dump_config: bool,
}

#[derive(Debug, Serialize)]
struct FrameReport {
    frame: usize,
    path: PathBuf,
    color: SignalColor,
    region: Region,
}

#[derive(Debug, Default)]
struct RunSummary {
    frames: usize,
    skipped: usize,
    red: usize,
    green: usize,
    unknown: usize,
    busy: Duration,
}

impl RunSummary {
    fn record(&mut self, detection: &Detection, elapsed: Duration) {
        self.frames += 1;
        self.busy += elapsed;
        match detection.color {
            SignalColor::Red => self.red += 1,
            SignalColor::Green => self.green += 1,
            SignalColor::Unknown => self.unknown += 1,
        }
    }

    fn mean_ms(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        self.busy.as_secs_f64() * 1000.0 / self.frames as f64
    }
}

fn load_config(args: &Args) -> Result<DetectionConfig> {
    let mut config = match &args.config {
        Some(path) => DetectionConfig::from_json_file(path)?,
        None => DetectionConfig::default(),
    };
    if let Some(history_size) = args.history_size {
        config.history_size = history_size;
    }
    config.validate().context("Invalid detection config")?;
    Ok(config)
}

/// Output path for an annotated frame; the index keeps same-named inputs apart
fn annotated_path(dir: &Path, index: usize, frame: &Path) -> PathBuf {
    let name = frame
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame.png".to_string());
    dir.join(format!("{:05}_{}", index, name))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = load_config(&args)?;
    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let source = FrameSource::from_inputs(&args.inputs)?;
    if source.is_empty() {
        warn!("No frames found in {:?}", args.inputs);
        return Ok(());
    }
    info!("Processing {} frames, history size {}", source.len(), config.history_size);

    if let Some(dir) = &args.annotate_dir {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }

    let font = args.font.as_ref().map(ImageUtils::load_font).transpose()?;

    let mut annotator = FrameAnnotator::with_config(config);
    let mut summary = RunSummary::default();
    let mut reports = Vec::new();

    for (index, (path, frame)) in source.frames().enumerate() {
        let mut frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Skipping {:?}: {:#}", path, e);
                summary.skipped += 1;
                continue;
            }
        };

        let start = Instant::now();
        let detection = annotator.annotate(&frame)?;
        summary.record(&detection, start.elapsed());

        println!("{:>5}  {:<7}  {}  {}", index, detection.color, detection.region, path.display());

        if let Some(dir) = &args.annotate_dir {
            ImageUtils::draw_detection(&mut frame, &detection, font.as_ref());
            ImageUtils::save_rgb(&frame, annotated_path(dir, index, path))?;
        }

        reports.push(FrameReport {
            frame: index,
            path: path.to_path_buf(),
            color: detection.color,
            region: detection.region,
        });
    }

    if let Some(report_path) = &args.report {
        let json = serde_json::to_string_pretty(&reports)?;
        fs::write(report_path, json).with_context(|| format!("Failed to write report {:?}", report_path))?;
        info!("Wrote {} detections to {:?}", reports.len(), report_path);
    }

    info!(
        "Processed {} frames ({} skipped): red {}, green {}, unknown {}, mean {:.2} ms/frame",
        summary.frames,
        summary.skipped,
        summary.red,
        summary.green,
        summary.unknown,
        summary.mean_ms()
    );

    Ok(())
}
