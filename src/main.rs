// src/main.rs

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use wagon_detection::{process_video_with_options, Config, ProcessOptions, RunReport, VideoProcessor};

#[derive(Parser, Debug)]
#[command(name = "wagon-detection", about = "Count railway wagons crossing a line in video")]
struct Args {
    /// Video file, or a directory of videos to process in turn
    input: PathBuf,

    /// Annotated output video (single-file mode only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show annotated frames while processing ('q' or Esc to stop)
    #[arg(short, long)]
    display: bool,

    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Append count events as JSON lines (single-file mode only)
    #[arg(short, long)]
    events: Option<PathBuf>,
}

fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load(path).with_context(|| format!("loading {}", path.display()))
    } else {
        Ok(Config::default())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args.config)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("wagon_detection={}", config.logging.level))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🚆 Wagon Detection Starting");
    if !args.config.exists() {
        warn!("{} not found, using default configuration", args.config.display());
    }
    info!(
        "Counting thresholds: min_area={:.0}, line_position={:.2}, line_threshold={}, cooldown={} frames",
        config.counting.min_area,
        config.counting.line_position,
        config.counting.line_threshold,
        config.counting.min_frames_between_counts
    );

    let reports = if args.input.is_dir() {
        run_batch(&args, &config)?
    } else {
        let options = ProcessOptions {
            output: args.output.clone(),
            display: args.display,
            events: args.events.clone(),
        };
        let report = process_video_with_options(&args.input, &options, &config)
            .with_context(|| format!("processing {}", args.input.display()))?;
        vec![report]
    };

    for report in &reports {
        print_summary(report);
        println!("{}", serde_json::to_string(report)?);
    }

    Ok(())
}

fn run_batch(args: &Args, config: &Config) -> Result<Vec<RunReport>> {
    if args.output.is_some() || args.events.is_some() {
        warn!("--output and --events are ignored in directory mode");
    }

    let processor = VideoProcessor::new(config.clone());
    let video_files = processor.find_video_files(&args.input)?;
    if video_files.is_empty() {
        error!("No video files found in {}", args.input.display());
        return Ok(Vec::new());
    }

    let mut reports = Vec::with_capacity(video_files.len());
    for (idx, video_path) in video_files.iter().enumerate() {
        info!(
            "Processing video {}/{}: {}",
            idx + 1,
            video_files.len(),
            video_path.display()
        );

        let options = ProcessOptions {
            output: config
                .video
                .save_annotated
                .then(|| processor.processed_output_path(video_path)),
            display: args.display,
            events: None,
        };

        match process_video_with_options(video_path, &options, config) {
            Ok(report) => reports.push(report),
            Err(e) => error!("Failed to process {}: {:#}", video_path.display(), e),
        }
    }

    Ok(reports)
}

fn print_summary(report: &RunReport) {
    info!("✓ {}", report.source.display());
    info!("  Total wagons counted: {}", report.wagon_count);
    info!("  Frames processed: {}", report.frames_processed);
    if report.skipped_frames > 0 {
        info!("  Frames skipped: {}", report.skipped_frames);
    }
    if let Some(frame) = report.aborted_at {
        warn!("  Stopped early after an error at frame {}", frame);
    }
}
