//! Stepchart CLI — render lane chart images from MIDI difficulty tracks.

use std::num::{NonZeroU64, NonZeroUsize};
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use stepchart_core::labels::DifficultyLabels;
use stepchart_core::project::{ChartLayout, ProjectionMode};
use stepchart_core::{render_charts, ChartConfig, TrackOutcome};

// ─── CLI ─────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "stepchart",
    about = "Render rhythm-game style lane charts from MIDI note tracks",
    version,
)]
struct Cli {
    /// MIDI file with one track per difficulty
    midi_path: PathBuf,

    /// Output directory (created if missing)
    #[arg(long, default_value = "./stepchart-output")]
    output_dir: PathBuf,

    /// Difficulty name for the next charted track; repeat in track order
    #[arg(short = 'd', long = "difficulty")]
    difficulties: Vec<String>,

    /// Chart style
    #[arg(long, default_value = "discrete", value_parser = ["discrete", "continuous"])]
    mode: String,

    /// Number of lanes (note number modulo lanes picks the lane)
    #[arg(long, default_value = "4")]
    lanes: NonZeroUsize,

    /// Ticks per grid row in discrete mode
    #[arg(long, default_value = "100")]
    time_resolution: NonZeroU64,

    /// Ticks between beat lines in continuous mode
    #[arg(long, default_value = "480")]
    beat_interval: NonZeroU64,

    /// Note height in ticks in continuous mode
    #[arg(long, default_value_t = 50.0)]
    note_height: f64,

    /// Leave out track 0 (tempo/meta track of format-1 files)
    #[arg(long, default_value_t = false)]
    skip_conductor_track: bool,

    /// Write a JSON run summary to this path
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

// ─── Main ────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(cli) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

// ─── Runner ──────────────────────────────────────────────────────

fn build_config(cli: &Cli) -> Result<ChartConfig> {
    if !cli.midi_path.exists() {
        bail!("File not found: {}", cli.midi_path.display());
    }

    let mode: ProjectionMode = cli.mode.parse()?;
    Ok(ChartConfig {
        midi_path: cli.midi_path.clone(),
        output_dir: cli.output_dir.clone(),
        labels: DifficultyLabels::new(cli.difficulties.iter().cloned()),
        mode,
        skip_conductor_track: cli.skip_conductor_track,
        layout: ChartLayout {
            lanes: cli.lanes,
            time_resolution: cli.time_resolution,
            beat_interval: cli.beat_interval,
            note_height: cli.note_height,
            ..Default::default()
        },
    })
}

fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;
    let summary = render_charts(&config)?;

    for outcome in &summary.tracks {
        match outcome {
            TrackOutcome::Rendered { label, notes, output, .. } => {
                println!("{}: {} notes -> {}", label, notes, output.display());
            }
            TrackOutcome::Skipped { track, reason, .. } => {
                println!("Track {}: skipped ({})", track, reason);
            }
        }
    }
    println!(
        "Rendered {} of {} track(s) into {}",
        summary.rendered().count(),
        summary.total_tracks,
        config.output_dir.display()
    );

    if let Some(path) = &cli.manifest {
        summary.write_manifest(path)?;
        log::info!("Wrote manifest {}", path.display());
    }

    Ok(())
}
