//! Chart rendering pipeline: load, extract, project and render each track.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ChartError;
use crate::extract::extract_notes;
use crate::labels::DifficultyLabels;
use crate::midi::load_chart;
use crate::project::{get_projector, ChartLayout, ProjectionMode};
use crate::render::render_projection;
use crate::types::NoteEvent;

/// Configuration for a chart rendering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub midi_path: PathBuf,
    /// Created if absent
    pub output_dir: PathBuf,
    pub labels: DifficultyLabels,
    pub mode: ProjectionMode,
    /// Leave out track 0 (tempo/meta data in most format-1 files)
    pub skip_conductor_track: bool,
    pub layout: ChartLayout,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            midi_path: PathBuf::new(),
            output_dir: PathBuf::from("./stepchart-output"),
            labels: DifficultyLabels::default(),
            mode: ProjectionMode::Discrete,
            skip_conductor_track: false,
            layout: ChartLayout::default(),
        }
    }
}

impl ChartConfig {
    pub fn validate(&self) -> Result<(), ChartError> {
        self.layout.validate()
    }
}

/// What happened to one source track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TrackOutcome {
    Rendered {
        track: usize,
        label: String,
        /// All events in the track, including non-note ones
        messages: usize,
        notes: usize,
        /// Notes drawn on top of an earlier note in the same grid cell
        collapsed: usize,
        output: PathBuf,
    },
    Skipped {
        track: usize,
        label: String,
        messages: usize,
        reason: String,
    },
}

impl TrackOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, TrackOutcome::Rendered { .. })
    }
}

/// Report of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSummary {
    pub config: ChartConfig,
    pub total_tracks: usize,
    pub tracks: Vec<TrackOutcome>,
}

impl ChartSummary {
    pub fn rendered(&self) -> impl Iterator<Item = &TrackOutcome> {
        self.tracks.iter().filter(|t| t.is_rendered())
    }

    /// Write the summary as pretty JSON.
    pub fn write_manifest(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write manifest: {}", path.display()))?;
        Ok(())
    }
}

/// Render one image per charted track of `config.midi_path`.
///
/// Tracks are processed strictly one after another. Tracks without note
/// activations are skipped; any load or render failure aborts the run.
pub fn render_charts(config: &ChartConfig) -> Result<ChartSummary> {
    config.validate()?;

    let chart = load_chart(&config.midi_path)?;
    log::info!(
        "Loaded {}: {} track(s)",
        config.midi_path.display(),
        chart.tracks.len()
    );

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output directory: {}", config.output_dir.display())
    })?;

    let projector = get_projector(config.mode, &config.layout);
    let skip = usize::from(config.skip_conductor_track);
    let mut outcomes = Vec::new();

    for (position, track) in chart.tracks.iter().skip(skip).enumerate() {
        let label = config.labels.label(position);
        let events: Vec<NoteEvent> = extract_notes(&track.messages, config.layout.lanes).collect();
        let messages = track.messages.len();
        log::info!(
            "Track {} ({}): {} messages, {} notes found",
            track.index,
            label,
            messages,
            events.len()
        );

        if events.is_empty() {
            log::info!("No notes found in track {}, skipping visualization", track.index);
            outcomes.push(TrackOutcome::Skipped {
                track: track.index,
                label,
                messages,
                reason: "no note activations".into(),
            });
            continue;
        }

        let projection = projector.project(&events);
        if projection.collapsed_notes() > 0 {
            log::debug!(
                "Track {}: {} note(s) share a grid cell with another note",
                track.index,
                projection.collapsed_notes()
            );
        }

        let output = config.output_dir.join(config.mode.file_name(position));
        let title = format!("{} - {} notes", label, events.len());
        render_projection(&projection, &title, &output)?;
        log::info!("Saved visualization for {} to {}", label, output.display());

        outcomes.push(TrackOutcome::Rendered {
            track: track.index,
            label,
            messages,
            notes: events.len(),
            collapsed: projection.collapsed_notes(),
            output,
        });
    }

    Ok(ChartSummary {
        config: config.clone(),
        total_tracks: chart.tracks.len(),
        tracks: outcomes,
    })
}
