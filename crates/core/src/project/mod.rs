//! Project note events into chart coordinates.
//!
//! Two projections share the same extracted events:
//! - Discrete: a time-quantized occupancy grid ([`grid::ChartGrid`])
//! - Continuous: one rectangle per note plus beat reference lines ([`layout::NoteLayout`])

pub mod grid;
pub mod layout;

use std::fmt;
use std::num::{NonZeroU64, NonZeroUsize};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChartError;
use crate::types::NoteEvent;

pub use grid::{ChartGrid, GridProjector};
pub use layout::{NoteLayout, NoteRect, RectProjector};

/// Ticks per quarter note assumed for beat lines.
pub const DEFAULT_BEAT_INTERVAL: u64 = 480;
/// Ticks per grid row in discrete mode.
pub const DEFAULT_TIME_RESOLUTION: u64 = 100;
pub const DEFAULT_LANES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    #[default]
    Discrete,
    Continuous,
}

impl ProjectionMode {
    /// Output file name for the chart at 0-based chart `position`.
    pub fn file_name(self, position: usize) -> String {
        match self {
            ProjectionMode::Discrete => format!("track_{}.png", position + 1),
            ProjectionMode::Continuous => format!("chart_{}_detailed.png", position + 1),
        }
    }
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionMode::Discrete => write!(f, "discrete"),
            ProjectionMode::Continuous => write!(f, "continuous"),
        }
    }
}

impl FromStr for ProjectionMode {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discrete" => Ok(ProjectionMode::Discrete),
            "continuous" => Ok(ProjectionMode::Continuous),
            _ => Err(ChartError::InvalidConfig(format!(
                "Unknown projection mode: '{}'. Available: discrete, continuous",
                s
            ))),
        }
    }
}

/// Geometry shared by both projections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub lanes: NonZeroUsize,
    /// Ticks per grid row (discrete)
    pub time_resolution: NonZeroU64,
    /// Lane width in chart units (continuous)
    pub lane_width: f64,
    /// Gap between lanes in chart units (continuous)
    pub lane_spacing: f64,
    /// Note rectangle height in ticks (continuous)
    pub note_height: f64,
    /// Ticks between beat reference lines (continuous)
    pub beat_interval: NonZeroU64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            lanes: NonZeroUsize::new(DEFAULT_LANES).unwrap_or(NonZeroUsize::MIN),
            time_resolution: NonZeroU64::new(DEFAULT_TIME_RESOLUTION).unwrap_or(NonZeroU64::MIN),
            lane_width: 1.0,
            lane_spacing: 0.2,
            note_height: 50.0,
            beat_interval: NonZeroU64::new(DEFAULT_BEAT_INTERVAL).unwrap_or(NonZeroU64::MIN),
        }
    }
}

impl ChartLayout {
    pub fn validate(&self) -> Result<(), ChartError> {
        if !(self.lane_width.is_finite() && self.lane_width > 0.0) {
            return Err(ChartError::InvalidConfig(format!(
                "lane_width must be positive, got {}",
                self.lane_width
            )));
        }
        if !(self.lane_spacing.is_finite() && self.lane_spacing >= 0.0) {
            return Err(ChartError::InvalidConfig(format!(
                "lane_spacing must be non-negative, got {}",
                self.lane_spacing
            )));
        }
        if !(self.note_height.is_finite() && self.note_height > 0.0) {
            return Err(ChartError::InvalidConfig(format!(
                "note_height must be positive, got {}",
                self.note_height
            )));
        }
        Ok(())
    }
}

/// A projected track, ready for rendering.
#[derive(Debug, Clone)]
pub enum Projection {
    Grid(ChartGrid),
    Notes(NoteLayout),
}

impl Projection {
    pub fn mode(&self) -> ProjectionMode {
        match self {
            Projection::Grid(_) => ProjectionMode::Discrete,
            Projection::Notes(_) => ProjectionMode::Continuous,
        }
    }

    /// Number of note events that went into the projection.
    pub fn note_count(&self) -> usize {
        match self {
            Projection::Grid(g) => g.note_count(),
            Projection::Notes(n) => n.notes.len(),
        }
    }

    /// Notes that share a cell with an earlier note and are not drawn separately.
    pub fn collapsed_notes(&self) -> usize {
        match self {
            Projection::Grid(g) => g.collapsed_notes(),
            Projection::Notes(_) => 0,
        }
    }
}

/// Projection backend trait.
pub trait Projector {
    fn mode(&self) -> ProjectionMode;

    /// Project one track's events. Events must come from the extractor with
    /// the same lane count as this projector.
    fn project(&self, events: &[NoteEvent]) -> Projection;
}

/// Get a projector by mode.
pub fn get_projector(mode: ProjectionMode, layout: &ChartLayout) -> Box<dyn Projector> {
    match mode {
        ProjectionMode::Discrete => Box::new(GridProjector::new(layout.lanes, layout.time_resolution)),
        ProjectionMode::Continuous => Box::new(RectProjector::new(layout.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("discrete".parse::<ProjectionMode>().unwrap(), ProjectionMode::Discrete);
        assert_eq!("continuous".parse::<ProjectionMode>().unwrap(), ProjectionMode::Continuous);
        let err = "sparkly".parse::<ProjectionMode>().unwrap_err();
        assert!(err.to_string().contains("sparkly"));
    }

    #[test]
    fn test_mode_display_matches_parse() {
        for mode in [ProjectionMode::Discrete, ProjectionMode::Continuous] {
            assert_eq!(mode.to_string().parse::<ProjectionMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_file_names() {
        assert_eq!(ProjectionMode::Discrete.file_name(0), "track_1.png");
        assert_eq!(ProjectionMode::Continuous.file_name(2), "chart_3_detailed.png");
    }

    #[test]
    fn test_default_layout() {
        let layout = ChartLayout::default();
        assert_eq!(layout.lanes.get(), 4);
        assert_eq!(layout.time_resolution.get(), 100);
        assert_eq!(layout.beat_interval.get(), 480);
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn test_layout_validation() {
        let bad_width = ChartLayout { lane_width: 0.0, ..Default::default() };
        assert!(matches!(bad_width.validate(), Err(ChartError::InvalidConfig(_))));

        let bad_spacing = ChartLayout { lane_spacing: -0.1, ..Default::default() };
        assert!(bad_spacing.validate().is_err());

        let bad_height = ChartLayout { note_height: f64::NAN, ..Default::default() };
        assert!(bad_height.validate().is_err());
    }

    #[test]
    fn test_get_projector_modes() {
        let layout = ChartLayout::default();
        let events = [NoteEvent { time: 250, lane: 2 }];

        let discrete = get_projector(ProjectionMode::Discrete, &layout);
        assert_eq!(discrete.mode(), ProjectionMode::Discrete);
        let projection = discrete.project(&events);
        assert_eq!(projection.mode(), ProjectionMode::Discrete);
        assert_eq!(projection.note_count(), 1);

        let continuous = get_projector(ProjectionMode::Continuous, &layout);
        assert_eq!(continuous.mode(), ProjectionMode::Continuous);
        let projection = continuous.project(&events);
        assert_eq!(projection.mode(), ProjectionMode::Continuous);
        assert_eq!(projection.note_count(), 1);
    }

    #[test]
    fn test_collapsed_notes_only_in_discrete() {
        let layout = ChartLayout::default();
        let events = [NoteEvent { time: 10, lane: 1 }, NoteEvent { time: 20, lane: 1 }];
        assert_eq!(get_projector(ProjectionMode::Discrete, &layout).project(&events).collapsed_notes(), 1);
        assert_eq!(get_projector(ProjectionMode::Continuous, &layout).project(&events).collapsed_notes(), 0);
    }
}
