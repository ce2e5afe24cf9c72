//! Stepchart core: render lane charts from the note tracks of a MIDI file.

pub mod error;
pub mod extract;
pub mod labels;
pub mod midi;
pub mod pipeline;
pub mod project;
pub mod render;
pub mod types;

pub use error::ChartError;
pub use pipeline::{render_charts, ChartConfig, ChartSummary, TrackOutcome};
