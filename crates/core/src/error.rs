//! Error types for chart loading, configuration and rendering.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    /// The source file is missing, unreadable, or not a MIDI file at all.
    #[error("Cannot read chart file {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    /// A track (or one of its events) failed to decode. The whole file is rejected.
    #[error("Malformed track {track} at event {event}: {reason}")]
    MalformedTrack {
        track: usize,
        event: usize,
        reason: String,
    },

    #[error("Invalid chart configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to render {path}: {reason}")]
    Render { path: PathBuf, reason: String },
}
