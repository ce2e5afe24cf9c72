//! Discrete projection: a time-quantized lane occupancy grid.

use std::collections::BTreeMap;
use std::num::{NonZeroU64, NonZeroUsize};

use super::{Projection, ProjectionMode, Projector};
use crate::types::NoteEvent;

/// `rows x lanes` grid of per-cell note counts.
///
/// Row `r` covers ticks `[r * resolution, (r + 1) * resolution)`. Row 0 is the
/// earliest time. Rendering only looks at occupancy, so several notes in one
/// cell draw as one; the counts are kept for reporting.
///
/// Only occupied cells are stored. A single late note can stretch the grid to
/// billions of rows while the memory used stays proportional to the notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartGrid {
    rows: u64,
    lanes: usize,
    resolution: u64,
    /// Keyed by `(row, lane)`, so iteration is row-major.
    counts: BTreeMap<(u64, usize), u32>,
}

impl ChartGrid {
    /// Quantize `events` into a grid with `floor(max_time / resolution) + 1` rows.
    pub fn from_events(events: &[NoteEvent], lanes: NonZeroUsize, resolution: NonZeroU64) -> Self {
        let lanes = lanes.get();
        let resolution = resolution.get();
        let max_time = events.iter().map(|e| e.time).max().unwrap_or(0);
        let rows = max_time / resolution + 1;

        let mut counts = BTreeMap::new();
        for ev in events {
            debug_assert!(ev.lane < lanes, "lane {} out of range for {} lanes", ev.lane, lanes);
            if ev.lane >= lanes {
                continue;
            }
            *counts.entry((ev.time / resolution, ev.lane)).or_insert(0) += 1;
        }

        Self { rows, lanes, resolution, counts }
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn lanes(&self) -> usize {
        self.lanes
    }

    pub fn resolution(&self) -> u64 {
        self.resolution
    }

    /// First tick covered by `row`.
    pub fn row_time(&self, row: u64) -> u64 {
        row.saturating_mul(self.resolution)
    }

    pub fn count(&self, row: u64, lane: usize) -> u32 {
        self.counts.get(&(row, lane)).copied().unwrap_or(0)
    }

    pub fn is_occupied(&self, row: u64, lane: usize) -> bool {
        self.count(row, lane) > 0
    }

    /// `(row, lane)` of every occupied cell, in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (u64, usize)> + '_ {
        self.counts.keys().copied()
    }

    pub fn occupied_count(&self) -> usize {
        self.counts.len()
    }

    pub fn note_count(&self) -> usize {
        self.counts.values().map(|&c| c as usize).sum()
    }

    pub fn collapsed_notes(&self) -> usize {
        self.note_count() - self.occupied_count()
    }
}

pub struct GridProjector {
    lanes: NonZeroUsize,
    resolution: NonZeroU64,
}

impl GridProjector {
    pub fn new(lanes: NonZeroUsize, resolution: NonZeroU64) -> Self {
        Self { lanes, resolution }
    }
}

impl Projector for GridProjector {
    fn mode(&self) -> ProjectionMode {
        ProjectionMode::Discrete
    }

    fn project(&self, events: &[NoteEvent]) -> Projection {
        Projection::Grid(ChartGrid::from_events(events, self.lanes, self.resolution))
    }
}
