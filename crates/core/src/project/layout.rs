//! Continuous projection: one rectangle per note, placed at its exact tick.

use super::{ChartLayout, Projection, ProjectionMode, Projector};
use crate::types::NoteEvent;

/// Horizontal position of the left edge of `lane`.
pub fn lane_x(lane: usize, lane_width: f64, lane_spacing: f64) -> f64 {
    lane as f64 * (lane_width + lane_spacing)
}

/// Beat reference lines at every multiple of `interval` in `[0, max_time + interval)`.
///
/// Lazy: a long track with a short interval yields millions of lines.
pub fn beat_lines(max_time: u64, interval: u64) -> impl Iterator<Item = u64> + Clone {
    let end = if interval == 0 { 0 } else { max_time.saturating_add(interval) };
    (0..end).step_by(interval.max(1) as usize)
}

/// Number of items [`beat_lines`] yields.
pub fn beat_line_count(max_time: u64, interval: u64) -> u64 {
    if interval == 0 {
        return 0;
    }
    max_time.saturating_add(interval).div_ceil(interval)
}

/// A note rectangle in chart units (x) and ticks (y).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteRect {
    pub time: u64,
    pub lane: usize,
    /// Left edge
    pub x: f64,
    pub width: f64,
    /// Earliest tick covered (`time - note_height / 2`)
    pub top: f64,
    /// Latest tick covered (`time + note_height / 2`)
    pub bottom: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteLayout {
    pub notes: Vec<NoteRect>,
    pub beat_interval: u64,
    pub lanes: usize,
    pub lane_width: f64,
    pub lane_spacing: f64,
    pub max_time: u64,
    /// Padding used when the track spans zero ticks
    pub note_height: f64,
}

impl NoteLayout {
    pub fn from_events(events: &[NoteEvent], layout: &ChartLayout) -> Self {
        let half = layout.note_height / 2.0;
        let notes = events
            .iter()
            .map(|e| NoteRect {
                time: e.time,
                lane: e.lane,
                x: lane_x(e.lane, layout.lane_width, layout.lane_spacing),
                width: layout.lane_width,
                top: e.time as f64 - half,
                bottom: e.time as f64 + half,
            })
            .collect();
        let max_time = events.iter().map(|e| e.time).max().unwrap_or(0);

        Self {
            notes,
            beat_interval: layout.beat_interval.get(),
            lanes: layout.lanes.get(),
            lane_width: layout.lane_width,
            lane_spacing: layout.lane_spacing,
            max_time,
            note_height: layout.note_height,
        }
    }

    pub fn beat_lines(&self) -> impl Iterator<Item = u64> + Clone {
        beat_lines(self.max_time, self.beat_interval)
    }

    pub fn beat_line_count(&self) -> u64 {
        beat_line_count(self.max_time, self.beat_interval)
    }

    pub fn lane_x(&self, lane: usize) -> f64 {
        lane_x(lane, self.lane_width, self.lane_spacing)
    }

    pub fn lane_center(&self, lane: usize) -> f64 {
        self.lane_x(lane) + self.lane_width / 2.0
    }

    /// Horizontal extent of the chart, with one unit of margin on the left.
    pub fn x_extent(&self) -> (f64, f64) {
        (-1.0, self.lanes as f64 * (self.lane_width + self.lane_spacing))
    }

    /// Visible tick range `(earliest, latest)`, padded 5% on each side.
    pub fn time_window(&self) -> (f64, f64) {
        if self.max_time == 0 {
            return (-self.note_height, self.note_height);
        }
        let max = self.max_time as f64;
        (-max * 0.05, max * 1.05)
    }
}

pub struct RectProjector {
    layout: ChartLayout,
}

impl RectProjector {
    pub fn new(layout: ChartLayout) -> Self {
        Self { layout }
    }
}

impl Projector for RectProjector {
    fn mode(&self) -> ProjectionMode {
        ProjectionMode::Continuous
    }

    fn project(&self, events: &[NoteEvent]) -> Projection {
        Projection::Notes(NoteLayout::from_events(events, &self.layout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU64;

    fn ev(time: u64, lane: usize) -> NoteEvent {
        NoteEvent { time, lane }
    }

    #[test]
    fn test_lane_positions() {
        assert_eq!(lane_x(0, 1.0, 0.2), 0.0);
        assert!((lane_x(1, 1.0, 0.2) - 1.2).abs() < 1e-12);
        assert!((lane_x(3, 1.0, 0.2) - 3.6).abs() < 1e-12);
    }

    #[test]
    fn test_beat_lines_cover_past_last_note() {
        let lines = |max, interval| beat_lines(max, interval).collect::<Vec<_>>();
        assert_eq!(lines(1000, 480), vec![0, 480, 960, 1440]);
        // The end is exclusive, so a note on a beat gets no extra line after it.
        assert_eq!(lines(960, 480), vec![0, 480, 960]);
        assert_eq!(lines(959, 480), vec![0, 480, 960]);
        assert_eq!(lines(0, 480), vec![0]);
        assert!(lines(100, 0).is_empty());
    }

    #[test]
    fn test_beat_line_count_matches_lines() {
        for (max, interval) in [(0, 480), (959, 480), (960, 480), (1000, 480), (1234, 7), (5, 0)] {
            assert_eq!(
                beat_line_count(max, interval),
                beat_lines(max, interval).count() as u64,
                "max {max}, interval {interval}"
            );
        }
    }

    #[test]
    fn test_long_track_beat_lines_stay_lazy() {
        let max = 10 * ((1u64 << 28) - 1);
        let layout = ChartLayout {
            beat_interval: NonZeroU64::new(1).unwrap(),
            ..Default::default()
        };
        let nl = NoteLayout::from_events(&[ev(0, 0), ev(max, 1)], &layout);
        assert_eq!(nl.beat_line_count(), max + 1);
        assert_eq!(nl.beat_lines().take(3).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(nl.notes.len(), 2);
    }

    #[test]
    fn test_rect_per_event_centered_on_time() {
        let layout = ChartLayout::default();
        let nl = NoteLayout::from_events(&[ev(0, 0), ev(15, 1), ev(20, 1)], &layout);

        // No collapsing: close notes in one lane still get their own rectangles.
        assert_eq!(nl.notes.len(), 3);
        let r = nl.notes[1];
        assert_eq!(r.time, 15);
        assert!((r.x - 1.2).abs() < 1e-12);
        assert_eq!(r.width, 1.0);
        assert_eq!(r.top, -10.0);
        assert_eq!(r.bottom, 40.0);
        assert!(nl.notes[2].top < nl.notes[1].bottom);
    }

    #[test]
    fn test_beat_interval_does_not_move_notes() {
        let events = [ev(100, 0), ev(733, 3)];
        let a = NoteLayout::from_events(&events, &ChartLayout::default());
        let b = NoteLayout::from_events(
            &events,
            &ChartLayout {
                beat_interval: NonZeroU64::new(96).unwrap(),
                ..Default::default()
            },
        );
        assert_eq!(a.notes, b.notes);
        assert_ne!(
            a.beat_lines().collect::<Vec<_>>(),
            b.beat_lines().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_extents_and_window() {
        let nl = NoteLayout::from_events(&[ev(2000, 2)], &ChartLayout::default());
        let (x0, x1) = nl.x_extent();
        assert_eq!(x0, -1.0);
        assert!((x1 - 4.8).abs() < 1e-12);
        assert!((nl.lane_center(2) - 2.9).abs() < 1e-12);
        let (t0, t1) = nl.time_window();
        assert!((t0 + 100.0).abs() < 1e-9);
        assert!((t1 - 2100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_span_window_uses_note_height() {
        let nl = NoteLayout::from_events(&[ev(0, 1)], &ChartLayout::default());
        assert_eq!(nl.time_window(), (-50.0, 50.0));
    }
}
