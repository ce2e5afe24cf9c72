//! Draw projected charts to PNG images.
//!
//! Both chart styles are drawn in pixel space through a [`Frame`], which maps
//! chart coordinates (lane units across, ticks or grid rows down) onto the
//! plot rectangle. Time grows downward: the earliest note is at the top.

use std::path::Path;
use std::sync::OnceLock;

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;

use crate::error::ChartError;
use crate::project::{ChartGrid, NoteLayout, Projection};

/// Image size for discrete grid charts (8x12 in at 100 dpi).
pub const GRID_IMAGE_SIZE: (u32, u32) = (800, 1200);
/// Image size for continuous charts (10x15 in at 150 dpi).
pub const DETAILED_IMAGE_SIZE: (u32, u32) = (1500, 2250);

pub const LANE_NAMES: [&str; 4] = ["Left", "Down", "Up", "Right"];

const PURPLE: RGBColor = RGBColor(128, 0, 128);
const LIGHT_GRAY: RGBColor = RGBColor(211, 211, 211);
const GRAY: RGBColor = RGBColor(128, 128, 128);
const LANE_COLORS: [RGBColor; 4] = [RED, BLUE, GREEN, PURPLE];

const MAX_BEAT_LINES: u64 = 2000;

const FONT: &str = "sans-serif";
static FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
static FONT_REGISTERED: OnceLock<bool> = OnceLock::new();

/// Register the bundled typeface as the `sans-serif` family, once per process.
fn ensure_font(path: &Path) -> Result<(), ChartError> {
    let registered = *FONT_REGISTERED.get_or_init(|| {
        plotters::style::register_font(FONT, FontStyle::Normal, FONT_DATA).is_ok()
    });
    if !registered {
        return Err(ChartError::Render {
            path: path.to_path_buf(),
            reason: "bundled font could not be loaded".into(),
        });
    }
    Ok(())
}

/// Render a projection to a PNG at `path`, sized for its mode.
pub fn render_projection(projection: &Projection, title: &str, path: &Path) -> Result<(), ChartError> {
    ensure_font(path)?;
    let size = match projection {
        Projection::Grid(_) => GRID_IMAGE_SIZE,
        Projection::Notes(_) => DETAILED_IMAGE_SIZE,
    };
    let root = BitMapBackend::new(path, size).into_drawing_area();
    let drawn = match projection {
        Projection::Grid(grid) => draw_grid(&root, grid, title),
        Projection::Notes(layout) => draw_notes(&root, layout, title),
    };
    drawn.map_err(|e| render_error(path, e))?;
    root.present().map_err(|e| render_error(path, e))?;
    Ok(())
}

fn render_error<E: std::error::Error + Send + Sync>(path: &Path, e: DrawingAreaErrorKind<E>) -> ChartError {
    ChartError::Render {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Discrete chart: one red cell per occupied (row, lane).
pub fn draw_grid<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    grid: &ChartGrid,
    title: &str,
) -> DrawResult<DB> {
    root.fill(&WHITE)?;
    let body = root.titled(title, (FONT, 28))?;
    let (w, h) = body.dim_in_pixel();
    let frame = Frame::new(
        (0.0, grid.lanes() as f64),
        (0.0, grid.rows() as f64),
        (80, 10, w as i32 - 20, h as i32 - 70),
    );

    for (row, lane) in grid.occupied_cells() {
        let p0 = frame.map(lane as f64, row as f64);
        let p1 = frame.map(lane as f64 + 1.0, row as f64 + 1.0);
        body.draw(&Rectangle::new([p0, p1], RED.filled()))?;
    }

    let (left, top, right, bottom) = frame.pixel_bounds();
    body.draw(&Rectangle::new([(left, top), (right, bottom)], BLACK.stroke_width(1)))?;

    let lane_centers: Vec<f64> = (0..grid.lanes()).map(|l| l as f64 + 0.5).collect();
    draw_lane_labels(&body, &frame, &lane_centers)?;

    // Time ticks at roughly ten evenly spaced rows.
    let step = (grid.rows() / 10).max(1);
    for row in (0..=grid.rows()).step_by(step as usize) {
        let y = frame.map_y(row as f64);
        draw_time_tick(&body, left, y, grid.row_time(row))?;
    }

    draw_axis_titles(&body, &frame, "Lanes", "Time (descending)")
}

/// Continuous chart: lane backgrounds, beat lines, one rectangle per note.
pub fn draw_notes<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layout: &NoteLayout,
    title: &str,
) -> DrawResult<DB> {
    root.fill(&WHITE)?;
    let body = root.titled(title, (FONT, 40))?;
    let (w, h) = body.dim_in_pixel();
    let (t0, t1) = layout.time_window();
    let frame = Frame::new(
        layout.x_extent(),
        (t0, t1),
        (120, 15, w as i32 - 30, h as i32 - 100),
    );

    for lane in 0..layout.lanes {
        let x = layout.lane_x(lane);
        let p0 = frame.map(x, t0);
        let p1 = frame.map(x + layout.lane_width, t1);
        body.draw(&Rectangle::new([p0, p1], LIGHT_GRAY.mix(0.3).filled()))?;
        body.draw(&Rectangle::new([p0, p1], GRAY.stroke_width(1)))?;
    }

    let (left, top, right, bottom) = frame.pixel_bounds();
    // Thin out beat lines to at most about one per pixel row.
    let stride = layout.beat_line_count().div_ceil(MAX_BEAT_LINES).max(1);
    let drawn = layout.beat_line_count().div_ceil(stride);
    let label_every = (drawn / 20).max(1) as usize;
    for (i, beat) in layout.beat_lines().step_by(stride as usize).enumerate() {
        let b = beat as f64;
        if b < t0 || b > t1 {
            continue;
        }
        let y = frame.map_y(b);
        body.draw(&PathElement::new(
            vec![(left, y), (right, y)],
            BLACK.mix(0.3).stroke_width(1),
        ))?;
        if i % label_every == 0 {
            draw_time_tick(&body, left, y, beat)?;
        }
    }

    for note in &layout.notes {
        let p0 = frame.map(note.x, note.top);
        let p1 = frame.map(note.x + note.width, note.bottom);
        body.draw(&Rectangle::new([p0, p1], lane_color(note.lane).mix(0.8).filled()))?;
        body.draw(&Rectangle::new([p0, p1], BLACK.stroke_width(1)))?;
    }

    body.draw(&Rectangle::new([(left, top), (right, bottom)], BLACK.stroke_width(1)))?;

    let lane_centers: Vec<f64> = (0..layout.lanes).map(|l| layout.lane_center(l)).collect();
    draw_lane_labels(&body, &frame, &lane_centers)?;
    draw_axis_titles(&body, &frame, "Lanes", "Time (ticks)")
}

fn draw_lane_labels<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    frame: &Frame,
    centers: &[f64],
) -> DrawResult<DB> {
    let (_, _, _, bottom) = frame.pixel_bounds();
    let style = TextStyle::from((FONT, 18).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
    for (lane, &cx) in centers.iter().enumerate() {
        area.draw(&Text::new(lane_name(lane), (frame.map_x(cx), bottom + 8), style.clone()))?;
    }
    Ok(())
}

fn draw_time_tick<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    left: i32,
    y: i32,
    ticks: u64,
) -> DrawResult<DB> {
    area.draw(&PathElement::new(vec![(left - 5, y), (left, y)], BLACK.stroke_width(1)))?;
    let style = TextStyle::from((FONT, 14).into_font()).pos(Pos::new(HPos::Right, VPos::Center));
    area.draw(&Text::new(ticks.to_string(), (left - 8, y), style))
}

fn draw_axis_titles<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    frame: &Frame,
    x_title: &str,
    y_title: &str,
) -> DrawResult<DB> {
    let (left, top, right, bottom) = frame.pixel_bounds();
    let x_style = TextStyle::from((FONT, 20).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
    area.draw(&Text::new(x_title.to_string(), ((left + right) / 2, bottom + 36), x_style))?;

    let y_style = TextStyle::from((FONT, 20).into_font().transform(FontTransform::Rotate270))
        .pos(Pos::new(HPos::Center, VPos::Top));
    area.draw(&Text::new(y_title.to_string(), (8, (top + bottom) / 2), y_style))
}
