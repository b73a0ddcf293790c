use crate::ui::chart::ChartState;
use ratatui::{buffer::Buffer, layout::Rect, style::Color};
use tracing::trace;

/// Dash pattern of the guideline, in rows: drawn, then skipped.
const DASH: (u16, u16) = (5, 2);
const GUIDE_COLOR: Color = Color::Rgb(170, 200, 220);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointRef {
    pub series: usize,
    pub index: usize,
}

/// Where each point of one series landed on the last draw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesGeometry {
    pub hidden: bool,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Moved(f64),
    Clicked(f64),
    Left,
}

/// Horizontally nearest point across all visible series. Ties keep the
/// first candidate seen: lower series index, then lower point index.
pub fn select_nearest(pointer_x: f64, series: &[SeriesGeometry]) -> Option<(PointRef, f64)> {
    let mut best: Option<PointRef> = None;
    let mut best_distance = f64::INFINITY;

    for (series_idx, geometry) in series.iter().enumerate() {
        if geometry.hidden {
            continue;
        }
        for (index, x) in geometry.xs.iter().enumerate() {
            let distance = (x - pointer_x).abs();
            if distance < best_distance {
                best_distance = distance;
                best = Some(PointRef {
                    series: series_idx,
                    index,
                });
            }
        }
    }

    best.map(|point| (point, best_distance))
}

/// Turns pointer events into tooltip/crosshair state on a [`ChartState`].
#[derive(Debug, Clone, Copy)]
pub struct CrosshairHandler {
    snap_threshold: f64,
}

impl CrosshairHandler {
    pub fn new(snap_threshold: f64) -> Self {
        Self { snap_threshold }
    }

    /// Point to activate for `pointer_x`, if any lies within the threshold.
    pub fn snap(&self, pointer_x: f64, series: &[SeriesGeometry]) -> Option<PointRef> {
        select_nearest(pointer_x, series)
            .filter(|(_, distance)| *distance <= self.snap_threshold)
            .map(|(point, _)| point)
    }

    /// Applies `event` to `state`. Returns true when a redraw is needed.
    pub fn handle(&self, state: &mut ChartState, event: PointerEvent) -> bool {
        let next = match event {
            PointerEvent::Moved(x) | PointerEvent::Clicked(x) => self.snap(x, &state.geometry),
            PointerEvent::Left => None,
        };

        let changed = state.active != next || state.tooltip_enabled != next.is_some();
        if changed {
            trace!(?event, ?next, "crosshair moved");
        }
        state.active = next;
        state.tooltip_enabled = next.is_some();
        changed
    }
}

/// Dashed vertical guideline at column `x` spanning `plot`.
pub fn draw_crosshair(buf: &mut Buffer, plot: Rect, x: u16) {
    if x < plot.x || x >= plot.x + plot.width {
        return;
    }

    for row in plot.y..plot.y + plot.height {
        if (row - plot.y) % (DASH.0 + DASH.1) < DASH.0 {
            buf[(x, row)].set_char('│').set_fg(GUIDE_COLOR);
        }
    }
}
