use crate::data::ChartData;
use crate::ui::crosshair::{draw_crosshair, PointRef, SeriesGeometry};
use crate::ui::tooltip::{render_tooltip, tooltip_lines};
use chrono::{DateTime, Utc};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

/// Columns reserved left of the plot for price labels.
pub const Y_GUTTER: u16 = 9;
const X_LABEL_WIDTH: u16 = 6;
const MAX_X_LABELS: usize = 10;
const Y_LABELS: usize = 5;

const LINE_COLOR: Color = Color::Rgb(170, 200, 220);
const FILL_COLOR: Color = Color::Rgb(31, 62, 86);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// Prices, shown with the currency sign.
    Currency,
    /// Pre-formatted magnitudes such as `"2.00M"`.
    Magnitude,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
    /// Per-point display text; empty when values print as plain numbers.
    pub display: Vec<String>,
    pub format: ValueFormat,
    pub hidden: bool,
}

impl Series {
    fn numeric(label: &str, values: Vec<f64>, hidden: bool) -> Self {
        Self {
            label: label.to_string(),
            values,
            display: Vec::new(),
            format: ValueFormat::Currency,
            hidden,
        }
    }
}

/// Render context of the price chart: data, visibility, geometry of the
/// last draw and the active point.
#[derive(Debug, Clone)]
pub struct ChartState {
    pub dates: Vec<DateTime<Utc>>,
    pub timestamps: Vec<f64>,
    pub series: Vec<Series>,
    pub geometry: Vec<SeriesGeometry>,
    /// Whole drawable area inside the border; pointer events outside it
    /// count as leaving the chart.
    pub canvas: Rect,
    pub plot: Rect,
    pub active: Option<PointRef>,
    pub tooltip_enabled: bool,
    pub currency: String,
}

impl ChartState {
    /// Price is drawn; High, Low and Volume stay hidden and only feed the
    /// tooltip.
    pub fn new(data: ChartData, currency: &str) -> Self {
        let len = data.len();
        let timestamps = data.timestamps();
        let series = vec![
            Series::numeric("Price", data.price, false),
            Series::numeric("High", data.high, true),
            Series::numeric("Low", data.low, true),
            Series {
                label: "Volume".to_string(),
                values: vec![f64::NAN; len],
                display: data.volume,
                format: ValueFormat::Magnitude,
                hidden: true,
            },
        ];

        Self {
            dates: data.dates,
            timestamps,
            series,
            geometry: Vec::new(),
            canvas: Rect::default(),
            plot: Rect::default(),
            active: None,
            tooltip_enabled: false,
            currency: currency.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Shows or hides a series. An active point on a series that becomes
    /// hidden is dropped.
    pub fn set_hidden(&mut self, series: usize, hidden: bool) {
        let Some(s) = self.series.get_mut(series) else {
            return;
        };
        s.hidden = hidden;
        if let Some(geometry) = self.geometry.get_mut(series) {
            geometry.hidden = hidden;
        }
        if hidden && self.active.map(|p| p.series) == Some(series) {
            self.active = None;
            self.tooltip_enabled = false;
        }
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.canvas.x
            && column < self.canvas.x + self.canvas.width
            && row >= self.canvas.y
            && row < self.canvas.y + self.canvas.height
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.render_to(frame.buffer_mut(), area);
    }

    pub fn render_to(&mut self, buf: &mut Buffer, area: Rect) {
        let block = Block::default()
            .title("Price")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        block.render(area, buf);
        self.canvas = inner;

        if self.is_empty() || inner.width <= Y_GUTTER + 2 || inner.height < 4 {
            self.geometry.clear();
            self.plot = Rect::default();
            return;
        }

        self.plot = Rect {
            x: inner.x + Y_GUTTER,
            y: inner.y,
            width: inner.width - Y_GUTTER,
            height: inner.height - 1,
        };

        let (min, max) = self.value_range();
        self.geometry = self.layout_geometry(min, max);

        for (series, geometry) in self.series.iter().zip(&self.geometry) {
            if !series.hidden {
                draw_area(buf, self.plot, geometry);
            }
        }

        self.render_y_labels(buf, inner, min, max);
        self.render_x_labels(buf, inner);

        if let Some(active) = self.active.filter(|_| self.tooltip_enabled) {
            if let Some(x) = self
                .geometry
                .get(active.series)
                .and_then(|g| g.xs.get(active.index))
                .filter(|x| x.is_finite())
            {
                let column = x.round() as u16;
                draw_crosshair(buf, self.plot, column);
                let lines = tooltip_lines(self, active, &self.currency);
                render_tooltip(buf, self.plot, column, &lines);
            }
        }
    }

    /// Value range of the visible currency series, widened when flat.
    fn value_range(&self) -> (f64, f64) {
        let (mut min, mut max) = self
            .series
            .iter()
            .filter(|s| !s.hidden && s.format == ValueFormat::Currency)
            .flat_map(|s| s.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold((f64::MAX, f64::MIN), |(min, max), v| (min.min(v), max.max(v)));

        if min > max {
            return (0.0, 1.0);
        }
        if (max - min).abs() < f64::EPSILON {
            min -= 0.5;
            max += 0.5;
        }
        (min, max)
    }

    fn layout_geometry(&self, min: f64, max: f64) -> Vec<SeriesGeometry> {
        let xs = x_positions(&self.timestamps, self.plot);
        let span = (self.plot.height.saturating_sub(1)) as f64;
        let top = self.plot.y as f64;

        self.series
            .iter()
            .map(|series| SeriesGeometry {
                hidden: series.hidden,
                xs: xs.clone(),
                ys: series
                    .values
                    .iter()
                    .map(|v| top + (max - v) / (max - min) * span)
                    .collect(),
            })
            .collect()
    }

    fn render_y_labels(&self, buf: &mut Buffer, inner: Rect, min: f64, max: f64) {
        let count = Y_LABELS.min(self.plot.height as usize / 2).max(1);
        let span = self.plot.height.saturating_sub(1);
        let width = (Y_GUTTER - 1) as usize;

        for i in 0..=count {
            let row = self.plot.y + (i as u16 * span) / count as u16;
            let value = max - (i as f64 / count as f64) * (max - min);
            let label = format!("{:>width$}", axis_label(&self.currency, value));
            let label: String = label.chars().take(width).collect();
            buf.set_string(inner.x, row, label, Style::default().fg(Color::Gray));
        }
    }

    fn render_x_labels(&self, buf: &mut Buffer, inner: Rect) {
        let Some(xs) = self.geometry.first().map(|g| &g.xs) else {
            return;
        };
        if self.plot.width < X_LABEL_WIDTH {
            return;
        }

        let row = inner.y + inner.height - 1;
        let max_labels = MAX_X_LABELS
            .min(self.plot.width as usize / (X_LABEL_WIDTH as usize + 2))
            .max(1);
        let step = self.len().div_ceil(max_labels).max(1);
        let last_start = self.plot.x + self.plot.width - X_LABEL_WIDTH;

        let mut next_free = self.plot.x;
        for idx in (0..self.len()).step_by(step) {
            let Some(x) = xs.get(idx).filter(|x| x.is_finite()) else {
                continue;
            };
            let start = (x.round() as u16)
                .saturating_sub(X_LABEL_WIDTH / 2)
                .clamp(self.plot.x, last_start);
            if start < next_free {
                continue;
            }
            let label = self.dates[idx].format("%b %d").to_string();
            buf.set_string(start, row, label, Style::default().fg(Color::Gray));
            next_free = start + X_LABEL_WIDTH + 1;
        }
    }
}

/// Centre column of each point on a time axis spanning `plot`.
pub fn x_positions(timestamps: &[f64], plot: Rect) -> Vec<f64> {
    let left = plot.x as f64;
    let span = plot.width.saturating_sub(1) as f64;
    let (min, max) = timestamps
        .iter()
        .copied()
        .filter(|t| t.is_finite())
        .fold((f64::MAX, f64::MIN), |(min, max), t| (min.min(t), max.max(t)));

    if max <= min {
        return vec![left + span / 2.0; timestamps.len()];
    }

    timestamps
        .iter()
        .map(|t| left + (t - min) / (max - min) * span)
        .collect()
}

/// Price tick label: currency sign and at most one decimal.
pub fn axis_label(currency: &str, value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{currency}{rounded}")
}

/// Line plus shaded area beneath it, interpolated column by column.
fn draw_area(buf: &mut Buffer, plot: Rect, geometry: &SeriesGeometry) {
    let bottom = plot.y + plot.height;
    let right = (plot.x + plot.width) as f64;
    let points: Vec<(f64, f64)> = geometry
        .xs
        .iter()
        .zip(&geometry.ys)
        .map(|(x, y)| (*x, *y))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();

    let mut plot_cell = |column: f64, y: f64| {
        if column < plot.x as f64 || column >= right {
            return;
        }
        let column = column as u16;
        let row = (y.round() as u16).clamp(plot.y, bottom - 1);
        buf[(column, row)].set_char('•').set_fg(LINE_COLOR);
        for fill in row + 1..bottom {
            buf[(column, fill)].set_char('░').set_fg(FILL_COLOR);
        }
    };

    if let [(x, y)] = points.as_slice() {
        plot_cell(x.round(), *y);
        return;
    }

    for pair in points.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        let (xa, ya, xb, yb) = if x0 <= x1 {
            (x0, y0, x1, y1)
        } else {
            (x1, y1, x0, y0)
        };
        let mut column = xa.round();
        while column <= xb.round() {
            let t = if xb > xa { ((column - xa) / (xb - xa)).clamp(0.0, 1.0) } else { 0.0 };
            plot_cell(column, ya + t * (yb - ya));
            column += 1.0;
        }
    }
}

/// Panel shown when no chart could be loaded.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .title("Price")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let text = Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(Color::Gray),
    ));
    let para = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(para, area);
}
