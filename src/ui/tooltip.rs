use crate::data::chart_data::to_fixed;
use crate::ui::chart::{ChartState, Series, ValueFormat};
use crate::ui::crosshair::PointRef;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

const PRIMARY_COLUMN: usize = 19;
const COMPANION_COLUMN: usize = 18;
const MAGNITUDE_COLUMN: usize = 15;

pub const TOOLTIP_BG: Color = Color::Rgb(31, 62, 86);

/// Spaces needed to push `used` characters out to `target`; never negative.
pub fn pad_count(target: usize, used: usize) -> usize {
    target.saturating_sub(used)
}

/// `"<label>: " + padding + currency + value`, right-aligned to column 19
/// counting the currency sign.
pub fn primary_line(label: &str, currency: &str, value: &str) -> String {
    let used = label.chars().count() + 2 + currency.chars().count() + value.chars().count();
    let spaces = " ".repeat(pad_count(PRIMARY_COLUMN, used));
    format!("{label}: {spaces}{currency}{value}")
}

/// Line for a series shown alongside the active one. Currency series pad
/// towards column 18, magnitude series (volume) towards column 15 with no
/// sign. The padding is sized from `active_value`, the active series'
/// formatted value, so every row in one tooltip shares the same indent rule.
pub fn companion_line(
    label: &str,
    format: ValueFormat,
    currency: &str,
    value: &str,
    active_value: &str,
) -> String {
    let used = label.chars().count() + 2 + active_value.chars().count();
    match format {
        ValueFormat::Currency => {
            let spaces = " ".repeat(pad_count(COMPANION_COLUMN, used));
            format!("{label}: {spaces}{currency}{value}")
        }
        ValueFormat::Magnitude => {
            let spaces = " ".repeat(pad_count(MAGNITUDE_COLUMN, used));
            format!("{label}: {spaces}{value}")
        }
    }
}

/// Number formatting used for the active value: grouped thousands and at
/// most three fraction digits, halfway values rounded away from zero.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "NaN".to_string()
        } else if value > 0.0 {
            "∞".to_string()
        } else {
            "-∞".to_string()
        };
    }

    let rounded = to_fixed(value.abs(), 3);
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && (int_part != "0" || !frac_part.is_empty());
    let sign = if negative { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

fn raw_value(series: &Series, index: usize) -> String {
    match series.display.get(index) {
        Some(text) => text.clone(),
        None => series
            .values
            .get(index)
            .map(|v| v.to_string())
            .unwrap_or_default(),
    }
}

/// Tooltip rows for `active`: the date, the active series, then every
/// other series at the same index in series order.
pub fn tooltip_lines(state: &ChartState, active: PointRef, currency: &str) -> Vec<String> {
    let mut lines = Vec::with_capacity(state.series.len() + 1);

    if let Some(date) = state.dates.get(active.index) {
        lines.push(date.format("%b %d").to_string());
    }

    let Some(primary) = state.series.get(active.series) else {
        return lines;
    };
    let value = primary
        .values
        .get(active.index)
        .copied()
        .map(format_number)
        .unwrap_or_default();
    lines.push(primary_line(&primary.label, currency, &value));

    for (idx, series) in state.series.iter().enumerate() {
        if idx == active.series {
            continue;
        }
        let companion = raw_value(series, active.index);
        lines.push(companion_line(
            &series.label,
            series.format,
            currency,
            &companion,
            &value,
        ));
    }

    lines
}

/// Draws the tooltip box beside the active point, flipping to the left of
/// it when there is no room on the right.
pub fn render_tooltip(buf: &mut Buffer, plot: Rect, anchor_x: u16, lines: &[String]) {
    if lines.is_empty() || plot.width < 4 || plot.height < 3 {
        return;
    }

    let content_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
    let width = (content_width + 2).min(plot.width);
    let height = (lines.len() as u16 + 2).min(plot.height);

    let right = plot.x + plot.width;
    let x = if anchor_x + 2 + width <= right {
        anchor_x + 2
    } else {
        anchor_x.saturating_sub(width + 1).max(plot.x)
    };

    let area = Rect {
        x,
        y: plot.y,
        width,
        height,
    };

    let text: Vec<Line> = lines.iter().map(|l| Line::from(l.as_str())).collect();
    Clear.render(area, buf);
    Paragraph::new(text)
        .style(Style::default().fg(Color::White).bg(TOOLTIP_BG))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray).bg(TOOLTIP_BG)),
        )
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_line_is_right_aligned() {
        let line = primary_line("Price", "€", "123.45");
        assert_eq!(line, "Price:      €123.45");
        assert_eq!(line.chars().count(), PRIMARY_COLUMN);
    }

    #[test]
    fn padding_is_stable() {
        assert_eq!(
            primary_line("Price", "€", "123.45"),
            primary_line("Price", "€", "123.45")
        );
        assert_eq!(pad_count(19, 14), 5);
    }

    #[test]
    fn padding_clamps_to_zero() {
        assert_eq!(pad_count(15, 30), 0);
        let line = primary_line("Price", "€", "123,456,789,012.5");
        assert_eq!(line, "Price: €123,456,789,012.5");
    }

    #[test]
    fn companion_lines() {
        assert_eq!(
            companion_line("High", ValueFormat::Currency, "€", "12", "10"),
            "High:           €12"
        );
        assert_eq!(
            companion_line("Volume", ValueFormat::Magnitude, "€", "2.00M", "10"),
            "Volume:      2.00M"
        );
    }

    #[test]
    fn companion_padding_follows_the_active_value() {
        assert_eq!(
            companion_line("High", ValueFormat::Currency, "€", "12", "123.45"),
            "High:       €12"
        );
        assert_eq!(
            companion_line("Volume", ValueFormat::Magnitude, "€", "1.50M", "11.5"),
            "Volume:    1.50M"
        );
        assert_eq!(
            companion_line("Volume", ValueFormat::Magnitude, "€", "1.50M", "1,234,567.5"),
            "Volume: 1.50M"
        );
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(123.45), "123.45");
        assert_eq!(format_number(1234.5), "1,234.5");
        assert_eq!(format_number(1_234_567.891_2), "1,234,567.891");
        assert_eq!(format_number(-0.5), "-0.5");
        assert_eq!(format_number(-0.0001), "0");
        assert_eq!(format_number(999.9999), "1,000");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn halfway_values_round_away_from_zero() {
        assert_eq!(format_number(1.0625), "1.063");
        assert_eq!(format_number(-1.0625), "-1.063");
        assert_eq!(format_number(1_000.0625), "1,000.063");
    }
}
