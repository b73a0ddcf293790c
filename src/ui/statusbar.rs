use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

pub struct StatusBar {
    pub chart_loaded: bool,
    pub ticker_updated: Option<DateTime<Local>>,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            chart_loaded: false,
            ticker_updated: None,
        }
    }

    pub fn line(&self) -> Line<'static> {
        let (status_color, status_text, label) = if self.chart_loaded {
            (Color::Green, "●", "CHART LOADED")
        } else {
            (Color::Red, "○", "NO CHART")
        };

        let ticker = match self.ticker_updated {
            Some(at) => format!("ticker {}", at.format("%H:%M:%S")),
            None => "ticker pending".to_string(),
        };

        Line::from(vec![
            Span::styled(format!("{} ", status_text), Style::default().fg(status_color)),
            Span::styled(label, Style::default().fg(Color::White)),
            Span::raw(" | "),
            Span::styled(ticker, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled("Q", Style::default().fg(Color::Yellow)),
            Span::raw(":Quit "),
            Span::styled("R", Style::default().fg(Color::Yellow)),
            Span::raw(":Reload "),
            Span::styled("Mouse", Style::default().fg(Color::Yellow)),
            Span::raw(":Crosshair"),
        ])
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let para = Paragraph::new(self.line()).block(Block::default());
        frame.render_widget(para, area);
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}
