use crate::data::{TickerSnapshot, TickerTrend};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// The two rows the ticker block shows for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerView {
    pub trend: TickerTrend,
    pub top: [String; 2],
    pub bottom: [String; 2],
}

impl TickerView {
    pub fn build(brand: &str, snapshot: &TickerSnapshot) -> Self {
        Self {
            trend: snapshot.trend(),
            top: [format!("[{brand}]"), snapshot.price.clone()],
            bottom: [
                snapshot.percent.clone(),
                format!("({}) Today", snapshot.change),
            ],
        }
    }
}

pub struct TickerPanel {
    pub brand: String,
    pub view: Option<TickerView>,
}

impl TickerPanel {
    pub fn new(brand: String) -> Self {
        Self { brand, view: None }
    }

    /// Replaces whatever was shown before.
    pub fn update(&mut self, snapshot: &TickerSnapshot) {
        self.view = Some(TickerView::build(&self.brand, snapshot));
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Ticker")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));

        let Some(view) = &self.view else {
            let text = Line::from(Span::styled(
                "Loading...",
                Style::default().fg(Color::Gray),
            ));
            let para = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(para, area);
            return;
        };

        let color = match view.trend {
            TickerTrend::Up => Color::Green,
            TickerTrend::Down => Color::Red,
        };

        let lines = vec![
            Line::from(vec![
                Span::styled(
                    format!("{} ", view.top[0]),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    view.top[1].clone(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled(format!("{} ", view.bottom[0]), Style::default().fg(color)),
                Span::styled(view.bottom[1].clone(), Style::default().fg(color)),
            ]),
        ];

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
