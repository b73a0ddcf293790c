use crate::ui::{chart, ChartState, StatusBar, TickerPanel};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

pub struct LayoutManager {
    pub ticker: TickerPanel,
    pub statusbar: StatusBar,
}

impl LayoutManager {
    pub fn new(brand: String) -> Self {
        Self {
            ticker: TickerPanel::new(brand),
            statusbar: StatusBar::new(),
        }
    }

    pub fn split(area: Rect) -> [Rect; 3] {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(8),
                Constraint::Length(1),
            ])
            .split(area);
        [chunks[0], chunks[1], chunks[2]]
    }

    pub fn render(&mut self, frame: &mut Frame, chart_state: Option<&mut ChartState>, area: Rect) {
        let [ticker_area, chart_area, status_area] = Self::split(area);

        self.ticker.render(frame, ticker_area);

        self.statusbar.chart_loaded = chart_state.is_some();
        match chart_state {
            Some(state) => state.render(frame, chart_area),
            None => chart::render_empty(frame, chart_area, "No data"),
        }

        self.statusbar.render(frame, status_area);
    }
}
