use crate::config::AppConfig;
use crate::data::{http_client, load_chart_data, Source, TickerPoller, TickerSnapshot};
use crate::ui::{ChartState, CrosshairHandler, LayoutManager, PointerEvent};
use chrono::Local;
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::Frame;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Redraw,
    Reload,
    Quit,
}

pub struct App {
    pub config: AppConfig,
    pub chart: Option<ChartState>,
    pub layout: LayoutManager,
    pub crosshair: CrosshairHandler,
    client: Client,
    poller: Option<TickerPoller>,
    ticker_rx: Option<mpsc::Receiver<TickerSnapshot>>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let client = http_client().unwrap_or_else(|err| {
            warn!(%err, "falling back to a default HTTP client");
            Client::new()
        });
        Self {
            layout: LayoutManager::new(config.brand.clone()),
            crosshair: CrosshairHandler::new(config.snap_threshold),
            config,
            chart: None,
            client,
            poller: None,
            ticker_rx: None,
        }
    }

    /// Loads the chart snapshot. On failure the error is logged and the
    /// current chart, if any, stays as it was.
    pub async fn load_chart(&mut self) -> bool {
        let source = Source::parse(&self.config.chart_source);
        match load_chart_data(&self.client, &source).await {
            Ok(data) => {
                self.chart = Some(ChartState::new(data, &self.config.currency));
                true
            }
            Err(err) => {
                error!(source = source.name(), %err, "error loading the chart data");
                false
            }
        }
    }

    pub fn start_ticker(&mut self) {
        self.stop_ticker();
        let source = Source::parse(&self.config.ticker_source);
        let interval = Duration::from_secs(self.config.ticker_interval_secs);
        info!(source = source.name(), ?interval, "starting ticker poller");

        let (poller, rx) = TickerPoller::spawn(self.client.clone(), source, interval);
        self.poller = Some(poller);
        self.ticker_rx = Some(rx);
    }

    pub fn stop_ticker(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
        self.ticker_rx = None;
    }

    /// Applies every snapshot received since the last call.
    pub fn drain_ticker(&mut self) -> bool {
        let mut latest = None;
        if let Some(rx) = self.ticker_rx.as_mut() {
            while let Ok(snapshot) = rx.try_recv() {
                latest = Some(snapshot);
            }
        }

        match latest {
            Some(snapshot) => {
                self.apply_ticker(&snapshot);
                true
            }
            None => false,
        }
    }

    pub fn apply_ticker(&mut self, snapshot: &TickerSnapshot) {
        self.layout.ticker.update(snapshot);
        self.layout.statusbar.ticker_updated = Some(Local::now());
    }

    pub fn pointer(&mut self, event: PointerEvent) -> bool {
        match self.chart.as_mut() {
            Some(chart) => self.crosshair.handle(chart, event),
            None => false,
        }
    }

    pub fn handle_event(&mut self, event: Event) -> Action {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
                KeyCode::Char('r') => Action::Reload,
                _ => Action::None,
            },
            Event::Mouse(mouse) => {
                let inside = self
                    .chart
                    .as_ref()
                    .is_some_and(|c| c.contains(mouse.column, mouse.row));
                let x = mouse.column as f64;

                let pointer = match mouse.kind {
                    MouseEventKind::Moved | MouseEventKind::Drag(_) if inside => {
                        PointerEvent::Moved(x)
                    }
                    MouseEventKind::Down(MouseButton::Left) if inside => PointerEvent::Clicked(x),
                    MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_) => {
                        PointerEvent::Left
                    }
                    _ => return Action::None,
                };

                if self.pointer(pointer) {
                    Action::Redraw
                } else {
                    Action::None
                }
            }
            Event::FocusLost => {
                if self.pointer(PointerEvent::Left) {
                    Action::Redraw
                } else {
                    Action::None
                }
            }
            Event::Resize(_, _) => Action::Redraw,
            _ => Action::None,
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.layout.render(frame, self.chart.as_mut(), area);
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}
