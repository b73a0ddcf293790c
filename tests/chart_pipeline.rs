use crossterm::event::{Event, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{backend::TestBackend, Terminal};
use std::path::Path;
use stockchart::config::AppConfig;
use stockchart::data::{load_chart_data, Source};
use stockchart::ui::PointRef;
use stockchart::{Action, App, StockError};
use tempfile::TempDir;

const THREE_DAYS: &str = r#"{
    "Date": {"0": "2024-01-01", "1": "2024-01-02", "2": "2024-01-03"},
    "Price": {"0": "10", "1": "11.5", "2": "9"},
    "High": {"0": "12", "1": "12.5", "2": "10"},
    "Low": {"0": "9", "1": "10", "2": "8"},
    "Volume": {"0": 2000000, "1": 1500000, "2": 3250000}
}"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

fn config_for(chart_source: String, dir: &Path) -> AppConfig {
    AppConfig {
        chart_source,
        ticker_source: dir.join("missing-ticker.json").to_string_lossy().into_owned(),
        ..AppConfig::default()
    }
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn draw(terminal: &mut Terminal<TestBackend>, app: &mut App) -> Vec<String> {
    terminal.draw(|f| app.render(f)).unwrap();
    let buffer = terminal.backend().buffer();
    let area = buffer.area;
    (area.y..area.y + area.height)
        .map(|y| {
            (area.x..area.x + area.width)
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect()
        })
        .collect()
}

#[tokio::test]
async fn sample_payload_loads_one_point() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "stock-chart-data.json",
        r#"{"Date":{"0":"2024-01-01"},"Price":{"0":"10"},"High":{"0":"12"},"Low":{"0":"9"},"Volume":{"0":"2000000"}}"#,
    );

    let data = load_chart_data(&reqwest::Client::new(), &Source::parse(&path))
        .await
        .unwrap();

    assert_eq!(data.len(), 1);
    assert_eq!(data.price, vec![10.0]);
    assert_eq!(data.high, vec![12.0]);
    assert_eq!(data.low, vec![9.0]);
    assert_eq!(data.volume, vec!["2.00M".to_string()]);
}

#[tokio::test]
async fn missing_volume_aborts_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "stock-chart-data.json",
        r#"{"Date":{"0":"2024-01-01"},"Price":{"0":"10"},"High":{"0":"12"},"Low":{"0":"9"}}"#,
    );

    let err = load_chart_data(&reqwest::Client::new(), &Source::parse(&path))
        .await
        .unwrap_err();
    assert!(matches!(err, StockError::MissingKey("Volume")));

    let mut app = App::new(config_for(path, dir.path()));
    assert!(!app.load_chart().await);
    assert!(app.chart.is_none());

    let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
    let rows = draw(&mut terminal, &mut app);
    assert!(rows.iter().any(|r| r.contains("No data")));
    assert!(rows.iter().all(|r| !r.contains('•')));
}

#[tokio::test]
async fn failed_reload_keeps_the_previous_chart() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "stock-chart-data.json", THREE_DAYS);

    let mut app = App::new(config_for(path.clone(), dir.path()));
    assert!(app.load_chart().await);

    std::fs::write(&path, "{ not json").unwrap();
    assert!(!app.load_chart().await);
    assert_eq!(app.chart.as_ref().map(|c| c.len()), Some(3));
}

#[tokio::test]
async fn pointer_snaps_tooltip_and_crosshair() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "stock-chart-data.json", THREE_DAYS);

    let mut app = App::new(config_for(path, dir.path()));
    assert!(app.load_chart().await);

    let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
    draw(&mut terminal, &mut app);

    // Ticker takes rows 0..4, the chart border starts at row 4, the price
    // gutter is 9 wide: points land on columns 10, 34 and 58.
    let chart = app.chart.as_ref().unwrap();
    assert_eq!(chart.geometry[0].xs, vec![10.0, 34.0, 58.0]);

    assert_eq!(
        app.handle_event(mouse(MouseEventKind::Moved, 30, 8)),
        Action::Redraw
    );
    let chart = app.chart.as_ref().unwrap();
    assert_eq!(chart.active, Some(PointRef { series: 0, index: 1 }));
    assert!(chart.tooltip_enabled);

    let rows = draw(&mut terminal, &mut app);
    let screen = rows.join("\n");
    assert!(screen.contains("Jan 02"));
    assert!(screen.contains("Price:        €11.5"));
    assert!(screen.contains("High:         €12.5"));
    assert!(screen.contains("Low:          €10"));
    assert!(screen.contains("Volume:    1.50M"));
    let plot_top = &rows[5];
    assert_eq!(plot_top.chars().nth(34), Some('│'));

    // Equidistant from two points but beyond the threshold.
    assert_eq!(
        app.handle_event(mouse(MouseEventKind::Moved, 22, 8)),
        Action::Redraw
    );
    let chart = app.chart.as_ref().unwrap();
    assert_eq!(chart.active, None);
    assert!(!chart.tooltip_enabled);

    assert_eq!(
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 50, 8)),
        Action::Redraw
    );
    assert_eq!(
        app.chart.as_ref().unwrap().active,
        Some(PointRef { series: 0, index: 2 })
    );

    // Leaving the chart panel hides everything.
    assert_eq!(
        app.handle_event(mouse(MouseEventKind::Moved, 30, 1)),
        Action::Redraw
    );
    assert_eq!(app.chart.as_ref().unwrap().active, None);

    let rows = draw(&mut terminal, &mut app);
    assert!(rows.iter().all(|r| !r.contains("Price:")));
}

#[tokio::test]
async fn focus_loss_hides_the_tooltip() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "stock-chart-data.json", THREE_DAYS);

    let mut app = App::new(config_for(path, dir.path()));
    assert!(app.load_chart().await);
    let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
    draw(&mut terminal, &mut app);

    app.handle_event(mouse(MouseEventKind::Moved, 10, 8));
    assert!(app.chart.as_ref().unwrap().tooltip_enabled);

    assert_eq!(app.handle_event(Event::FocusLost), Action::Redraw);
    assert!(!app.chart.as_ref().unwrap().tooltip_enabled);
    assert_eq!(app.handle_event(Event::FocusLost), Action::None);
}
