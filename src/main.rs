use crossterm::{
    event::{self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use stockchart::config::{config_path, load_config};
use stockchart::{logging, Action, App};
use tracing::info;

const EVENT_POLL: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let config = load_config(&config_path());
    logging::init(&config.log_file)?;
    info!(chart = %config.chart_source, ticker = %config.ticker_source, "stockchart starting");

    let mut app = App::new(config);
    app.load_chart().await;
    app.start_ticker();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app).await;
    app.stop_ticker();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    info!("stockchart stopped");
    res
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> color_eyre::Result<()> {
    let mut dirty = true;
    loop {
        dirty |= app.drain_ticker();

        if dirty {
            terminal.draw(|f| app.render(f))?;
            dirty = false;
        }

        if !event::poll(EVENT_POLL)? {
            continue;
        }

        match app.handle_event(event::read()?) {
            Action::Quit => return Ok(()),
            Action::Reload => {
                app.load_chart().await;
                dirty = true;
            }
            Action::Redraw => dirty = true,
            Action::None => {}
        }
    }
}
