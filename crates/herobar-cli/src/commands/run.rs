use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{info, warn};

use herobar_core::{DelayRefresh, HeaderConfig, HeaderEvent, HeaderRuntime};
use herobar_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::{apply_action, handle_key_event, handle_mouse_event},
    ui,
};

/// Terminal poll interval; also drives the spinner animation
const TICK_RATE_MS: u64 = 50;

type Term = Terminal<CrosstermBackend<io::Stdout>>;

pub async fn run(config: HeaderConfig, refresh_ms: u64, fail_refresh: Option<String>) -> Result<()> {
    let mut operation = DelayRefresh::new(Duration::from_millis(refresh_ms));
    if let Some(message) = fail_refresh {
        operation = operation.failing(message);
    }

    let (runtime, handle) = HeaderRuntime::new(&config, Arc::new(operation))?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let runtime_task = tokio::spawn(runtime.with_event_sender(event_tx).run());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("herobar"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(handle.clone(), &config);
    let result = event_loop(&mut terminal, &mut app, &mut event_rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    handle.shutdown();
    if let Err(e) = runtime_task.await {
        warn!("Header runtime task ended abnormally: {}", e);
    }
    info!("Demo closed");

    result
}

async fn event_loop(
    terminal: &mut Term,
    app: &mut App,
    event_rx: &mut mpsc::UnboundedReceiver<HeaderEvent>,
) -> Result<()> {
    let size = terminal.size()?;
    app.resize(size.width, size.height)?;

    let event_handler = EventHandler::new(TICK_RATE_MS);

    loop {
        // Process header notifications (non-blocking)
        while let Ok(event) = event_rx.try_recv() {
            app.on_header_event(&event);
        }
        app.sync();

        terminal.draw(|frame| ui::draw(frame, app))?;

        if let Some(event) = event_handler.next()? {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, app);
                    apply_action(app, action)?;
                }
                AppEvent::Mouse(mouse) => apply_action(app, handle_mouse_event(mouse))?,
                AppEvent::Resize(width, height) => app.resize(width, height)?,
                AppEvent::Tick => app.on_tick()?,
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
