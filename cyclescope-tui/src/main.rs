//! CycleScope TUI — six-panel terminal dashboard for market-cycle signals.
//!
//! Panels:
//! 1. Chart — score lines, thresholds, oversold/overbought regions
//! 2. Indicators — selection, per-line visibility, average switches
//! 3. Parameters — per-indicator parameter overrides
//! 4. ROC Table — rate-of-change rows in display order
//! 5. Presets — named configuration store
//! 6. Help — keyboard shortcuts and documentation
//!
//! Scores come from a computation service: the HTTP endpoint named by
//! `CYCLESCOPE_URL`, or a built-in synthetic service when unset.

mod app;
mod input;
mod persistence;
mod sample_data;
mod theme;
mod ui;
mod worker;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use cyclescope_core::service::{ComputeService, HttpComputeService};

use crate::app::{AppState, ErrorCategory};
use crate::sample_data::SyntheticComputeService;
use crate::worker::{WorkerCommand, WorkerResponse};

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Paths
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cyclescope");
    let preset_path = config_dir.join("presets.json");
    let state_path = config_dir.join("session.json");

    // Service: remote endpoint if configured, synthetic otherwise.
    let service_url = std::env::var("CYCLESCOPE_URL").ok();
    let service: Box<dyn ComputeService> = match &service_url {
        Some(url) => Box::new(HttpComputeService::new(url.clone())),
        None => Box::new(SyntheticComputeService::new()),
    };

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle = worker::spawn_worker(service, cmd_rx, resp_tx);

    // Build app state
    let mut app = AppState::new(cmd_tx.clone(), resp_rx, preset_path.clone(), state_path.clone());
    match &service_url {
        Some(url) => app.set_status(format!("Using computation service at {url}")),
        None => app.set_status("Using built-in synthetic data (set CYCLESCOPE_URL for live)"),
    }

    // Restore the previous session and the preset store.
    app.presets.entries = persistence::load_presets(&preset_path);
    if let Some(session) = persistence::load_session(&state_path) {
        persistence::apply(&mut app, session);
    }

    // Kick off the descriptor fetch; the first recompute follows it.
    let _ = cmd_tx.send(WorkerCommand::FetchDescriptors);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the main event loop
    let result = run_app(&mut terminal, &mut app);

    // Save session before exit
    let session = persistence::extract(&app);
    let _ = persistence::save_session(&state_path, &session);

    // Shutdown worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            handle_worker_response(app, resp);
        }

        // 3. Fire any due debounced recompute
        app.tick(Instant::now());

        // 4. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 5. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}

fn handle_worker_response(app: &mut AppState, resp: WorkerResponse) {
    match resp {
        WorkerResponse::Descriptors(descriptors) => {
            app.set_status(format!("Loaded {} indicators", descriptors.len()));
            app.set_descriptors(descriptors);
        }
        WorkerResponse::DescriptorsFailed { error } => {
            app.push_error(
                ErrorCategory::Network,
                format!("Failed to load indicators: {error}"),
                "descriptors".into(),
            );
        }
        WorkerResponse::RecomputeDone { seq, data, roc } => {
            app.apply_compute(seq, data, roc);
        }
        WorkerResponse::RecomputeFailed { seq, error } => {
            app.compute_failed(seq, error);
        }
    }
}
