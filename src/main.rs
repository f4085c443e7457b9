// ABOUTME: Main entry point for analysis-wizard with TUI and CLI support
//
// Binary: analysis-wizard
// Usage: analysis-wizard [COMMAND]
// - No command: launches the wizard TUI
// - submit: run the wizard headlessly and submit once
// - config: print or initialise configuration

#![allow(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::Backend, prelude::*};
use std::{
    io::{self, IsTerminal},
    time::{Duration, Instant},
};

mod cli;

use analysis_wizard::app::{App, AppEvent, EventHandler};
use analysis_wizard::components::WizardComponent;
use analysis_wizard::config::AppConfig;
use analysis_wizard::transport;

/// Terminal cleanup utility to ensure proper restoration
fn cleanup_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste);
}

/// Unified terminal cleanup that works with a terminal instance
fn cleanup_terminal_with_instance<B: Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    match args.command {
        // Headless commands keep stdout for their output
        Some(cli::Commands::Submit(_)) => setup_stderr_logging(),
        Some(cli::Commands::Config(_)) => {}
        Some(cli::Commands::Tui) | None => {
            setup_logging()?;
            setup_panic_handler();
        }
    }

    let mut config = AppConfig::load(args.config.as_deref())?;
    if args.strict_file_size {
        config.wizard.enforce_file_size_limit = true;
    }

    match args.command {
        Some(cli::Commands::Submit(submit_args)) => {
            cli::submit::execute(submit_args, args.format, &config).await
        }
        Some(cli::Commands::Config(config_args)) => cli::config::execute(config_args, &config),

        // TUI mode (explicit or default)
        Some(cli::Commands::Tui) | None => {
            let transport = transport::from_config(&config.submission)?;
            let mut app = App::new(&config, transport);
            app.init();

            // Flush any pending terminal events so stray keypresses don't land in step 1
            while crossterm::event::poll(Duration::from_millis(10)).unwrap_or(false) {
                let _ = crossterm::event::read();
            }

            let result = run_tui(&mut app, Duration::from_millis(config.ui.tick_rate_ms)).await;
            app.shutdown();

            // Ensure terminal is cleaned up on any error
            if result.is_err() {
                cleanup_terminal();
            }
            result
        }
    }
}

async fn run_tui(app: &mut App, tick_rate: Duration) -> Result<()> {
    // Check if we have a proper TTY
    if !IsTerminal::is_terminal(&io::stdout()) {
        return Err(anyhow::anyhow!(
            "No TTY detected. This application requires a terminal.\n\
             Use `analysis-wizard submit` for non-interactive submissions."
        ));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_tui_loop(app, &mut terminal, tick_rate).await;

    // Always clean up terminal using unified cleanup
    if let Err(e) = cleanup_terminal_with_instance(&mut terminal) {
        tracing::error!("Failed to cleanup terminal: {}", e);
        // Fallback to basic cleanup
        cleanup_terminal();
    }

    result
}

async fn run_tui_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    tick_rate: Duration,
) -> Result<()> {
    let component = WizardComponent::new();
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| {
            let area = frame.size();
            component.render(frame, area, &app.state);
        })?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            match event::read()? {
                Event::Key(key_event) => {
                    if let Some(app_event) = EventHandler::handle_key_event(key_event, &app.state)
                    {
                        EventHandler::process_event(app_event, &mut app.state);
                    }
                }
                Event::Paste(text) => {
                    EventHandler::process_event(AppEvent::PasteText(text), &mut app.state);
                }
                Event::Resize(_, _) => {
                    // Redrawn on the next iteration
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        if app.state.should_quit {
            tracing::info!("Quit requested");
            break;
        }

        // Let spawned submission and reveal tasks make progress
        tokio::task::yield_now().await;
    }

    Ok(())
}

fn setup_logging() -> Result<()> {
    use std::fs::OpenOptions;
    use tracing_subscriber::prelude::*;

    let log_dir = AppConfig::base_dir()
        .map(|dir| dir.join("logs"))
        .unwrap_or_else(|_| std::path::PathBuf::from(".analysis-wizard/logs"));

    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    // Create JSONL log file with timestamp
    let log_file = log_dir.join(format!(
        "analysis-wizard-{}.jsonl",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()             // Output in JSON Lines format
                .with_target(true)  // Include target module in JSON
                .with_writer(file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "analysis_wizard=info".into()),
        )
        .init();

    Ok(())
}

/// Compact logs on stderr for headless commands; quiet unless RUST_LOG says otherwise
fn setup_stderr_logging() {
    use tracing_subscriber::prelude::*;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "analysis_wizard=warn".into()),
        )
        .init();
}

fn setup_panic_handler() {
    use tracing::error;

    std::panic::set_hook(Box::new(|panic_info| {
        // Ensure terminal is restored before logging the panic
        cleanup_terminal();

        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
