//! TrackiFi onboarding wizard
//!
//! A terminal walk-through that creates a TrackiFi account in three steps:
//! credentials, income details, and a first financial goal. Each step is
//! validated before moving on, and the final step hands the collected data
//! to the account service.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::info;

use trackifi_onboarding::application::App;
use trackifi_onboarding::infrastructure::{
    init_logging, ConfigOverrides, SimulatedAccountService, WizardConfig,
};
use trackifi_onboarding::presentation::{render_ui, InputHandler};

/// How long the event loop waits for input before redrawing.
const TICK_RATE: Duration = Duration::from_millis(100);

#[derive(Debug, Parser)]
#[command(name = "trackifi-onboarding", version, about = "Create a TrackiFi account from the terminal")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulated account-creation delay in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Directory for the log file
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `trackifi_onboarding=trace`
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            submission_delay_ms: self.delay_ms,
            log_directory: self.log_dir.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

/// Entry point for the onboarding wizard.
///
/// Loads configuration, starts file logging, sets up the terminal and runs
/// the event loop until the user quits.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the log file cannot be
/// opened, or the terminal cannot be set up.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = WizardConfig::load(cli.config.as_deref())?.with_overrides(cli.overrides())?;

    let _log_guard = init_logging(&config.log_directory(), &config.logging.level)?;
    info!(
        delay_ms = config.submission_delay_ms,
        brand = %config.brand_name,
        "starting onboarding wizard"
    );

    let service = Arc::new(SimulatedAccountService::new(config.submission_delay()));
    let mut app = App::new(service, config.brand_name.clone());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    info!(complete = app.form.is_complete(), "onboarding wizard closed");
    Ok(())
}

/// Main application event loop.
///
/// Redraws on every tick so the submission spinner animates, and forwards
/// key presses and pastes to the input handler.
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(TICK_RATE)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    InputHandler::handle_key_event(app, key.code, key.modifiers);
                }
                Event::Paste(text) => InputHandler::handle_paste(app, &text),
                _ => {}
            }
        }

        app.on_tick();

        if app.should_quit {
            return Ok(());
        }
    }
}
