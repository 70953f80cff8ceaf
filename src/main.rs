mod app;
mod config;
mod form;
mod theme;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use config::AppConfig;
use theme::Theme;

#[derive(Parser, Debug)]
#[command(name = "contactform")]
#[command(version)]
#[command(about = "A terminal contact form with inline validation")]
struct Args {
    /// Load configuration from this file instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Event poll interval in milliseconds (overrides the config file)
    #[arg(short, long)]
    tick_rate: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (stderr, so it stays off the alternate screen)
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref());
    if let Some(ms) = args.tick_rate {
        config.tick_rate_ms = ms;
    }

    ui::init_theme(Theme::load(config.theme_file.as_deref()));

    run_tui(config).await
}

async fn run_tui(config: AppConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let tick_rate = Duration::from_millis(app.config.tick_rate_ms.max(1));

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(app.poll_timeout(tick_rate))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc => return Ok(()),
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => app.handle_key(key),
                    }
                }
            }
        }

        // Apply a finished success window, expire status messages
        app.tick();
    }
}
