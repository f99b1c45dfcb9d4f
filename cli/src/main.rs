mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    event::{EnableMouseCapture, DisableMouseCapture},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use directories::ProjectDirs;
use dragnotes_core::storage::SqliteNoteStore;
use dragnotes_tui::config::load_config;
use dragnotes_tui::{App, EventHandler};
use log::{error, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;

/// Grid of short notes; drag a note onto the bin to delete it
#[derive(Parser, Debug)]
#[command(name = "dragnotes", version)]
struct Cli {
    /// Path to the notes database
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(short = 'c', long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to the log file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

struct Paths {
    db: PathBuf,
    config: PathBuf,
    log_file: PathBuf,
}

impl Cli {
    /// Fill unset paths from the platform data and config directories,
    /// falling back to the working directory
    fn resolve_paths(self) -> Paths {
        let dirs = ProjectDirs::from("", "", "dragnotes");
        let data_dir = dirs
            .as_ref()
            .map(|d| d.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        let config_dir = dirs
            .as_ref()
            .map(|d| d.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let db = self.db.unwrap_or_else(|| data_dir.join("notes.db"));
        let log_file = self.log_file.unwrap_or_else(|| {
            db.parent()
                .map(|p| p.join("dragnotes.log"))
                .unwrap_or_else(|| PathBuf::from("dragnotes.log"))
        });
        Paths {
            db,
            config: self.config.unwrap_or_else(|| config_dir.join("config.toml")),
            log_file,
        }
    }
}

fn main() -> Result<()> {
    let paths = Cli::parse().resolve_paths();
    logging::init_logging(&paths.log_file)?;

    let config = load_config(&paths.config)?;
    let store = SqliteNoteStore::open(&paths.db)
        .with_context(|| format!("Failed to open notes database {}", paths.db.display()))?;
    info!("Using notes database {}", store.path().display());

    // Create app before touching the terminal so setup errors print normally
    let mut app = App::new(Box::new(store), config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create event handler
    let event_handler = EventHandler::new(250); // 250ms tick rate

    // Main loop
    let result = run_app(&mut terminal, &mut app, &event_handler);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!("Exiting after error: {:?}", err);
        eprintln!("Error: {:?}", err);
    }
    info!("Shutting down");

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_handler: &EventHandler,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| dragnotes_tui::ui::render(f, app))?;

        // Handle events
        match event_handler.next()? {
            dragnotes_tui::Event::Key(key) => {
                dragnotes_tui::event::handle_key_event(key, app);
            }
            dragnotes_tui::Event::Mouse(mouse) => {
                dragnotes_tui::event::handle_mouse_event(mouse, app);
            }
            dragnotes_tui::Event::Tick => {
                app.tick();
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_paths_win() {
        let cli = Cli::parse_from([
            "dragnotes",
            "--db",
            "/tmp/x/notes.db",
            "--config",
            "/tmp/x/c.toml",
        ]);
        let paths = cli.resolve_paths();
        assert_eq!(paths.db, PathBuf::from("/tmp/x/notes.db"));
        assert_eq!(paths.config, PathBuf::from("/tmp/x/c.toml"));
        assert_eq!(paths.log_file, PathBuf::from("/tmp/x/dragnotes.log"));
    }

    #[test]
    fn test_default_db_name() {
        let paths = Cli::parse_from(["dragnotes"]).resolve_paths();
        assert!(paths.db.ends_with("notes.db"));
        assert!(paths.config.ends_with("config.toml"));
    }
}
