//! howmuch TUI - type a quantity, see it in other units and next to familiar things

mod app;
mod popups;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use app::App;
use clap::Parser;
use directories::ProjectDirs;
use howmuch_core::load::{load_catalog, TableSource};
use howmuch_core::session::decode_fragment;
use howmuch_core::Catalog;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Quantity to start with, or a shared "#..." fragment
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// Units table (path or http(s) URL)
    #[arg(long, env = "HOWMUCH_UNITS", value_name = "SOURCE", requires = "comparisons")]
    units: Option<TableSource>,

    /// Comparisons table (path or http(s) URL)
    #[arg(long, env = "HOWMUCH_COMPARISONS", value_name = "SOURCE", requires = "units")]
    comparisons: Option<TableSource>,
}

type LoadResult = std::result::Result<Catalog, String>;

fn main() -> Result<()> {
    let args = Args::parse();

    let initial = args.text.as_deref().map(|text| {
        if text.starts_with('#') {
            decode_fragment(text).unwrap_or_default()
        } else {
            text.to_string()
        }
    });
    let path = ProjectDirs::from("rs", "howmuch", "howmuch")
        .map(|proj_dirs| proj_dirs.config_dir().join("last_input"));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(path, initial);

    // Load both tables off the UI thread
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(load(args.units, args.comparisons));
    });

    let res = run_app(&mut terminal, &mut app, rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = app.save() {
        eprintln!("Error saving input: {err}");
    }
    if let Err(err) = res {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn load(units: Option<TableSource>, comparisons: Option<TableSource>) -> LoadResult {
    let (Some(units), Some(comparisons)) = (units, comparisons) else {
        return Catalog::builtin().map_err(|e| e.to_string());
    };
    let rt = tokio::runtime::Runtime::new().map_err(|e| e.to_string())?;
    rt.block_on(load_catalog(&units, &comparisons))
        .map_err(|e| e.to_string())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<LoadResult>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let now = Instant::now();
        if let Ok(result) = rx.try_recv() {
            app.catalog_loaded(result, now);
        }
        app.tick(now);

        // Poll for events
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let now = Instant::now();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if app.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q')) {
                app.toggle_help();
            }
            continue;
        }

        match key.code {
            KeyCode::Esc => return Ok(()),
            KeyCode::Char('c') if ctrl => return Ok(()),
            KeyCode::Char('u') if ctrl => app.clear_input(now),
            KeyCode::Char('s') if ctrl => match app.save() {
                Ok(()) => app.set_status("Saved"),
                Err(e) => app.set_status(&format!("Error saving: {e}")),
            },
            KeyCode::F(1) => app.toggle_help(),
            KeyCode::Char(c) if !ctrl => app.insert_char(c, now),
            KeyCode::Backspace => app.delete_char(now),
            KeyCode::Delete => app.delete_char_forward(now),
            KeyCode::Left => app.move_left(),
            KeyCode::Right => app.move_right(),
            KeyCode::Home => app.move_to_start(),
            KeyCode::End => app.move_to_end(),
            _ => {}
        }
    }
}
