//! Application state and logic

use howmuch_core::{Catalog, Engine, Query, Session};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Error(String),
}

pub struct App {
    pub input: String,
    pub cursor: usize, // Character index into input
    pub session: Option<Session>,
    pub load_status: LoadStatus,
    pub load_start: Instant, // For loading animation
    pub apology: bool,
    pub path: Option<PathBuf>,
    pub status_message: Option<String>,
    pub status_start: Option<Instant>,
    pub show_help: bool,
}

/// Convert character index to byte index in a string
fn char_to_byte_idx(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

impl Default for App {
    fn default() -> Self {
        Self {
            input: String::new(),
            cursor: 0,
            session: None,
            load_status: LoadStatus::Loading,
            load_start: Instant::now(),
            apology: false,
            path: None,
            status_message: None,
            status_start: None,
            show_help: false,
        }
    }
}

impl App {
    /// Start with `initial` text, or whatever was saved at `path` last time
    pub fn new(path: Option<PathBuf>, initial: Option<String>) -> Self {
        let mut app = Self {
            path,
            ..Self::default()
        };
        match initial {
            Some(text) => app.set_input(text),
            None => {
                if let Some(p) = &app.path {
                    if p.exists() {
                        if let Err(e) = app.load() {
                            app.set_status(&format!("Failed to load last input: {e}"));
                        }
                    }
                }
            }
        }
        app
    }

    /// Load the last input from the file
    pub fn load(&mut self) -> io::Result<()> {
        if let Some(path) = &self.path {
            let content = fs::read_to_string(path)?;
            let text = content.lines().next().unwrap_or_default().to_string();
            self.set_input(text);
        }
        Ok(())
    }

    /// Save the input to the file
    pub fn save(&mut self) -> io::Result<()> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &self.input)?;
        }
        Ok(())
    }

    /// Install the catalog once the tables are loaded and answer
    /// whatever was typed meanwhile
    pub fn catalog_loaded(&mut self, result: Result<Catalog, String>, now: Instant) {
        match result {
            Ok(catalog) => {
                self.session = Some(Session::new(Engine::new(catalog)));
                self.load_status = LoadStatus::Ready;
                self.refresh(now);
            }
            Err(e) => self.load_status = LoadStatus::Error(e),
        }
    }

    /// The answer for the current input; `None` until the catalog is loaded
    pub fn query(&self) -> Option<Query<'_>> {
        self.session
            .as_ref()
            .map(|session| session.engine().query(&self.input))
    }

    /// Check whether the apology is due
    pub fn tick(&mut self, now: Instant) {
        if let Some(session) = &mut self.session {
            if session.poll_apology(now) {
                self.apology = true;
            }
        }
        self.clear_status_if_expired();
    }

    /// URL fragment for the current input, while results are showing
    pub fn share_fragment(&self) -> Option<String> {
        self.session.as_ref().and_then(Session::share_fragment)
    }

    /// Set a temporary status message
    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some(msg.to_string());
        self.status_start = Some(Instant::now());
    }

    /// Clear status message if it has expired
    /// "Saved" expires after 1.5s, others after 3s
    pub fn clear_status_if_expired(&mut self) {
        if let (Some(start), Some(msg)) = (self.status_start, &self.status_message) {
            let timeout_ms = if msg == "Saved" { 1500 } else { 3000 };
            if start.elapsed().as_millis() >= timeout_ms {
                self.status_message = None;
                self.status_start = None;
            }
        }
    }

    /// Toggle help popup
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn insert_char(&mut self, c: char, now: Instant) {
        let idx = char_to_byte_idx(&self.input, self.cursor);
        self.input.insert(idx, c);
        self.cursor += 1;
        self.refresh(now);
    }

    /// Backspace
    pub fn delete_char(&mut self, now: Instant) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = char_to_byte_idx(&self.input, self.cursor);
            self.input.remove(idx);
            self.refresh(now);
        }
    }

    pub fn delete_char_forward(&mut self, now: Instant) {
        if self.cursor < self.input.chars().count() {
            let idx = char_to_byte_idx(&self.input, self.cursor);
            self.input.remove(idx);
            self.refresh(now);
        }
    }

    pub fn clear_input(&mut self, now: Instant) {
        self.input.clear();
        self.cursor = 0;
        self.refresh(now);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    fn set_input(&mut self, text: String) {
        self.input = text;
        self.move_to_end();
        self.refresh(Instant::now());
    }

    /// Feed the input to the session; any edit withdraws the apology
    fn refresh(&mut self, now: Instant) {
        if let Some(session) = &mut self.session {
            if session.input(&self.input, now).is_some() {
                self.apology = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use howmuch_core::APOLOGY_DELAY;
    use std::time::Duration;

    fn loaded_app() -> App {
        let mut app = App::default();
        app.catalog_loaded(Catalog::builtin().map_err(|e| e.to_string()), Instant::now());
        app
    }

    fn type_text(app: &mut App, text: &str, now: Instant) {
        for c in text.chars() {
            app.insert_char(c, now);
        }
    }

    #[test]
    fn test_typed_before_load_is_answered_after() {
        let now = Instant::now();
        let mut app = App::default();
        type_text(&mut app, "2 km", now);
        assert!(app.query().is_none());

        app.catalog_loaded(Catalog::builtin().map_err(|e| e.to_string()), now);
        assert_eq!(app.load_status, LoadStatus::Ready);
        let query = app.query().unwrap();
        assert_eq!(query.answer().unwrap().unit.name, "kilometre");
        assert_eq!(app.share_fragment().as_deref(), Some("2%20km"));
    }

    #[test]
    fn test_load_error() {
        let mut app = App::default();
        app.catalog_loaded(Err("no such file".to_string()), Instant::now());
        assert_eq!(app.load_status, LoadStatus::Error("no such file".to_string()));
        assert!(app.session.is_none());
    }

    #[test]
    fn test_apology_after_delay() {
        let now = Instant::now();
        let mut app = loaded_app();
        type_text(&mut app, "3 wibbles", now);

        app.tick(now + Duration::from_secs(1));
        assert!(!app.apology);
        app.tick(now + APOLOGY_DELAY);
        assert!(app.apology);

        // Editing withdraws it
        app.delete_char(now + APOLOGY_DELAY);
        assert!(!app.apology);
    }

    #[test]
    fn test_no_apology_when_recognized() {
        let now = Instant::now();
        let mut app = loaded_app();
        type_text(&mut app, "3 miles", now);
        app.tick(now + APOLOGY_DELAY * 2);
        assert!(!app.apology);
    }

    #[test]
    fn test_cursor_editing() {
        let now = Instant::now();
        let mut app = loaded_app();
        type_text(&mut app, "2 m²", now);
        app.move_left();
        app.delete_char(now);
        assert_eq!(app.input, "2 ²");
        assert_eq!(app.cursor, 2);
        app.move_to_start();
        app.delete_char_forward(now);
        assert_eq!(app.input, " ²");
        app.move_to_end();
        assert_eq!(app.cursor, 2);
        app.clear_input(now);
        assert!(app.input.is_empty());
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("howmuch-tui-{}", std::process::id()));
        let mut app = App::new(Some(path.clone()), Some("12 furlongs".to_string()));
        app.save().unwrap();

        let restored = App::new(Some(path.clone()), None);
        assert_eq!(restored.input, "12 furlongs");
        assert_eq!(restored.cursor, 11);
        fs::remove_file(path).unwrap();
    }
}
