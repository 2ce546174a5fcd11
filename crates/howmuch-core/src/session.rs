//! Interactive query session
//!
//! A front end feeds every edit of its single text box to [`Session::input`]
//! and calls [`Session::poll_apology`] from its event loop. When typed text
//! stays unrecognized for [`APOLOGY_DELAY`] after the last edit, the poll
//! reports that an apology should be shown.

use std::time::{Duration, Instant};

use crate::{Engine, Query};

/// Grace period before an unrecognized unit earns an apology
pub const APOLOGY_DELAY: Duration = Duration::from_secs(5);

/// A cancellable delayed task.
///
/// Scheduling replaces any pending deadline, so of a burst of edits only
/// the last one can fire.
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// (Re)start the delay from `now`
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True once when the deadline has passed; the task is then spent
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// State of one text box: last input, whether results are showing, and
/// the pending apology
pub struct Session {
    engine: Engine,
    text: Option<String>,
    results_shown: bool,
    apology: Debounce,
}

impl Session {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            text: None,
            results_shown: false,
            apology: Debounce::new(APOLOGY_DELAY),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The text last passed to [`Session::input`]
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Whether the last input produced an answer
    pub fn results_shown(&self) -> bool {
        self.results_shown
    }

    /// Run one query for new input text.
    ///
    /// Returns `None` when the text has not changed since the last call.
    /// Input with a number and unit text (re)schedules the apology,
    /// whether or not the unit is recognized.
    pub fn input(&mut self, text: &str, now: Instant) -> Option<Query<'_>> {
        if self.text.as_deref() == Some(text) {
            return None;
        }
        self.text = Some(text.to_string());

        let query = self.engine.query(text);
        match &query {
            Query::Incomplete => {}
            Query::Unrecognized { .. } | Query::Answer(_) => self.apology.schedule(now),
        }
        self.results_shown = query.is_answer();
        Some(query)
    }

    /// Whether the apology for unrecognized input is due now.
    ///
    /// Fires at most once per scheduled deadline, and only when no results
    /// are showing and the text box is not blank.
    pub fn poll_apology(&mut self, now: Instant) -> bool {
        self.apology.fire(now) && !self.results_shown && !self.text().trim().is_empty()
    }

    /// The input text encoded for a URL fragment, while results are showing
    pub fn share_fragment(&self) -> Option<String> {
        self.results_shown.then(|| encode_fragment(self.text()))
    }
}

/// Percent-encode text the way `encodeURIComponent` does
pub fn encode_fragment(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Decode a URL fragment (with or without its leading `#`).
///
/// Returns `None` for malformed escapes or bytes that are not UTF-8.
pub fn decode_fragment(fragment: &str) -> Option<String> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    let bytes = fragment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = fragment.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
