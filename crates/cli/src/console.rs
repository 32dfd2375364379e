//! Terminal stand-ins for the browser ports.
//!
//! [`ConsoleBrowser`] prints the navigation it would perform instead of
//! driving a real browser; [`ConsoleListener`] prints user-facing messages.

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use linking::{BrowserError, BrowserHost, NavigationError, NavigationListener, PlaceholderTab};

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

fn emit(out: &SharedWriter, line: &str) -> Result<(), BrowserError> {
    let mut out = out.lock().unwrap_or_else(PoisonError::into_inner);
    writeln!(out, "{line}").map_err(|e| BrowserError::new(e.to_string()))
}

/// A [`BrowserHost`] that writes one line per browser action.
#[derive(Clone)]
pub struct ConsoleBrowser {
    out: SharedWriter,
}

impl ConsoleBrowser {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(out))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl BrowserHost for ConsoleBrowser {
    fn open_blank_tab(&self) -> Option<Box<dyn PlaceholderTab>> {
        emit(&self.out, "open about:blank").ok()?;
        Some(Box::new(ConsoleTab {
            out: Arc::clone(&self.out),
        }))
    }

    fn click_anchor(&self, url: &str) -> Result<(), BrowserError> {
        emit(&self.out, &format!("click {url}"))
    }
}

struct ConsoleTab {
    out: SharedWriter,
}

impl PlaceholderTab for ConsoleTab {
    fn set_location(&mut self, url: &str) -> Result<(), BrowserError> {
        emit(&self.out, &format!("redirect {url}"))
    }

    fn close(self: Box<Self>) {
        // Nothing to report to if the terminal is gone.
        let _ = emit(&self.out, "close");
    }
}

/// Prints navigation problems to stderr.
pub struct ConsoleListener;

impl NavigationListener for ConsoleListener {
    fn on_error(&self, error: &NavigationError) {
        eprintln!("error: {error}");
    }

    fn on_warning(&self, message: &str) {
        eprintln!("warning: {message}");
    }
}
