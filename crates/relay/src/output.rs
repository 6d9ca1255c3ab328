//! Styled terminal output for the token walk and server startup.

use console::{Term, style};

/// Width of banner separator lines.
const SEPARATOR_WIDTH: usize = 70;

/// Terminal output formatter. Writes to stderr so piped stdout stays clean
/// for the verifier prompt.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    /// Print a plain message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&style(msg).green().to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&style(msg).yellow().to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&style(msg).red().to_string());
    }

    /// Print a highlighted message (cyan bold), e.g. the authorization URL.
    pub(crate) fn highlight(&self, msg: &str) {
        let _ = self.term.write_line(&style(msg).cyan().bold().to_string());
    }

    /// Print a separator line.
    pub(crate) fn separator(&self) {
        let _ = self.term.write_line(&"=".repeat(SEPARATOR_WIDTH));
    }

    /// Print a title between separator lines.
    pub(crate) fn banner(&self, title: &str) {
        self.separator();
        self.highlight(title);
        self.separator();
    }
}
