//! Terminal output for the polished CLI.
//!
//! Status lines go to stderr with a right-aligned verb column. Stdout is
//! left for `--json` output.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const CYAN: &str = "\x1b[36m";

/// Width of the verb column.
const VERB_WIDTH: usize = 12;

/// Colour of a status verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Note,
    Caution,
    Bad,
}

impl Tone {
    fn code(self) -> &'static str {
        match self {
            Tone::Good => "\x1b[32m",
            Tone::Note => CYAN,
            Tone::Caution => "\x1b[33m",
            Tone::Bad => "\x1b[31m",
        }
    }
}

/// Status printer. Colour is on when stderr is a terminal.
pub struct Printer {
    color: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
        }
    }

    /// Printer that never emits escape codes.
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// e.g. "     Checked maps/Route1.blk"
    pub fn status(&self, verb: &str, message: &str) {
        self.emit(&self.line(Tone::Good, verb, message));
    }

    pub fn success(&self, verb: &str, message: &str) {
        self.status(verb, message);
    }

    pub fn info(&self, verb: &str, message: &str) {
        self.emit(&self.line(Tone::Note, verb, message));
    }

    pub fn warning(&self, verb: &str, message: &str) {
        self.emit(&self.line(Tone::Caution, verb, message));
    }

    pub fn error(&self, verb: &str, message: &str) {
        self.emit(&self.line(Tone::Bad, verb, message));
    }

    /// Indented dim line under the previous status line.
    pub fn detail(&self, message: &str) {
        let line = format!("{:VERB_WIDTH$} {}", "", self.paint(DIM, message));
        self.emit(&line);
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    /// Paths and other values.
    pub fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }

    /// One status line, verb right-aligned in its column.
    pub fn line(&self, tone: Tone, verb: &str, message: &str) -> String {
        let verb = format!("{verb:>VERB_WIDTH$}");
        if self.color {
            format!("{BOLD}{}{verb}{RESET} {message}", tone.code())
        } else {
            format!("{verb} {message}")
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_owned()
        }
    }

    fn emit(&self, line: &str) {
        // Nothing useful to do if stderr is gone
        let _ = writeln!(io::stderr().lock(), "{line}");
    }
}

/// `plural(1, "block", "blocks")` gives "1 block".
pub fn plural(n: usize, singular: &str, plural: &str) -> String {
    let noun = if n == 1 { singular } else { plural };
    format!("{n} {noun}")
}

/// Path relative to the working directory when it is inside it.
pub fn display_path(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf));
    match relative {
        Some(rel) if rel.as_os_str().is_empty() => ".".to_owned(),
        Some(rel) => rel.display().to_string(),
        None => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "block", "blocks"), "1 block");
        assert_eq!(plural(0, "block", "blocks"), "0 blocks");
        assert_eq!(plural(256, "tile", "tiles"), "256 tiles");
    }

    #[test]
    fn test_plain_line_aligns_verb() {
        let printer = Printer::plain();
        assert_eq!(
            printer.line(Tone::Good, "Resized", "Route1.blk to 3x2"),
            "     Resized Route1.blk to 3x2"
        );
        assert_eq!(printer.bold("johto"), "johto");
        assert_eq!(printer.cyan("maps/Route1.blk"), "maps/Route1.blk");
    }

    #[test]
    fn test_coloured_line() {
        let printer = Printer { color: true };
        let line = printer.line(Tone::Bad, "error", "no blocks");
        assert!(line.starts_with("\x1b[1m\x1b[31m"));
        assert!(line.ends_with("\x1b[0m no blocks"));
    }

    #[test]
    fn test_display_path() {
        let p = Path::new("/nonexistent/maps/Route1.blk");
        assert_eq!(display_path(p), "/nonexistent/maps/Route1.blk");

        let cwd = std::env::current_dir().unwrap();
        assert_eq!(display_path(&cwd), ".");
        assert_eq!(display_path(&cwd.join("maps/Route1.blk")), "maps/Route1.blk");
    }
}
