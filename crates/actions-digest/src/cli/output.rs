//! Terminal styling and the global output switches.
//!
//! Status lines go to stderr so stdout stays clean for reports piped
//! elsewhere. `--json`, `--quiet`, `--verbose` and `--no-color` are set as
//! environment variables by `main` and read back here.

use crate::model::Conclusion;
use std::io::IsTerminal;

pub const ENV_JSON: &str = "ACTIONS_DIGEST_JSON";
pub const ENV_QUIET: &str = "ACTIONS_DIGEST_QUIET";
pub const ENV_VERBOSE: &str = "ACTIONS_DIGEST_VERBOSE";
pub const ENV_NO_COLOR: &str = "ACTIONS_DIGEST_NO_COLOR";

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Whether stderr output should carry ANSI colors.
pub fn color_enabled() -> bool {
    // https://no-color.org/
    let disabled = [ENV_NO_COLOR, "NO_COLOR"]
        .iter()
        .any(|key| std::env::var_os(key).is_some());
    !disabled && std::io::stderr().is_terminal()
}

/// A status glyph with its colored and plain renderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Ok,
    Fail,
    Warn,
    Info,
}

impl Mark {
    fn parts(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Mark::Ok => (GREEN, "\u{2713}", "OK"),
            Mark::Fail => (RED, "\u{2717}", "!!"),
            Mark::Warn => (YELLOW, "\u{26a0}", "??"),
            Mark::Info => (BLUE, "\u{25cb}", "--"),
        }
    }
}

/// Colored string builder.
#[derive(Debug, Clone, Copy)]
pub struct Styled {
    use_color: bool,
}

impl Default for Styled {
    fn default() -> Self {
        Self::new()
    }
}

impl Styled {
    pub fn new() -> Self {
        Self::with_color(color_enabled())
    }

    pub fn with_color(use_color: bool) -> Self {
        Self { use_color }
    }

    pub fn mark(&self, mark: Mark) -> String {
        let (code, glyph, plain) = mark.parts();
        if self.use_color {
            format!("{code}{glyph}{RESET}")
        } else {
            plain.to_string()
        }
    }

    pub fn ok_sym(&self) -> String {
        self.mark(Mark::Ok)
    }

    pub fn fail_sym(&self) -> String {
        self.mark(Mark::Fail)
    }

    pub fn warn_sym(&self) -> String {
        self.mark(Mark::Warn)
    }

    pub fn info_sym(&self) -> String {
        self.mark(Mark::Info)
    }

    /// Glyph for a step outcome: failures fail, cancellations warn.
    pub fn outcome_sym(&self, conclusion: Conclusion) -> String {
        self.mark(match conclusion {
            Conclusion::Success => Mark::Ok,
            Conclusion::Failure => Mark::Fail,
            Conclusion::Cancelled => Mark::Warn,
            Conclusion::Skipped | Conclusion::Unknown => Mark::Info,
        })
    }

    fn paint(&self, code: &str, s: &str) -> String {
        if self.use_color {
            format!("{code}{s}{RESET}")
        } else {
            s.to_string()
        }
    }

    pub fn green(&self, s: &str) -> String {
        self.paint(GREEN, s)
    }

    pub fn red(&self, s: &str) -> String {
        self.paint(RED, s)
    }

    pub fn yellow(&self, s: &str) -> String {
        self.paint(YELLOW, s)
    }

    pub fn dim(&self, s: &str) -> String {
        self.paint(DIM, s)
    }

    pub fn bold(&self, s: &str) -> String {
        self.paint(BOLD, s)
    }
}

/// `actions-digest vX.Y.Z` banner.
pub fn print_header(s: &Styled) {
    let version = format!("v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("  {} {}\n", s.bold("actions-digest"), s.dim(&version));
}

pub fn print_section(s: &Styled, title: &str) {
    eprintln!("  {}", s.bold(title));
}

/// One aligned `symbol label value` row under a section.
pub fn print_check(symbol: &str, label: &str, value: &str) {
    eprintln!("    {symbol} {label:<16} {value}");
}

pub fn print_status(s: &Styled, status: &str, msg: &str) {
    eprintln!("\n  {}: {status} ({msg})", s.bold("Status"));
}

fn flag_set(key: &str) -> bool {
    std::env::var_os(key).is_some()
}

pub fn is_quiet() -> bool {
    flag_set(ENV_QUIET)
}

pub fn is_verbose() -> bool {
    flag_set(ENV_VERBOSE)
}

pub fn is_json() -> bool {
    flag_set(ENV_JSON)
}

/// Pretty-print `value` to stdout.
pub fn print_json(value: &serde_json::Value) {
    if let Ok(s) = serde_json::to_string_pretty(value) {
        println!("{s}");
    }
}
