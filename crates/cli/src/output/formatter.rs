//! Output formatter for human-readable and JSON output
//!
//! In JSON mode stdout carries exactly one JSON document per command and
//! nothing else; colors and status marks are only used for humans.

use console::{Color, style};
use serde::Serialize;

use super::{ColorMode, OutputConfig};

/// Status mark printed in front of a human-readable message
#[derive(Debug, Clone, Copy)]
enum Mark {
    Ok,
    Err,
    Warn,
}

impl Mark {
    const fn symbol(self) -> &'static str {
        match self {
            Mark::Ok => "✓",
            Mark::Err => "✗",
            Mark::Warn => "⚠",
        }
    }

    const fn color(self) -> Color {
        match self {
            Mark::Ok => Color::Green,
            Mark::Err => Color::Red,
            Mark::Warn => Color::Yellow,
        }
    }

    /// Stream the mark is written to
    const fn on_stderr(self) -> bool {
        !matches!(self, Mark::Ok)
    }
}

/// Formatter for CLI output
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Output configuration this formatter was built from
    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    pub fn is_json(&self) -> bool {
        self.config.json
    }

    pub fn is_quiet(&self) -> bool {
        self.config.quiet
    }

    /// Whether stdout output is colored
    pub fn colors_enabled(&self) -> bool {
        self.colors_on(false)
    }

    fn colors_on(&self, stderr: bool) -> bool {
        if self.config.json {
            return false;
        }
        match self.config.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto if stderr => console::colors_enabled_stderr(),
            ColorMode::Auto => console::colors_enabled(),
        }
    }

    /// Prefix the first line with a mark and indent the rest under it
    ///
    /// rclone error output often spans several lines.
    fn marked(&self, mark: Mark, message: &str) -> String {
        let prefix = style(mark.symbol())
            .fg(mark.color())
            .force_styling(self.colors_on(mark.on_stderr()));
        let body = message.trim_end().replace('\n', "\n  ");
        format!("{prefix} {body}")
    }

    /// Report a completed operation on stdout
    pub fn success(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }
        println!("{}", self.marked(Mark::Ok, message));
    }

    /// Report a failure on stderr, even in quiet mode
    pub fn error(&self, message: &str) {
        if self.config.json {
            let error = serde_json::json!({ "error": message.trim_end() });
            eprintln!("{error}");
        } else {
            eprintln!("{}", self.marked(Mark::Err, message));
        }
    }

    pub fn warning(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }
        eprintln!("{}", self.marked(Mark::Warn, message));
    }

    /// Print a value as pretty JSON on stdout
    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => self.error(&format!("Could not serialize output: {e}")),
        }
    }

    /// Print a plain line unless quiet
    pub fn println(&self, message: &str) {
        if !self.config.quiet {
            println!("{message}");
        }
    }
}
