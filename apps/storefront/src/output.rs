//! Output formatting for the CLI.
//!
//! Human-readable text on stdout by default; with `--json` every command
//! prints its result as one JSON document instead.

use serde::Serialize;

use crate::error::AppError;

/// Output handler for command results and messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Output { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Prints a command result: `value` as JSON, or the rendered text.
    pub fn emit<T: Serialize>(&self, value: &T, render: impl FnOnce() -> String) {
        if self.json {
            match serde_json::to_string_pretty(value) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("{}", AppError::internal(e.to_string())),
            }
        } else {
            println!("{}", render());
        }
    }

    /// Prints a success line. Silent in JSON mode.
    pub fn success(&self, msg: &str) {
        if !self.json {
            println!("✓ {msg}");
        }
    }

    /// Prints a warning on stderr. Silent in JSON mode.
    pub fn warn(&self, msg: &str) {
        if !self.json {
            eprintln!("⚠ {msg}");
        }
    }

    /// Prints a failed command's error on stderr.
    pub fn error(&self, err: &AppError) {
        if self.json {
            if let Ok(json) = serde_json::to_string(err) {
                eprintln!("{json}");
                return;
            }
        }
        eprintln!("✗ {err}");
    }
}
