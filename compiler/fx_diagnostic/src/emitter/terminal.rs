//! Plain text rendering of diagnostics for a terminal, with ANSI styling
//! when the output is interactive.
//!
//! ```text
//! error [E2002]: render state 'Opaque' is not defined
//!   --> solid.fx:12
//!   = in program 'Solid'
//!   = note: every program needs a RenderState row
//! ```

use std::fmt::Write as _;
use std::io;

use crate::{Diagnostic, Severity};

use super::DiagnosticEmitter;

/// When to style output with ANSI escapes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Style only when writing to a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn enabled(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Clone, Copy)]
enum Style {
    Error,
    Warning,
    Note,
    Code,
    Path,
}

impl Style {
    fn escape(self) -> &'static str {
        match self {
            Style::Error => "\x1b[1;31m",
            Style::Warning => "\x1b[1;33m",
            Style::Note => "\x1b[1;36m",
            Style::Code => "\x1b[1m",
            Style::Path => "\x1b[1;34m",
        }
    }

    fn for_severity(severity: Severity) -> Self {
        match severity {
            Severity::Error => Style::Error,
            Severity::Warning => Style::Warning,
            Severity::Note => Style::Note,
        }
    }
}

/// Writes diagnostics to any `io::Write`, one block per diagnostic.
///
/// Each block is rendered into a buffer first and written with a single
/// call, so blocks from concurrent writers to stderr do not interleave.
pub struct TerminalEmitter<W: io::Write> {
    out: W,
    styled: bool,
}

impl<W: io::Write> TerminalEmitter<W> {
    /// `is_tty` decides styling when `mode` is [`ColorMode::Auto`].
    pub fn with_color_mode(out: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            out,
            styled: mode.enabled(is_tty),
        }
    }

    fn paint(&self, buf: &mut String, style: Style, text: &str) {
        if self.styled {
            let _ = write!(buf, "{}{text}\x1b[0m", style.escape());
        } else {
            buf.push_str(text);
        }
    }

    fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut buf = String::new();
        self.paint(
            &mut buf,
            Style::for_severity(diagnostic.severity),
            &diagnostic.severity.to_string(),
        );
        buf.push(' ');
        self.paint(&mut buf, Style::Code, &format!("[{}]", diagnostic.code));
        let _ = writeln!(buf, ": {}", diagnostic.message);

        if let Some(location) = &diagnostic.location {
            buf.push_str("  --> ");
            self.paint(&mut buf, Style::Path, &location.to_string());
            buf.push('\n');
        }
        if let Some(context) = &diagnostic.context {
            let _ = writeln!(buf, "  = in {context}");
        }
        for note in &diagnostic.notes {
            buf.push_str("  = ");
            self.paint(&mut buf, Style::Code, "note");
            let _ = writeln!(buf, ": {note}");
        }
        buf.push('\n');
        buf
    }
}

fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

impl<W: io::Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        let block = self.render(diagnostic);
        let _ = self.out.write_all(block.as_bytes());
    }

    fn flush(&mut self) {
        let _ = self.out.flush();
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        let mut line = String::new();
        match (error_count, warning_count) {
            (0, 0) => return,
            (0, warnings) => {
                self.paint(&mut line, Style::Warning, "warning");
                let _ = writeln!(line, ": link finished with {}", count(warnings, "warning"));
            }
            (errors, 0) => {
                self.paint(&mut line, Style::Error, "error");
                let _ = writeln!(line, ": link failed with {}", count(errors, "error"));
            }
            (errors, warnings) => {
                self.paint(&mut line, Style::Error, "error");
                let _ = writeln!(
                    line,
                    ": link failed with {} and {}",
                    count(errors, "error"),
                    count(warnings, "warning")
                );
            }
        }
        let _ = self.out.write_all(line.as_bytes());
    }
}
