//! Output sinks for collected diagnostics.

mod terminal;

pub use terminal::{ColorMode, TerminalEmitter};

use crate::Diagnostic;

/// Something that can present diagnostics to a user.
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: &Diagnostic);

    /// Emit `diagnostics` in order.
    fn emit_all(&mut self, diagnostics: &[Diagnostic]) {
        diagnostics.iter().for_each(|d| self.emit(d));
    }

    fn flush(&mut self);

    /// Closing line reporting how many errors and warnings the run produced.
    /// Prints nothing when both are zero.
    fn emit_summary(&mut self, error_count: usize, warning_count: usize);
}
