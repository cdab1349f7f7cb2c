//! Collects the diagnostics of a link run.
//!
//! Programs link independently, possibly on worker threads. Each worker
//! fills a [`DiagnosticQueue::fork`] of the run's queue and the run merges
//! them back in program order, so output does not depend on scheduling.

use rustc_hash::FxHashSet;

use crate::{Diagnostic, ErrorGuaranteed, Severity};

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Errors kept for output; 0 keeps all. Errors past the limit still
    /// count toward [`DiagnosticQueue::error_count`].
    pub error_limit: usize,
    /// Drop a diagnostic equal to one already kept.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 100,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Keep everything, duplicates included.
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    kept: Vec<Diagnostic>,
    seen: FxHashSet<Diagnostic>,
    errors: usize,
    /// Errors counted in `errors` but not in `kept`.
    dropped_errors: usize,
    warnings: usize,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..DiagnosticQueue::default()
        }
    }

    /// An empty queue sharing this one's configuration.
    pub fn fork(&self) -> Self {
        Self::with_config(self.config.clone())
    }

    fn over_limit(&self) -> bool {
        self.config.error_limit != 0 && self.errors > self.config.error_limit
    }

    /// Queue `diag`. Returns `false` when it was a duplicate or an error
    /// past the limit.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        if self.config.deduplicate && self.seen.contains(&diag) {
            return false;
        }
        match diag.severity {
            Severity::Error => {
                self.errors += 1;
                if self.over_limit() {
                    self.dropped_errors += 1;
                    return false;
                }
            }
            Severity::Warning => self.warnings += 1,
            Severity::Note => {}
        }
        if self.config.deduplicate {
            self.seen.insert(diag.clone());
        }
        self.kept.push(diag);
        true
    }

    /// Queue an error. The returned proof is how phases abort a program.
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        debug_assert!(diag.is_error(), "emit_error with a {} diagnostic", diag.severity);
        self.add(diag);
        ErrorGuaranteed::new()
    }

    pub fn emit_warning(&mut self, diag: Diagnostic) {
        self.add(diag);
    }

    /// Append everything `other` collected, in its order.
    pub fn merge(&mut self, other: DiagnosticQueue) {
        for diag in other.kept {
            self.add(diag);
        }
        self.errors += other.dropped_errors;
        self.dropped_errors += other.dropped_errors;
    }

    pub fn limit_reached(&self) -> bool {
        self.config.error_limit != 0 && self.errors >= self.config.error_limit
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.errors)
    }

    /// Take the queued diagnostics ordered by location and reset the queue.
    ///
    /// Unlocated diagnostics sort first; ties keep the order they were added.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut out = std::mem::take(&mut self.kept);
        out.sort_by(|a, b| a.location.cmp(&b.location));
        *self = self.fork();
        out
    }

    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.kept.iter()
    }
}

#[cfg(test)]
mod tests;
