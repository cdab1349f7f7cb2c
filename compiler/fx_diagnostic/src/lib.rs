//! Diagnostic system for the effect linker.
//!
//! Every problem found while linking is reported as a `Diagnostic` with an
//! error code, a message, the source location of the offending declaration
//! and the item it belongs to. Diagnostics accumulate in a
//! `DiagnosticQueue` so one run surfaces every problem it can find.
//!
//! # Error Guarantees
//!
//! `ErrorGuaranteed` is type-level proof that at least one error was
//! emitted. Phases that can abort a program return
//! `Result<_, ErrorGuaranteed>`:
//!
//! ```text
//! let guarantee = queue.emit_error(diagnostic);
//! fn validate(...) -> Result<(), ErrorGuaranteed> { ... }
//! ```

mod diagnostic;
pub mod emitter;
mod error_code;
mod guarantee;
pub mod queue;

pub use diagnostic::{kind_mismatch, redefinition, unresolved, Diagnostic, Severity};
pub use error_code::{ErrorCode, Phase};
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
