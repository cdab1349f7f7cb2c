//! Command handlers for the `fxc` CLI.
//!
//! Each submodule implements one command. Handlers that the binary calls
//! directly print their own errors and exit; the pieces they are built from
//! return `Result` so tests can drive them.

mod compile;
mod dump;

pub use compile::{compile_effect, compile_file, CompileError, CompileOptions, UsageError};
pub use dump::{dump_artifact, write_record};
