//! Symbol table, layout engine and declaration checks.
//!
//! - `SymbolTable`: one flat namespace of `Symbol`s with kind-checked lookups
//! - `layout`: packed byte sizes, self-reference detection and flattening of
//!   user aggregates
//! - `DeclarationChecker`: registers parsed declarations and reports
//!   redefinitions, unresolved types and slot conflicts

mod check;
pub mod layout;
mod symbols;

pub use check::DeclarationChecker;
pub use layout::{byte_size, calculate_size, is_recursive, unroll, LayoutError};
pub use symbols::{ProgramSymbol, ResolveError, Symbol, SymbolKind, SymbolTable};
