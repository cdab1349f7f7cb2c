//! Symbol table for effect declarations.
//!
//! Every named declaration lives in one flat namespace. A `Symbol` is a
//! closed variant over the declaration kinds, and lookups that expect a
//! particular kind go through fallible accessors instead of downcasts.
//!
//! # Design
//!
//! - `FxHashMap` keyed by name for O(1) lookup
//! - Registration never overwrites; the first definition wins

use std::fmt;

use fx_ir::{Function, Location, RenderState, Structure, Subroutine, Variable};
use rustc_hash::FxHashMap;

/// A program's entry in the symbol table. Program state itself lives in the linker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgramSymbol {
    pub name: String,
    pub location: Location,
}

/// A registered declaration.
#[derive(Clone, Debug, PartialEq)]
pub enum Symbol {
    Variable(Variable),
    Function(Function),
    Subroutine(Subroutine),
    Structure(Structure),
    Program(ProgramSymbol),
    RenderState(RenderState),
}

/// Discriminant of a [`Symbol`], for messages and kind checks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Variable,
    Function,
    Subroutine,
    Structure,
    Program,
    RenderState,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Function => "function",
            SymbolKind::Subroutine => "subroutine",
            SymbolKind::Structure => "structure",
            SymbolKind::Program => "program",
            SymbolKind::RenderState => "render state",
        };
        f.write_str(name)
    }
}

/// Failure to find a symbol of the expected kind.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("'{name}' is not defined")]
    Unresolved { name: String },
    #[error("'{name}' is a {found}, expected {expected}")]
    KindMismatch {
        name: String,
        expected: SymbolKind,
        found: SymbolKind,
    },
    #[error("'{name}' is already defined at {previous}")]
    Redefinition { name: String, previous: Location },
}

macro_rules! accessor {
    ($fn_name:ident, $variant:ident, $ty:ty) => {
        /// Borrow the declaration if this symbol has the expected kind.
        pub fn $fn_name(&self) -> Result<&$ty, ResolveError> {
            match self {
                Symbol::$variant(inner) => Ok(inner),
                other => Err(ResolveError::KindMismatch {
                    name: other.name().to_owned(),
                    expected: SymbolKind::$variant,
                    found: other.kind(),
                }),
            }
        }
    };
}

impl Symbol {
    pub fn kind(&self) -> SymbolKind {
        match self {
            Symbol::Variable(_) => SymbolKind::Variable,
            Symbol::Function(_) => SymbolKind::Function,
            Symbol::Subroutine(_) => SymbolKind::Subroutine,
            Symbol::Structure(_) => SymbolKind::Structure,
            Symbol::Program(_) => SymbolKind::Program,
            Symbol::RenderState(_) => SymbolKind::RenderState,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Symbol::Variable(v) => &v.name,
            Symbol::Function(f) => &f.name,
            Symbol::Subroutine(s) => &s.name,
            Symbol::Structure(s) => &s.name,
            Symbol::Program(p) => &p.name,
            Symbol::RenderState(r) => &r.name,
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            Symbol::Variable(v) => &v.location,
            Symbol::Function(f) => &f.location,
            Symbol::Subroutine(s) => &s.location,
            Symbol::Structure(s) => &s.location,
            Symbol::Program(p) => &p.location,
            Symbol::RenderState(r) => &r.location,
        }
    }

    accessor!(as_variable, Variable, Variable);
    accessor!(as_function, Function, Function);
    accessor!(as_subroutine, Subroutine, Subroutine);
    accessor!(as_structure, Structure, Structure);
    accessor!(as_program, Program, ProgramSymbol);
    accessor!(as_render_state, RenderState, RenderState);
}

/// Flat namespace of every declaration in one compilation.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    symbols: FxHashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a symbol under its name.
    ///
    /// Fails with `Redefinition` if the name is taken; the table is unchanged.
    pub fn register(&mut self, symbol: Symbol) -> Result<(), ResolveError> {
        if let Some(previous) = self.symbols.get(symbol.name()) {
            return Err(ResolveError::Redefinition {
                name: symbol.name().to_owned(),
                previous: previous.location().clone(),
            });
        }
        tracing::trace!(name = symbol.name(), kind = %symbol.kind(), "registered symbol");
        self.symbols.insert(symbol.name().to_owned(), symbol);
        Ok(())
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Look up a symbol of any kind.
    pub fn resolve(&self, name: &str) -> Result<&Symbol, ResolveError> {
        self.get(name).ok_or_else(|| ResolveError::Unresolved {
            name: name.to_owned(),
        })
    }

    pub fn resolve_structure(&self, name: &str) -> Result<&Structure, ResolveError> {
        self.resolve(name)?.as_structure()
    }

    pub fn resolve_function(&self, name: &str) -> Result<&Function, ResolveError> {
        self.resolve(name)?.as_function()
    }

    pub fn resolve_variable(&self, name: &str) -> Result<&Variable, ResolveError> {
        self.resolve(name)?.as_variable()
    }

    pub fn resolve_subroutine(&self, name: &str) -> Result<&Subroutine, ResolveError> {
        self.resolve(name)?.as_subroutine()
    }

    pub fn resolve_render_state(&self, name: &str) -> Result<&RenderState, ResolveError> {
        self.resolve(name)?.as_render_state()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
