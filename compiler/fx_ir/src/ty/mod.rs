//! Data types of the effect language.
//!
//! A [`DataType`] is either a builtin [`TypeKind`] or a reference to a user
//! aggregate by name. All per-kind facts (backend names, component count,
//! byte size, dimensions, primitive element, signature token) come from the
//! single [`KIND_TABLE`]; the methods here only add the `UserType` case.
//!
//! Byte size of a `UserType` needs the symbol table and lives in `fx_types`.

mod kinds;

pub use kinds::{KindInfo, TypeKind, KIND_TABLE, UNDEFINED_NAME};

use std::fmt;
use std::ops::Deref;

/// Target shading language of a compilation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Language {
    Glsl,
    Hlsl,
    /// SPIR-V, produced from GLSL source; uses GLSL type names.
    SpirV,
    /// Host-side C, used for companion headers.
    C,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Glsl => "glsl",
            Language::Hlsl => "hlsl",
            Language::SpirV => "spirv",
            Language::C => "c",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symbol-table name of a user aggregate. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName(String);

impl TypeName {
    /// Returns `None` for an empty name.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.is_empty() {
            None
        } else {
            Some(TypeName(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for TypeName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A data type as written in effect source.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    Builtin(TypeKind),
    /// Reference to a structure by symbol-table name.
    UserType(TypeName),
}

impl DataType {
    /// Create a user type reference.
    ///
    /// Returns `None` for an empty name.
    pub fn user(name: impl Into<String>) -> Option<Self> {
        TypeName::new(name).map(DataType::UserType)
    }

    /// The builtin kind, if this is not a user type.
    pub fn kind(&self) -> Option<TypeKind> {
        match self {
            DataType::Builtin(kind) => Some(*kind),
            DataType::UserType(_) => None,
        }
    }

    /// The referenced structure name, if this is a user type.
    pub fn user_name(&self) -> Option<&str> {
        match self {
            DataType::Builtin(_) => None,
            DataType::UserType(name) => Some(name.as_str()),
        }
    }

    /// Name of this type in `language`.
    ///
    /// Builtins without an equivalent return [`UNDEFINED_NAME`]. User types
    /// are spelled the same in every language.
    pub fn backend_name(&self, language: Language) -> &str {
        match self {
            DataType::Builtin(kind) => {
                let info = kind.info();
                match language {
                    Language::Glsl | Language::SpirV => info.glsl,
                    Language::Hlsl => info.hlsl,
                    Language::C => info.c,
                }
            }
            DataType::UserType(name) => name.as_str(),
        }
    }

    /// Number of scalar components; 0 for opaque, aggregate and non-data kinds.
    pub fn vector_size(&self) -> u32 {
        self.kind().map_or(0, |kind| kind.info().components)
    }

    /// `(rows, cols)`; `(1, 1)` for scalars, `(0, 0)` for everything non-numeric.
    pub fn dimensions(&self) -> (u32, u32) {
        self.kind().map_or((0, 0), |kind| kind.info().dimensions)
    }

    /// Scalar element type. User types are their own element.
    #[must_use]
    pub fn primitive(&self) -> DataType {
        match self {
            DataType::Builtin(kind) => DataType::Builtin(kind.info().primitive),
            DataType::UserType(_) => self.clone(),
        }
    }

    /// Short mangled token for overload keys.
    pub fn signature(&self) -> &str {
        match self {
            DataType::Builtin(kind) => kind.info().signature,
            DataType::UserType(name) => name.as_str(),
        }
    }

    /// Human-readable description for diagnostics.
    pub fn description(&self) -> &str {
        match self {
            DataType::Builtin(kind) => kind.info().description,
            DataType::UserType(name) => name.as_str(),
        }
    }

    /// Byte size of a builtin. `None` for user types.
    pub fn builtin_byte_size(&self) -> Option<u32> {
        self.kind().map(|kind| kind.info().byte_size)
    }

    /// Whether this is an opaque GPU resource.
    pub fn is_opaque(&self) -> bool {
        self.kind().is_some_and(TypeKind::is_opaque)
    }
}

impl From<TypeKind> for DataType {
    fn from(kind: TypeKind) -> Self {
        DataType::Builtin(kind)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
