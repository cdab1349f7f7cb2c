use std::fmt;

/// Which part of the link a code belongs to, from its leading digit.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Phase {
    /// 1xxx: declarations and symbol lookup.
    Symbols,
    /// 2xxx: program rows and the stage interface chain.
    Programs,
    /// 5xxx: stage compile, link, reflection and binary translation.
    Backend,
    /// 6xxx: writing artifacts.
    Output,
    /// 9xxx: the linker itself.
    Internal,
}

macro_rules! error_codes {
    ($($code:ident => $name:literal, $phase:ident;)*) => {
        /// Code attached to every linker diagnostic. `E` codes are errors,
        /// `W` codes warnings; the first digit is the [`Phase`].
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
        pub enum ErrorCode {
            $(#[doc = $name] $code,)*
        }

        impl ErrorCode {
            pub const ALL: &'static [ErrorCode] = &[$(ErrorCode::$code),*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(ErrorCode::$code => stringify!($code),)*
                }
            }

            /// Stable name for docs and log fields, e.g. `UnresolvedReference`.
            pub fn name(self) -> &'static str {
                match self {
                    $(ErrorCode::$code => $name,)*
                }
            }

            pub fn phase(self) -> Phase {
                match self {
                    $(ErrorCode::$code => Phase::$phase,)*
                }
            }
        }
    };
}

error_codes! {
    E1001 => "Redefinition", Symbols;
    E1002 => "UnresolvedReference", Symbols;
    E1003 => "KindMismatch", Symbols;
    E1004 => "StructureRecursion", Symbols;
    E1005 => "DuplicateParameterSlot", Symbols;
    E2001 => "InvalidRowFlag", Programs;
    E2002 => "MissingRequiredSlot", Programs;
    E2003 => "StageInterfaceCount", Programs;
    E2004 => "StageInterfaceType", Programs;
    E2005 => "PatchVertexMismatch", Programs;
    E2006 => "UnpairedTessellationStage", Programs;
    E5001 => "BackendLinkFailure", Backend;
    E5002 => "ReflectionFailure", Backend;
    E5003 => "BinaryTranslationFailure", Backend;
    E5004 => "StageCompileFailure", Backend;
    E6001 => "IOFailure", Output;
    E9001 => "InternalError", Internal;
    W2001 => "ConflictingCompileFlags", Programs;
    W5001 => "NoBackendStrategy", Backend;
}

impl ErrorCode {
    pub fn is_warning(self) -> bool {
        self.as_str().starts_with('W')
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
