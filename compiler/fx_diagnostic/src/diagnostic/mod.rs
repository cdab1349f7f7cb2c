use std::fmt;

use fx_ir::Location;

use crate::ErrorCode;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported problem.
///
/// `location` is the declaration or program row at fault. `context` names
/// what was being linked when it was found, e.g. `program 'Solid'` or
/// `shader 'PSMain'`; the emitter prints it as `in {context}`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "a diagnostic does nothing until it is queued"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub location: Option<Location>,
    pub context: Option<String>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, code: ErrorCode) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            location: None,
            context: None,
            notes: Vec::new(),
        }
    }

    pub fn error(code: ErrorCode) -> Self {
        Self::new(Severity::Error, code)
    }

    pub fn warning(code: ErrorCode) -> Self {
        Self::new(Severity::Warning, code)
    }

    pub fn with_message(self, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            ..self
        }
    }

    pub fn at(self, location: &Location) -> Self {
        Diagnostic {
            location: Some(location.clone()),
            ..self
        }
    }

    pub fn in_context(self, context: impl Into<String>) -> Self {
        Diagnostic {
            context: Some(context.into()),
            ..self
        }
    }

    pub fn in_program(self, program: &str) -> Self {
        self.in_context(format!("program '{program}'"))
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Same layout as the terminal emitter without styling or the trailing
/// blank line.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;
        if let Some(location) = &self.location {
            write!(f, "\n  --> {location}")?;
        }
        if let Some(context) = &self.context {
            write!(f, "\n  = in {context}")?;
        }
        self.notes
            .iter()
            .try_for_each(|note| write!(f, "\n  = note: {note}"))
    }
}

/// E1001: a name declared twice. The note points at the first declaration.
#[cold]
pub fn redefinition(kind: &str, name: &str, location: &Location, previous: &Location) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1001)
        .with_message(format!("{kind} '{name}' is already defined"))
        .at(location)
        .with_note(format!("previous definition at {previous}"))
}

/// E1002: `what` names the expected kind, e.g. `Vertex shader`.
#[cold]
pub fn unresolved(what: &str, name: &str, location: &Location) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1002)
        .with_message(format!("{what} '{name}' is not defined"))
        .at(location)
}

/// E1003: the name resolved, but to the wrong kind of declaration.
#[cold]
pub fn kind_mismatch(name: &str, expected: &str, found: &str, location: &Location) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1003)
        .with_message(format!("symbol '{name}' is a {found}, expected {expected}"))
        .at(location)
}
