use std::collections::BTreeMap;

use super::Annotation;
use crate::Location;

/// One `Key = Value;` line of a program declaration.
///
/// Stage rows may carry subroutine bindings, `interface -> implementation`.
/// The key is kept as written; the linker decides whether it is valid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgramRow {
    pub flag: String,
    pub value: String,
    pub subroutines: BTreeMap<String, String>,
    pub location: Location,
}

impl ProgramRow {
    pub fn new(flag: impl Into<String>, value: impl Into<String>, location: Location) -> Self {
        ProgramRow {
            flag: flag.into(),
            value: value.into(),
            subroutines: BTreeMap::new(),
            location,
        }
    }

    #[must_use]
    pub fn with_subroutine(
        mut self,
        interface: impl Into<String>,
        implementation: impl Into<String>,
    ) -> Self {
        self.subroutines
            .insert(interface.into(), implementation.into());
        self
    }
}

/// A program as parsed: its name, rows in source order and optional annotation.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgramDecl {
    pub name: String,
    pub location: Location,
    pub rows: Vec<ProgramRow>,
    pub annotation: Option<Annotation>,
}

impl ProgramDecl {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        ProgramDecl {
            name: name.into(),
            location,
            rows: Vec::new(),
            annotation: None,
        }
    }

    #[must_use]
    pub fn with_row(mut self, row: ProgramRow) -> Self {
        self.rows.push(row);
        self
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotation = Some(annotation);
        self
    }
}
