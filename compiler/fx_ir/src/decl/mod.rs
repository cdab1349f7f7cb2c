//! Declarations handed to the linker by the parser and expression checker.
//!
//! These are plain data. Registration, resolution and layout live in
//! `fx_types`; program linking lives in `fx_link`.

mod annotation;
mod program;

pub use annotation::{Annotation, AnnotationEntry, AnnotationValue};
pub use program::{ProgramDecl, ProgramRow};

use std::collections::BTreeMap;

use crate::{DataType, Location};

/// Direction of a function parameter.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    In,
    Out,
    InOut,
}

impl Direction {
    pub fn is_input(self) -> bool {
        matches!(self, Direction::In | Direction::InOut)
    }

    pub fn is_output(self) -> bool {
        matches!(self, Direction::Out | Direction::InOut)
    }
}

/// A function parameter or structure member.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Parameter {
    pub name: String,
    pub ty: DataType,
    /// Element count for array parameters.
    pub array_size: Option<u32>,
    pub location: Location,
    pub direction: Direction,
    /// Explicit pipeline slot; parameters without one take their ordinal
    /// position within the input or output list.
    pub slot: Option<u32>,
    /// Color attachment index for pixel outputs.
    pub color_attachment: Option<u32>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: DataType, location: Location) -> Self {
        Parameter {
            name: name.into(),
            ty,
            array_size: None,
            location,
            direction: Direction::In,
            slot: None,
            color_attachment: None,
        }
    }

    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn with_array_size(mut self, size: u32) -> Self {
        self.array_size = Some(size);
        self
    }

    #[must_use]
    pub fn with_slot(mut self, slot: u32) -> Self {
        self.slot = Some(slot);
        self
    }

    #[must_use]
    pub fn with_color_attachment(mut self, index: u32) -> Self {
        self.color_attachment = Some(index);
        self
    }

    pub fn is_array(&self) -> bool {
        self.array_size.is_some()
    }

    /// Whether a value written through `output` can be read through `self`
    /// without conversion: same type, same array size.
    pub fn compatible(&self, output: &Parameter) -> bool {
        self.ty == output.ty && self.array_size == output.array_size
    }
}

/// Integer attributes attached to a function, e.g. tessellation vertex counts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FunctionAttribute {
    InputVertices,
    OutputVertices,
    MaxVertexCount,
    Instances,
    LocalSizeX,
    LocalSizeY,
    LocalSizeZ,
}

/// A function declaration, possibly a shader entry point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub location: Location,
    pub return_type: DataType,
    pub parameters: Vec<Parameter>,
    /// Marked as a shader entry point.
    pub is_shader: bool,
    pub attributes: BTreeMap<FunctionAttribute, u32>,
    /// Stage source body, consumed by the source generator.
    pub code: String,
}

impl Function {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Function {
            name: name.into(),
            location,
            return_type: DataType::Builtin(crate::TypeKind::Void),
            parameters: Vec::new(),
            is_shader: false,
            attributes: BTreeMap::new(),
            code: String::new(),
        }
    }

    /// Integer attribute value, 0 when absent.
    pub fn int_flag(&self, attribute: FunctionAttribute) -> u32 {
        self.attributes.get(&attribute).copied().unwrap_or(0)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| p.direction.is_input())
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| p.direction.is_output())
    }

    /// Effective pipeline slot of each input, in declaration order.
    pub fn input_slots(&self) -> Vec<u32> {
        effective_slots(self.inputs())
    }

    /// Effective pipeline slot of each output, in declaration order.
    pub fn output_slots(&self) -> Vec<u32> {
        effective_slots(self.outputs())
    }

    /// Color attachment index of each output; outputs without an explicit
    /// attachment use their ordinal position.
    pub fn output_attachments(&self) -> Vec<u32> {
        self.outputs()
            .zip(0u32..)
            .map(|(param, ordinal)| param.color_attachment.unwrap_or(ordinal))
            .collect()
    }
}

fn effective_slots<'a>(params: impl Iterator<Item = &'a Parameter>) -> Vec<u32> {
    params
        .zip(0u32..)
        .map(|(param, ordinal)| param.slot.unwrap_or(ordinal))
        .collect()
}

/// A global variable declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub location: Location,
    pub ty: DataType,
    pub array_size: Option<u32>,
    /// Declares a subroutine interface that programs bind implementations to.
    pub is_subroutine_prototype: bool,
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: DataType, location: Location) -> Self {
        Variable {
            name: name.into(),
            location,
            ty,
            array_size: None,
            is_subroutine_prototype: false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SubroutineKind {
    Signature,
    Implementation,
}

/// A subroutine signature or implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subroutine {
    pub name: String,
    pub location: Location,
    pub kind: SubroutineKind,
}

/// A user-defined aggregate type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Structure {
    pub name: String,
    pub location: Location,
    pub members: Vec<Parameter>,
}

impl Structure {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Structure {
            name: name.into(),
            location,
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_member(mut self, member: Parameter) -> Self {
        self.members.push(member);
        self
    }
}

/// A named bundle of fixed-function state. Its contents are opaque to the linker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderState {
    pub name: String,
    pub location: Location,
}
