//! FX IR - declarations consumed by the effect linker
//!
//! This crate holds the data the parser and expression checker hand over:
//! - `Location` for file/line positions
//! - `DataType` and the builtin kind table (names, sizes, dimensions, signatures)
//! - Declarations: `Function`, `Variable`, `Subroutine`, `Structure`,
//!   `RenderState`, `ProgramDecl`
//! - `ShaderStage` in pipeline order
//! - `Header` with the target profile and compile switches
//!
//! Nothing here resolves names; that is `fx_types`' job.

mod decl;
mod effect;
mod header;
mod location;
mod stage;
pub mod ty;

pub use decl::{
    Annotation, AnnotationEntry, AnnotationValue, Direction, Function, FunctionAttribute,
    Parameter, ProgramDecl, ProgramRow, RenderState, Structure, Subroutine, SubroutineKind,
    Variable,
};
pub use effect::{effect_name_from_path, Effect};
pub use header::{Header, HeaderError, HeaderFlags};
pub use location::Location;
pub use stage::ShaderStage;
pub use ty::{DataType, KindInfo, Language, TypeKind, TypeName};
