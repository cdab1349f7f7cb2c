//! Program linker for compiled effects.
//!
//! A program binds up to six pipeline stages and a render state to shader
//! functions. Linking runs in phases, each a gate for the program it works
//! on:
//!
//! 1. Collect: program rows become [`Program`] slot state
//! 2. Validate: [`type_check`] resolves every name the program uses
//! 3. Resolve: [`build_shaders`] interns one [`Shader`] per permutation in a
//!    [`ShaderPool`] shared by the whole batch
//! 4. Backend-Link: [`generate`] links stage units, reads reflection and
//!    translates stages to binaries through a [`Backend`]
//! 5. Serialize: [`compile`] writes the program with a [`BinWriter`]
//!
//! [`Linker`] drives all phases over an effect and writes one artifact per
//! program.

mod backend;
mod batch;
mod compile;
mod container;
mod generate;
mod generator;
mod program;
mod resolve;
mod shader;
mod validate;

#[cfg(test)]
mod test_support;

pub use backend::{Backend, BackendProgram, BackendSession, OPAQUE_TYPE_THRESHOLD};
pub use batch::{LinkReport, LinkedEffect, LinkedProgram, Linker, ARTIFACT_EXTENSION};
pub use compile::{compile, ProgramRecord, StageRecord};
pub use container::{BinReader, BinWriter, ContainerError};
pub use generate::{generate, strip_array_suffix, LinkStrategy};
pub use generator::{Generator, SourceGenerator};
pub use program::{InvalidRow, Program, Reflection, StageSlot};
pub use resolve::{build_shaders, shader_identity};
pub use shader::{Shader, ShaderId, ShaderPool};
pub use validate::type_check;

/// Switches for the linker itself, independent of the target header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LinkOptions {
    /// Run the cross-stage interface checks during validation.
    pub interface_validation: bool,
    /// Run Backend-Link for independent programs on a thread pool.
    pub parallel: bool,
}

impl Default for LinkOptions {
    fn default() -> Self {
        LinkOptions {
            interface_validation: true,
            parallel: false,
        }
    }
}
