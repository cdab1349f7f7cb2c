//! Backend compiler interface.
//!
//! A backend compiles generated stage source into units, links units into a
//! program object and reports what survived linking. The linker only talks
//! to backends through these traits; which operations it calls depends on
//! the [`LinkStrategy`](crate::LinkStrategy) for the target.

use fx_ir::{Header, ShaderStage};

/// GL type ids at or above this value name samplers, images and other
/// opaque bindings. Their uniforms have no offset in a data block.
pub const OPAQUE_TYPE_THRESHOLD: u32 = 0x8B5D;

pub trait Backend: Sync {
    /// A compiled stage, shared by every program that uses the shader.
    type Unit: Send + Sync;
    type Program: BackendProgram<Unit = Self::Unit>;

    fn name(&self) -> &'static str;

    /// Prepare process-level backend state. Called once per batch.
    fn acquire(&self) -> Result<(), String> {
        Ok(())
    }

    /// Undo [`acquire`](Backend::acquire).
    fn release(&self) {}

    /// Compile one stage. The error is the backend's log.
    fn compile_stage(
        &self,
        stage: ShaderStage,
        source: &str,
        header: &Header,
    ) -> Result<Self::Unit, String>;

    fn create_program(&self) -> Self::Program;
}

/// A program object being linked: stages in, reflection and binaries out.
///
/// Reflection indices run from zero to the matching count. Queries are
/// only meaningful after [`link`](BackendProgram::link) and
/// [`build_reflection`](BackendProgram::build_reflection) succeeded.
pub trait BackendProgram {
    type Unit;

    fn add_stage(&mut self, stage: ShaderStage, unit: &Self::Unit);
    fn link(&mut self) -> bool;
    fn info_log(&self) -> String;
    fn build_reflection(&mut self) -> bool;

    fn live_uniform_block_count(&self) -> usize;
    fn live_uniform_block_name(&self, index: usize) -> &str;
    fn live_uniform_count(&self) -> usize;
    fn live_uniform_name(&self, index: usize) -> &str;
    /// GL type id of a live uniform.
    fn live_uniform_type(&self, index: usize) -> u32;
    /// Byte offset within the uniform's block, `None` outside any block.
    fn live_uniform_buffer_offset(&self, index: usize) -> Option<u32>;

    /// Final binary of a linked stage, in words.
    fn translate_to_binary(&self, stage: ShaderStage) -> Result<Vec<u32>, String>;
}

/// Backend state acquired for one batch, released on drop.
pub struct BackendSession<'b, B: Backend> {
    backend: &'b B,
}

impl<'b, B: Backend> BackendSession<'b, B> {
    pub fn acquire(backend: &'b B) -> Result<Self, String> {
        backend.acquire()?;
        tracing::debug!(backend = backend.name(), "backend acquired");
        Ok(BackendSession { backend })
    }

    pub fn backend(&self) -> &'b B {
        self.backend
    }
}

impl<B: Backend> Drop for BackendSession<'_, B> {
    fn drop(&mut self) {
        self.backend.release();
        tracing::debug!(backend = self.backend.name(), "backend released");
    }
}
