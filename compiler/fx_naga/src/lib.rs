//! naga backend for the effect linker.
//!
//! Stages are parsed by naga's GLSL frontend and validated on compile.
//! Linking checks entry points and the location interface between adjacent
//! stages, reflection walks the uniform and handle globals each entry point
//! actually uses, and translation writes SPIR-V.
//!
//! naga has no tessellation or geometry pipeline, so hull, domain and
//! geometry stages fail to compile with this backend.

mod program;
mod reflect;

use std::sync::Arc;

use fx_ir::{Header, ShaderStage};
use fx_link::Backend;

pub use program::NagaProgram;
pub use reflect::{gl_type_id, ReflectedUniform};

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("{0} shaders are not supported by the naga backend")]
    Unsupported(ShaderStage),
    #[error("{stage} shader failed to parse: {log}")]
    Parse { stage: ShaderStage, log: String },
    #[error("{stage} shader failed validation: {log}")]
    Validation { stage: ShaderStage, log: String },
}

/// Pipeline stage naga models for `stage`.
pub fn naga_stage(stage: ShaderStage) -> Result<naga::ShaderStage, StageError> {
    match stage {
        ShaderStage::Vertex => Ok(naga::ShaderStage::Vertex),
        ShaderStage::Pixel => Ok(naga::ShaderStage::Fragment),
        ShaderStage::Compute => Ok(naga::ShaderStage::Compute),
        ShaderStage::Hull | ShaderStage::Domain | ShaderStage::Geometry => {
            Err(StageError::Unsupported(stage))
        }
    }
}

/// A validated stage module. Cloning shares the module.
#[derive(Clone, Debug)]
pub struct NagaUnit(Arc<CompiledStage>);

#[derive(Debug)]
pub(crate) struct CompiledStage {
    pub stage: ShaderStage,
    pub module: naga::Module,
    pub info: naga::valid::ModuleInfo,
}

impl NagaUnit {
    pub fn stage(&self) -> ShaderStage {
        self.0.stage
    }

    pub fn module(&self) -> &naga::Module {
        &self.0.module
    }

    pub(crate) fn compiled(&self) -> &CompiledStage {
        &self.0
    }
}

/// Compiles GLSL stages with naga and links them into SPIR-V programs.
#[derive(Copy, Clone, Debug, Default)]
pub struct NagaBackend;

impl NagaBackend {
    /// Parse and validate one stage.
    #[tracing::instrument(level = "debug", skip(self, source))]
    pub fn compile(&self, stage: ShaderStage, source: &str) -> Result<NagaUnit, StageError> {
        let options = naga::front::glsl::Options {
            stage: naga_stage(stage)?,
            defines: Default::default(),
        };
        let module = naga::front::glsl::Frontend::default()
            .parse(&options, source)
            .map_err(|e| StageError::Parse {
                stage,
                log: format!("{e:?}"),
            })?;
        let info = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .map_err(|e| StageError::Validation {
            stage,
            log: format!("{e:?}"),
        })?;

        tracing::debug!(
            globals = module.global_variables.len(),
            entry_points = module.entry_points.len(),
            "stage compiled"
        );
        Ok(NagaUnit(Arc::new(CompiledStage {
            stage,
            module,
            info,
        })))
    }
}

impl Backend for NagaBackend {
    type Unit = NagaUnit;
    type Program = NagaProgram;

    fn name(&self) -> &'static str {
        "naga"
    }

    fn compile_stage(
        &self,
        stage: ShaderStage,
        source: &str,
        _header: &Header,
    ) -> Result<NagaUnit, String> {
        self.compile(stage, source).map_err(|e| e.to_string())
    }

    fn create_program(&self) -> NagaProgram {
        NagaProgram::default()
    }
}

#[cfg(test)]
pub(crate) mod test_shaders;
