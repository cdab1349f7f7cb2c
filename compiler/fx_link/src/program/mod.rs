//! Program state and the Collect phase.
//!
//! A [`Program`] starts out as the rows of its declaration. Validation,
//! resolution and backend linking fill in the rest of the state in place;
//! serialization reads it once at the end.

use std::collections::BTreeMap;

use fx_ir::{Annotation, Location, ProgramDecl, ProgramRow, ShaderStage};

use crate::ShaderId;

/// State of one programmable stage of a program.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StageSlot {
    pub populated: bool,
    /// Function named by the program row.
    pub function: String,
    /// Name written to the compiled program. Same as `function` unless
    /// subroutine bindings were resolved statically.
    pub shader_name: String,
    /// Dynamic subroutine bindings, interface to implementation.
    pub subroutines: BTreeMap<String, String>,
    pub location: Location,
    pub shader: Option<ShaderId>,
    /// Stage binary in words, filled by backends that produce one.
    pub binary: Vec<u32>,
}

/// Program row whose key is not a known program flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidRow {
    pub flag: String,
    pub location: Location,
}

/// What the backend reported as live after linking.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reflection {
    pub uniform_blocks: Vec<String>,
    /// Live uniforms as the backend names them, array suffix included.
    pub uniforms: Vec<String>,
    /// Byte offset within its block per uniform, keyed without array suffix.
    pub offsets: BTreeMap<String, u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub name: String,
    pub location: Location,
    stages: [StageSlot; ShaderStage::COUNT],
    pub render_state: Option<String>,
    pub render_state_location: Location,
    pub compile_flags: String,
    pub invalid_rows: Vec<InvalidRow>,
    pub annotation: Option<Annotation>,
    /// Control points per patch, read from the hull shader.
    pub patch_size: u32,
    pub reflection: Reflection,
}

impl Program {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Program {
            name: name.into(),
            render_state_location: location.clone(),
            location,
            stages: Default::default(),
            render_state: None,
            compile_flags: String::new(),
            invalid_rows: Vec::new(),
            annotation: None,
            patch_size: 0,
            reflection: Reflection::default(),
        }
    }

    /// Collect a declaration: every row in source order, then the annotation.
    pub fn from_decl(decl: &ProgramDecl) -> Self {
        let mut program = Program::new(&decl.name, decl.location.clone());
        for row in &decl.rows {
            program.consume_row(row);
        }
        program.annotation.clone_from(&decl.annotation);
        program
    }

    /// Apply one program row.
    ///
    /// Stage keys populate the stage slot, `RenderState` and `CompileFlags`
    /// set their value. Any other key is kept in `invalid_rows` for
    /// validation to report. A repeated key replaces the earlier row.
    pub fn consume_row(&mut self, row: &ProgramRow) {
        if let Some(stage) = ShaderStage::from_row_key(&row.flag) {
            let slot = &mut self.stages[stage.index()];
            slot.populated = true;
            slot.function.clone_from(&row.value);
            slot.shader_name.clone_from(&row.value);
            slot.subroutines.clone_from(&row.subroutines);
            slot.location = row.location.clone();
            return;
        }

        match row.flag.as_str() {
            "RenderState" => {
                self.render_state = Some(row.value.clone());
                self.render_state_location = row.location.clone();
            }
            "CompileFlags" => self.compile_flags.clone_from(&row.value),
            _ => self.invalid_rows.push(InvalidRow {
                flag: row.flag.clone(),
                location: row.location.clone(),
            }),
        }
    }

    #[inline]
    pub fn stage(&self, stage: ShaderStage) -> &StageSlot {
        &self.stages[stage.index()]
    }

    #[inline]
    pub fn stage_mut(&mut self, stage: ShaderStage) -> &mut StageSlot {
        &mut self.stages[stage.index()]
    }

    pub fn is_populated(&self, stage: ShaderStage) -> bool {
        self.stage(stage).populated
    }

    /// Populated stages in pipeline order.
    pub fn populated_stages(&self) -> impl Iterator<Item = ShaderStage> + '_ {
        ShaderStage::ALL
            .into_iter()
            .filter(|&stage| self.is_populated(stage))
    }
}
