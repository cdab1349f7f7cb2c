//! Fixtures and a scripted backend for linker tests.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::sync::atomic::{AtomicUsize, Ordering};

use fx_diagnostic::{DiagnosticConfig, DiagnosticQueue};
use fx_ir::{
    Direction, Effect, Function, Header, Location, Parameter, ProgramDecl, ProgramRow,
    RenderState, ShaderStage, TypeKind,
};
use fx_types::{DeclarationChecker, SymbolTable};

use crate::{Backend, BackendProgram};

pub(crate) const STAGE_CODE: &str = "#version 450\nvoid main() {}\n";

pub(crate) fn loc(line: u32) -> Location {
    Location::new("test.fx", line)
}

pub(crate) fn queue() -> DiagnosticQueue {
    DiagnosticQueue::with_config(DiagnosticConfig::unlimited())
}

/// A shader function with typed inputs and outputs. Outputs named
/// `color*` get their ordinal as color attachment.
pub(crate) fn shader_fn(
    name: &str,
    line: u32,
    inputs: &[(&str, TypeKind)],
    outputs: &[(&str, TypeKind)],
) -> Function {
    let mut function = Function::new(name, loc(line));
    function.is_shader = true;
    function.code = STAGE_CODE.into();
    for &(param, kind) in inputs {
        function
            .parameters
            .push(Parameter::new(param, kind.into(), loc(line)));
    }
    for (i, &(param, kind)) in outputs.iter().enumerate() {
        let mut out = Parameter::new(param, kind.into(), loc(line)).with_direction(Direction::Out);
        if param.starts_with("color") {
            out = out.with_color_attachment(u32::try_from(i).unwrap());
        }
        function.parameters.push(out);
    }
    function
}

pub(crate) fn vs_main() -> Function {
    shader_fn(
        "VSMain",
        10,
        &[("position", TypeKind::Float3), ("uv", TypeKind::Float2)],
        &[("uv", TypeKind::Float2), ("normal", TypeKind::Float3)],
    )
}

pub(crate) fn ps_main() -> Function {
    shader_fn(
        "PSMain",
        20,
        &[("uv", TypeKind::Float2), ("normal", TypeKind::Float3)],
        &[("color", TypeKind::Float4)],
    )
}

pub(crate) fn lit_program(name: &str, line: u32) -> ProgramDecl {
    ProgramDecl::new(name, loc(line))
        .with_row(ProgramRow::new("VertexShader", "VSMain", loc(line + 1)))
        .with_row(ProgramRow::new("PixelShader", "PSMain", loc(line + 2)))
        .with_row(ProgramRow::new("RenderState", "Default", loc(line + 3)))
}

/// VSMain and PSMain, a `Default` render state and one program `Lit`.
pub(crate) fn lit_effect() -> Effect {
    let mut effect = Effect::new("Test", "test.fx");
    effect.render_states.push(RenderState {
        name: "Default".into(),
        location: loc(1),
    });
    effect.functions.push(vs_main());
    effect.functions.push(ps_main());
    effect.programs.push(lit_program("Lit", 30));
    effect
}

/// Symbol table with every non-program declaration of `effect` registered.
pub(crate) fn symbols_for(effect: &Effect) -> SymbolTable {
    let mut symbols = SymbolTable::new();
    let mut diagnostics = queue();
    DeclarationChecker::new(&mut symbols, &mut diagnostics).check_effect(effect);
    assert!(diagnostics.has_errors().is_none(), "{:?}", diagnostics.flush());
    symbols
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MockUniform {
    pub name: &'static str,
    pub ty: u32,
    pub offset: Option<u32>,
}

/// Backend that records what it was asked to do and answers from a script.
#[derive(Default)]
pub(crate) struct MockBackend {
    pub blocks: Vec<&'static str>,
    pub uniforms: Vec<MockUniform>,
    pub fail_link: bool,
    pub fail_acquire: bool,
    pub compiled: AtomicUsize,
    pub acquired: AtomicUsize,
    pub released: AtomicUsize,
}

impl MockBackend {
    pub fn with_globals() -> Self {
        MockBackend {
            blocks: vec!["Globals"],
            uniforms: vec![
                MockUniform {
                    name: "mvp",
                    ty: 0x8B5C,
                    offset: Some(0),
                },
                MockUniform {
                    name: "lights[0]",
                    ty: 0x8B52,
                    offset: Some(64),
                },
                MockUniform {
                    name: "albedo",
                    ty: 0x8B5E,
                    offset: Some(0),
                },
                MockUniform {
                    name: "loose",
                    ty: 0x1406,
                    offset: None,
                },
            ],
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MockUnit {
    pub stage: ShaderStage,
    pub source: String,
}

pub(crate) struct MockProgram {
    stages: Vec<ShaderStage>,
    blocks: Vec<&'static str>,
    uniforms: Vec<MockUniform>,
    fail_link: bool,
    linked: bool,
}

impl Backend for MockBackend {
    type Unit = MockUnit;
    type Program = MockProgram;

    fn name(&self) -> &'static str {
        "mock"
    }

    fn acquire(&self) -> Result<(), String> {
        if self.fail_acquire {
            return Err("no device".into());
        }
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn release(&self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }

    fn compile_stage(
        &self,
        stage: ShaderStage,
        source: &str,
        _header: &Header,
    ) -> Result<MockUnit, String> {
        self.compiled.fetch_add(1, Ordering::SeqCst);
        if source.contains("#error") {
            return Err(format!("{stage}: 0:1: #error directive"));
        }
        Ok(MockUnit {
            stage,
            source: source.to_owned(),
        })
    }

    fn create_program(&self) -> MockProgram {
        MockProgram {
            stages: Vec::new(),
            blocks: self.blocks.clone(),
            uniforms: self.uniforms.clone(),
            fail_link: self.fail_link,
            linked: false,
        }
    }
}

impl BackendProgram for MockProgram {
    type Unit = MockUnit;

    fn add_stage(&mut self, stage: ShaderStage, unit: &MockUnit) {
        assert_eq!(stage, unit.stage);
        self.stages.push(stage);
    }

    fn link(&mut self) -> bool {
        self.linked = !self.fail_link;
        self.linked
    }

    fn info_log(&self) -> String {
        if self.linked {
            String::new()
        } else {
            "ERROR: Linking vertex stage: Missing entry point".into()
        }
    }

    fn build_reflection(&mut self) -> bool {
        self.linked
    }

    fn live_uniform_block_count(&self) -> usize {
        self.blocks.len()
    }

    fn live_uniform_block_name(&self, index: usize) -> &str {
        self.blocks[index]
    }

    fn live_uniform_count(&self) -> usize {
        self.uniforms.len()
    }

    fn live_uniform_name(&self, index: usize) -> &str {
        self.uniforms[index].name
    }

    fn live_uniform_type(&self, index: usize) -> u32 {
        self.uniforms[index].ty
    }

    fn live_uniform_buffer_offset(&self, index: usize) -> Option<u32> {
        self.uniforms[index].offset
    }

    fn translate_to_binary(&self, stage: ShaderStage) -> Result<Vec<u32>, String> {
        if !self.stages.contains(&stage) {
            return Err(format!("{stage} stage was not linked"));
        }
        Ok(vec![0x0723_0203, u32::try_from(stage.index()).unwrap()])
    }
}
