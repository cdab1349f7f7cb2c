//! End-to-end linking of real GLSL stages through the naga backend.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use fx_diagnostic::{DiagnosticConfig, DiagnosticQueue, ErrorCode};
use fx_ir::{
    Direction, Effect, Function, Header, Location, Parameter, ProgramDecl, ProgramRow,
    RenderState, ShaderStage, TypeKind,
};
use fx_link::{Linker, ProgramRecord, SourceGenerator};
use fx_naga::NagaBackend;
use pretty_assertions::assert_eq;

const VERTEX: &str = "#version 450
layout(location = 0) in vec3 position;
layout(location = 0) out vec2 uv;

layout(std140, set = 0, binding = 0) uniform Globals {
    mat4 mvp;
    vec4 tint;
};

void main() {
    uv = tint.xy;
    gl_Position = mvp * vec4(position, 1.0);
}
";

const PIXEL: &str = "#version 450
layout(location = 0) in vec2 uv;
layout(location = 0) out vec4 color;

void main() {
    color = vec4(uv, 0.0, 1.0);
}
";

fn loc(line: u32) -> Location {
    Location::new("sky.fx", line)
}

fn stage_fn(
    name: &str,
    line: u32,
    code: &str,
    input: (&str, TypeKind),
    output: (&str, TypeKind),
) -> Function {
    let mut function = Function::new(name, loc(line));
    function.is_shader = true;
    function.code = code.into();
    function
        .parameters
        .push(Parameter::new(input.0, input.1.into(), loc(line)));
    function.parameters.push(
        Parameter::new(output.0, output.1.into(), loc(line)).with_direction(Direction::Out),
    );
    function
}

fn sky_effect(pixel_source: &str) -> Effect {
    let mut effect = Effect::new("Sky", "sky.fx");
    effect.render_states.push(RenderState {
        name: "Opaque".into(),
        location: loc(1),
    });
    effect.functions.push(stage_fn(
        "VSSky",
        10,
        VERTEX,
        ("position", TypeKind::Float3),
        ("uv", TypeKind::Float2),
    ));
    effect.functions.push(stage_fn(
        "PSSky",
        20,
        pixel_source,
        ("uv", TypeKind::Float2),
        ("color", TypeKind::Float4),
    ));
    effect.programs.push(
        ProgramDecl::new("Sky", loc(30))
            .with_row(ProgramRow::new("VertexShader", "VSSky", loc(31)))
            .with_row(ProgramRow::new("PixelShader", "PSSky", loc(32)))
            .with_row(ProgramRow::new("RenderState", "Opaque", loc(33))),
    );
    effect
}

#[test]
fn spirv_target_writes_binaries_and_offsets() {
    let dir = tempfile::tempdir().unwrap();
    let header = Header::from_profile("spv10").unwrap();
    let mut diagnostics = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());

    let report = Linker::new(&SourceGenerator, &header, dir.path()).run(
        &NagaBackend,
        &sky_effect(PIXEL),
        &mut diagnostics,
    );
    let diagnostics = diagnostics.flush();
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(report.artifacts, vec![dir.path().join("Sky.fxb")]);

    let record = ProgramRecord::read_file(&report.artifacts[0]).unwrap();
    assert_eq!(record.uniform_blocks, vec!["Globals"]);
    assert_eq!(record.uniforms, vec!["mvp", "tint"]);
    assert_eq!(
        record.offsets,
        vec![("mvp".to_owned(), 0), ("tint".to_owned(), 64)]
    );
    for stage in [ShaderStage::Vertex, ShaderStage::Pixel] {
        assert_eq!(record.stage(stage).binary[0], 0x0723_0203, "{stage}");
    }
    assert!(record.stage(ShaderStage::Hull).binary.is_empty());
    assert_eq!(record.render_state, "Opaque");
}

#[test]
fn glsl_target_reflects_without_binaries() {
    let dir = tempfile::tempdir().unwrap();
    let header = Header::from_profile("glsl450").unwrap();
    let mut diagnostics = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());

    let report = Linker::new(&SourceGenerator, &header, dir.path()).run(
        &NagaBackend,
        &sky_effect(PIXEL),
        &mut diagnostics,
    );
    assert!(report.is_success());

    let record = ProgramRecord::read_file(&report.artifacts[0]).unwrap();
    assert_eq!(record.offsets.len(), 2);
    assert!(record.stage(ShaderStage::Vertex).binary.is_empty());
}

#[test]
fn broken_stage_source_fails_the_program() {
    let dir = tempfile::tempdir().unwrap();
    let header = Header::from_profile("spv10").unwrap();
    let mut diagnostics = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());

    let report = Linker::new(&SourceGenerator, &header, dir.path()).run(
        &NagaBackend,
        &sky_effect("#version 450\nvoid main() { color = ; }\n"),
        &mut diagnostics,
    );
    let codes: Vec<ErrorCode> = diagnostics.flush().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E5004]);
    assert_eq!(report.failed, vec!["Sky"]);
    assert!(report.artifacts.is_empty());
}
