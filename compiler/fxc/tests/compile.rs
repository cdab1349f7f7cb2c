//! `fxc compile` end to end: manifest on disk, artifacts in a temp dir.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::fs;
use std::path::Path;
use std::process::Command;

use fx_diagnostic::emitter::{ColorMode, TerminalEmitter};
use fx_ir::ShaderStage;
use fx_link::ProgramRecord;
use fxc::commands::{compile_effect, CompileOptions};
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

const MANIFEST: &str = r#"{
    "file": "sky.fx",
    "render_states": [{ "name": "Opaque", "line": 1 }],
    "functions": [
        {
            "name": "VSSky", "line": 10, "shader": true, "code_file": "sky.vert",
            "parameters": [
                { "name": "position", "type": "vec3" },
                { "name": "uv", "type": "vec2", "direction": "out" }
            ]
        },
        {
            "name": "PSSky", "line": 20, "shader": true, "code_file": "sky.frag",
            "parameters": [
                { "name": "uv", "type": "vec2" },
                { "name": "color", "type": "vec4", "direction": "out", "color_attachment": 0 }
            ]
        }
    ],
    "programs": [
        {
            "name": "Sky", "line": 30,
            "rows": [
                { "flag": "VertexShader", "value": "VSSky", "line": 31 },
                { "flag": "PixelShader", "value": "PSSky", "line": 32 },
                { "flag": "RenderState", "value": "Opaque", "line": 33 }
            ],
            "annotation": { "line": 29, "entries": [{ "key": "queue", "value": { "int": 1000 } }] }
        },
        {
            "name": "Unfinished", "line": 40,
            "rows": [
                { "flag": "VertexShader", "value": "VSSky", "line": 41 },
                { "flag": "PixelShader", "value": "PSMissing", "line": 42 },
                { "flag": "RenderState", "value": "Opaque", "line": 43 }
            ]
        }
    ]
}"#;

/// Write the sky effect into `dir` and return the manifest path.
fn sky_effect(dir: &Path) -> std::path::PathBuf {
    fs::write(dir.join("sky.vert"), VERTEX).unwrap();
    fs::write(dir.join("sky.frag"), PIXEL).unwrap();
    let manifest = dir.join("sky.json");
    fs::write(&manifest, MANIFEST).unwrap();
    manifest
}

fn options(manifest: &Path, out_dir: &Path, extra: &[&str]) -> CompileOptions {
    let mut args = vec![
        manifest.display().to_string(),
        "-o".to_owned(),
        out_dir.display().to_string(),
    ];
    args.extend(extra.iter().map(|s| (*s).to_owned()));
    CompileOptions::parse(&args).unwrap()
}

/// Compile and return the report with everything the emitter printed.
fn compile(options: &CompileOptions) -> (fx_link::LinkReport, String) {
    let mut printed = Vec::new();
    let mut emitter = TerminalEmitter::with_color_mode(&mut printed, ColorMode::Never, false);
    let report = compile_effect(options, &mut emitter).unwrap();
    drop(emitter);
    (report, String::from_utf8(printed).unwrap())
}

#[test]
fn good_program_is_written_and_bad_one_reported() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let manifest = sky_effect(src.path());

    let (report, printed) = compile(&options(&manifest, out.path(), &[]));
    assert_eq!(report.artifacts, vec![out.path().join("Sky.fxb")]);
    assert_eq!(report.failed, vec!["Unfinished"]);
    assert!(
        printed.starts_with("error [E1002]: Pixel/Fragment shader 'PSMissing' is not defined\n"),
        "{printed}"
    );
    assert!(printed.contains("  --> sky.fx:42\n"), "{printed}");
    assert!(printed.contains("  = in program 'Unfinished'\n"), "{printed}");

    let record = ProgramRecord::read_file(&report.artifacts[0]).unwrap();
    assert_eq!(record.name, "Sky");
    assert_eq!(record.annotation.as_ref().map(Vec::len), Some(1));
    assert_eq!(record.vertex_input_slots, vec![0]);
    assert_eq!(record.pixel_output_slots, vec![0]);
    assert_eq!(record.stage(ShaderStage::Vertex).name, "VSSky");
    assert_eq!(record.stage(ShaderStage::Pixel).binary[0], 0x0723_0203);
    assert_eq!(
        record.offsets,
        vec![("mvp".to_owned(), 0), ("tint".to_owned(), 64)]
    );
    assert_eq!(record.render_state, "Opaque");
}

#[test]
fn parallel_link_writes_identical_artifacts() {
    let src = tempfile::tempdir().unwrap();
    let sequential = tempfile::tempdir().unwrap();
    let parallel = tempfile::tempdir().unwrap();
    let manifest = sky_effect(src.path());

    compile(&options(&manifest, sequential.path(), &[]));
    compile(&options(&manifest, parallel.path(), &["--parallel"]));
    assert_eq!(
        fs::read(sequential.path().join("Sky.fxb")).unwrap(),
        fs::read(parallel.path().join("Sky.fxb")).unwrap()
    );
}

#[test]
fn output_switch_dumps_generated_sources() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let manifest = sky_effect(src.path());

    compile(&options(&manifest, out.path(), &["/OUTPUT"]));
    assert_eq!(
        fs::read_to_string(out.path().join("VSSky.vert.glsl")).unwrap(),
        VERTEX
    );
    assert!(out.path().join("PSSky.frag.glsl").exists());
}

#[test]
fn missing_manifest_is_an_error() {
    let out = tempfile::tempdir().unwrap();
    let options = options(&out.path().join("nope.json"), out.path(), &[]);
    let mut emitter = TerminalEmitter::with_color_mode(std::io::sink(), ColorMode::Never, false);
    assert!(compile_effect(&options, &mut emitter).is_err());
}

#[test]
fn binary_exit_status_and_dump() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let manifest = sky_effect(src.path());

    let output = Command::new(env!("CARGO_BIN_EXE_fxc"))
        .arg("compile")
        .arg(&manifest)
        .arg("-o")
        .arg(out.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[E1002]"), "{stderr}");
    assert!(stderr.contains("sky.fx:42"), "{stderr}");
    assert!(stderr.contains("Unfinished"), "{stderr}");

    let output = Command::new(env!("CARGO_BIN_EXE_fxc"))
        .arg("dump")
        .arg(out.path().join("Sky.fxb"))
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("program Sky\n"), "{stdout}");
    assert!(stdout.contains("tint @ 64"), "{stdout}");
}
