use std::path::Path;

use fx_ir::{AnnotationValue, DataType, Direction, FunctionAttribute, SubroutineKind, TypeKind};
use pretty_assertions::assert_eq;

use super::*;

fn effect(json: &str) -> Result<Effect, ManifestError> {
    let path = Path::new("effects/deferred_light.json");
    Manifest::parse(json, path)?.into_effect(path, Path::new("effects"))
}

#[test]
fn builtin_names_resolve_in_either_language() {
    assert_eq!(builtin_kind("vec3"), Some(TypeKind::Float3));
    assert_eq!(builtin_kind("float3"), Some(TypeKind::Float3));
    assert_eq!(builtin_kind("mat4x4"), Some(TypeKind::Matrix4x4));
    assert_eq!(builtin_kind("uint"), Some(TypeKind::UInteger));
    assert_eq!(builtin_kind("th"), Some(TypeKind::TextureHandle));
    assert_eq!(builtin_kind("undefined"), Some(TypeKind::Undefined));
    assert_eq!(builtin_kind("Light"), None);
}

#[test]
fn empty_manifest_is_named_after_its_file() {
    let effect = effect("{}").unwrap();
    assert_eq!(effect.name, "DeferredLight");
    assert_eq!(effect.file, "effects/deferred_light.json");
    assert!(effect.programs.is_empty());
}

#[test]
fn declarations_carry_their_lines() {
    let effect = effect(
        r#"{
            "name": "Deferred",
            "file": "deferred.fx",
            "structures": [{
                "name": "Light", "line": 2,
                "members": [
                    { "name": "color", "type": "vec4" },
                    { "name": "range", "type": "float", "line": 4 }
                ]
            }],
            "variables": [
                { "name": "lights", "type": "Light", "line": 6, "array_size": 8 },
                { "name": "shade", "type": "void", "line": 7, "subroutine": true }
            ],
            "subroutines": [
                { "name": "phong", "line": 8, "kind": "implementation" },
                { "name": "Shade", "line": 9, "kind": "signature" }
            ],
            "render_states": [{ "name": "Opaque", "line": 10 }]
        }"#,
    )
    .unwrap();

    assert_eq!(effect.name, "Deferred");
    let light = &effect.structures[0];
    assert_eq!(light.location, Location::new("deferred.fx", 2));
    assert_eq!(light.members[0].location.line, 2);
    assert_eq!(light.members[1].location.line, 4);
    assert_eq!(light.members[1].ty, DataType::Builtin(TypeKind::Float));

    assert_eq!(effect.variables[0].ty, DataType::user("Light").unwrap());
    assert_eq!(effect.variables[0].array_size, Some(8));
    assert!(effect.variables[1].is_subroutine_prototype);
    assert_eq!(effect.subroutines[0].kind, SubroutineKind::Implementation);
    assert_eq!(effect.subroutines[1].kind, SubroutineKind::Signature);
    assert_eq!(effect.render_states[0].location.line, 10);
}

#[test]
fn functions_and_programs() {
    let effect = effect(
        r##"{
            "functions": [{
                "name": "HSPatch", "line": 12, "shader": true,
                "code": "#version 450\n",
                "attributes": { "input_vertices": 3, "output_vertices": 4 },
                "parameters": [
                    { "name": "uv", "type": "vec2", "slot": 2 },
                    { "name": "color", "type": "vec4", "direction": "out", "color_attachment": 1 },
                    { "name": "weights", "type": "float", "direction": "inout", "array_size": 4 }
                ]
            }],
            "programs": [{
                "name": "Lit", "line": 30,
                "rows": [
                    { "flag": "PixelShader", "value": "PSMain", "line": 31,
                      "subroutines": { "shade": "phong" } },
                    { "flag": "RenderState", "value": "Opaque", "line": 32 }
                ],
                "annotation": {
                    "line": 29,
                    "entries": [
                        { "key": "queue", "value": { "int": -1 } },
                        { "key": "group", "value": { "string": "opaque" } },
                        { "key": "scale", "value": { "double": 2.5 } }
                    ]
                }
            }]
        }"##,
    )
    .unwrap();

    let function = &effect.functions[0];
    assert!(function.is_shader);
    assert_eq!(function.code, "#version 450\n");
    assert_eq!(function.int_flag(FunctionAttribute::InputVertices), 3);
    assert_eq!(function.int_flag(FunctionAttribute::OutputVertices), 4);
    assert_eq!(function.int_flag(FunctionAttribute::MaxVertexCount), 0);
    let directions: Vec<Direction> = function.parameters.iter().map(|p| p.direction).collect();
    assert_eq!(directions, vec![Direction::In, Direction::Out, Direction::InOut]);
    assert_eq!(function.input_slots(), vec![2, 1]);
    assert_eq!(function.output_attachments(), vec![1, 1]);

    let program = &effect.programs[0];
    assert_eq!(program.rows.len(), 2);
    assert_eq!(program.rows[0].subroutines.get("shade").map(String::as_str), Some("phong"));
    let annotation = program.annotation.as_ref().unwrap();
    assert_eq!(annotation.location.line, 29);
    assert_eq!(annotation.get("queue"), Some(&AnnotationValue::Int(-1)));
    assert_eq!(annotation.get("scale"), Some(&AnnotationValue::Double(2.5)));
}

#[test]
fn stage_code_is_read_relative_to_the_manifest() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("sky.vert"), "#version 450\nvoid main() {}\n").unwrap();
    let manifest = dir.path().join("sky.json");
    std::fs::write(
        &manifest,
        r#"{ "functions": [{ "name": "VSSky", "shader": true, "code_file": "sky.vert" }] }"#,
    )
    .unwrap();

    let effect = Manifest::load(&manifest).unwrap();
    assert_eq!(effect.name, "Sky");
    assert_eq!(effect.functions[0].code, "#version 450\nvoid main() {}\n");
}

#[test]
fn malformed_manifests_are_errors() {
    assert!(matches!(
        effect(r#"{ "functions": [{ "name": 3 }] }"#),
        Err(ManifestError::Json { .. })
    ));
    assert!(matches!(
        effect(r#"{ "variables": [{ "name": "x", "type": "" }] }"#),
        Err(ManifestError::EmptyType { .. })
    ));
    assert!(matches!(
        effect(r#"{ "functions": [{ "name": "f", "code": "", "code_file": "f.glsl" }] }"#),
        Err(ManifestError::AmbiguousCode { .. })
    ));
    assert!(matches!(
        Manifest::load(Path::new("does/not/exist.json")),
        Err(ManifestError::Io { .. })
    ));
}
