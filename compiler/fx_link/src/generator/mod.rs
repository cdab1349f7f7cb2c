//! Stage source generation.

use fx_ir::Header;

use crate::Shader;

/// Turns a pooled shader into source text for the backend.
pub trait Generator: Sync {
    fn generate(&self, shader: &Shader, header: &Header) -> Result<String, String>;
}

/// Forwards the function's stage code with a block of `#define`s for
/// statically bound subroutines and compile flags.
///
/// The defines go right after the `#version` directive, which must stay the
/// first statement of a GLSL stage. A compile flag `NAME=VALUE` defines
/// `NAME` as `VALUE`, a bare `NAME` defines it empty.
#[derive(Copy, Clone, Debug, Default)]
pub struct SourceGenerator;

impl Generator for SourceGenerator {
    fn generate(&self, shader: &Shader, _header: &Header) -> Result<String, String> {
        let code = &shader.function.code;
        if code.trim().is_empty() {
            return Err(format!("function '{}' has no stage code", shader.function.name));
        }

        let mut defines = String::new();
        for (interface, implementation) in &shader.subroutines {
            defines.push_str(&format!("#define {interface} {implementation}\n"));
        }
        for flag in shader.compile_flags.split_whitespace() {
            match flag.split_once('=') {
                Some((name, value)) => defines.push_str(&format!("#define {name} {value}\n")),
                None => defines.push_str(&format!("#define {flag}\n")),
            }
        }
        if defines.is_empty() {
            return Ok(code.clone());
        }

        let first_line_end = code.find('\n').map_or(code.len(), |i| i + 1);
        let (version, body) = if code[..first_line_end].trim_start().starts_with("#version") {
            code.split_at(first_line_end)
        } else {
            ("", code.as_str())
        };

        let mut source = String::with_capacity(code.len() + defines.len() + 1);
        source.push_str(version);
        if !version.is_empty() && !version.ends_with('\n') {
            source.push('\n');
        }
        source.push_str(&defines);
        source.push_str(body);
        Ok(source)
    }
}
