//! The Resolve phase: one pooled [`Shader`] per populated stage.

use std::collections::BTreeMap;

use fx_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode, ErrorGuaranteed};
use fx_ir::{Header, HeaderFlags, ShaderStage};
use fx_types::SymbolTable;

use crate::{Program, Shader, ShaderPool};

/// Canonical shader name: the function name, followed by the static
/// bindings as `name(a = x, b = y)` when there are any.
pub fn shader_identity(function: &str, bindings: &BTreeMap<String, String>) -> String {
    if bindings.is_empty() {
        return function.to_owned();
    }
    let bound: Vec<String> = bindings
        .iter()
        .map(|(interface, implementation)| format!("{interface} = {implementation}"))
        .collect();
    format!("{function}({})", bound.join(", "))
}

/// Attach a pooled shader to every populated stage of a validated program.
///
/// With [`HeaderFlags::NO_SUBROUTINES`] the stage's bindings are baked into
/// the shader identity and removed from the program; otherwise they stay on
/// the program as dynamic bindings and the shader is shared by all of them.
/// A shared shader keeps the compile flags it was first built with; a
/// program asking for different ones gets a warning.
#[tracing::instrument(level = "debug", skip_all, fields(program = %program.name))]
pub fn build_shaders(
    program: &mut Program,
    symbols: &SymbolTable,
    header: &Header,
    pool: &mut ShaderPool,
    diagnostics: &mut DiagnosticQueue,
) -> Result<(), ErrorGuaranteed> {
    let static_bindings = header.has(HeaderFlags::NO_SUBROUTINES);
    let compile_flags = program.compile_flags.clone();
    let mut failed = None;

    for stage in ShaderStage::ALL {
        let name = program.name.clone();
        let slot = program.stage_mut(stage);
        if !slot.populated {
            continue;
        }

        let function = match symbols.resolve_function(&slot.function) {
            Ok(function) if function.is_shader => function,
            // Validation reports these; reaching here means it was skipped.
            _ => {
                failed = Some(
                    diagnostics.emit_error(
                        Diagnostic::error(ErrorCode::E9001)
                            .with_message(format!(
                                "{stage} stage has no shader function '{}'",
                                slot.function
                            ))
                            .at(&slot.location)
                            .in_program(&name),
                    ),
                );
                continue;
            }
        };

        let (identity, subroutines) = if static_bindings {
            let bindings = std::mem::take(&mut slot.subroutines);
            (shader_identity(&function.name, &bindings), bindings)
        } else {
            (function.name.clone(), BTreeMap::new())
        };
        if let Some(pooled) = pool.lookup(stage, &identity).and_then(|id| pool.get(id)) {
            if pooled.compile_flags != compile_flags {
                diagnostics.emit_warning(
                    Diagnostic::warning(ErrorCode::W2001)
                        .with_message(format!(
                            "{stage} shader '{identity}' was already built with compile flags '{}'; \
                             flags '{compile_flags}' are ignored",
                            pooled.compile_flags
                        ))
                        .at(&slot.location)
                        .in_program(&name),
                );
            }
        }
        slot.shader_name.clone_from(&identity);
        slot.shader = Some(pool.intern(Shader {
            stage,
            identity,
            function: function.clone(),
            compile_flags: compile_flags.clone(),
            subroutines,
        }));
    }

    match failed {
        Some(guarantee) => Err(guarantee),
        None => Ok(()),
    }
}
