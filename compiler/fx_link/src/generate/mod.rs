//! The Backend-Link phase.
//!
//! Which backend operations run depends on the target. Every strategy has
//! the same entry point, so a new target only adds a row to
//! [`LinkStrategy::for_header`] and the phases before it stay untouched.

use fx_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode, ErrorGuaranteed};
use fx_ir::{Header, Language, ShaderStage};

use crate::{Backend, BackendProgram, Program, OPAQUE_TYPE_THRESHOLD};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LinkStrategy {
    /// Link, reflect and translate every stage to its binary.
    Portable,
    /// Link and reflect; the runtime compiles the stages itself.
    Reflect,
    /// Nothing to link for this target.
    Stub,
    /// No strategy for this target and version.
    Unsupported,
}

impl LinkStrategy {
    pub fn for_header(header: &Header) -> LinkStrategy {
        match (header.language, header.major) {
            (Language::SpirV, 1) => LinkStrategy::Portable,
            (Language::Glsl, 1..=4) => LinkStrategy::Reflect,
            (Language::Hlsl, 3..=5) | (Language::C, _) => LinkStrategy::Stub,
            _ => LinkStrategy::Unsupported,
        }
    }

    /// Whether stages must be compiled into backend units first.
    pub fn needs_units(self) -> bool {
        matches!(self, LinkStrategy::Portable | LinkStrategy::Reflect)
    }
}

/// Strip one trailing `[<digits>]` from a uniform name.
pub fn strip_array_suffix(name: &str) -> &str {
    name.strip_suffix(']')
        .and_then(|rest| rest.rsplit_once('['))
        .filter(|(_, index)| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
        .map_or(name, |(base, _)| base)
}

/// Link a resolved program and record what the backend reports.
///
/// `units` holds the compiled unit of every pooled shader, indexed by
/// [`ShaderId`](crate::ShaderId); a shader whose compilation failed holds
/// the proof of that error. A failure here only affects this program.
#[tracing::instrument(level = "debug", skip_all, fields(program = %program.name))]
pub fn generate<B: Backend>(
    program: &mut Program,
    units: &[Result<B::Unit, ErrorGuaranteed>],
    backend: &B,
    header: &Header,
    diagnostics: &mut DiagnosticQueue,
) -> Result<(), ErrorGuaranteed> {
    let strategy = LinkStrategy::for_header(header);
    tracing::debug!(?strategy, profile = %header, "backend link");

    match strategy {
        LinkStrategy::Portable => link_and_reflect(program, units, backend, diagnostics, true),
        LinkStrategy::Reflect => link_and_reflect(program, units, backend, diagnostics, false),
        LinkStrategy::Stub => Ok(()),
        LinkStrategy::Unsupported => {
            tracing::warn!(profile = %header, "no backend strategy");
            diagnostics.emit_warning(
                Diagnostic::warning(ErrorCode::W5001)
                    .with_message(format!("no backend strategy for target {header}"))
                    .at(&program.location)
                    .in_program(&program.name),
            );
            Ok(())
        }
    }
}

fn link_and_reflect<B: Backend>(
    program: &mut Program,
    units: &[Result<B::Unit, ErrorGuaranteed>],
    backend: &B,
    diagnostics: &mut DiagnosticQueue,
    translate: bool,
) -> Result<(), ErrorGuaranteed> {
    let mut linked = backend.create_program();
    let stages: Vec<ShaderStage> = program.populated_stages().collect();

    for &stage in &stages {
        let slot = program.stage(stage);
        match slot.shader.and_then(|id| units.get(id.index())) {
            Some(Ok(unit)) => linked.add_stage(stage, unit),
            Some(Err(guarantee)) => return Err(*guarantee),
            None => {
                return Err(diagnostics.emit_error(
                    Diagnostic::error(ErrorCode::E9001)
                        .with_message(format!("{stage} stage has no compiled shader"))
                        .at(&slot.location)
                        .in_program(&program.name),
                ))
            }
        }
    }

    if !linked.link() {
        return Err(diagnostics.emit_error(
            Diagnostic::error(ErrorCode::E5001)
                .with_message(format!("failed to link program '{}'", program.name))
                .at(&program.location)
                .in_program(&program.name)
                .with_note(linked.info_log()),
        ));
    }
    if !linked.build_reflection() {
        return Err(diagnostics.emit_error(
            Diagnostic::error(ErrorCode::E5002)
                .with_message(format!("failed to reflect program '{}'", program.name))
                .at(&program.location)
                .in_program(&program.name)
                .with_note(linked.info_log()),
        ));
    }

    let reflection = &mut program.reflection;
    for i in 0..linked.live_uniform_block_count() {
        reflection
            .uniform_blocks
            .push(linked.live_uniform_block_name(i).to_owned());
    }
    for i in 0..linked.live_uniform_count() {
        let name = linked.live_uniform_name(i);
        reflection.uniforms.push(name.to_owned());
        if linked.live_uniform_type(i) >= OPAQUE_TYPE_THRESHOLD {
            continue;
        }
        if let Some(offset) = linked.live_uniform_buffer_offset(i) {
            reflection
                .offsets
                .insert(strip_array_suffix(name).to_owned(), offset);
        }
    }
    tracing::debug!(
        blocks = reflection.uniform_blocks.len(),
        uniforms = reflection.uniforms.len(),
        offsets = reflection.offsets.len(),
        "reflection"
    );

    if !translate {
        return Ok(());
    }
    let mut failed = None;
    for stage in stages {
        match linked.translate_to_binary(stage) {
            Ok(words) => program.stage_mut(stage).binary = words,
            Err(log) => {
                let location = program.stage(stage).location.clone();
                failed = Some(
                    diagnostics.emit_error(
                        Diagnostic::error(ErrorCode::E5003)
                            .with_message(format!("failed to translate {stage} stage to binary"))
                            .at(&location)
                            .in_program(&program.name)
                            .with_note(log),
                    ),
                );
            }
        }
    }
    match failed {
        Some(guarantee) => Err(guarantee),
        None => Ok(()),
    }
}
