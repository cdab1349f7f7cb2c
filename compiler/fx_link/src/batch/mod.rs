//! Batch driver: every program of an effect through every phase.
//!
//! Declarations are checked and programs validated first, all of them, so
//! one run reports every problem. Programs that pass are resolved into one
//! shared [`ShaderPool`]; each pooled shader is generated and compiled
//! once; then each program is linked and written to its own artifact. An
//! error in any phase stops only the program it belongs to. Errors in
//! shared declarations stop every program, since any of them may use the
//! broken declaration.

use std::fs;
use std::path::{Path, PathBuf};

use fx_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode, ErrorGuaranteed};
use fx_ir::{Effect, Header, HeaderFlags};
use fx_types::{DeclarationChecker, SymbolTable};
use rayon::prelude::*;

use crate::{
    build_shaders, compile, generate, type_check, Backend, BackendSession, BinWriter, Generator,
    LinkOptions, LinkStrategy, Program, Shader, ShaderPool,
};

/// File extension of a compiled program.
pub const ARTIFACT_EXTENSION: &str = "fxb";

/// A program and how far it got.
#[derive(Debug)]
pub struct LinkedProgram {
    pub program: Program,
    pub status: Result<(), ErrorGuaranteed>,
}

/// Every program of an effect after Backend-Link, with the pool they share.
#[derive(Debug)]
pub struct LinkedEffect {
    pub programs: Vec<LinkedProgram>,
    pub pool: ShaderPool,
}

/// What a run wrote and which programs it gave up on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkReport {
    pub artifacts: Vec<PathBuf>,
    pub failed: Vec<String>,
}

impl LinkReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Linker<'a, G: Generator> {
    generator: &'a G,
    header: &'a Header,
    options: LinkOptions,
    out_dir: PathBuf,
}

impl<'a, G: Generator> Linker<'a, G> {
    pub fn new(generator: &'a G, header: &'a Header, out_dir: impl Into<PathBuf>) -> Self {
        Linker {
            generator,
            header,
            options: LinkOptions::default(),
            out_dir: out_dir.into(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: LinkOptions) -> Self {
        self.options = options;
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Link and write every program of `effect` inside one backend session.
    #[tracing::instrument(level = "debug", skip_all, fields(effect = %effect.name, profile = %self.header))]
    pub fn run<B: Backend>(
        &self,
        backend: &B,
        effect: &Effect,
        diagnostics: &mut DiagnosticQueue,
    ) -> LinkReport {
        let session = match BackendSession::acquire(backend) {
            Ok(session) => session,
            Err(message) => {
                let _ = diagnostics.emit_error(
                    Diagnostic::error(ErrorCode::E9001).with_message(format!(
                        "cannot start backend '{}': {message}",
                        backend.name()
                    )),
                );
                return LinkReport {
                    artifacts: Vec::new(),
                    failed: effect.programs.iter().map(|p| p.name.clone()).collect(),
                };
            }
        };
        let linked = self.link(&session, effect, diagnostics);
        self.write(&linked, diagnostics)
    }

    /// Phases 1 to 4 for every program of `effect`.
    pub fn link<B: Backend>(
        &self,
        session: &BackendSession<'_, B>,
        effect: &Effect,
        diagnostics: &mut DiagnosticQueue,
    ) -> LinkedEffect {
        let mut symbols = SymbolTable::new();
        let before = diagnostics.error_count();
        DeclarationChecker::new(&mut symbols, diagnostics).check_effect(effect);
        let declarations = ErrorGuaranteed::from_error_count(diagnostics.error_count() - before);

        let mut programs: Vec<LinkedProgram> = effect
            .programs
            .iter()
            .map(|decl| {
                let mut program = Program::from_decl(decl);
                let status = type_check(&mut program, &mut symbols, diagnostics, &self.options)
                    .and(declarations.map_or(Ok(()), Err));
                LinkedProgram { program, status }
            })
            .collect();

        let mut pool = ShaderPool::new();
        for linked in programs.iter_mut().filter(|p| p.status.is_ok()) {
            linked.status = build_shaders(
                &mut linked.program,
                &symbols,
                self.header,
                &mut pool,
                diagnostics,
            );
        }
        tracing::debug!(shaders = pool.len(), programs = programs.len(), "shaders resolved");

        let backend = session.backend();
        let units: Vec<Result<B::Unit, ErrorGuaranteed>> =
            if LinkStrategy::for_header(self.header).needs_units() {
                pool.iter()
                    .map(|(_, shader)| self.compile_shader(backend, shader, diagnostics))
                    .collect()
            } else {
                Vec::new()
            };

        if self.options.parallel {
            self.link_parallel(backend, &mut programs, &units, diagnostics);
        } else {
            for linked in programs.iter_mut().filter(|p| p.status.is_ok()) {
                linked.status =
                    generate(&mut linked.program, &units, backend, self.header, diagnostics);
            }
        }

        LinkedEffect { programs, pool }
    }

    /// Backend-Link with one task per program on a scoped thread pool.
    ///
    /// Each task reports into its own queue; queues are merged in program
    /// order afterwards, so output does not depend on scheduling.
    fn link_parallel<B: Backend>(
        &self,
        backend: &B,
        programs: &mut [LinkedProgram],
        units: &[Result<B::Unit, ErrorGuaranteed>],
        diagnostics: &mut DiagnosticQueue,
    ) {
        let template = diagnostics.fork();
        let header = self.header;
        let link_one = |linked: &mut LinkedProgram| {
            let mut queue = template.fork();
            linked.status = generate(&mut linked.program, units, backend, header, &mut queue);
            queue
        };

        let queues: Vec<DiagnosticQueue> = rayon::ThreadPoolBuilder::new()
            .build_scoped(rayon::ThreadBuilder::run, |pool| {
                pool.install(|| {
                    programs
                        .par_iter_mut()
                        .filter(|p| p.status.is_ok())
                        .map(link_one)
                        .collect()
                })
            })
            .unwrap_or_else(|e| {
                tracing::warn!("failed to create thread pool ({e}), linking sequentially");
                programs
                    .iter_mut()
                    .filter(|p| p.status.is_ok())
                    .map(link_one)
                    .collect()
            });

        for queue in queues {
            diagnostics.merge(queue);
        }
    }

    /// Generate and compile one pooled shader.
    fn compile_shader<B: Backend>(
        &self,
        backend: &B,
        shader: &Shader,
        diagnostics: &mut DiagnosticQueue,
    ) -> Result<B::Unit, ErrorGuaranteed> {
        let context = format!("shader '{}'", shader.identity);
        let source = self.generator.generate(shader, self.header).map_err(|message| {
            diagnostics.emit_error(
                Diagnostic::error(ErrorCode::E5004)
                    .with_message(format!("cannot generate {} source: {message}", shader.stage))
                    .at(&shader.function.location)
                    .in_context(context.clone()),
            )
        })?;

        if self.header.has(HeaderFlags::OUTPUT_GENERATED_SHADERS) {
            self.dump_source(shader, &source, diagnostics);
        }

        backend
            .compile_stage(shader.stage, &source, self.header)
            .map_err(|log| {
                diagnostics.emit_error(
                    Diagnostic::error(ErrorCode::E5004)
                        .with_message(format!("{} shader failed to compile", shader.stage))
                        .at(&shader.function.location)
                        .in_context(context)
                        .with_note(log),
                )
            })
    }

    fn dump_source(&self, shader: &Shader, source: &str, diagnostics: &mut DiagnosticQueue) {
        let path = self.out_dir.join(format!(
            "{}.{}.glsl",
            sanitize_file_stem(&shader.identity),
            shader.stage.extension()
        ));
        match fs::create_dir_all(&self.out_dir).and_then(|()| fs::write(&path, source)) {
            Ok(()) => tracing::debug!(path = %path.display(), "generated source written"),
            Err(e) => {
                let _ = diagnostics.emit_error(
                    Diagnostic::error(ErrorCode::E6001)
                        .with_message(format!("cannot write '{}': {e}", path.display()))
                        .at(&shader.function.location),
                );
            }
        }
    }

    /// Phase 5: one artifact per program that got through linking.
    pub fn write(&self, linked: &LinkedEffect, diagnostics: &mut DiagnosticQueue) -> LinkReport {
        let mut report = LinkReport::default();
        for LinkedProgram { program, status } in &linked.programs {
            if status.is_err() {
                report.failed.push(program.name.clone());
                continue;
            }

            let mut writer = BinWriter::new();
            compile(program, &linked.pool, &mut writer);
            let path = self
                .out_dir
                .join(format!("{}.{ARTIFACT_EXTENSION}", program.name));
            let written = fs::create_dir_all(&self.out_dir)
                .map_err(Into::into)
                .and_then(|()| writer.write_to(&path));
            match written {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), bytes = writer.len(), "program written");
                    report.artifacts.push(path);
                }
                Err(e) => {
                    let _ = diagnostics.emit_error(
                        Diagnostic::error(ErrorCode::E6001)
                            .with_message(format!("cannot write '{}': {e}", path.display()))
                            .at(&program.location)
                            .in_program(&program.name),
                    );
                    report.failed.push(program.name.clone());
                }
            }
        }
        report
    }
}

/// Keep ASCII letters, digits, `_` and `-`; everything else becomes `_`.
fn sanitize_file_stem(identity: &str) -> String {
    let stem: String = identity
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    stem.trim_end_matches('_').to_owned()
}
