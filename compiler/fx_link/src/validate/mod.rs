//! The Validate phase.
//!
//! Every name a program uses is resolved against the symbol table. Each
//! problem is reported on its own and checking continues, so one pass shows
//! everything wrong with a program. Only a program redefinition stops early.

use fx_diagnostic::{
    kind_mismatch, redefinition, unresolved, Diagnostic, DiagnosticQueue, ErrorCode,
    ErrorGuaranteed,
};
use fx_ir::{Function, FunctionAttribute, ShaderStage, SubroutineKind};
use fx_types::{ProgramSymbol, ResolveError, Symbol, SymbolKind, SymbolTable};
use rustc_hash::FxHashSet;

use crate::{LinkOptions, Program};

/// Stages that pass data to each other, in pipeline order.
const GRAPHICS_STAGES: [ShaderStage; 5] = [
    ShaderStage::Vertex,
    ShaderStage::Hull,
    ShaderStage::Domain,
    ShaderStage::Geometry,
    ShaderStage::Pixel,
];

/// Validate a collected program and register it as a symbol.
///
/// Sets the program's patch size from the hull shader. Returns `Err` if any
/// error was reported for this program.
#[tracing::instrument(level = "debug", skip_all, fields(program = %program.name))]
pub fn type_check(
    program: &mut Program,
    symbols: &mut SymbolTable,
    diagnostics: &mut DiagnosticQueue,
    options: &LinkOptions,
) -> Result<(), ErrorGuaranteed> {
    let registered = symbols.register(Symbol::Program(ProgramSymbol {
        name: program.name.clone(),
        location: program.location.clone(),
    }));
    if let Err(ResolveError::Redefinition { previous, .. }) = registered {
        return Err(diagnostics.emit_error(redefinition(
            "program",
            &program.name,
            &program.location,
            &previous,
        )));
    }

    let mut checker = ProgramChecker {
        program,
        symbols,
        diagnostics,
        failed: None,
    };
    checker.check_annotation();
    checker.check_invalid_rows();
    checker.check_subroutines();
    checker.check_render_state();
    let functions = checker.check_stage_functions();

    if let Some(hull) = functions[ShaderStage::Hull.index()] {
        checker.program.patch_size = hull.int_flag(FunctionAttribute::InputVertices);
    }
    if options.interface_validation {
        checker.check_interfaces(&functions);
    }

    match checker.failed {
        Some(guarantee) => Err(guarantee),
        None => Ok(()),
    }
}

struct ProgramChecker<'a> {
    program: &'a mut Program,
    symbols: &'a SymbolTable,
    diagnostics: &'a mut DiagnosticQueue,
    failed: Option<ErrorGuaranteed>,
}

impl<'a> ProgramChecker<'a> {
    fn error(&mut self, diag: Diagnostic) {
        let diag = diag.in_program(&self.program.name);
        self.failed = Some(self.diagnostics.emit_error(diag));
    }

    fn check_annotation(&mut self) {
        let Some(annotation) = self.program.annotation.clone() else {
            return;
        };
        let mut keys = FxHashSet::default();
        for entry in &annotation.entries {
            if !keys.insert(entry.key.as_str()) {
                self.error(
                    Diagnostic::error(ErrorCode::E1001)
                        .with_message(format!(
                            "annotation key '{}' is defined more than once",
                            entry.key
                        ))
                        .at(&annotation.location),
                );
            }
        }
    }

    fn check_invalid_rows(&mut self) {
        for row in std::mem::take(&mut self.program.invalid_rows) {
            self.error(
                Diagnostic::error(ErrorCode::E2001)
                    .with_message(format!("invalid program flag '{}'", row.flag))
                    .at(&row.location),
            );
            self.program.invalid_rows.push(row);
        }
    }

    /// Interfaces must be subroutine prototype variables, implementations
    /// must be subroutines declared as implementations.
    fn check_subroutines(&mut self) {
        let symbols = self.symbols;
        let mut bindings = Vec::new();
        for stage in self.program.populated_stages() {
            let slot = self.program.stage(stage);
            for (interface, implementation) in &slot.subroutines {
                bindings.push((interface.clone(), implementation.clone(), slot.location.clone()));
            }
        }

        for (interface, implementation, location) in bindings {
            match symbols.resolve(&interface) {
                Err(_) => self.error(unresolved("subroutine interface", &interface, &location)),
                Ok(Symbol::Variable(variable)) if !variable.is_subroutine_prototype => self.error(
                    Diagnostic::error(ErrorCode::E1003)
                        .with_message(format!("symbol '{interface}' is not of subroutine type"))
                        .at(&location),
                ),
                Ok(Symbol::Variable(_)) => {}
                Ok(other) => self.error(
                    kind_mismatch(
                        &interface,
                        "subroutine prototype",
                        &other.kind().to_string(),
                        &location,
                    ),
                ),
            }

            match symbols.resolve_subroutine(&implementation) {
                Ok(subroutine) if subroutine.kind != SubroutineKind::Implementation => self.error(
                    Diagnostic::error(ErrorCode::E1003)
                        .with_message(format!(
                            "subroutine '{implementation}' must be declared as a subroutine implementation"
                        ))
                        .at(&location),
                ),
                Ok(_) => {}
                Err(ResolveError::KindMismatch { found, .. }) => self.error(kind_mismatch(
                    &implementation,
                    &SymbolKind::Subroutine.to_string(),
                    &found.to_string(),
                    &location,
                )),
                Err(_) => self.error(unresolved(
                    "subroutine implementation",
                    &implementation,
                    &location,
                )),
            }
        }
    }

    fn check_render_state(&mut self) {
        let location = self.program.render_state_location.clone();
        let Some(name) = self.program.render_state.clone() else {
            self.error(
                Diagnostic::error(ErrorCode::E2002)
                    .with_message("program has no RenderState")
                    .at(&location),
            );
            return;
        };
        match self.symbols.resolve_render_state(&name) {
            Ok(_) => {}
            Err(ResolveError::KindMismatch { found, .. }) => self.error(kind_mismatch(
                &name,
                &SymbolKind::RenderState.to_string(),
                &found.to_string(),
                &location,
            )),
            Err(_) => self.error(unresolved("render state", &name, &location)),
        }
    }

    /// Resolve the function of every populated stage. Entries are `None` for
    /// empty stages and for functions that failed to resolve.
    fn check_stage_functions(&mut self) -> [Option<&'a Function>; ShaderStage::COUNT] {
        let symbols = self.symbols;
        let mut functions = [None; ShaderStage::COUNT];

        for stage in ShaderStage::ALL {
            let slot = self.program.stage(stage);
            if !slot.populated {
                continue;
            }
            let (name, location) = (slot.function.clone(), slot.location.clone());
            match symbols.resolve_function(&name) {
                Ok(function) if function.is_shader => functions[stage.index()] = Some(function),
                Ok(_) => self.error(
                    Diagnostic::error(ErrorCode::E1003)
                        .with_message(format!("function '{name}' is not marked as a shader"))
                        .at(&location),
                ),
                Err(ResolveError::KindMismatch { found, .. }) => self.error(kind_mismatch(
                    &name,
                    &SymbolKind::Function.to_string(),
                    &found.to_string(),
                    &location,
                )),
                Err(_) => self.error(
                    Diagnostic::error(ErrorCode::E1002)
                        .with_message(format!("{stage} shader '{name}' is not defined"))
                        .at(&location),
                ),
            }
        }
        functions
    }

    /// Cross-stage checks: tessellation stages come in pairs with matching
    /// control point counts, and every stage reads no more than the
    /// previous populated stage writes, with matching types.
    fn check_interfaces(&mut self, functions: &[Option<&'a Function>; ShaderStage::COUNT]) {
        let has_hull = self.program.is_populated(ShaderStage::Hull);
        let has_domain = self.program.is_populated(ShaderStage::Domain);
        if has_hull != has_domain {
            let (present, missing) = if has_hull {
                (ShaderStage::Hull, ShaderStage::Domain)
            } else {
                (ShaderStage::Domain, ShaderStage::Hull)
            };
            let location = self.program.stage(present).location.clone();
            self.error(
                Diagnostic::error(ErrorCode::E2006)
                    .with_message(format!("{present} shader without a {missing} shader"))
                    .at(&location),
            );
        }

        if let (Some(hull), Some(domain)) = (
            functions[ShaderStage::Hull.index()],
            functions[ShaderStage::Domain.index()],
        ) {
            let produced = hull.int_flag(FunctionAttribute::OutputVertices);
            let expected = domain.int_flag(FunctionAttribute::InputVertices);
            if produced != expected {
                self.error(
                    Diagnostic::error(ErrorCode::E2005)
                        .with_message(format!(
                            "hull shader '{}' outputs {produced} control points but domain shader '{}' expects {expected}",
                            hull.name, domain.name
                        ))
                        .at(&domain.location),
                );
            }
        }

        // Pairs across a stage that failed to resolve would be meaningless.
        let mut chain = Vec::new();
        for stage in GRAPHICS_STAGES {
            if !self.program.is_populated(stage) {
                continue;
            }
            match functions[stage.index()] {
                Some(function) => chain.push((stage, function)),
                None => return,
            }
        }

        for pair in chain.windows(2) {
            let [(from, producer), (to, consumer)] = [pair[0], pair[1]];
            self.check_linkage(from, producer, to, consumer);
        }
    }

    fn check_linkage(
        &mut self,
        from: ShaderStage,
        producer: &Function,
        to: ShaderStage,
        consumer: &Function,
    ) {
        let outputs: Vec<_> = producer.outputs().collect();
        let inputs: Vec<_> = consumer.inputs().collect();

        if outputs.len() < inputs.len() {
            self.error(
                Diagnostic::error(ErrorCode::E2003)
                    .with_message(format!(
                        "{to} shader '{}' reads {} inputs but {from} shader '{}' writes only {}",
                        consumer.name,
                        inputs.len(),
                        producer.name,
                        outputs.len()
                    ))
                    .at(&consumer.location),
            );
        }

        // Pairs that do line up are still checked.
        for (input, output) in inputs.into_iter().zip(outputs) {
            if !input.compatible(output) {
                self.error(
                    Diagnostic::error(ErrorCode::E2004)
                        .with_message(format!(
                            "cannot implicitly convert from type '{}' ({}) to type '{}' ({}) in linkage between {from} ({}) and {to} ({}) shaders",
                            output.ty, output.name, input.ty, input.name, producer.name, consumer.name
                        ))
                        .at(&input.location),
                );
            }
        }
    }
}
