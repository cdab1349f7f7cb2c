//! Registration checks for effect declarations.
//!
//! Runs before program linking: every structure, variable, subroutine,
//! render state and function is registered in the symbol table, then the
//! parts of each declaration the linker later depends on are verified
//! (member and parameter types resolve, slots are unique, structures do not
//! contain themselves). Problems are reported to the queue and checking
//! continues with the next declaration.

use fx_diagnostic::{
    kind_mismatch, redefinition, unresolved, Diagnostic, DiagnosticQueue, ErrorCode,
};
use fx_ir::{DataType, Effect, Function, Location, Structure, Variable};
use rustc_hash::FxHashMap;

use crate::{is_recursive, ResolveError, Symbol, SymbolKind, SymbolTable};

/// Registers declarations and reports what is wrong with them.
pub struct DeclarationChecker<'a> {
    symbols: &'a mut SymbolTable,
    diagnostics: &'a mut DiagnosticQueue,
}

impl<'a> DeclarationChecker<'a> {
    pub fn new(symbols: &'a mut SymbolTable, diagnostics: &'a mut DiagnosticQueue) -> Self {
        DeclarationChecker {
            symbols,
            diagnostics,
        }
    }

    /// Check every non-program declaration of an effect.
    ///
    /// Every declaration is registered before any type is checked, so a
    /// type may name a declaration that appears later in the effect, and a
    /// type naming a non-structure is a kind mismatch wherever it is
    /// declared. Redefinitions are not checked further.
    #[tracing::instrument(level = "debug", skip_all, fields(effect = %effect.name))]
    pub fn check_effect(&mut self, effect: &Effect) {
        let before = self.diagnostics.error_count();

        let structures: Vec<&Structure> = effect
            .structures
            .iter()
            .filter(|s| self.register(Symbol::Structure((*s).clone()), "structure"))
            .collect();
        let variables: Vec<&Variable> = effect
            .variables
            .iter()
            .filter(|v| self.register(Symbol::Variable((*v).clone()), "variable"))
            .collect();
        for subroutine in &effect.subroutines {
            self.register(Symbol::Subroutine(subroutine.clone()), "subroutine");
        }
        for render_state in &effect.render_states {
            self.register(Symbol::RenderState(render_state.clone()), "render state");
        }
        let functions: Vec<&Function> = effect
            .functions
            .iter()
            .filter(|f| self.register(Symbol::Function((*f).clone()), "function"))
            .collect();

        for structure in structures {
            self.check_structure(structure);
        }
        for variable in variables {
            self.check_type(&variable.ty, &variable.location, &variable.name);
        }
        for function in functions {
            self.check_function(function);
        }

        tracing::debug!(
            symbols = self.symbols.len(),
            errors = self.diagnostics.error_count() - before,
            "declarations checked"
        );
    }

    /// Recursion and member types of a registered structure.
    fn check_structure(&mut self, structure: &Structure) {
        if is_recursive(structure, self.symbols) {
            let _ = self.diagnostics.emit_error(
                Diagnostic::error(ErrorCode::E1004)
                    .with_message(format!(
                        "structure '{}' includes itself as a member",
                        structure.name
                    ))
                    .at(&structure.location),
            );
        }

        for member in &structure.members {
            // A self reference was reported above; it does resolve.
            if member.ty.user_name() == Some(structure.name.as_str()) {
                continue;
            }
            self.check_type(&member.ty, &member.location, &structure.name);
        }
    }

    /// Parameter types and slot uniqueness of a registered function.
    fn check_function(&mut self, function: &Function) {
        self.check_type(&function.return_type, &function.location, &function.name);
        for param in &function.parameters {
            self.check_type(&param.ty, &param.location, &function.name);
        }

        self.check_unique_slots(function, "input", function.inputs().zip(function.input_slots()));
        self.check_unique_slots(function, "output", function.outputs().zip(function.output_slots()));
    }

    fn check_unique_slots<'p>(
        &mut self,
        function: &Function,
        list: &str,
        slots: impl Iterator<Item = (&'p fx_ir::Parameter, u32)>,
    ) {
        let mut taken: FxHashMap<u32, &str> = FxHashMap::default();
        for (param, slot) in slots {
            if let Some(first) = taken.insert(slot, &param.name) {
                let _ = self.diagnostics.emit_error(
                    Diagnostic::error(ErrorCode::E1005)
                        .with_message(format!(
                            "{list} parameters '{first}' and '{}' share slot {slot}",
                            param.name
                        ))
                        .at(&param.location)
                        .in_context(format!("function '{}'", function.name)),
                );
            }
        }
    }

    /// A user type must name a registered structure.
    fn check_type(&mut self, ty: &DataType, location: &Location, owner: &str) {
        let DataType::UserType(name) = ty else {
            return;
        };
        let diag = match self.symbols.resolve_structure(name) {
            Ok(_) => return,
            Err(ResolveError::KindMismatch { found, .. }) => {
                kind_mismatch(name, &SymbolKind::Structure.to_string(), &found.to_string(), location)
            }
            Err(_) => unresolved("type", name, location),
        };
        let _ = self.diagnostics.emit_error(diag.in_context(format!("'{owner}'")));
    }

    /// Register a symbol, reporting a redefinition. Returns whether it was added.
    fn register(&mut self, symbol: Symbol, kind: &str) -> bool {
        let name = symbol.name().to_owned();
        let location = symbol.location().clone();
        match self.symbols.register(symbol) {
            Ok(()) => true,
            Err(ResolveError::Redefinition { previous, .. }) => {
                let _ = self
                    .diagnostics
                    .emit_error(redefinition(kind, &name, &location, &previous));
                false
            }
            Err(other) => {
                let _ = self.diagnostics.emit_error(
                    Diagnostic::error(ErrorCode::E9001)
                        .with_message(format!("unexpected registration failure: {other}"))
                        .at(&location),
                );
                false
            }
        }
    }
}
