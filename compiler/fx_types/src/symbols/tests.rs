use fx_ir::{DataType, SubroutineKind, TypeKind};
use pretty_assertions::assert_eq;

use super::*;

fn loc(line: u32) -> Location {
    Location::new("symbols.fx", line)
}

fn table() -> SymbolTable {
    let mut symbols = SymbolTable::new();
    let mut shading = Variable::new("shading", DataType::Builtin(TypeKind::Float4), loc(1));
    shading.is_subroutine_prototype = true;
    symbols.register(Symbol::Variable(shading)).unwrap();
    symbols
        .register(Symbol::Structure(Structure::new("Light", loc(2))))
        .unwrap();
    symbols
        .register(Symbol::Subroutine(Subroutine {
            name: "phong".into(),
            location: loc(3),
            kind: SubroutineKind::Implementation,
        }))
        .unwrap();
    symbols
}

#[test]
fn redefinition_keeps_first() {
    let mut symbols = table();
    let err = symbols
        .register(Symbol::RenderState(RenderState {
            name: "Light".into(),
            location: loc(9),
        }))
        .unwrap_err();
    assert_eq!(
        err,
        ResolveError::Redefinition {
            name: "Light".into(),
            previous: loc(2),
        }
    );
    assert_eq!(symbols.get("Light").map(Symbol::kind), Some(SymbolKind::Structure));
    assert_eq!(symbols.len(), 3);
}

#[test]
fn resolve_by_kind() {
    let symbols = table();
    assert_eq!(symbols.resolve_structure("Light").unwrap().location, loc(2));
    assert!(symbols.resolve_variable("shading").unwrap().is_subroutine_prototype);
    assert_eq!(
        symbols.resolve_subroutine("phong").unwrap().kind,
        SubroutineKind::Implementation
    );
}

#[test]
fn wrong_kind_is_kind_mismatch() {
    let symbols = table();
    assert_eq!(
        symbols.resolve_render_state("Light"),
        Err(ResolveError::KindMismatch {
            name: "Light".into(),
            expected: SymbolKind::RenderState,
            found: SymbolKind::Structure,
        })
    );
    assert_eq!(
        symbols.resolve_function("missing"),
        Err(ResolveError::Unresolved {
            name: "missing".into()
        })
    );
}

#[test]
fn error_messages() {
    let err = ResolveError::KindMismatch {
        name: "Light".into(),
        expected: SymbolKind::RenderState,
        found: SymbolKind::Structure,
    };
    assert_eq!(err.to_string(), "'Light' is a structure, expected render state");
}
