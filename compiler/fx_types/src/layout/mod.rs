//! Layout engine for user-defined aggregates.
//!
//! Sizes are flat and packed: the byte size of a structure is the plain sum
//! of its members' sizes in declaration order. No alignment or padding is
//! applied, so the result does not match GPU uniform-buffer packing rules;
//! consumers that upload these structures must run their own alignment pass.

use fx_ir::{DataType, Parameter, Structure};

use crate::{ResolveError, SymbolTable};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// A structure contains itself through one or more other structures.
    #[error("structure '{}' contains itself through {}", .path[0], .path.join(" -> "))]
    Cycle { path: Vec<String> },
    #[error("size of structure '{structure}' does not fit in 32 bits")]
    Overflow { structure: String },
}

/// Byte size of any data type.
///
/// Builtins come from the kind table; user types are resolved and measured
/// with [`calculate_size`]. Fails with `Unresolved` if the structure was
/// never registered.
pub fn byte_size(ty: &DataType, symbols: &SymbolTable) -> Result<u32, LayoutError> {
    match ty {
        DataType::Builtin(kind) => Ok(kind.info().byte_size),
        DataType::UserType(name) => {
            let structure = symbols.resolve_structure(name)?;
            calculate_size(structure, symbols)
        }
    }
}

/// Packed size of a structure: the sum of member sizes, arrays multiplied out.
pub fn calculate_size(structure: &Structure, symbols: &SymbolTable) -> Result<u32, LayoutError> {
    let mut visiting = vec![structure.name.clone()];
    size_of_members(structure, symbols, &mut visiting)
}

fn size_of_members(
    structure: &Structure,
    symbols: &SymbolTable,
    visiting: &mut Vec<String>,
) -> Result<u32, LayoutError> {
    let mut sum = 0u32;
    for member in &structure.members {
        let element = match &member.ty {
            DataType::Builtin(kind) => kind.info().byte_size,
            DataType::UserType(name) => {
                let inner = enter(name, symbols, visiting)?;
                let size = size_of_members(inner, symbols, visiting)?;
                visiting.pop();
                size
            }
        };
        sum = element
            .checked_mul(member.array_size.unwrap_or(1))
            .and_then(|size| sum.checked_add(size))
            .ok_or_else(|| LayoutError::Overflow {
                structure: structure.name.clone(),
            })?;
    }
    Ok(sum)
}

/// Resolve `name` and push it on the visiting stack, failing on a revisit.
fn enter<'a>(
    name: &str,
    symbols: &'a SymbolTable,
    visiting: &mut Vec<String>,
) -> Result<&'a Structure, LayoutError> {
    if let Some(start) = visiting.iter().position(|seen| seen == name) {
        let mut path = visiting[start..].to_vec();
        path.push(name.to_owned());
        return Err(LayoutError::Cycle { path });
    }
    let inner = symbols.resolve_structure(name)?;
    visiting.push(name.to_owned());
    Ok(inner)
}

/// Whether a member of `structure` names `structure` itself as its type.
///
/// Only direct members are inspected: `A { B b; }` with `B { A a; }` is not
/// reported here. Such cycles surface later as [`LayoutError::Cycle`] when
/// the size is computed.
pub fn is_recursive(structure: &Structure, symbols: &SymbolTable) -> bool {
    structure.members.iter().any(|member| {
        member.ty.user_name().is_some_and(|name| {
            symbols
                .resolve_structure(name)
                .is_ok_and(|found| found.name == structure.name && found.location == structure.location)
        })
    })
}

/// Flatten nested structures into leaf members named `prefix.member`.
///
/// Leaves keep their type, array size and source location. Order is
/// declaration order, depth first.
pub fn unroll(
    prefix: &str,
    structure: &Structure,
    symbols: &SymbolTable,
) -> Result<Vec<Parameter>, LayoutError> {
    let mut leaves = Vec::new();
    let mut visiting = vec![structure.name.clone()];
    unroll_into(prefix, structure, symbols, &mut visiting, &mut leaves)?;
    Ok(leaves)
}

fn unroll_into(
    prefix: &str,
    structure: &Structure,
    symbols: &SymbolTable,
    visiting: &mut Vec<String>,
    leaves: &mut Vec<Parameter>,
) -> Result<(), LayoutError> {
    for member in &structure.members {
        let qualified = format!("{prefix}.{}", member.name);
        match &member.ty {
            DataType::UserType(name) => {
                let inner = enter(name, symbols, visiting)?;
                unroll_into(&qualified, inner, symbols, visiting, leaves)?;
                visiting.pop();
            }
            DataType::Builtin(_) => {
                let mut leaf = member.clone();
                leaf.name = qualified;
                leaves.push(leaf);
            }
        }
    }
    Ok(())
}
