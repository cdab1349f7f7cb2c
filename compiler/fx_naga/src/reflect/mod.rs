//! Uniform reflection over naga modules, reported the way a GL program
//! object reports its active uniforms.

use naga::{
    AddressSpace, ArraySize, Handle, ImageClass, ImageDimension, Module, Scalar, ScalarKind,
    Type, TypeInner,
};

const FLOAT: u32 = 0x1406;
const INT: u32 = 0x1404;
const UNSIGNED_INT: u32 = 0x1405;
const DOUBLE: u32 = 0x140A;
const BOOL: u32 = 0x8B56;
const FLOAT_VEC2: u32 = 0x8B50;
const INT_VEC2: u32 = 0x8B53;
const BOOL_VEC2: u32 = 0x8B57;
const UNSIGNED_INT_VEC2: u32 = 0x8DC6;
const DOUBLE_VEC2: u32 = 0x8FFC;
const SAMPLER_1D: u32 = 0x8B5D;
const SAMPLER_2D: u32 = 0x8B5E;
const SAMPLER_3D: u32 = 0x8B5F;
const SAMPLER_CUBE: u32 = 0x8B60;
const SAMPLER_2D_SHADOW: u32 = 0x8B62;
const IMAGE_2D: u32 = 0x904D;

/// One uniform as a GL program would list it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReflectedUniform {
    pub name: String,
    /// GL type id.
    pub ty: u32,
    /// Byte offset in the block, `None` for opaque bindings.
    pub offset: Option<u32>,
}

/// GL type id of a naga type. Arrays report their element type.
/// `None` for types a GL program never lists as a uniform.
pub fn gl_type_id(module: &Module, ty: Handle<Type>) -> Option<u32> {
    match module.types[ty].inner {
        TypeInner::Scalar(scalar) => vector_id(scalar, 1),
        TypeInner::Vector { size, scalar } => vector_id(scalar, size as u32),
        TypeInner::Matrix {
            columns,
            rows,
            scalar,
        } if scalar.kind == ScalarKind::Float && scalar.width == 4 => {
            matrix_id(columns as u32, rows as u32)
        }
        TypeInner::Array { base, .. } | TypeInner::BindingArray { base, .. } => {
            gl_type_id(module, base)
        }
        TypeInner::Image { dim, class, .. } => Some(image_id(dim, class)),
        TypeInner::Sampler { comparison } => Some(if comparison {
            SAMPLER_2D_SHADOW
        } else {
            SAMPLER_2D
        }),
        _ => None,
    }
}

fn vector_id(scalar: Scalar, size: u32) -> Option<u32> {
    let base = match (scalar.kind, scalar.width) {
        (ScalarKind::Float, 4) => [FLOAT, FLOAT_VEC2],
        (ScalarKind::Float, 8) => [DOUBLE, DOUBLE_VEC2],
        (ScalarKind::Sint, 4) => [INT, INT_VEC2],
        (ScalarKind::Uint, 4) => [UNSIGNED_INT, UNSIGNED_INT_VEC2],
        (ScalarKind::Bool, _) => [BOOL, BOOL_VEC2],
        _ => return None,
    };
    match size {
        1 => Some(base[0]),
        2..=4 => Some(base[1] + size - 2),
        _ => None,
    }
}

fn matrix_id(columns: u32, rows: u32) -> Option<u32> {
    match (columns, rows) {
        (2, 2) => Some(0x8B5A),
        (3, 3) => Some(0x8B5B),
        (4, 4) => Some(0x8B5C),
        (2, 3) => Some(0x8B65),
        (2, 4) => Some(0x8B66),
        (3, 2) => Some(0x8B67),
        (3, 4) => Some(0x8B68),
        (4, 2) => Some(0x8B69),
        (4, 3) => Some(0x8B6A),
        _ => None,
    }
}

fn image_id(dim: ImageDimension, class: ImageClass) -> u32 {
    match class {
        ImageClass::Depth { .. } => SAMPLER_2D_SHADOW,
        ImageClass::Storage { .. } => IMAGE_2D,
        ImageClass::Sampled { .. } => match dim {
            ImageDimension::D1 => SAMPLER_1D,
            ImageDimension::D2 => SAMPLER_2D,
            ImageDimension::D3 => SAMPLER_3D,
            ImageDimension::Cube => SAMPLER_CUBE,
        },
    }
}

/// Live uniform blocks and uniforms of one stage module.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct StageReflection {
    pub blocks: Vec<String>,
    pub uniforms: Vec<ReflectedUniform>,
}

/// Collect the uniform and handle globals any entry point of `module` uses.
pub(crate) fn reflect_stage(module: &Module, info: &naga::valid::ModuleInfo) -> StageReflection {
    let mut reflection = StageReflection::default();
    for (handle, global) in module.global_variables.iter() {
        let live = (0..module.entry_points.len())
            .any(|i| !info.get_entry_point(i)[handle].is_empty());
        if !live {
            continue;
        }
        match global.space {
            AddressSpace::Uniform => {
                // An instance-less block is named by its type, e.g.
                // `uniform Globals { .. };`. Members of a named instance are
                // listed as `Block.member`.
                let block = module.types[global.ty]
                    .name
                    .clone()
                    .or_else(|| global.name.clone())
                    .unwrap_or_default();
                let prefix = if global.name.is_some() {
                    block.clone()
                } else {
                    String::new()
                };
                flatten(module, &prefix, global.ty, 0, &mut reflection.uniforms);
                reflection.blocks.push(block);
            }
            AddressSpace::Handle => {
                let (Some(name), Some(ty)) = (&global.name, gl_type_id(module, global.ty)) else {
                    continue;
                };
                reflection.uniforms.push(ReflectedUniform {
                    name: array_name(module, global.ty, name),
                    ty,
                    offset: None,
                });
            }
            _ => {}
        }
    }
    reflection
}

/// List the leaves of a block type, the way GL names them: struct members
/// joined with `.`, arrays as their first element `[0]`.
fn flatten(
    module: &Module,
    prefix: &str,
    ty: Handle<Type>,
    offset: u32,
    out: &mut Vec<ReflectedUniform>,
) {
    match &module.types[ty].inner {
        TypeInner::Struct { members, .. } => {
            for member in members {
                let name = member.name.as_deref().unwrap_or_default();
                let path = if prefix.is_empty() {
                    name.to_owned()
                } else {
                    format!("{prefix}.{name}")
                };
                flatten(module, &path, member.ty, offset + member.offset, out);
            }
        }
        TypeInner::Array { base, .. }
            if matches!(module.types[*base].inner, TypeInner::Struct { .. }) =>
        {
            flatten(module, &format!("{prefix}[0]"), *base, offset, out);
        }
        _ => {
            if let Some(id) = gl_type_id(module, ty) {
                out.push(ReflectedUniform {
                    name: array_name(module, ty, prefix),
                    ty: id,
                    offset: Some(offset),
                });
            }
        }
    }
}

fn array_name(module: &Module, ty: Handle<Type>, name: &str) -> String {
    match module.types[ty].inner {
        TypeInner::Array { .. }
        | TypeInner::BindingArray {
            size: ArraySize::Constant(_),
            ..
        } => format!("{name}[0]"),
        _ => name.to_owned(),
    }
}
