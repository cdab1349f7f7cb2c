use crate::{Function, ProgramDecl, RenderState, Structure, Subroutine, Variable};

/// Everything parsed from one effect source, in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Effect {
    pub name: String,
    pub file: String,
    pub structures: Vec<Structure>,
    pub variables: Vec<Variable>,
    pub subroutines: Vec<Subroutine>,
    pub render_states: Vec<RenderState>,
    pub functions: Vec<Function>,
    pub programs: Vec<ProgramDecl>,
}

impl Effect {
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Effect {
            name: name.into(),
            file: file.into(),
            ..Effect::default()
        }
    }
}

/// Effect name for a source path: the file stem with `snake_case` turned
/// into `PascalCase`, e.g. `deferred_light.fx` becomes `DeferredLight`.
pub fn effect_name_from_path(path: &str) -> String {
    let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);

    let mut name = String::with_capacity(stem.len());
    let mut upper = true;
    for c in stem.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            name.extend(c.to_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}
