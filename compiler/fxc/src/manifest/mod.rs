//! Effect manifests.
//!
//! A manifest is the JSON form of what the effect parser hands the linker:
//! declarations with their source lines, and programs as rows. Stage code
//! is inline (`code`) or in a file next to the manifest (`code_file`).
//!
//! ```json
//! {
//!   "name": "Sky",
//!   "render_states": [{ "name": "Opaque", "line": 1 }],
//!   "functions": [{
//!     "name": "VSSky", "line": 10, "shader": true, "code_file": "sky.vert",
//!     "parameters": [{ "name": "position", "type": "vec3" }]
//!   }],
//!   "programs": [{
//!     "name": "Sky", "line": 30,
//!     "rows": [{ "flag": "VertexShader", "value": "VSSky", "line": 31 }]
//!   }]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use fx_ir::{
    effect_name_from_path, Annotation, AnnotationEntry, AnnotationValue, DataType, Direction,
    Effect, Function, FunctionAttribute, Location, Parameter, ProgramDecl, ProgramRow,
    RenderState, Structure, Subroutine, SubroutineKind, TypeKind, Variable,
};
use fx_ir::ty::UNDEFINED_NAME;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("'{}' is not a valid manifest: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{file}:{line}: '{name}' has an empty type")]
    EmptyType { file: String, line: u32, name: String },
    #[error("{file}:{line}: function '{name}' has both `code` and `code_file`")]
    AmbiguousCode { file: String, line: u32, name: String },
}

#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: Option<String>,
    /// Source file named in locations; the manifest path when absent.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub structures: Vec<StructureEntry>,
    #[serde(default)]
    pub variables: Vec<VariableEntry>,
    #[serde(default)]
    pub subroutines: Vec<SubroutineEntry>,
    #[serde(default)]
    pub render_states: Vec<NamedEntry>,
    #[serde(default)]
    pub functions: Vec<FunctionEntry>,
    #[serde(default)]
    pub programs: Vec<ProgramEntry>,
}

#[derive(Debug, Deserialize)]
pub struct NamedEntry {
    pub name: String,
    #[serde(default)]
    pub line: u32,
}

#[derive(Debug, Deserialize)]
pub struct StructureEntry {
    pub name: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub members: Vec<ParameterEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ParameterEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub direction: DirectionEntry,
    #[serde(default)]
    pub array_size: Option<u32>,
    #[serde(default)]
    pub slot: Option<u32>,
    #[serde(default)]
    pub color_attachment: Option<u32>,
}

#[derive(Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionEntry {
    #[default]
    In,
    Out,
    InOut,
}

#[derive(Debug, Deserialize)]
pub struct VariableEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub array_size: Option<u32>,
    #[serde(default)]
    pub subroutine: bool,
}

#[derive(Debug, Deserialize)]
pub struct SubroutineEntry {
    pub name: String,
    #[serde(default)]
    pub line: u32,
    pub kind: SubroutineKindEntry,
}

#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubroutineKindEntry {
    Signature,
    Implementation,
}

#[derive(Debug, Deserialize)]
pub struct FunctionEntry {
    pub name: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub shader: bool,
    #[serde(default)]
    pub parameters: Vec<ParameterEntry>,
    #[serde(default)]
    pub attributes: BTreeMap<AttributeEntry, u32>,
    #[serde(default)]
    pub code: Option<String>,
    /// Path relative to the manifest.
    #[serde(default)]
    pub code_file: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeEntry {
    InputVertices,
    OutputVertices,
    MaxVertexCount,
    Instances,
    LocalSizeX,
    LocalSizeY,
    LocalSizeZ,
}

#[derive(Debug, Deserialize)]
pub struct ProgramEntry {
    pub name: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub rows: Vec<RowEntry>,
    #[serde(default)]
    pub annotation: Option<AnnotationEntryList>,
}

#[derive(Debug, Deserialize)]
pub struct RowEntry {
    pub flag: String,
    pub value: String,
    #[serde(default)]
    pub line: u32,
    /// `interface -> implementation`.
    #[serde(default)]
    pub subroutines: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct AnnotationEntryList {
    #[serde(default)]
    pub line: u32,
    pub entries: Vec<KeyValueEntry>,
}

#[derive(Debug, Deserialize)]
pub struct KeyValueEntry {
    pub key: String,
    pub value: ValueEntry,
}

/// `{ "int": -1 }`, `{ "string": "opaque" }`, ...
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueEntry {
    Int(i32),
    Uint(u32),
    Float(f32),
    Double(f64),
    Bool(bool),
    String(String),
}

impl Manifest {
    pub fn parse(text: &str, path: &Path) -> Result<Manifest, ManifestError> {
        serde_json::from_str(text).map_err(|source| ManifestError::Json {
            path: path.to_owned(),
            source,
        })
    }

    /// Read a manifest and turn it into an [`Effect`].
    #[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Effect, ManifestError> {
        let text = read(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Manifest::parse(&text, path)?.into_effect(path, base)
    }

    /// Convert to an [`Effect`]. `code_file` paths are resolved against `base`.
    pub fn into_effect(self, path: &Path, base: &Path) -> Result<Effect, ManifestError> {
        let path_text = path.to_string_lossy();
        let file = self.file.unwrap_or_else(|| path_text.clone().into_owned());
        let name = self
            .name
            .unwrap_or_else(|| effect_name_from_path(&path_text));
        let at = |line: u32| Location::new(file.clone(), line);
        let mut effect = Effect::new(name, file.clone());

        for entry in self.structures {
            let mut structure = Structure::new(entry.name, at(entry.line));
            for member in entry.members {
                structure.members.push(parameter(member, entry.line, &file)?);
            }
            effect.structures.push(structure);
        }

        for entry in self.variables {
            let ty = data_type(&entry.ty, &entry.name, entry.line, &file)?;
            let mut variable = Variable::new(entry.name, ty, at(entry.line));
            variable.array_size = entry.array_size;
            variable.is_subroutine_prototype = entry.subroutine;
            effect.variables.push(variable);
        }

        effect
            .subroutines
            .extend(self.subroutines.into_iter().map(|entry| Subroutine {
                name: entry.name,
                location: at(entry.line),
                kind: match entry.kind {
                    SubroutineKindEntry::Signature => SubroutineKind::Signature,
                    SubroutineKindEntry::Implementation => SubroutineKind::Implementation,
                },
            }));

        effect
            .render_states
            .extend(self.render_states.into_iter().map(|entry| RenderState {
                name: entry.name,
                location: at(entry.line),
            }));

        for entry in self.functions {
            effect.functions.push(function(entry, &file, base)?);
        }

        effect.programs.extend(self.programs.into_iter().map(|entry| {
            let mut program = ProgramDecl::new(entry.name, at(entry.line));
            for row in entry.rows {
                let mut decl = ProgramRow::new(row.flag, row.value, at(row.line));
                decl.subroutines = row.subroutines;
                program.rows.push(decl);
            }
            program.annotation = entry.annotation.map(|list| Annotation {
                location: at(list.line),
                entries: list.entries.into_iter().map(annotation_entry).collect(),
            });
            program
        }));

        tracing::debug!(
            effect = %effect.name,
            functions = effect.functions.len(),
            programs = effect.programs.len(),
            "manifest loaded"
        );
        Ok(effect)
    }
}

fn read(path: &Path) -> Result<String, ManifestError> {
    fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_owned(),
        source,
    })
}

fn function(entry: FunctionEntry, file: &str, base: &Path) -> Result<Function, ManifestError> {
    let mut function = Function::new(entry.name, Location::new(file, entry.line));
    function.is_shader = entry.shader;
    if let Some(ty) = &entry.return_type {
        function.return_type = data_type(ty, &function.name, entry.line, file)?;
    }
    for param in entry.parameters {
        function.parameters.push(parameter(param, entry.line, file)?);
    }
    function.attributes = entry
        .attributes
        .into_iter()
        .map(|(attribute, value)| (attribute.into(), value))
        .collect();
    function.code = match (entry.code, entry.code_file) {
        (Some(_), Some(_)) => {
            return Err(ManifestError::AmbiguousCode {
                file: file.to_owned(),
                line: entry.line,
                name: function.name,
            })
        }
        (Some(code), None) => code,
        (None, Some(relative)) => read(&base.join(relative))?,
        (None, None) => String::new(),
    };
    Ok(function)
}

/// Members and parameters without a line of their own sit on their owner's line.
fn parameter(entry: ParameterEntry, owner_line: u32, file: &str) -> Result<Parameter, ManifestError> {
    let line = entry.line.unwrap_or(owner_line);
    let ty = data_type(&entry.ty, &entry.name, line, file)?;
    let mut param = Parameter::new(entry.name, ty, Location::new(file, line)).with_direction(
        match entry.direction {
            DirectionEntry::In => Direction::In,
            DirectionEntry::Out => Direction::Out,
            DirectionEntry::InOut => Direction::InOut,
        },
    );
    param.array_size = entry.array_size;
    param.slot = entry.slot;
    param.color_attachment = entry.color_attachment;
    Ok(param)
}

fn annotation_entry(entry: KeyValueEntry) -> AnnotationEntry {
    AnnotationEntry {
        key: entry.key,
        value: match entry.value {
            ValueEntry::Int(v) => AnnotationValue::Int(v),
            ValueEntry::Uint(v) => AnnotationValue::UInt(v),
            ValueEntry::Float(v) => AnnotationValue::Float(v),
            ValueEntry::Double(v) => AnnotationValue::Double(v),
            ValueEntry::Bool(v) => AnnotationValue::Bool(v),
            ValueEntry::String(v) => AnnotationValue::String(v),
        },
    }
}

impl From<AttributeEntry> for FunctionAttribute {
    fn from(entry: AttributeEntry) -> Self {
        match entry {
            AttributeEntry::InputVertices => FunctionAttribute::InputVertices,
            AttributeEntry::OutputVertices => FunctionAttribute::OutputVertices,
            AttributeEntry::MaxVertexCount => FunctionAttribute::MaxVertexCount,
            AttributeEntry::Instances => FunctionAttribute::Instances,
            AttributeEntry::LocalSizeX => FunctionAttribute::LocalSizeX,
            AttributeEntry::LocalSizeY => FunctionAttribute::LocalSizeY,
            AttributeEntry::LocalSizeZ => FunctionAttribute::LocalSizeZ,
        }
    }
}

fn data_type(name: &str, owner: &str, line: u32, file: &str) -> Result<DataType, ManifestError> {
    if let Some(kind) = builtin_kind(name) {
        return Ok(kind.into());
    }
    DataType::user(name).ok_or_else(|| ManifestError::EmptyType {
        file: file.to_owned(),
        line,
        name: owner.to_owned(),
    })
}

/// Builtin kind spelled `name` in GLSL or HLSL, or by its signature token.
/// The first kind in table order wins, so `uint` is the integer, not a handle.
pub fn builtin_kind(name: &str) -> Option<TypeKind> {
    if name == UNDEFINED_NAME {
        return Some(TypeKind::Undefined);
    }
    TypeKind::ALL.into_iter().find(|kind| {
        let info = kind.info();
        info.glsl == name || info.hlsl == name || info.signature == name
    })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
