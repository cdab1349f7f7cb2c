//! The Serialize phase and its reader.
//!
//! Field order of a compiled program:
//!
//! ```text
//! name
//! hasAnnotation:bool [entryCount:uint (kind:uint key value) x entryCount]
//! hullPresent:bool patchSize:uint
//! vertexInputCount:uint pixelOutputCount:uint
//! vertexInputSlot:uint x vertexInputCount
//! pixelOutputSlot:uint x pixelOutputCount
//! hasGeometry:bool
//! per stage, pipeline order:
//!   tag shaderName bindingCount:uint (interface impl) x bindingCount
//!   byteLength:uint word x byteLength/4
//! blockCount:uint blockName x blockCount
//! uniformCount:uint uniformName x uniformCount
//! offsetCount:uint (uniformName offset:uint) x offsetCount
//! 'RSTA' renderStateName
//! ```

use std::path::Path;

use fx_ir::{AnnotationEntry, AnnotationValue, Function, ShaderStage};

use crate::{BinReader, BinWriter, ContainerError, Program, ShaderPool};

const RENDER_STATE_TAG: [u8; 4] = *b"RSTA";

/// Serialize a linked program.
#[tracing::instrument(level = "debug", skip_all, fields(program = %program.name))]
pub fn compile(program: &Program, pool: &ShaderPool, writer: &mut BinWriter) {
    let vertex_inputs = stage_function(program, pool, ShaderStage::Vertex)
        .map(Function::input_slots)
        .unwrap_or_default();
    let pixel_outputs = stage_function(program, pool, ShaderStage::Pixel)
        .map(Function::output_attachments)
        .unwrap_or_default();

    writer.write_string(&program.name);
    match &program.annotation {
        Some(annotation) => {
            writer.write_bool(true);
            write_annotation(writer, &annotation.entries);
        }
        None => writer.write_bool(false),
    }

    writer.write_bool(program.is_populated(ShaderStage::Hull));
    writer.write_uint(program.patch_size);
    writer.write_count(vertex_inputs.len());
    writer.write_count(pixel_outputs.len());
    for slot in vertex_inputs.into_iter().chain(pixel_outputs) {
        writer.write_uint(slot);
    }
    writer.write_bool(program.is_populated(ShaderStage::Geometry));

    for stage in ShaderStage::ALL {
        let slot = program.stage(stage);
        writer.write_tag(stage.tag());
        writer.write_string(if slot.populated { slot.shader_name.as_str() } else { "" });
        writer.write_count(slot.subroutines.len());
        for (interface, implementation) in &slot.subroutines {
            writer.write_string(interface);
            writer.write_string(implementation);
        }
        writer.write_words(&slot.binary);
    }

    let reflection = &program.reflection;
    writer.write_count(reflection.uniform_blocks.len());
    for block in &reflection.uniform_blocks {
        writer.write_string(block);
    }
    writer.write_count(reflection.uniforms.len());
    for uniform in &reflection.uniforms {
        writer.write_string(uniform);
    }
    writer.write_count(reflection.offsets.len());
    for (name, offset) in &reflection.offsets {
        writer.write_string(name);
        writer.write_uint(*offset);
    }

    writer.write_tag(RENDER_STATE_TAG);
    writer.write_string(program.render_state.as_deref().unwrap_or_default());
}

fn stage_function<'p>(
    program: &Program,
    pool: &'p ShaderPool,
    stage: ShaderStage,
) -> Option<&'p Function> {
    let id = program.stage(stage).shader?;
    pool.get(id).map(|shader| &shader.function)
}

fn write_annotation(writer: &mut BinWriter, entries: &[AnnotationEntry]) {
    writer.write_count(entries.len());
    for entry in entries {
        writer.write_uint(entry.value.kind_code());
        writer.write_string(&entry.key);
        match &entry.value {
            AnnotationValue::Int(v) => writer.write_int(*v),
            AnnotationValue::UInt(v) => writer.write_uint(*v),
            AnnotationValue::Float(v) => writer.write_float(*v),
            AnnotationValue::Double(v) => writer.write_double(*v),
            AnnotationValue::Bool(v) => writer.write_bool(*v),
            AnnotationValue::String(v) => writer.write_string(v),
        }
    }
}

fn read_annotation(reader: &mut BinReader<'_>) -> Result<Vec<AnnotationEntry>, ContainerError> {
    let count = reader.read_count()?;
    let mut entries = Vec::with_capacity(count.min(reader.remaining()));
    for _ in 0..count {
        let offset = reader.position();
        let kind = reader.read_uint()?;
        let key = reader.read_string()?;
        let value = match kind {
            0 => AnnotationValue::Int(reader.read_int()?),
            1 => AnnotationValue::UInt(reader.read_uint()?),
            2 => AnnotationValue::Float(reader.read_float()?),
            3 => AnnotationValue::Double(reader.read_double()?),
            4 => AnnotationValue::Bool(reader.read_bool()?),
            5 => AnnotationValue::String(reader.read_string()?),
            _ => return Err(ContainerError::InvalidValueKind { offset, kind }),
        };
        entries.push(AnnotationEntry { key, value });
    }
    Ok(entries)
}

/// One stage block of a compiled program.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StageRecord {
    pub name: String,
    pub subroutines: Vec<(String, String)>,
    pub binary: Vec<u32>,
}

/// A compiled program read back field by field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProgramRecord {
    pub name: String,
    pub annotation: Option<Vec<AnnotationEntry>>,
    pub hull_present: bool,
    pub patch_size: u32,
    pub vertex_input_slots: Vec<u32>,
    pub pixel_output_slots: Vec<u32>,
    pub has_geometry: bool,
    pub stages: [StageRecord; ShaderStage::COUNT],
    pub uniform_blocks: Vec<String>,
    pub uniforms: Vec<String>,
    pub offsets: Vec<(String, u32)>,
    pub render_state: String,
}

impl ProgramRecord {
    /// Parse a whole compiled program. Bytes after the record are an error.
    pub fn read(bytes: &[u8]) -> Result<ProgramRecord, ContainerError> {
        let mut reader = BinReader::new(bytes);
        let record = Self::read_from(&mut reader)?;
        if !reader.is_at_end() {
            return Err(ContainerError::TrailingBytes {
                len: reader.remaining(),
            });
        }
        Ok(record)
    }

    pub fn read_file(path: &Path) -> Result<ProgramRecord, ContainerError> {
        Self::read(&std::fs::read(path)?)
    }

    pub fn read_from(reader: &mut BinReader<'_>) -> Result<ProgramRecord, ContainerError> {
        let mut record = ProgramRecord {
            name: reader.read_string()?,
            ..ProgramRecord::default()
        };
        if reader.read_bool()? {
            record.annotation = Some(read_annotation(reader)?);
        }

        record.hull_present = reader.read_bool()?;
        record.patch_size = reader.read_uint()?;
        let vertex_inputs = reader.read_count()?;
        let pixel_outputs = reader.read_count()?;
        record.vertex_input_slots = read_n(reader, vertex_inputs, BinReader::read_uint)?;
        record.pixel_output_slots = read_n(reader, pixel_outputs, BinReader::read_uint)?;
        record.has_geometry = reader.read_bool()?;

        for stage in ShaderStage::ALL {
            reader.expect_tag(stage.tag())?;
            let block = &mut record.stages[stage.index()];
            block.name = reader.read_string()?;
            let bindings = reader.read_count()?;
            block.subroutines = read_n(reader, bindings, |r| Ok((r.read_string()?, r.read_string()?)))?;
            block.binary = reader.read_words()?;
        }

        let blocks = reader.read_count()?;
        record.uniform_blocks = read_n(reader, blocks, BinReader::read_string)?;
        let uniforms = reader.read_count()?;
        record.uniforms = read_n(reader, uniforms, BinReader::read_string)?;
        let offsets = reader.read_count()?;
        record.offsets = read_n(reader, offsets, |r| Ok((r.read_string()?, r.read_uint()?)))?;

        reader.expect_tag(RENDER_STATE_TAG)?;
        record.render_state = reader.read_string()?;
        Ok(record)
    }

    #[inline]
    pub fn stage(&self, stage: ShaderStage) -> &StageRecord {
        &self.stages[stage.index()]
    }
}

/// Read `count` items. Capacity is bounded by the input left, so a corrupt
/// count cannot force a huge allocation.
fn read_n<'a, T>(
    reader: &mut BinReader<'a>,
    count: usize,
    mut read: impl FnMut(&mut BinReader<'a>) -> Result<T, ContainerError>,
) -> Result<Vec<T>, ContainerError> {
    let mut items = Vec::with_capacity(count.min(reader.remaining()));
    for _ in 0..count {
        items.push(read(reader)?);
    }
    Ok(items)
}
