//! The `dump` command: print a compiled program field by field.

use std::io::{self, Write};
use std::path::Path;

use fx_ir::{AnnotationValue, ShaderStage};
use fx_link::ProgramRecord;

/// Entry point for `fxc dump`.
pub fn dump_artifact(path: &str) {
    let record = match ProgramRecord::read_file(Path::new(path)) {
        Ok(record) => record,
        Err(e) => {
            eprintln!("error: cannot read '{path}': {e}");
            std::process::exit(1);
        }
    };
    let mut out = io::stdout().lock();
    if let Err(e) = write_record(&record, &mut out) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

pub fn write_record(record: &ProgramRecord, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "program {}", record.name)?;
    if let Some(entries) = &record.annotation {
        writeln!(out, "  annotation")?;
        for entry in entries {
            let value = match &entry.value {
                AnnotationValue::Int(v) => format!("int {v}"),
                AnnotationValue::UInt(v) => format!("uint {v}"),
                AnnotationValue::Float(v) => format!("float {v}"),
                AnnotationValue::Double(v) => format!("double {v}"),
                AnnotationValue::Bool(v) => format!("bool {v}"),
                AnnotationValue::String(v) => format!("string {v:?}"),
            };
            writeln!(out, "    {} = {value}", entry.key)?;
        }
    }
    if record.hull_present {
        writeln!(out, "  patch size {}", record.patch_size)?;
    }
    writeln!(out, "  vertex inputs {:?}", record.vertex_input_slots)?;
    writeln!(out, "  pixel outputs {:?}", record.pixel_output_slots)?;
    if record.has_geometry {
        writeln!(out, "  geometry")?;
    }

    for stage in ShaderStage::ALL {
        let block = record.stage(stage);
        if block.name.is_empty() {
            continue;
        }
        writeln!(out, "  {stage}: {} ({} words)", block.name, block.binary.len())?;
        for (interface, implementation) in &block.subroutines {
            writeln!(out, "    {interface} -> {implementation}")?;
        }
    }

    writeln!(out, "  uniform blocks: {}", record.uniform_blocks.join(", "))?;
    writeln!(out, "  uniforms: {}", record.uniforms.join(", "))?;
    for (name, offset) in &record.offsets {
        writeln!(out, "    {name} @ {offset}")?;
    }
    writeln!(out, "  render state {}", record.render_state)
}
