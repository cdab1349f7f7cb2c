//! Program objects for the naga backend.

use std::fmt::Write as _;

use fx_ir::ShaderStage;
use fx_link::BackendProgram;
use naga::{Binding, Handle, Module, Type, TypeInner};
use rustc_hash::FxHashSet;

use crate::reflect::{reflect_stage, ReflectedUniform};
use crate::{naga_stage, NagaUnit};

#[derive(Debug, Default)]
pub struct NagaProgram {
    stages: Vec<NagaUnit>,
    log: String,
    blocks: Vec<String>,
    uniforms: Vec<ReflectedUniform>,
}

impl NagaProgram {
    fn unit(&self, stage: ShaderStage) -> Option<&NagaUnit> {
        self.stages.iter().find(|unit| unit.stage() == stage)
    }

    fn fail(&mut self, stage: ShaderStage, message: impl std::fmt::Display) {
        let _ = writeln!(self.log, "ERROR: Linking {stage} stage: {message}");
    }
}

impl BackendProgram for NagaProgram {
    type Unit = NagaUnit;

    fn add_stage(&mut self, _stage: ShaderStage, unit: &NagaUnit) {
        self.stages.push(unit.clone());
    }

    fn link(&mut self) -> bool {
        self.log.clear();
        self.stages.sort_by_key(NagaUnit::stage);

        let missing: Vec<ShaderStage> = self
            .stages
            .iter()
            .filter(|unit| entry_point(unit).is_none())
            .map(NagaUnit::stage)
            .collect();
        for stage in missing {
            self.fail(stage, "Missing entry point");
        }

        // Every location a stage reads must be written by the stage before it.
        let mut unmatched = Vec::new();
        for pair in self.stages.windows(2) {
            let (Some(producer), Some(consumer)) = (entry_point(&pair[0]), entry_point(&pair[1]))
            else {
                continue;
            };
            let written = output_locations(pair[0].module(), producer);
            for location in input_locations(pair[1].module(), consumer) {
                if !written.contains(&location) {
                    unmatched.push((pair[1].stage(), pair[0].stage(), location));
                }
            }
        }
        for (stage, producer, location) in unmatched {
            self.fail(
                stage,
                format!("input at location {location} is not written by the {producer} stage"),
            );
        }

        tracing::debug!(stages = self.stages.len(), linked = self.log.is_empty(), "link");
        self.log.is_empty()
    }

    fn info_log(&self) -> String {
        self.log.clone()
    }

    fn build_reflection(&mut self) -> bool {
        self.blocks.clear();
        self.uniforms.clear();
        let mut blocks = FxHashSet::default();
        let mut uniforms = FxHashSet::default();
        for unit in &self.stages {
            let compiled = unit.compiled();
            let stage = reflect_stage(&compiled.module, &compiled.info);
            for block in stage.blocks {
                if blocks.insert(block.clone()) {
                    self.blocks.push(block);
                }
            }
            for uniform in stage.uniforms {
                if uniforms.insert(uniform.name.clone()) {
                    self.uniforms.push(uniform);
                }
            }
        }
        true
    }

    fn live_uniform_block_count(&self) -> usize {
        self.blocks.len()
    }

    fn live_uniform_block_name(&self, index: usize) -> &str {
        &self.blocks[index]
    }

    fn live_uniform_count(&self) -> usize {
        self.uniforms.len()
    }

    fn live_uniform_name(&self, index: usize) -> &str {
        &self.uniforms[index].name
    }

    fn live_uniform_type(&self, index: usize) -> u32 {
        self.uniforms[index].ty
    }

    fn live_uniform_buffer_offset(&self, index: usize) -> Option<u32> {
        self.uniforms[index].offset
    }

    fn translate_to_binary(&self, stage: ShaderStage) -> Result<Vec<u32>, String> {
        let unit = self
            .unit(stage)
            .ok_or_else(|| format!("{stage} stage was not linked"))?;
        let entry = entry_point(unit).ok_or_else(|| format!("{stage} stage has no entry point"))?;
        let pipeline = naga::back::spv::PipelineOptions {
            shader_stage: entry.stage,
            entry_point: entry.name.clone(),
        };
        let compiled = unit.compiled();
        naga::back::spv::write_vec(
            &compiled.module,
            &compiled.info,
            &naga::back::spv::Options::default(),
            Some(&pipeline),
        )
        .map_err(|e| e.to_string())
    }
}

fn entry_point(unit: &NagaUnit) -> Option<&naga::EntryPoint> {
    let stage = naga_stage(unit.stage()).ok()?;
    unit.module()
        .entry_points
        .iter()
        .find(|entry| entry.stage == stage)
}

fn input_locations(module: &Module, entry: &naga::EntryPoint) -> Vec<u32> {
    let mut locations = Vec::new();
    for argument in &entry.function.arguments {
        collect_locations(module, argument.ty, argument.binding.as_ref(), &mut locations);
    }
    locations
}

fn output_locations(module: &Module, entry: &naga::EntryPoint) -> FxHashSet<u32> {
    let mut locations = Vec::new();
    if let Some(result) = &entry.function.result {
        collect_locations(module, result.ty, result.binding.as_ref(), &mut locations);
    }
    locations.into_iter().collect()
}

/// User locations of a binding, looking through struct members for
/// unbound aggregates. Builtins are not part of the interface.
fn collect_locations(
    module: &Module,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut Vec<u32>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => out.push(*location),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}
