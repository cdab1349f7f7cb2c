//! Shader records and the deduplication pool.
//!
//! The pool is the only owner of [`Shader`]s. Programs refer to them by
//! [`ShaderId`], so two programs that need the same permutation hold the
//! same id and the permutation is compiled once.

use std::collections::BTreeMap;
use std::ops::Index;

use fx_ir::{Function, ShaderStage};
use rustc_hash::FxHashMap;

/// Handle to a [`Shader`] in a [`ShaderPool`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderId(u32);

impl ShaderId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One compilable stage permutation.
#[derive(Clone, Debug, PartialEq)]
pub struct Shader {
    pub stage: ShaderStage,
    /// Function name, plus the sorted static bindings when subroutines are
    /// resolved at compile time.
    pub identity: String,
    pub function: Function,
    /// Flags of the program that first created this shader.
    pub compile_flags: String,
    /// Subroutine bindings baked into this permutation.
    pub subroutines: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
pub struct ShaderPool {
    shaders: Vec<Shader>,
    index: FxHashMap<(ShaderStage, String), ShaderId>,
}

impl ShaderPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the shader with the same stage and identity, adding `shader` if
    /// there is none yet. An existing record is never replaced.
    pub fn intern(&mut self, shader: Shader) -> ShaderId {
        let key = (shader.stage, shader.identity);
        if let Some(&id) = self.index.get(&key) {
            tracing::debug!(stage = %key.0, identity = %key.1, "shader pool hit");
            return id;
        }

        #[expect(
            clippy::cast_possible_truncation,
            reason = "a batch never holds 2^32 shaders"
        )]
        let id = ShaderId(self.shaders.len() as u32);
        tracing::debug!(stage = %key.0, identity = %key.1, "shader pool miss");
        self.shaders.push(Shader {
            stage: key.0,
            identity: key.1.clone(),
            ..shader
        });
        self.index.insert(key, id);
        id
    }

    pub fn lookup(&self, stage: ShaderStage, identity: &str) -> Option<ShaderId> {
        self.index.get(&(stage, identity.to_owned())).copied()
    }

    pub fn get(&self, id: ShaderId) -> Option<&Shader> {
        self.shaders.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }

    /// Shaders in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ShaderId, &Shader)> {
        self.shaders.iter().enumerate().map(|(i, shader)| {
            #[expect(clippy::cast_possible_truncation, reason = "ids are created from u32")]
            let id = ShaderId(i as u32);
            (id, shader)
        })
    }
}

impl Index<ShaderId> for ShaderPool {
    type Output = Shader;

    fn index(&self, id: ShaderId) -> &Shader {
        &self.shaders[id.index()]
    }
}
