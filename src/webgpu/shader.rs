//! WebGPU shader module registry.
//!
//! Deduplicates compiled `wgpu::ShaderModule`s by hashing the **final** WGSL
//! source (after specialization-constant substitution) with xxh3-128, and
//! hands out the opaque [`ShaderModuleId`]s that pipeline keys carry. Two
//! requests producing the same post-substitution source share one module and
//! one id.

use std::borrow::Cow;

use rustc_hash::FxHashMap;
use xxhash_rust::xxh3::xxh3_128;

use crate::errors::Result;
use crate::pipeline::id::ShaderModuleId;
use crate::shader::SpecConstantValue;
use crate::shader::spec_const;

/// Centralized shader module cache for the WebGPU backend.
pub struct ShaderModuleRegistry {
    modules: FxHashMap<ShaderModuleId, wgpu::ShaderModule>,
    /// xxh3-128 of final WGSL → issued id.
    by_source_hash: FxHashMap<u128, ShaderModuleId>,
    next_id: u64,
}

impl Default for ShaderModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderModuleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            modules: FxHashMap::default(),
            by_source_hash: FxHashMap::default(),
            next_id: 0,
        }
    }

    /// Compile `source` (or return the cached module for it).
    ///
    /// Overrides are applied as a textual rewrite before hashing, so every
    /// distinct specialization compiles to its own module. Compilation
    /// diagnostics are logged by severity; they never mutate cache state.
    ///
    /// Fails only on malformed shader source (a missing spec-constant
    /// terminator), which is a content bug rather than a runtime condition.
    pub fn get_or_create(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        overrides: &FxHashMap<u32, SpecConstantValue>,
    ) -> Result<ShaderModuleId> {
        let source: Cow<'_, str> = if overrides.is_empty() {
            Cow::Borrowed(source)
        } else {
            Cow::Owned(spec_const::substitute(label, source, overrides)?)
        };

        let hash = xxh3_128(source.as_bytes());
        if let Some(&id) = self.by_source_hash.get(&hash) {
            return Ok(id);
        }

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source),
        });
        log_compilation_info(label, &module);

        let id = ShaderModuleId(self.next_id);
        self.next_id += 1;
        self.modules.insert(id, module);
        self.by_source_hash.insert(hash, id);
        Ok(id)
    }

    /// Resolve an id to its compiled module.
    #[must_use]
    pub fn get(&self, id: ShaderModuleId) -> Option<&wgpu::ShaderModule> {
        self.modules.get(&id)
    }

    /// Number of cached shader modules.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

/// Log the module's compile diagnostics by severity. Log-only: the messages
/// never affect whether the module is returned.
fn log_compilation_info(label: &str, module: &wgpu::ShaderModule) {
    let info = pollster::block_on(module.get_compilation_info());
    for message in &info.messages {
        let location = message
            .location
            .map(|l| format!(" line#:{} linePos:{}", l.line_number, l.line_position))
            .unwrap_or_default();
        match message.message_type {
            wgpu::CompilationMessageType::Error => {
                log::error!("error compiling {label}: {}{location}", message.message);
            }
            wgpu::CompilationMessageType::Warning => {
                log::warn!("warning compiling {label}: {}{location}", message.message);
            }
            wgpu::CompilationMessageType::Info => {
                log::info!("{label}: {}{location}", message.message);
            }
        }
    }
}
