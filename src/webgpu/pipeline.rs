//! WebGPU pipeline backend.
//!
//! Rebuilds `wgpu` descriptor types from the key's hashable mirrors and
//! constructs the actual `wgpu::RenderPipeline`. Construction failures are
//! captured through a validation error scope and surfaced as `Err`, which
//! the cache converts to its invalid-entry sentinel.
//!
//! Specialization constants are applied textually when the shader module is
//! created (see [`ShaderModuleRegistry`]), so pipeline construction itself
//! passes default compilation options.

use rustc_hash::FxHashMap;

use crate::errors::{BackendError, Result};
use crate::pipeline::backend::PipelineBackend;
use crate::pipeline::id::{PipelineLayoutId, ShaderModuleId};
use crate::pipeline::key::RenderPipelineKey;
use crate::shader::SpecConstantValue;
use crate::webgpu::shader::ShaderModuleRegistry;

/// WebGPU implementation of [`PipelineBackend`].
///
/// Owns the device handle plus the shader-module and pipeline-layout tables
/// that resolve the opaque identities inside pipeline keys.
pub struct WgpuPipelineBackend {
    device: wgpu::Device,
    shaders: ShaderModuleRegistry,
    layouts: FxHashMap<PipelineLayoutId, wgpu::PipelineLayout>,
    next_layout_id: u64,
}

impl WgpuPipelineBackend {
    #[must_use]
    pub fn new(device: wgpu::Device) -> Self {
        Self {
            device,
            shaders: ShaderModuleRegistry::new(),
            layouts: FxHashMap::default(),
            next_layout_id: 0,
        }
    }

    #[must_use]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Compile (or fetch) a shader module; the returned id goes into keys.
    pub fn create_shader_module(
        &mut self,
        label: &str,
        source: &str,
        overrides: &FxHashMap<u32, SpecConstantValue>,
    ) -> Result<ShaderModuleId> {
        self.shaders.get_or_create(&self.device, label, source, overrides)
    }

    /// Register a pipeline layout; the returned id goes into keys.
    pub fn register_pipeline_layout(&mut self, layout: wgpu::PipelineLayout) -> PipelineLayoutId {
        let id = PipelineLayoutId(self.next_layout_id);
        self.next_layout_id += 1;
        self.layouts.insert(id, layout);
        id
    }

    #[must_use]
    pub fn shaders(&self) -> &ShaderModuleRegistry {
        &self.shaders
    }
}

impl PipelineBackend for WgpuPipelineBackend {
    type Pipeline = wgpu::RenderPipeline;

    fn create_render_pipeline(&mut self, key: &RenderPipelineKey) -> Result<wgpu::RenderPipeline> {
        let vertex_id = key.vertex_shader.ok_or_else(|| {
            BackendError::PipelineCreation("pipeline key has no vertex shader module".into())
        })?;
        let vertex_module = self
            .shaders
            .get(vertex_id)
            .ok_or(BackendError::UnknownShaderModule(vertex_id))?;
        let fragment_module = match key.fragment_shader {
            Some(id) => Some(
                self.shaders
                    .get(id)
                    .ok_or(BackendError::UnknownShaderModule(id))?,
            ),
            None => None,
        };
        let layout_id = key.layout.ok_or_else(|| {
            BackendError::PipelineCreation("pipeline key has no pipeline layout".into())
        })?;
        let layout = self
            .layouts
            .get(&layout_id)
            .ok_or(BackendError::UnknownPipelineLayout(layout_id))?;

        // Rebuild wgpu types from key mirrors.
        let attribute_storage: Vec<Vec<wgpu::VertexAttribute>> = key
            .vertex_buffers
            .iter()
            .map(|b| b.attributes.iter().map(|a| a.as_wgpu()).collect())
            .collect();
        let vertex_buffers_layout: Vec<wgpu::VertexBufferLayout<'_>> = key
            .vertex_buffers
            .iter()
            .zip(&attribute_storage)
            .map(|(b, attributes)| wgpu::VertexBufferLayout {
                array_stride: b.array_stride,
                step_mode: b.step_mode,
                attributes,
            })
            .collect();

        let blend_state = key.blend.as_ref().map(|bk| bk.as_wgpu());

        // Blend state is uniform across attachments; target 0 is replicated
        // over the declared color target count.
        let color_target = Some(wgpu::ColorTargetState {
            format: key.color_format,
            blend: blend_state,
            write_mask: wgpu::ColorWrites::from_bits_truncate(key.color_write_mask),
        });
        let color_targets = vec![color_target; key.color_target_count as usize];

        let error_scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Cached Render Pipeline"),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: vertex_module,
                    entry_point: Some("vs_main"),
                    buffers: &vertex_buffers_layout,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: fragment_module.map(|module| wgpu::FragmentState {
                    module,
                    entry_point: Some("fs_main"),
                    targets: &color_targets,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: key.topology,
                    front_face: key.front_face,
                    cull_mode: key.cull_mode,
                    unclipped_depth: key.unclipped_depth,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: key.depth_format,
                    depth_write_enabled: Some(key.depth_write.unwrap_or(false)),
                    depth_compare: Some(key.depth_compare),
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState {
                        constant: key.depth_bias,
                        slope_scale: key.depth_bias_slope_scale(),
                        clamp: 0.0,
                    },
                }),
                multisample: wgpu::MultisampleState {
                    count: key.sample_count,
                    mask: !0,
                    alpha_to_coverage_enabled: key.alpha_to_coverage,
                },
                multiview_mask: None,
                cache: None,
            });

        if let Some(error) = pollster::block_on(error_scope.pop()) {
            return Err(BackendError::PipelineCreation(error.to_string()));
        }
        Ok(pipeline)
    }

    fn destroy_render_pipeline(&mut self, pipeline: wgpu::RenderPipeline) {
        // wgpu releases the GPU object when the handle drops.
        drop(pipeline);
    }
}
