//! Strongly-typed pipeline cache keys.
//!
//! `wgpu` descriptor types (`BlendState`, `DepthBiasState`, …) do not all
//! implement `Hash` / `Eq`, and the full `RenderPipelineDescriptor` drags
//! along borrowed module references that must not participate in identity.
//! This module defines *mirror* types that extract exactly the fields relevant
//! for pipeline identity and derive the correct trait impls.
//!
//! Two keys are equal iff every scalar field matches, the vertex-buffer
//! sequences are pointwise equal over their active entries, and the
//! specialization-constant sets are equal as mappings. Hash is derived from
//! the same fields, so equal keys always hash equally; the cache map resolves
//! hash collisions with a full equality check.

use smallvec::SmallVec;

use crate::config::{MAX_VERTEX_ATTRIBUTES, MAX_VERTEX_BUFFERS};
use crate::pipeline::id::{PipelineLayoutId, ShaderModuleId};
use crate::shader::SpecConstant;

// ─── Hashable Mirror Types ────────────────────────────────────────────────────

/// Hashable mirror of `wgpu::BlendComponent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendComponentKey {
    pub src_factor: wgpu::BlendFactor,
    pub dst_factor: wgpu::BlendFactor,
    pub operation: wgpu::BlendOperation,
}

impl From<wgpu::BlendComponent> for BlendComponentKey {
    fn from(b: wgpu::BlendComponent) -> Self {
        Self {
            src_factor: b.src_factor,
            dst_factor: b.dst_factor,
            operation: b.operation,
        }
    }
}

impl BlendComponentKey {
    #[must_use]
    pub fn as_wgpu(&self) -> wgpu::BlendComponent {
        wgpu::BlendComponent {
            src_factor: self.src_factor,
            dst_factor: self.dst_factor,
            operation: self.operation,
        }
    }
}

/// Hashable mirror of `wgpu::BlendState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendStateKey {
    pub color: BlendComponentKey,
    pub alpha: BlendComponentKey,
}

impl From<wgpu::BlendState> for BlendStateKey {
    fn from(b: wgpu::BlendState) -> Self {
        Self {
            color: b.color.into(),
            alpha: b.alpha.into(),
        }
    }
}

impl BlendStateKey {
    #[must_use]
    pub fn as_wgpu(&self) -> wgpu::BlendState {
        wgpu::BlendState {
            color: self.color.as_wgpu(),
            alpha: self.alpha.as_wgpu(),
        }
    }
}

/// Hashable mirror of `wgpu::VertexAttribute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttributeKey {
    pub format: wgpu::VertexFormat,
    pub offset: u64,
    pub shader_location: u32,
}

impl From<wgpu::VertexAttribute> for VertexAttributeKey {
    fn from(a: wgpu::VertexAttribute) -> Self {
        Self {
            format: a.format,
            offset: a.offset,
            shader_location: a.shader_location,
        }
    }
}

impl VertexAttributeKey {
    #[must_use]
    pub fn as_wgpu(&self) -> wgpu::VertexAttribute {
        wgpu::VertexAttribute {
            format: self.format,
            offset: self.offset,
            shader_location: self.shader_location,
        }
    }
}

/// One vertex buffer layout: step mode, stride, and its attributes.
///
/// The number of active buffers is the sequence length; the fixed inline
/// capacities keep key construction allocation-free within the engine limits
/// (`MAX_VERTEX_BUFFERS` / `MAX_VERTEX_ATTRIBUTES`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexBufferLayoutKey {
    pub array_stride: u64,
    pub step_mode: wgpu::VertexStepMode,
    pub attributes: SmallVec<[VertexAttributeKey; 4]>,
}

impl Default for VertexBufferLayoutKey {
    fn default() -> Self {
        Self {
            array_stride: 0,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: SmallVec::new(),
        }
    }
}

// ─── Render Pipeline Key ──────────────────────────────────────────────────────

/// Plain-data description of everything that determines whether two requested
/// render pipelines are interchangeable.
///
/// Built fresh from bound state on every draw request and never mutated after
/// lookup. Shader modules and the pipeline layout participate as opaque
/// identities ([`ShaderModuleId`] / [`PipelineLayoutId`]); the backend that
/// issued them resolves them at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderPipelineKey {
    /// Vertex stage module; required for construction.
    pub vertex_shader: Option<ShaderModuleId>,
    /// Fragment stage module; `None` for depth/vertex-only pipelines.
    pub fragment_shader: Option<ShaderModuleId>,
    /// Active vertex buffer layouts, at most [`MAX_VERTEX_BUFFERS`].
    pub vertex_buffers: SmallVec<[VertexBufferLayoutKey; MAX_VERTEX_BUFFERS]>,
    /// Specialization-constant overrides, canonicalized by [`set_constants`].
    ///
    /// [`set_constants`]: RenderPipelineKey::set_constants
    pub constants: SmallVec<[SpecConstant; 4]>,
    pub topology: wgpu::PrimitiveTopology,
    pub cull_mode: Option<wgpu::Face>,
    pub front_face: wgpu::FrontFace,
    /// `None` == blending disabled.
    pub blend: Option<BlendStateKey>,
    /// `wgpu::ColorWrites` bits.
    pub color_write_mask: u32,
    pub sample_count: u32,
    pub alpha_to_coverage: bool,
    pub unclipped_depth: bool,
    pub color_target_count: u8,
    pub depth_compare: wgpu::CompareFunction,
    /// Tri-state: `Some(true)` / `Some(false)` / unspecified.
    pub depth_write: Option<bool>,
    pub depth_bias: i32,
    /// Slope-scale bias, stored as raw bits so the key stays `Eq + Hash`.
    pub depth_bias_slope_scale_bits: u32,
    pub layout: Option<PipelineLayoutId>,
    pub color_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
}

impl Default for RenderPipelineKey {
    fn default() -> Self {
        Self {
            vertex_shader: None,
            fragment_shader: None,
            vertex_buffers: SmallVec::new(),
            constants: SmallVec::new(),
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            front_face: wgpu::FrontFace::Ccw,
            blend: None,
            color_write_mask: wgpu::ColorWrites::ALL.bits(),
            sample_count: 1,
            alpha_to_coverage: false,
            unclipped_depth: false,
            color_target_count: 1,
            depth_compare: wgpu::CompareFunction::Always,
            depth_write: None,
            depth_bias: 0,
            depth_bias_slope_scale_bits: 0,
            layout: None,
            color_format: wgpu::TextureFormat::Rgba8Unorm,
            depth_format: wgpu::TextureFormat::Depth24Plus,
        }
    }
}

impl RenderPipelineKey {
    /// Install specialization-constant overrides in canonical order.
    ///
    /// Sorts by id and drops duplicate ids (first occurrence wins), so that
    /// the derived equality/hash treat the constants as a mapping regardless
    /// of the order the caller supplied them in.
    pub fn set_constants(&mut self, constants: impl IntoIterator<Item = SpecConstant>) {
        self.constants = constants.into_iter().collect();
        self.constants.sort_by_key(|c| c.id);
        self.constants.dedup_by_key(|c| c.id);
    }

    /// Set the slope-scale depth bias from a float value.
    pub fn set_depth_bias_slope_scale(&mut self, slope_scale: f32) {
        self.depth_bias_slope_scale_bits = slope_scale.to_bits();
    }

    /// The slope-scale depth bias as a float.
    #[must_use]
    pub fn depth_bias_slope_scale(&self) -> f32 {
        f32::from_bits(self.depth_bias_slope_scale_bits)
    }

    /// Total number of vertex attributes across all active buffers.
    #[must_use]
    pub fn attribute_count(&self) -> usize {
        self.vertex_buffers.iter().map(|b| b.attributes.len()).sum()
    }

    /// Whether this key can be handed to a backend for construction: it needs
    /// a vertex shader, a layout, and must respect the engine limits.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.vertex_shader.is_some()
            && self.layout.is_some()
            && self.vertex_buffers.len() <= MAX_VERTEX_BUFFERS
            && self.attribute_count() <= MAX_VERTEX_ATTRIBUTES
            && self.color_target_count >= 1
    }
}
