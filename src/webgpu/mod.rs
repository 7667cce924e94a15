//! WebGPU backend variant.
//!
//! Implements the caching layer's capability traits on top of `wgpu`:
//! `shader` owns module creation (with specialization-constant substitution
//! and compile-diagnostics logging), `pipeline` turns a generic
//! [`RenderPipelineKey`] into a `wgpu::RenderPipeline`.
//!
//! [`RenderPipelineKey`]: crate::pipeline::key::RenderPipelineKey

pub mod pipeline;
pub mod shader;

pub use pipeline::WgpuPipelineBackend;
pub use shader::ShaderModuleRegistry;
