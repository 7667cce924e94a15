//! Pipeline construction capability trait.
//!
//! The cache core is generic over this interface; each graphics API supplies
//! one implementation that turns a [`RenderPipelineKey`] into its native
//! pipeline object (see [`crate::webgpu::WgpuPipelineBackend`]).

use crate::errors::Result;
use crate::pipeline::key::RenderPipelineKey;

/// Per-API pipeline object construction and destruction.
///
/// Construction is a blocking call that either completes or reports failure
/// synchronously. The cache exclusively owns every pipeline it creates and
/// releases it through [`destroy_render_pipeline`] on eviction; callers must
/// never independently destroy a handle obtained from the cache.
///
/// [`destroy_render_pipeline`]: PipelineBackend::destroy_render_pipeline
pub trait PipelineBackend {
    /// The native pipeline object for this API.
    type Pipeline;

    /// Synchronously construct a pipeline matching `key`.
    fn create_render_pipeline(&mut self, key: &RenderPipelineKey) -> Result<Self::Pipeline>;

    /// Release a pipeline previously returned by [`create_render_pipeline`].
    ///
    /// [`create_render_pipeline`]: PipelineBackend::create_render_pipeline
    fn destroy_render_pipeline(&mut self, pipeline: Self::Pipeline);
}
