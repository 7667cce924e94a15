//! GPU backend caching layer for the Kiln rendering engine.
//!
//! This crate owns the two caches that sit between the renderer's per-draw
//! state and the expensive GPU objects it needs:
//!
//! - [`PipelineCache`] — an in-memory associative cache from a structurally
//!   compared [`RenderPipelineKey`] to a constructed pipeline object, with
//!   generational garbage collection to bound memory over a long session.
//! - [`ProgramBinaryCache`] — a persistent cache of pre-compiled program
//!   binaries keyed by program identity + specialization constants, with
//!   verification and fallback to fresh compilation on any mismatch.
//!
//! Both caches are generic over small capability traits ([`PipelineBackend`],
//! [`ProgramBinaryDriver`], [`BlobStore`]) so that each graphics API provides
//! its own object construction while the caching algorithm stays shared. The
//! in-tree WebGPU variant lives in [`webgpu`].
//!
//! All cache operations run on the thread that owns the graphics device; no
//! internal locking is provided.

pub mod config;
pub mod errors;
pub mod pipeline;
pub mod program;
pub mod shader;
pub mod store;
pub mod webgpu;

pub use errors::{BackendError, Result};
pub use pipeline::backend::PipelineBackend;
pub use pipeline::cache::PipelineCache;
pub use pipeline::id::{PipelineLayoutId, ShaderModuleId};
pub use pipeline::key::RenderPipelineKey;
pub use program::blob::Blob;
pub use program::cache::{BlobRetrieval, ProgramBinaryCache};
pub use program::driver::ProgramBinaryDriver;
pub use program::key::ProgramBinaryKey;
pub use shader::{SpecConstant, SpecConstantValue};
pub use store::{BlobStore, FsBlobStore, MemoryBlobStore};
