//! Cache Configuration Constants
//!
//! Engine-wide limits and defaults for the caching layer. The per-cache
//! constructors expose the tunable values (`PipelineCache::with_max_age`,
//! `ProgramBinaryCache::with_blob_buffer_size`); everything here is the
//! compile-time default.

/// Maximum number of vertex attributes a pipeline key may describe.
pub const MAX_VERTEX_ATTRIBUTES: usize = 16;

/// Maximum number of vertex buffer layouts a pipeline key may describe.
pub const MAX_VERTEX_BUFFERS: usize = 8;

/// Number of generations a pipeline entry may go unused before the next
/// [`gc`] sweep reclaims it.
///
/// With `gc` called once per frame this keeps a pipeline alive for roughly
/// `DEFAULT_PIPELINE_MAX_AGE` frames after its last draw.
///
/// [`gc`]: crate::pipeline::cache::PipelineCache::gc
pub const DEFAULT_PIPELINE_MAX_AGE: u64 = 10;

/// Initial buffer size for program-binary retrieval, in bytes.
///
/// Most driver binaries fit in 64 KiB; larger blobs are fetched with a single
/// retry once the store reports the true size.
pub const DEFAULT_BLOB_BUFFER_SIZE: usize = 64 * 1024;
