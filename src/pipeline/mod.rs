//! Pipeline cache subsystem.
//!
//! - `key`: strongly-typed, hashable pipeline state keys
//! - `id`: opaque handles for shader modules and pipeline layouts
//! - `backend`: the per-API pipeline construction trait
//! - `cache`: the generational get-or-create cache itself

pub mod backend;
pub mod cache;
pub mod id;
pub mod key;

pub use backend::PipelineBackend;
pub use cache::PipelineCache;
pub use id::{PipelineLayoutId, ShaderModuleId};
pub use key::RenderPipelineKey;
