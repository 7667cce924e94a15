//! Program-binary cache subsystem.
//!
//! - `key`: canonical program identity + specialization constants
//! - `blob`: the self-describing binary artifact (format tag + payload)
//! - `driver`: the per-API program serialization trait
//! - `cache`: retrieve / verify / insert logic over a [`BlobStore`]
//!
//! [`BlobStore`]: crate::store::BlobStore

pub mod blob;
pub mod cache;
pub mod driver;
pub mod key;

pub use blob::Blob;
pub use cache::{BlobRetrieval, ProgramBinaryCache};
pub use driver::ProgramBinaryDriver;
pub use key::ProgramBinaryKey;
