//! Strongly-typed backend resource handles.
//!
//! Thin `Copy` wrappers around a `u64` issued by the backend that owns the
//! underlying GPU object. Using distinct newtypes prevents accidentally mixing
//! up shader-module and pipeline-layout handles inside a pipeline key.
//!
//! The handles are *opaque identities*: the pipeline cache only ever compares
//! and hashes them, it never dereferences them itself.

/// Handle to a shader module registered with a pipeline backend.
///
/// Two keys referring to the same `ShaderModuleId` are interchangeable with
/// respect to that shader stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderModuleId(pub(crate) u64);

impl ShaderModuleId {
    /// Wrap a raw backend-issued identity.
    #[inline]
    #[must_use]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identity value.
    #[inline]
    #[must_use]
    pub fn to_raw(self) -> u64 {
        self.0
    }
}

/// Handle to a pipeline layout registered with a pipeline backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineLayoutId(pub(crate) u64);

impl PipelineLayoutId {
    /// Wrap a raw backend-issued identity.
    #[inline]
    #[must_use]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identity value.
    #[inline]
    #[must_use]
    pub fn to_raw(self) -> u64 {
        self.0
    }
}
