//! Program-binary cache keys.
//!
//! A persisted binary is only valid for the exact program source it was
//! compiled from *and* the exact specialization applied to it, so the key is
//! the program's content-derived cache id plus the full constant set in a
//! canonical (sorted-by-id) order.

use smallvec::SmallVec;

use crate::shader::{SpecConstant, SpecConstantValue};

/// Stable identity of a specialized program, with a canonical byte encoding
/// suitable for handing to a [`BlobStore`].
///
/// The byte encoding is little-endian and versionless by design: any change
/// to it simply misses the old entries, which the verification path already
/// tolerates.
///
/// [`BlobStore`]: crate::store::BlobStore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramBinaryKey {
    cache_id: u64,
    constants: SmallVec<[SpecConstant; 4]>,
    bytes: Vec<u8>,
}

impl ProgramBinaryKey {
    /// Build the canonical key for (`cache_id`, `constants`).
    ///
    /// Constants are sorted by id and duplicate ids dropped (first wins), so
    /// any internally consistent caller ordering produces the same key.
    #[must_use]
    pub fn new(cache_id: u64, constants: &[SpecConstant]) -> Self {
        let mut constants: SmallVec<[SpecConstant; 4]> = constants.iter().copied().collect();
        constants.sort_by_key(|c| c.id);
        constants.dedup_by_key(|c| c.id);

        let mut bytes = Vec::with_capacity(8 + constants.len() * 9);
        bytes.extend_from_slice(&cache_id.to_le_bytes());
        for constant in &constants {
            bytes.extend_from_slice(&constant.id.to_le_bytes());
            match constant.value {
                SpecConstantValue::Int(v) => {
                    bytes.push(0);
                    bytes.extend_from_slice(&v.to_le_bytes());
                }
                SpecConstantValue::Float(v) => {
                    bytes.push(1);
                    bytes.extend_from_slice(&v.to_bits().to_le_bytes());
                }
                SpecConstantValue::Bool(v) => {
                    bytes.push(2);
                    bytes.extend_from_slice(&u32::from(v).to_le_bytes());
                }
            }
        }

        Self {
            cache_id,
            constants,
            bytes,
        }
    }

    /// The content-derived program identity.
    #[must_use]
    pub fn cache_id(&self) -> u64 {
        self.cache_id
    }

    /// The canonicalized constant set.
    #[must_use]
    pub fn constants(&self) -> &[SpecConstant] {
        &self.constants
    }

    /// Canonical byte encoding for the blob store.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
