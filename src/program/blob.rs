//! Self-describing program binary blob.
//!
//! The persisted artifact is a small fixed header (the driver-specific binary
//! format tag) followed by the opaque payload the driver produced. The tag
//! must round-trip with the payload because drivers refuse binaries in a
//! format other than the one they emitted.

/// Size of the fixed header preceding the payload, in bytes.
pub const BLOB_HEADER_SIZE: usize = 4;

/// A driver program binary: format tag + opaque payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// Driver-specific binary format tag.
    pub format: u32,
    /// Opaque serialized program bytes.
    pub payload: Vec<u8>,
}

impl Blob {
    #[must_use]
    pub fn new(format: u32, payload: Vec<u8>) -> Self {
        Self { format, payload }
    }

    /// Serialize as header + payload for the blob store.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(BLOB_HEADER_SIZE + self.payload.len());
        bytes.extend_from_slice(&self.format.to_le_bytes());
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    /// Parse a stored blob.
    ///
    /// Returns `None` when `data` is smaller than the header; callers treat
    /// that as a cache miss rather than an error, since a truncated entry can
    /// only come from stale or damaged persisted state.
    #[must_use]
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < BLOB_HEADER_SIZE {
            return None;
        }
        let (header, payload) = data.split_at(BLOB_HEADER_SIZE);
        let format = u32::from_le_bytes(header.try_into().ok()?);
        Some(Self {
            format,
            payload: payload.to_vec(),
        })
    }

    /// Total serialized size, header included.
    #[must_use]
    pub fn serialized_size(&self) -> usize {
        BLOB_HEADER_SIZE + self.payload.len()
    }
}
