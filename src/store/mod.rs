//! Persistent blob storage boundary.
//!
//! The program-binary cache talks to the platform through [`BlobStore`], a
//! minimal key → blob interface with the retrieval contract the caching layer
//! relies on: an undersized destination buffer reports the true size without
//! corrupting the buffer, and insertion is fire-and-forget.
//!
//! Two implementations ship in-tree: [`MemoryBlobStore`] (tests, ephemeral
//! sessions) and [`FsBlobStore`] (one file per key under a cache directory).

use std::io;
use std::path::PathBuf;

use rustc_hash::FxHashMap;
use xxhash_rust::xxh3::xxh3_128;

/// Platform-provided persistent key → blob storage.
pub trait BlobStore {
    /// Copy the blob stored under `key` into `out`.
    ///
    /// Returns 0 when no blob is stored. When the stored blob is larger than
    /// `out`, returns the true size and leaves `out` untouched so the caller
    /// can retry with an exactly-sized buffer. Otherwise copies the blob into
    /// the front of `out` and returns its size.
    fn retrieve_blob(&self, key: &[u8], out: &mut [u8]) -> usize;

    /// Store `blob` under `key`, replacing any previous value.
    ///
    /// Fire-and-forget: failures are swallowed (at most logged) and never
    /// surface to the caller.
    fn insert_blob(&mut self, key: &[u8], blob: &[u8]);
}

// ─── MemoryBlobStore ──────────────────────────────────────────────────────────

/// In-memory blob store; contents do not survive the process.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: FxHashMap<Vec<u8>, Vec<u8>>,
}

impl MemoryBlobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl BlobStore for MemoryBlobStore {
    fn retrieve_blob(&self, key: &[u8], out: &mut [u8]) -> usize {
        let Some(blob) = self.blobs.get(key) else {
            return 0;
        };
        if blob.len() > out.len() {
            return blob.len();
        }
        out[..blob.len()].copy_from_slice(blob);
        blob.len()
    }

    fn insert_blob(&mut self, key: &[u8], blob: &[u8]) {
        self.blobs.insert(key.to_vec(), blob.to_vec());
    }
}

// ─── FsBlobStore ──────────────────────────────────────────────────────────────

/// File-backed blob store: one file per key under a cache directory.
///
/// File names are the xxh3-128 of the key bytes, so arbitrary-length keys map
/// to fixed-length paths. Write failures are logged and dropped, matching the
/// fire-and-forget contract.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The directory blobs are stored under.
    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn blob_path(&self, key: &[u8]) -> PathBuf {
        self.root.join(format!("{:032x}.bin", xxh3_128(key)))
    }
}

impl BlobStore for FsBlobStore {
    fn retrieve_blob(&self, key: &[u8], out: &mut [u8]) -> usize {
        let path = self.blob_path(key);
        let size = match std::fs::metadata(&path) {
            Ok(metadata) => metadata.len() as usize,
            Err(_) => return 0,
        };
        if size == 0 {
            return 0;
        }
        if size > out.len() {
            return size;
        }
        match std::fs::read(&path) {
            Ok(data) => {
                let len = data.len().min(out.len());
                out[..len].copy_from_slice(&data[..len]);
                len
            }
            Err(e) => {
                log::warn!("failed to read cached blob {}: {e}", path.display());
                0
            }
        }
    }

    fn insert_blob(&mut self, key: &[u8], blob: &[u8]) {
        let path = self.blob_path(key);
        if let Err(e) = std::fs::write(&path, blob) {
            log::warn!("failed to persist blob {}: {e}", path.display());
        }
    }
}
