//! Persistent program-binary cache.
//!
//! Linking a program from source is one of the most expensive operations a
//! backend performs, and the result is stable across runs as long as the
//! driver is. This cache round-trips linked programs through a [`BlobStore`]:
//! `retrieve` fetches a previously serialized binary by canonical key,
//! `create_from_blob` instantiates and *verifies* it (falling back to source
//! compilation on any mismatch, e.g. after a driver update), and `insert`
//! persists a freshly linked program.
//!
//! Every path degrades silently: an unsupported driver, a missing store, a
//! stale blob, or a refused serialization are all well-defined no-ops, never
//! errors.

use crate::config::DEFAULT_BLOB_BUFFER_SIZE;
use crate::program::blob::Blob;
use crate::program::driver::ProgramBinaryDriver;
use crate::program::key::ProgramBinaryKey;
use crate::shader::SpecConstant;
use crate::store::BlobStore;

/// Outcome of [`ProgramBinaryCache::retrieve`].
///
/// `Unsupported` (no binary-format support, or no store attached) is distinct
/// from `Miss` so callers can skip [`insert`] entirely on platforms that will
/// never accept it; no key is built in that case.
///
/// [`insert`]: ProgramBinaryCache::insert
#[derive(Debug)]
pub enum BlobRetrieval {
    /// Caching is disabled on this platform; the store was not touched.
    Unsupported,
    /// No blob stored under this key; `key` is reusable for later insertion.
    Miss { key: ProgramBinaryKey },
    /// A stored blob, exactly as inserted (header + payload).
    Hit { key: ProgramBinaryKey, data: Vec<u8> },
}

/// Persistent cache of pre-compiled program binaries.
pub struct ProgramBinaryCache {
    caching_supported: bool,
    store: Option<Box<dyn BlobStore>>,
    blob_buffer_size: usize,
}

impl ProgramBinaryCache {
    /// Build a cache for `driver`, persisting through `store`.
    ///
    /// Capability is probed once here: a driver reporting zero supported
    /// binary formats permanently disables the cache.
    pub fn new<D: ProgramBinaryDriver>(driver: &D, store: Option<Box<dyn BlobStore>>) -> Self {
        Self {
            caching_supported: driver.num_program_binary_formats() >= 1,
            store,
            blob_buffer_size: DEFAULT_BLOB_BUFFER_SIZE,
        }
    }

    /// Override the initial retrieval buffer size (default 64 KiB).
    #[must_use]
    pub fn with_blob_buffer_size(mut self, size: usize) -> Self {
        self.blob_buffer_size = size.max(1);
        self
    }

    /// Whether retrieval/insertion can do anything at all.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.caching_supported && self.store.is_some()
    }

    /// Look up the serialized binary for (`cache_id`, `constants`).
    ///
    /// Retrieval first attempts a default-sized buffer; when the store
    /// reports a larger true size, the call is retried exactly once with a
    /// buffer sized to fit.
    #[must_use]
    pub fn retrieve(&self, cache_id: u64, constants: &[SpecConstant]) -> BlobRetrieval {
        if !self.caching_supported {
            return BlobRetrieval::Unsupported;
        }
        let Some(store) = self.store.as_deref() else {
            return BlobRetrieval::Unsupported;
        };

        let key = ProgramBinaryKey::new(cache_id, constants);
        let mut data = vec![0u8; self.blob_buffer_size];
        let size = store.retrieve_blob(key.as_bytes(), &mut data);
        if size == 0 {
            return BlobRetrieval::Miss { key };
        }
        if size > data.len() {
            // Buffer was too small; retry with the reported size.
            data.resize(size, 0);
            let retried = store.retrieve_blob(key.as_bytes(), &mut data);
            if retried == 0 {
                return BlobRetrieval::Miss { key };
            }
            data.truncate(retried);
        } else {
            data.truncate(size);
        }
        BlobRetrieval::Hit { key, data }
    }

    /// Instantiate a ready-to-use program directly from a stored blob.
    ///
    /// Success is verified two ways: the driver's creation call must report
    /// no error, *and* the resulting program must report a successful link —
    /// `create_program_from_binary` can succeed into an unlinked program, for
    /// instance after a driver or firmware update changed the binary format.
    /// Either check failing destroys any partially created object and returns
    /// `None`; the caller falls back to full source compilation.
    pub fn create_from_blob<D: ProgramBinaryDriver>(
        driver: &mut D,
        data: &[u8],
    ) -> Option<D::Program> {
        let Some(blob) = Blob::from_bytes(data) else {
            log::warn!(
                "stored program blob smaller than its header ({} bytes), treating as a miss",
                data.len()
            );
            return None;
        };

        let program = match driver.create_program_from_binary(blob.format, &blob.payload) {
            Ok(program) => program,
            Err(e) => {
                log::warn!(
                    "failed to load program binary, size={}, format={}: {e}",
                    data.len(),
                    blob.format
                );
                return None;
            }
        };

        if !driver.link_status(&program) {
            log::warn!(
                "program binary loaded but did not link, size={}, format={}; \
                 falling back to source compilation",
                data.len(),
                blob.format
            );
            driver.destroy_program(program);
            return None;
        }

        Some(program)
    }

    /// Persist a freshly linked program under `key`.
    ///
    /// No-op when caching is unsupported. A driver that refuses to serialize
    /// the program (zero-size binary, readback error) is skipped silently;
    /// nothing here ever affects the live program object.
    pub fn insert<D: ProgramBinaryDriver>(
        &mut self,
        driver: &D,
        key: &ProgramBinaryKey,
        program: &D::Program,
    ) {
        if !self.caching_supported {
            return;
        }
        let Some(store) = self.store.as_deref_mut() else {
            return;
        };
        let Some(blob) = driver.serialize_program(program) else {
            log::debug!("driver declined to serialize program binary, skipping cache insert");
            return;
        };
        store.insert_blob(key.as_bytes(), &blob.to_bytes());
    }
}
