//! Program-binary capability trait.
//!
//! Everything API-specific about program binaries — whether the driver can
//! produce them at all, loading one, checking the resulting link status, and
//! serializing a linked program back out — sits behind this trait. A GL
//! backend wraps `glProgramBinary` / `glGetProgramBinary`; test suites use an
//! in-memory mock.

use crate::errors::Result;
use crate::program::blob::Blob;

/// Per-API program object construction from pre-compiled binaries.
pub trait ProgramBinaryDriver {
    /// The native program object for this API.
    type Program;

    /// Number of binary formats the driver supports. Zero disables every
    /// blob operation in the cache.
    fn num_program_binary_formats(&self) -> usize;

    /// Instantiate a program from a serialized binary in the given format.
    ///
    /// An `Err` here corresponds to the low-level creation call reporting an
    /// error; note that the call can also "succeed" into an unlinked program,
    /// which is why the cache additionally checks [`link_status`].
    ///
    /// [`link_status`]: ProgramBinaryDriver::link_status
    fn create_program_from_binary(&mut self, format: u32, payload: &[u8])
    -> Result<Self::Program>;

    /// Whether the program reports a successful link.
    fn link_status(&self, program: &Self::Program) -> bool;

    /// Release a program object.
    fn destroy_program(&mut self, program: Self::Program);

    /// Serialize a linked program to its native binary representation.
    ///
    /// Returns `None` when the driver refuses (zero-size binary or a readback
    /// error); the cache silently skips insertion in that case.
    fn serialize_program(&self, program: &Self::Program) -> Option<Blob>;
}
