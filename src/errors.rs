//! Error Types
//!
//! This module defines the error types used throughout the backend caching
//! layer.
//!
//! # Propagation policy
//!
//! Internal GPU-API failures are converted to sentinel results at the cache
//! boundary: a pipeline that fails to build is cached as an invalid handle, a
//! program binary that fails to link is discarded and recompiled from source.
//! Only malformed shader source (a content bug, not an environment condition)
//! aborts synchronously through [`Result`].

use thiserror::Error;

use crate::pipeline::id::{PipelineLayoutId, ShaderModuleId};

/// The main error type for the backend caching layer.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Shader source failed specialization-constant rewriting.
    ///
    /// Indicates a content bug in the shader itself (for instance a constant
    /// token without a terminating `;`), never a runtime condition.
    #[error("malformed shader source in {label}: {detail}")]
    MalformedShader {
        /// Human-readable shader label (program name + stage).
        label: String,
        /// Description of the offending token.
        detail: String,
    },

    /// The driver reported an error while constructing a pipeline object.
    #[error("pipeline creation failed: {0}")]
    PipelineCreation(String),

    /// The driver reported an error while instantiating a program object.
    #[error("program creation failed: {0}")]
    ProgramCreation(String),

    /// A pipeline key referenced a shader module id that was never registered.
    #[error("unknown shader module id: {0:?}")]
    UnknownShaderModule(ShaderModuleId),

    /// A pipeline key referenced a pipeline layout id that was never registered.
    #[error("unknown pipeline layout id: {0:?}")]
    UnknownPipelineLayout(PipelineLayoutId),

    /// File I/O error (blob store setup).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Alias for `Result<T, BackendError>`.
pub type Result<T> = std::result::Result<T, BackendError>;
