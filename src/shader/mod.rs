//! Shader-side support types for the caching layer.
//!
//! Specialization constants participate in both cache keys (pipeline and
//! program-binary) and in the textual source rewrite in [`spec_const`], so
//! the value types live here.

pub mod spec_const;

use std::hash::{Hash, Hasher};

/// A scalar value substituted into shader source at build time rather than
/// supplied at draw time.
#[derive(Debug, Clone, Copy)]
pub enum SpecConstantValue {
    Int(i32),
    Float(f32),
    Bool(bool),
}

// Floats compare and hash via their bit pattern so the type can serve as a
// cache key component.
impl PartialEq for SpecConstantValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Bool(a), Self::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for SpecConstantValue {}

impl Hash for SpecConstantValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Self::Int(v) => v.hash(state),
            Self::Float(v) => v.to_bits().hash(state),
            Self::Bool(v) => v.hash(state),
        }
    }
}

impl SpecConstantValue {
    /// Append the WGSL literal form of this value (`42i`, `1.5f`, `true`).
    pub(crate) fn write_wgsl(self, out: &mut String) {
        use std::fmt::Write;
        match self {
            Self::Int(v) => {
                let _ = write!(out, "{v}i");
            }
            Self::Float(v) => {
                let _ = write!(out, "{v}f");
            }
            Self::Bool(v) => {
                let _ = write!(out, "{v}");
            }
        }
    }
}

/// A numeric-id specialization-constant override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpecConstant {
    pub id: u32,
    pub value: SpecConstantValue,
}

impl SpecConstant {
    #[must_use]
    pub fn new(id: u32, value: SpecConstantValue) -> Self {
        Self { id, value }
    }
}
