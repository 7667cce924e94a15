//! Specialization-constant substitution.
//!
//! Shader templates declare their specialization constants as ordinary
//! assignment statements whose identifier carries a recognized token prefix
//! and a numeric id:
//!
//! ```wgsl
//! const KILN_SPEC_CONST_0_SHADOW_SAMPLE_COUNT = 4i;
//! ```
//!
//! [`substitute`] rewrites the right-hand side of each such statement with the
//! caller-supplied override value at the lexical level, before the source ever
//! reaches the compiler. Ids with no override, and occurrences of the token
//! that are not assignment statements, are left unchanged.
//!
//! A token with no id terminator or a statement with no terminating `;` means
//! the shader itself is malformed; that is the one error class in this crate
//! that aborts construction instead of degrading.

use rustc_hash::FxHashMap;

use crate::errors::{BackendError, Result};
use crate::shader::{SpecConstant, SpecConstantValue};

/// Token prefix recognized in shader source: `KILN_SPEC_CONST_<id>_<name>`.
pub const SPEC_CONST_PREFIX: &str = "KILN_SPEC_CONST_";

/// Collect a constant list into the id → value map [`substitute`] consumes.
#[must_use]
pub fn overrides_by_id(constants: &[SpecConstant]) -> FxHashMap<u32, SpecConstantValue> {
    constants.iter().map(|c| (c.id, c.value)).collect()
}

/// Rewrite every overridden spec-constant assignment in `source`.
///
/// `label` identifies the shader in diagnostics (program name + stage).
pub fn substitute(
    label: &str,
    source: &str,
    overrides: &FxHashMap<u32, SpecConstantValue>,
) -> Result<String> {
    let mut out = String::with_capacity(source.len());
    let mut pos = 0;

    while pos < source.len() {
        let Some(found) = source[pos..].find(SPEC_CONST_PREFIX) else {
            // No more spec constants; stream the rest of the source.
            out.push_str(&source[pos..]);
            break;
        };
        let token_start = pos + found;
        let id_start = token_start + SPEC_CONST_PREFIX.len();

        let Some(terminator) = source[id_start..].find('_') else {
            return Err(BackendError::MalformedShader {
                label: label.to_owned(),
                detail: format!(
                    "found spec constant prefix `{SPEC_CONST_PREFIX}` without an id or `_` after it"
                ),
            });
        };
        let id_end = id_start + terminator;
        let id_str = &source[id_start..id_end];

        let Some(semicolon) = source[id_end..].find(';') else {
            return Err(BackendError::MalformedShader {
                label: label.to_owned(),
                detail: format!(
                    "spec constant statement with id `{id_str}` has no terminating `;`"
                ),
            });
        };
        let statement_end = id_end + semicolon;

        let Some(equals) = source[id_end..statement_end].find('=') else {
            // Not an assignment statement; stream through the `;` unchanged.
            out.push_str(&source[pos..=statement_end]);
            pos = statement_end + 1;
            continue;
        };
        let equals_pos = id_end + equals;

        let id: u32 = id_str.parse().map_err(|_| BackendError::MalformedShader {
            label: label.to_owned(),
            detail: format!("spec constant id `{id_str}` is not a valid integer"),
        })?;

        let Some(value) = overrides.get(&id) else {
            // No override for this id; keep the declared default.
            out.push_str(&source[pos..=statement_end]);
            pos = statement_end + 1;
            continue;
        };

        // Stream up to and including the `=`, then the override value.
        out.push_str(&source[pos..=equals_pos]);
        out.push(' ');
        value.write_wgsl(&mut out);
        out.push(';');
        pos = statement_end + 1;
    }

    Ok(out)
}
