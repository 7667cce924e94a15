//! Specialization Constant Substitution Tests
//!
//! Tests for the textual rewrite of `KILN_SPEC_CONST_<id>_<name>` assignment
//! statements: value formatting per type, non-assignment occurrences,
//! unmatched ids, and the malformed-source error cases.

use kiln_backend::errors::BackendError;
use kiln_backend::shader::spec_const::{SPEC_CONST_PREFIX, overrides_by_id, substitute};
use kiln_backend::shader::{SpecConstant, SpecConstantValue};

fn overrides(constants: &[SpecConstant]) -> rustc_hash::FxHashMap<u32, SpecConstantValue> {
    overrides_by_id(constants)
}

// ============================================================================
// Successful rewrites
// ============================================================================

#[test]
fn integer_override_replaces_the_declared_default() {
    let source = "const KILN_SPEC_CONST_0_SAMPLE_COUNT = 1i;\nfn main() {}\n";
    let ov = overrides(&[SpecConstant::new(0, SpecConstantValue::Int(8))]);
    let rewritten = substitute("test", source, &ov).unwrap();
    assert_eq!(
        rewritten,
        "const KILN_SPEC_CONST_0_SAMPLE_COUNT = 8i;\nfn main() {}\n"
    );
}

#[test]
fn float_override_uses_the_f_suffix() {
    let source = "const KILN_SPEC_CONST_1_BIAS = 0.0f;";
    let ov = overrides(&[SpecConstant::new(1, SpecConstantValue::Float(1.5))]);
    let rewritten = substitute("test", source, &ov).unwrap();
    assert_eq!(rewritten, "const KILN_SPEC_CONST_1_BIAS = 1.5f;");
}

#[test]
fn bool_override_is_a_bare_keyword() {
    let source = "const KILN_SPEC_CONST_2_ENABLE_FOG = false;";
    let ov = overrides(&[SpecConstant::new(2, SpecConstantValue::Bool(true))]);
    let rewritten = substitute("test", source, &ov).unwrap();
    assert_eq!(rewritten, "const KILN_SPEC_CONST_2_ENABLE_FOG = true;");
}

#[test]
fn multiple_constants_rewrite_independently() {
    let source = "\
const KILN_SPEC_CONST_0_A = 0i;
const KILN_SPEC_CONST_1_B = 0.0f;
const KILN_SPEC_CONST_2_C = false;
";
    let ov = overrides(&[
        SpecConstant::new(0, SpecConstantValue::Int(-3)),
        SpecConstant::new(2, SpecConstantValue::Bool(true)),
    ]);
    let rewritten = substitute("test", source, &ov).unwrap();
    assert_eq!(
        rewritten,
        "\
const KILN_SPEC_CONST_0_A = -3i;
const KILN_SPEC_CONST_1_B = 0.0f;
const KILN_SPEC_CONST_2_C = true;
"
    );
}

#[test]
fn source_after_the_last_constant_is_preserved() {
    let source = "const KILN_SPEC_CONST_0_N = 1i; fn main() { let x = N; }";
    let ov = overrides(&[SpecConstant::new(0, SpecConstantValue::Int(2))]);
    let rewritten = substitute("test", source, &ov).unwrap();
    assert_eq!(
        rewritten,
        "const KILN_SPEC_CONST_0_N = 2i; fn main() { let x = N; }"
    );
}

// ============================================================================
// Occurrences left unchanged
// ============================================================================

#[test]
fn unmatched_id_keeps_the_declared_default() {
    let source = "const KILN_SPEC_CONST_5_UNTOUCHED = 7i;";
    let ov = overrides(&[SpecConstant::new(0, SpecConstantValue::Int(1))]);
    assert_eq!(substitute("test", source, &ov).unwrap(), source);
}

#[test]
fn non_assignment_occurrence_is_streamed_unchanged() {
    // A use of the constant, not its declaration.
    let source = "let samples = f32(KILN_SPEC_CONST_0_SAMPLE_COUNT);";
    let ov = overrides(&[SpecConstant::new(0, SpecConstantValue::Int(8))]);
    assert_eq!(substitute("test", source, &ov).unwrap(), source);
}

#[test]
fn empty_override_set_leaves_the_source_alone() {
    let source = "const KILN_SPEC_CONST_0_A = 1i;\nconst KILN_SPEC_CONST_1_B = 2i;\n";
    let ov = overrides(&[]);
    assert_eq!(substitute("test", source, &ov).unwrap(), source);
}

#[test]
fn source_without_the_prefix_passes_through() {
    let source = "fn main() { return; }";
    let ov = overrides(&[SpecConstant::new(0, SpecConstantValue::Int(1))]);
    assert_eq!(substitute("test", source, &ov).unwrap(), source);
}

// ============================================================================
// Malformed source
// ============================================================================

#[test]
fn prefix_without_id_terminator_is_malformed() {
    let source = format!("const {SPEC_CONST_PREFIX}");
    let ov = overrides(&[SpecConstant::new(0, SpecConstantValue::Int(1))]);
    assert!(matches!(
        substitute("test", &source, &ov),
        Err(BackendError::MalformedShader { .. })
    ));
}

#[test]
fn statement_without_semicolon_is_malformed() {
    let source = "const KILN_SPEC_CONST_0_A = 1i";
    let ov = overrides(&[SpecConstant::new(0, SpecConstantValue::Int(2))]);
    assert!(matches!(
        substitute("test", source, &ov),
        Err(BackendError::MalformedShader { .. })
    ));
}

#[test]
fn non_numeric_id_in_an_assignment_is_malformed() {
    let source = "const KILN_SPEC_CONST_xy_A = 1i;";
    let ov = overrides(&[SpecConstant::new(0, SpecConstantValue::Int(2))]);
    assert!(matches!(
        substitute("test", source, &ov),
        Err(BackendError::MalformedShader { .. })
    ));
}

#[test]
fn error_reports_the_shader_label() {
    let source = "const KILN_SPEC_CONST_0_A = 1i";
    let ov = overrides(&[SpecConstant::new(0, SpecConstantValue::Int(2))]);
    let Err(BackendError::MalformedShader { label, .. }) = substitute("depth_vs", source, &ov)
    else {
        panic!("expected a malformed-shader error");
    };
    assert_eq!(label, "depth_vs");
}
