//! Pipeline Cache Tests
//!
//! Tests for:
//! - RenderPipelineKey: structural equality, hash consistency, constant-order
//!   insensitivity, validity checks
//! - PipelineCache: exactly-once construction, generation stamping, gc
//!   eviction thresholds, invalid-entry sentinel, clear

use std::hash::{DefaultHasher, Hash, Hasher};

use smallvec::smallvec;

use kiln_backend::errors::{BackendError, Result};
use kiln_backend::pipeline::backend::PipelineBackend;
use kiln_backend::pipeline::cache::PipelineCache;
use kiln_backend::pipeline::id::{PipelineLayoutId, ShaderModuleId};
use kiln_backend::pipeline::key::{RenderPipelineKey, VertexAttributeKey, VertexBufferLayoutKey};
use kiln_backend::shader::{SpecConstant, SpecConstantValue};

// ============================================================================
// Mock backend
// ============================================================================

#[derive(Debug, PartialEq, Eq)]
struct MockPipeline {
    serial: u32,
}

#[derive(Default)]
struct MockBackend {
    created: u32,
    destroyed: u32,
    fail_creation: bool,
}

impl PipelineBackend for MockBackend {
    type Pipeline = MockPipeline;

    fn create_render_pipeline(&mut self, _key: &RenderPipelineKey) -> Result<MockPipeline> {
        if self.fail_creation {
            return Err(BackendError::PipelineCreation("mock failure".into()));
        }
        self.created += 1;
        Ok(MockPipeline {
            serial: self.created,
        })
    }

    fn destroy_render_pipeline(&mut self, _pipeline: MockPipeline) {
        self.destroyed += 1;
    }
}

fn basic_key() -> RenderPipelineKey {
    RenderPipelineKey {
        vertex_shader: Some(ShaderModuleId::from_raw(1)),
        fragment_shader: Some(ShaderModuleId::from_raw(2)),
        layout: Some(PipelineLayoutId::from_raw(1)),
        ..Default::default()
    }
}

fn hash_of<K: Hash>(key: &K) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

// ============================================================================
// Key equality and hashing
// ============================================================================

#[test]
fn identical_keys_are_equal_with_equal_hashes() {
    let k1 = basic_key();
    let k2 = basic_key();
    assert_eq!(k1, k2);
    assert_eq!(hash_of(&k1), hash_of(&k2));
}

#[test]
fn key_equality_is_order_insensitive_for_constants() {
    let mut k1 = basic_key();
    k1.set_constants([
        SpecConstant::new(3, SpecConstantValue::Float(0.5)),
        SpecConstant::new(0, SpecConstantValue::Int(4)),
        SpecConstant::new(7, SpecConstantValue::Bool(true)),
    ]);

    let mut k2 = basic_key();
    k2.set_constants([
        SpecConstant::new(7, SpecConstantValue::Bool(true)),
        SpecConstant::new(3, SpecConstantValue::Float(0.5)),
        SpecConstant::new(0, SpecConstantValue::Int(4)),
    ]);

    assert_eq!(k1, k2);
    assert_eq!(hash_of(&k1), hash_of(&k2));
}

#[test]
fn differing_constant_values_make_keys_unequal() {
    let mut k1 = basic_key();
    k1.set_constants([SpecConstant::new(0, SpecConstantValue::Int(4))]);
    let mut k2 = basic_key();
    k2.set_constants([SpecConstant::new(0, SpecConstantValue::Int(8))]);
    assert_ne!(k1, k2);
}

#[test]
fn vertex_layout_participates_in_equality() {
    let attribute = VertexAttributeKey {
        format: wgpu::VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    };
    let mut k1 = basic_key();
    k1.vertex_buffers = smallvec![VertexBufferLayoutKey {
        array_stride: 12,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: smallvec![attribute],
    }];

    let mut k2 = k1.clone();
    assert_eq!(k1, k2);
    assert_eq!(hash_of(&k1), hash_of(&k2));

    k2.vertex_buffers[0].attributes[0].offset = 4;
    assert_ne!(k1, k2);
}

#[test]
fn depth_bias_slope_scale_round_trips_through_bits() {
    let mut key = basic_key();
    key.set_depth_bias_slope_scale(2.5);
    assert!((key.depth_bias_slope_scale() - 2.5).abs() < f32::EPSILON);
}

#[test]
fn key_without_vertex_shader_or_layout_is_invalid() {
    let mut key = basic_key();
    assert!(key.is_valid());

    key.vertex_shader = None;
    assert!(!key.is_valid());

    let mut key = basic_key();
    key.layout = None;
    assert!(!key.is_valid());
}

// ============================================================================
// Get-or-create semantics
// ============================================================================

#[test]
fn get_or_create_constructs_exactly_once_per_key() {
    let mut backend = MockBackend::default();
    let mut cache = PipelineCache::new();
    let key = basic_key();

    let serial = cache.get_or_create(&mut backend, &key).unwrap().serial;
    for _ in 0..10 {
        let again = cache.get_or_create(&mut backend, &key).unwrap().serial;
        assert_eq!(again, serial, "repeated lookups must return the same entry");
    }
    assert_eq!(backend.created, 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn distinct_keys_construct_distinct_pipelines() {
    let mut backend = MockBackend::default();
    let mut cache = PipelineCache::new();

    let k1 = basic_key();
    let mut k2 = basic_key();
    k2.sample_count = 4;

    let s1 = cache.get_or_create(&mut backend, &k1).unwrap().serial;
    let s2 = cache.get_or_create(&mut backend, &k2).unwrap().serial;
    assert_ne!(s1, s2);
    assert_eq!(backend.created, 2);
    assert_eq!(cache.len(), 2);
}

#[test]
fn failed_construction_is_cached_as_invalid_and_never_retried() {
    let mut backend = MockBackend {
        fail_creation: true,
        ..Default::default()
    };
    let mut cache = PipelineCache::new();
    let key = basic_key();

    assert!(cache.get_or_create(&mut backend, &key).is_none());
    assert_eq!(cache.len(), 1, "the failure sentinel must be cached");

    // Even once the backend recovers, the cache does not retry on its own.
    backend.fail_creation = false;
    assert!(cache.get_or_create(&mut backend, &key).is_none());
    assert_eq!(backend.created, 0);
}

// ============================================================================
// Generational eviction
// ============================================================================

#[test]
fn entry_survives_up_to_max_age_generations_without_use() {
    let mut backend = MockBackend::default();
    let mut cache = PipelineCache::with_max_age(2);
    let key = basic_key();
    cache.get_or_create(&mut backend, &key);

    cache.gc(&mut backend);
    cache.gc(&mut backend);
    assert_eq!(cache.len(), 1, "within the age threshold, nothing is evicted");
    assert_eq!(backend.destroyed, 0);

    cache.gc(&mut backend);
    assert_eq!(cache.len(), 0, "exceeding the threshold evicts the entry");
    assert_eq!(backend.destroyed, 1);
}

#[test]
fn entry_accessed_between_gcs_is_never_evicted() {
    let mut backend = MockBackend::default();
    let mut cache = PipelineCache::with_max_age(1);
    let key = basic_key();
    cache.get_or_create(&mut backend, &key);

    for _ in 0..20 {
        cache.gc(&mut backend);
        assert!(
            cache.get_or_create(&mut backend, &key).is_some(),
            "an entry used every frame must stay alive"
        );
    }
    assert_eq!(backend.created, 1);
    assert_eq!(backend.destroyed, 0);
}

#[test]
fn fresh_entry_survives_an_immediate_gc() {
    let mut backend = MockBackend::default();
    let mut cache = PipelineCache::with_max_age(1);

    // Age the cache a few generations before inserting.
    cache.gc(&mut backend);
    cache.gc(&mut backend);
    cache.gc(&mut backend);

    let key = basic_key();
    cache.get_or_create(&mut backend, &key);
    cache.gc(&mut backend);
    assert_eq!(
        cache.len(),
        1,
        "a just-inserted entry must not be swept by the next gc"
    );
}

#[test]
fn only_stale_entries_are_evicted() {
    let mut backend = MockBackend::default();
    let mut cache = PipelineCache::with_max_age(1);

    let hot = basic_key();
    let mut cold = basic_key();
    cold.topology = wgpu::PrimitiveTopology::LineList;

    cache.get_or_create(&mut backend, &hot);
    cache.get_or_create(&mut backend, &cold);

    cache.gc(&mut backend);
    cache.get_or_create(&mut backend, &hot);
    cache.gc(&mut backend);

    assert_eq!(cache.len(), 1, "only the untouched entry is reclaimed");
    assert_eq!(backend.destroyed, 1);
    assert!(cache.get_or_create(&mut backend, &hot).is_some());
    assert_eq!(backend.created, 2, "the hot pipeline was never rebuilt");
}

#[test]
fn gc_advances_the_generation_counter() {
    let mut backend = MockBackend::default();
    let mut cache: PipelineCache<MockBackend> = PipelineCache::new();
    assert_eq!(cache.generation(), 0);
    cache.gc(&mut backend);
    cache.gc(&mut backend);
    assert_eq!(cache.generation(), 2);
}

#[test]
fn clear_releases_every_pipeline() {
    let mut backend = MockBackend::default();
    let mut cache = PipelineCache::new();

    let k1 = basic_key();
    let mut k2 = basic_key();
    k2.alpha_to_coverage = true;
    cache.get_or_create(&mut backend, &k1);
    cache.get_or_create(&mut backend, &k2);

    cache.clear(&mut backend);
    assert!(cache.is_empty());
    assert_eq!(backend.destroyed, 2);
}
