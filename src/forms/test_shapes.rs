// src/forms/test_shapes.rs
//! Deterministic nested-mapping generator shared by the codec and dict tests.

use super::field_value::{FieldMap, FieldValue};

pub const MAX_DEPTH: usize = 5;

/// Short keys so sibling branches keep colliding on shared prefixes.
const KEYS: &[&str] = &["a", "b", "ab", "icons", "win", "deep", "name_help", "tips_options", "kind_field"];

/// Linear congruential generator; a seed always yields the same shape.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed.wrapping_add(0x9E37_79B9_7F4A_7C15))
    }

    pub fn below(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) % bound.max(1)
    }
}

fn leaf(rng: &mut Lcg) -> FieldValue {
    match rng.below(7) {
        0 => FieldValue::Null,
        1 => FieldValue::Bool(rng.below(2) == 0),
        2 => FieldValue::Int(rng.below(2000) as i64 - 1000),
        3 => FieldValue::Float(rng.below(400) as f64 / 4.0),
        4 => FieldValue::text(format!("t{}", rng.below(50))),
        5 => FieldValue::List((0..rng.below(4)).map(|i| FieldValue::Int(i as i64)).collect()),
        _ => FieldValue::text(""),
    }
}

/// A non-empty mapping whose nested branches go at most [`MAX_DEPTH`] levels
/// deep, counting the root as level 1.
pub fn nested_map(rng: &mut Lcg, depth: usize) -> FieldMap {
    let mut out = FieldMap::new();
    let width = 1 + rng.below(4) as usize;
    for _ in 0..width {
        let key = KEYS[rng.below(KEYS.len() as u64) as usize].to_string();
        let value = if depth < MAX_DEPTH && rng.below(5) < 2 {
            FieldValue::Map(nested_map(rng, depth + 1))
        } else {
            leaf(rng)
        };
        out.insert(key, value);
    }
    out
}

pub fn depth_of(map: &FieldMap) -> usize {
    1 + map
        .values()
        .filter_map(FieldValue::as_map)
        .map(depth_of)
        .max()
        .unwrap_or(0)
}
