//! Property tests for symbol naming.
//!
//! Every instantiation the catalog can produce must map to a distinct, valid
//! C identifier, and broadcast forms must exist exactly where the operation
//! declares them.

use std::collections::HashMap;

use proptest::prelude::*;
use proptest::sample::select;

use ranmath_gen::catalog::{Broadcast, Catalog, Category};
use ranmath_gen::naming::{canonical_name, is_c_identifier, SymbolKey, Variant};
use ranmath_gen::taxonomy::{Shape, Taxonomy, Width};

/// Keys of every symbol the standard catalog emits over the standard taxonomy.
fn generated_keys() -> Vec<SymbolKey> {
    let catalog = Catalog::standard().unwrap_or_else(|e| panic!("Failed to build catalog: {}", e));
    let taxonomy = Taxonomy::standard();
    let mut keys = Vec::new();
    for op in catalog.operations() {
        for (ty, shape) in taxonomy.combinations() {
            if !op.applies_to(ty, shape) {
                continue;
            }
            let base = SymbolKey::new(op.name, ty, shape);
            keys.push(base);
            keys.extend(op.variants(shape).iter().map(|&v| base.with_variant(v)));
        }
    }
    keys
}

#[test]
fn test_full_sweep_is_injective() {
    let mut seen: HashMap<String, SymbolKey> = HashMap::new();
    for key in generated_keys() {
        let name = canonical_name(&key);
        assert!(is_c_identifier(&name), "{} is not a C identifier", name);
        if let Some(previous) = seen.insert(name.clone(), key) {
            panic!("{} names both {} and {}", name, previous, key);
        }
    }
    assert!(seen.len() > 1000);
}

#[test]
fn test_broadcast_forms_match_declaration() {
    let catalog = Catalog::standard().unwrap_or_else(|e| panic!("Failed to build catalog: {}", e));
    let shape = Shape::Vector(Width::Three);
    for category in [Category::Boolean, Category::Arithmetic] {
        for op in catalog.operations().iter().filter(|op| op.category == category) {
            let expected: &[Variant] = match (op.is_binary_elementwise(), op.broadcast) {
                (false, _) | (_, Broadcast::None) => &[],
                (true, Broadcast::VectorScalar) => &[Variant::VectorScalar],
                (true, Broadcast::Both) => &[Variant::VectorScalar, Variant::ScalarVector],
            };
            assert_eq!(op.variants(shape), expected, "{}", op.name);
        }
    }
}

#[test]
fn test_known_names() {
    use ranmath_gen::taxonomy::ScalarType;

    let vec3 = Shape::Vector(Width::Three);
    let cases = [
        (SymbolKey::new("add", ScalarType::F32, vec3), "rm_add_f32x3"),
        (SymbolKey::new("add", ScalarType::F32, vec3).with_variant(Variant::VectorScalar), "rm_adds_f32x3"),
        (SymbolKey::new("sub", ScalarType::I8, vec3).with_variant(Variant::ScalarVector), "rm_ssub_i8x3"),
        (SymbolKey::new("lt", ScalarType::U16, vec3), "rm_lt_u16x3"),
        (SymbolKey::new("floor", ScalarType::F64, Shape::Scalar), "rm_floor_f64"),
        (
            SymbolKey::new("mulv", ScalarType::F32, Shape::Matrix { cols: Width::Four, rows: Width::Two }),
            "rm_mulv_f32x2x4",
        ),
    ];
    for (key, name) in cases {
        assert_eq!(canonical_name(&key), name);
    }
}

proptest! {
    #[test]
    fn prop_distinct_keys_have_distinct_names(
        (a, b) in (select(generated_keys()), select(generated_keys()))
    ) {
        prop_assert_eq!(a == b, canonical_name(&a) == canonical_name(&b));
    }

    #[test]
    fn prop_name_ends_with_operand_token(key in select(generated_keys())) {
        let name = canonical_name(&key);
        let suffix = format!("_{}", key.type_token());
        prop_assert!(name.ends_with(&suffix));
        prop_assert!(name.starts_with("rm_"));
    }
}
