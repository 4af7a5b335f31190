// This module declares the vector arithmetic operations. Element-wise rows apply the
// matching scalar operation (or plain C operator) to each component and rebuild the
// vector with its constructor macro. The composite rows (fma, clamps, fmas, fmass) are
// written in terms of vector operations declared earlier in the table, including the
// derived broadcast forms, which is why add and mul precede them. Reductions (hadd,
// minv, maxv, dot) return the element type.

//! Vector arithmetic table.

use super::{Broadcast, OpSpec, ValueType};
use crate::taxonomy::TypeClass;

use ValueType::{Element, Operand};

const UNARY: &[(&str, ValueType)] = &[("v", Operand)];
const BINARY: &[(&str, ValueType)] = &[("a", Operand), ("b", Operand)];
const TERNARY: &[(&str, ValueType)] = &[("a", Operand), ("b", Operand), ("c", Operand)];
const RANGE: &[(&str, ValueType)] = &[("v", Operand), ("lo", Operand), ("hi", Operand)];

pub const OPERATIONS: &[OpSpec] = &[
    OpSpec {
        name: "neg",
        types: TypeClass::SignedOrFloat,
        params: UNARY,
        ret: Operand,
        bodies: &[(TypeClass::SignedOrFloat, "return {@vec:-v.{c}};")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "abs",
        types: TypeClass::SignedOrFloat,
        params: UNARY,
        ret: Operand,
        bodies: &[(TypeClass::SignedOrFloat, "return {@vec:rm_abs_{T}(v.{c})};")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "min",
        types: TypeClass::Numeric,
        params: BINARY,
        ret: Operand,
        bodies: &[(TypeClass::Numeric, "return {@vec:rm_min_{T}(a.{c}, b.{c})};")],
        broadcast: Broadcast::VectorScalar,
    },
    OpSpec {
        name: "max",
        types: TypeClass::Numeric,
        params: BINARY,
        ret: Operand,
        bodies: &[(TypeClass::Numeric, "return {@vec:rm_max_{T}(a.{c}, b.{c})};")],
        broadcast: Broadcast::VectorScalar,
    },
    OpSpec {
        name: "add",
        types: TypeClass::Numeric,
        params: BINARY,
        ret: Operand,
        bodies: &[(TypeClass::Numeric, "return {@vec:a.{c} + b.{c}};")],
        broadcast: Broadcast::VectorScalar,
    },
    OpSpec {
        name: "sub",
        types: TypeClass::Numeric,
        params: BINARY,
        ret: Operand,
        bodies: &[(TypeClass::Numeric, "return {@vec:a.{c} - b.{c}};")],
        broadcast: Broadcast::Both,
    },
    OpSpec {
        name: "mul",
        types: TypeClass::Numeric,
        params: BINARY,
        ret: Operand,
        bodies: &[(TypeClass::Numeric, "return {@vec:a.{c} * b.{c}};")],
        broadcast: Broadcast::VectorScalar,
    },
    OpSpec {
        name: "div",
        types: TypeClass::Numeric,
        params: BINARY,
        ret: Operand,
        bodies: &[(TypeClass::Numeric, "return {@vec:a.{c} / b.{c}};")],
        broadcast: Broadcast::Both,
    },
    OpSpec {
        name: "mod",
        types: TypeClass::Numeric,
        params: BINARY,
        ret: Operand,
        bodies: &[(TypeClass::Numeric, "return {@vec:rm_mod_{T}(a.{c}, b.{c})};")],
        broadcast: Broadcast::Both,
    },
    OpSpec {
        name: "clamp",
        types: TypeClass::Numeric,
        params: RANGE,
        ret: Operand,
        bodies: &[(TypeClass::Numeric, "return {@vec:rm_clamp_{T}(v.{c}, lo.{c}, hi.{c})};")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "sign",
        types: TypeClass::SignedOrFloat,
        params: UNARY,
        ret: Operand,
        bodies: &[(TypeClass::SignedOrFloat, "return {@vec:rm_sign_{T}(v.{c})};")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "copysign",
        types: TypeClass::SignedOrFloat,
        params: BINARY,
        ret: Operand,
        bodies: &[(TypeClass::SignedOrFloat, "return {@vec:rm_copysign_{T}(a.{c}, b.{c})};")],
        broadcast: Broadcast::Both,
    },
    OpSpec {
        name: "fma",
        types: TypeClass::Numeric,
        params: TERNARY,
        ret: Operand,
        bodies: &[(TypeClass::Numeric, "return rm_add_{V}(rm_mul_{V}(a, b), c);")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "clamps",
        types: TypeClass::Numeric,
        params: &[("v", Operand), ("lo", Element), ("hi", Element)],
        ret: Operand,
        bodies: &[(TypeClass::Numeric, "return rm_clamp_{V}(v, rm_{V}s(lo), rm_{V}s(hi));")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "fmas",
        types: TypeClass::Numeric,
        params: &[("a", Operand), ("b", Operand), ("c", Element)],
        ret: Operand,
        bodies: &[(TypeClass::Numeric, "return rm_adds_{V}(rm_mul_{V}(a, b), c);")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "fmass",
        types: TypeClass::Numeric,
        params: &[("a", Operand), ("b", Element), ("c", Element)],
        ret: Operand,
        bodies: &[(TypeClass::Numeric, "return rm_adds_{V}(rm_muls_{V}(a, b), c);")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "floor",
        types: TypeClass::Float,
        params: UNARY,
        ret: Operand,
        bodies: &[(TypeClass::Float, "return {@vec:rm_floor_{T}(v.{c})};")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "ceil",
        types: TypeClass::Float,
        params: UNARY,
        ret: Operand,
        bodies: &[(TypeClass::Float, "return {@vec:rm_ceil_{T}(v.{c})};")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "round",
        types: TypeClass::Float,
        params: UNARY,
        ret: Operand,
        bodies: &[(TypeClass::Float, "return {@vec:rm_round_{T}(v.{c})};")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "trunc",
        types: TypeClass::Float,
        params: UNARY,
        ret: Operand,
        bodies: &[(TypeClass::Float, "return {@vec:rm_trunc_{T}(v.{c})};")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "fract",
        types: TypeClass::Float,
        params: UNARY,
        ret: Operand,
        bodies: &[(TypeClass::Float, "return {@vec:rm_fract_{T}(v.{c})};")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "hadd",
        types: TypeClass::Numeric,
        params: UNARY,
        ret: Element,
        bodies: &[(TypeClass::Numeric, "return {@sum:v.{c}};")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "minv",
        types: TypeClass::Numeric,
        params: UNARY,
        ret: Element,
        bodies: &[(TypeClass::Numeric, "return {@chain:rm_min_{T}:v.{c}};")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "maxv",
        types: TypeClass::Numeric,
        params: UNARY,
        ret: Element,
        bodies: &[(TypeClass::Numeric, "return {@chain:rm_max_{T}:v.{c}};")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "dot",
        types: TypeClass::Numeric,
        params: BINARY,
        ret: Element,
        bodies: &[(TypeClass::Numeric, "return {@sum:a.{c} * b.{c}};")],
        broadcast: Broadcast::None,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Category};
    use crate::taxonomy::{ScalarType, Shape, Width};

    fn symbol_names(op: &str, ty: ScalarType, width: Width) -> Vec<String> {
        let catalog = Catalog::standard().unwrap();
        catalog
            .operation(Category::Arithmetic, op)
            .unwrap_or_else(|| panic!("no operation {}", op))
            .instantiate(ty, Shape::Vector(width))
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect()
    }

    #[test]
    fn test_composites_follow_their_parts() {
        let position = |name: &str| OPERATIONS.iter().position(|op| op.name == name).unwrap();
        assert!(position("add") < position("fma"));
        assert!(position("mul") < position("fmas"));
        assert!(position("clamp") < position("clamps"));
    }

    #[test]
    fn test_every_row_has_a_body() {
        for op in OPERATIONS {
            assert!(!op.bodies.is_empty(), "{} has no body", op.name);
        }
    }

    #[test]
    fn test_min_is_commutative() {
        assert_eq!(
            symbol_names("min", ScalarType::U32, Width::Three),
            ["rm_min_u32x3", "rm_mins_u32x3"]
        );
        assert_eq!(
            symbol_names("mod", ScalarType::U32, Width::Three),
            ["rm_mod_u32x3", "rm_mods_u32x3", "rm_smod_u32x3"]
        );
    }

    #[test]
    fn test_reductions_return_the_element() {
        let catalog = Catalog::standard().unwrap();
        let dot = catalog.operation(Category::Arithmetic, "dot").unwrap();
        let symbol = dot
            .instantiate(ScalarType::F32, Shape::Vector(Width::Three))
            .unwrap()
            .remove(0);
        assert_eq!(symbol.signature.ret, "f32");
        assert_eq!(symbol.body, "return (a.x * b.x + a.y * b.y + a.z * b.z);");
        assert!(dot.variants(Shape::Vector(Width::Three)).is_empty());
    }

    #[test]
    fn test_fmass_uses_broadcast_forms() {
        let catalog = Catalog::standard().unwrap();
        let fmass = catalog.operation(Category::Arithmetic, "fmass").unwrap();
        let symbol = fmass
            .instantiate(ScalarType::I16, Shape::Vector(Width::Two))
            .unwrap()
            .remove(0);
        assert_eq!(symbol.body, "return rm_adds_i16x2(rm_muls_i16x2(a, b), c);");
        assert_eq!(
            symbol.signature.render("RM_INLINE", &symbol.name),
            "RM_INLINE i16x2 rm_fmass_i16x2(const i16x2 a, const i16 b, const i16 c)"
        );
    }
}
