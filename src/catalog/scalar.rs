// This module declares the scalar operations, instantiated once per numeric scalar type.
// Rounding is built without <math.h>: trunc goes through the same-width signed integer
// below the exact-integer threshold and returns its input unchanged above it (or for
// NaN), floor and ceil correct trunc by one, and round rounds half away from zero by
// comparing the fractional part of the magnitude against one half. The float modulo is
// a - trunc(a / b) * b, the integer one is the C remainder. Later rows may call earlier
// ones, so the table order is also the definition order in the header.

//! Scalar operation table.

use super::{Broadcast, OpSpec, ValueType};
use crate::taxonomy::TypeClass;

use ValueType::Operand;

const UNARY: &[(&str, ValueType)] = &[("x", Operand)];
const BINARY: &[(&str, ValueType)] = &[("a", Operand), ("b", Operand)];
const RANGE: &[(&str, ValueType)] = &[("v", Operand), ("lo", Operand), ("hi", Operand)];

pub const OPERATIONS: &[OpSpec] = &[
    OpSpec {
        name: "abs",
        types: TypeClass::SignedOrFloat,
        params: UNARY,
        ret: Operand,
        bodies: &[(TypeClass::SignedOrFloat, "return RM_ABS(x);")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "min",
        types: TypeClass::Numeric,
        params: BINARY,
        ret: Operand,
        bodies: &[(TypeClass::Numeric, "return RM_MIN(a, b);")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "max",
        types: TypeClass::Numeric,
        params: BINARY,
        ret: Operand,
        bodies: &[(TypeClass::Numeric, "return RM_MAX(a, b);")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "clamp",
        types: TypeClass::Numeric,
        params: RANGE,
        ret: Operand,
        bodies: &[(TypeClass::Numeric, "return RM_CLAMP(v, lo, hi);")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "pow2",
        types: TypeClass::Numeric,
        params: UNARY,
        ret: Operand,
        bodies: &[(TypeClass::Numeric, "return RM_POW2(x);")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "trunc",
        types: TypeClass::Float,
        params: UNARY,
        ret: Operand,
        bodies: &[(
            TypeClass::Float,
            "return (rm_abs_{T}(x) < {EXACT}) ? ({T})({I})x : x;",
        )],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "mod",
        types: TypeClass::Numeric,
        params: BINARY,
        ret: Operand,
        bodies: &[
            (TypeClass::Integer, "return a % b;"),
            (TypeClass::Float, "return a - rm_trunc_{T}(a / b) * b;"),
        ],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "sign",
        types: TypeClass::SignedOrFloat,
        params: UNARY,
        ret: Operand,
        bodies: &[(TypeClass::SignedOrFloat, "return ({T})RM_SIGN(x);")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "copysign",
        types: TypeClass::SignedOrFloat,
        params: &[("x", Operand), ("s", Operand)],
        ret: Operand,
        bodies: &[(
            TypeClass::SignedOrFloat,
            "return (s < 0) ? -rm_abs_{T}(x) : rm_abs_{T}(x);",
        )],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "floor",
        types: TypeClass::Float,
        params: UNARY,
        ret: Operand,
        bodies: &[(
            TypeClass::Float,
            "const {T} t = rm_trunc_{T}(x);\nreturn (t > x) ? t - 1 : t;",
        )],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "ceil",
        types: TypeClass::Float,
        params: UNARY,
        ret: Operand,
        bodies: &[(
            TypeClass::Float,
            "const {T} t = rm_trunc_{T}(x);\nreturn (t < x) ? t + 1 : t;",
        )],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "round",
        types: TypeClass::Float,
        params: UNARY,
        ret: Operand,
        bodies: &[(
            TypeClass::Float,
            "const {T} m = rm_abs_{T}(x);\n\
             const {T} t = rm_floor_{T}(m);\n\
             const {T} r = (m - t >= 0.5{L}) ? t + 1 : t;\n\
             return (x < 0) ? -r : r;",
        )],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "fract",
        types: TypeClass::Float,
        params: UNARY,
        ret: Operand,
        bodies: &[(TypeClass::Float, "return x - rm_floor_{T}(x);")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "wrap",
        types: TypeClass::SignedOrFloat,
        params: RANGE,
        ret: Operand,
        bodies: &[(
            TypeClass::SignedOrFloat,
            "const {T} span = hi - lo;\n\
             return lo + rm_mod_{T}(span + rm_mod_{T}(v - lo, span), span);",
        )],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "deg2rad",
        types: TypeClass::Float,
        params: UNARY,
        ret: Operand,
        bodies: &[(TypeClass::Float, "return x * RM_DEG2RAD_{TU};")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "rad2deg",
        types: TypeClass::Float,
        params: UNARY,
        ret: Operand,
        bodies: &[(TypeClass::Float, "return x * RM_RAD2DEG_{TU};")],
        broadcast: Broadcast::None,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Category};
    use crate::taxonomy::{ScalarType, Shape};

    #[test]
    fn test_table_order() {
        let names: Vec<_> = OPERATIONS.iter().map(|op| op.name).collect();
        assert_eq!(
            names,
            [
                "abs", "min", "max", "clamp", "pow2", "trunc", "mod", "sign", "copysign", "floor",
                "ceil", "round", "fract", "wrap", "deg2rad", "rad2deg"
            ]
        );
    }

    #[test]
    fn test_integer_and_float_mod_bodies() {
        let catalog = Catalog::standard().unwrap();
        let op = catalog.operation(Category::Scalar, "mod").unwrap();
        let int = op.instantiate(ScalarType::I32, Shape::Scalar).unwrap();
        let float = op.instantiate(ScalarType::F32, Shape::Scalar).unwrap();
        assert_eq!(int[0].body, "return a % b;");
        assert_eq!(float[0].body, "return a - rm_trunc_f32(a / b) * b;");
    }

    #[test]
    fn test_trunc_uses_threshold_and_integer_cast() {
        let catalog = Catalog::standard().unwrap();
        let op = catalog.operation(Category::Scalar, "trunc").unwrap();
        let body = &op.instantiate(ScalarType::F64, Shape::Scalar).unwrap()[0].body;
        assert_eq!(body, "return (rm_abs_f64(x) < 4503599627370496.0) ? (f64)(i64)x : x;");
    }

    /// Rendered base body of the scalar operation `name` for `ty`.
    fn body(name: &str, ty: ScalarType) -> String {
        let catalog = Catalog::standard().unwrap();
        let op = catalog.operation(Category::Scalar, name).unwrap();
        op.instantiate(ty, Shape::Scalar).unwrap().remove(0).body
    }

    // Each body below is the formula its `reference` counterpart computes.
    #[test]
    fn test_rounding_bodies() {
        assert_eq!(
            body("floor", ScalarType::F32),
            "const f32 t = rm_trunc_f32(x);\nreturn (t > x) ? t - 1 : t;"
        );
        assert_eq!(
            body("ceil", ScalarType::F64),
            "const f64 t = rm_trunc_f64(x);\nreturn (t < x) ? t + 1 : t;"
        );
        assert_eq!(
            body("round", ScalarType::F32),
            "const f32 m = rm_abs_f32(x);\n\
             const f32 t = rm_floor_f32(m);\n\
             const f32 r = (m - t >= 0.5F) ? t + 1 : t;\n\
             return (x < 0) ? -r : r;"
        );
        assert_eq!(
            body("round", ScalarType::F64),
            "const f64 m = rm_abs_f64(x);\n\
             const f64 t = rm_floor_f64(m);\n\
             const f64 r = (m - t >= 0.5) ? t + 1 : t;\n\
             return (x < 0) ? -r : r;"
        );
        assert_eq!(body("fract", ScalarType::F64), "return x - rm_floor_f64(x);");
    }

    #[test]
    fn test_unsigned_types_skip_signed_operations() {
        let catalog = Catalog::standard().unwrap();
        let names: Vec<_> = catalog
            .operations_for(Category::Scalar, ScalarType::U16, Shape::Scalar)
            .map(|op| op.name)
            .collect();
        assert_eq!(names, ["min", "max", "clamp", "pow2", "mod"]);
    }
}
