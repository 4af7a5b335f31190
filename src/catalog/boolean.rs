// This module declares the vector boolean and comparison operations. any and all reduce a
// vector of any element type to a scalar bool, not and the comparisons produce a bool
// vector of the operand width. Comparisons are symbols of their operand type, so
// rm_eq_u8x2 and rm_eq_boolx2 are distinct functions. eq and neq are commutative and
// only get the vector-scalar broadcast; the ordering comparisons get both forms.

//! Vector boolean and comparison table.

use super::{Broadcast, OpSpec, ValueType};
use crate::taxonomy::TypeClass;

use ValueType::{Bool, BoolVector, Operand};

const UNARY: &[(&str, ValueType)] = &[("v", Operand)];
const BINARY: &[(&str, ValueType)] = &[("a", Operand), ("b", Operand)];

pub const OPERATIONS: &[OpSpec] = &[
    OpSpec {
        name: "any",
        types: TypeClass::Any,
        params: UNARY,
        ret: Bool,
        bodies: &[(TypeClass::Any, "return {@any:v.{c}};")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "all",
        types: TypeClass::Any,
        params: UNARY,
        ret: Bool,
        bodies: &[(TypeClass::Any, "return {@all:v.{c}};")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "not",
        types: TypeClass::Any,
        params: UNARY,
        ret: BoolVector,
        bodies: &[(TypeClass::Any, "return {@bvec:!v.{c}};")],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "eq",
        types: TypeClass::Any,
        params: BINARY,
        ret: BoolVector,
        bodies: &[(TypeClass::Any, "return {@bvec:a.{c} == b.{c}};")],
        broadcast: Broadcast::VectorScalar,
    },
    OpSpec {
        name: "neq",
        types: TypeClass::Any,
        params: BINARY,
        ret: BoolVector,
        bodies: &[(TypeClass::Any, "return {@bvec:a.{c} != b.{c}};")],
        broadcast: Broadcast::VectorScalar,
    },
    OpSpec {
        name: "lt",
        types: TypeClass::Numeric,
        params: BINARY,
        ret: BoolVector,
        bodies: &[(TypeClass::Numeric, "return {@bvec:a.{c} < b.{c}};")],
        broadcast: Broadcast::Both,
    },
    OpSpec {
        name: "lteq",
        types: TypeClass::Numeric,
        params: BINARY,
        ret: BoolVector,
        bodies: &[(TypeClass::Numeric, "return {@bvec:a.{c} <= b.{c}};")],
        broadcast: Broadcast::Both,
    },
    OpSpec {
        name: "gt",
        types: TypeClass::Numeric,
        params: BINARY,
        ret: BoolVector,
        bodies: &[(TypeClass::Numeric, "return {@bvec:a.{c} > b.{c}};")],
        broadcast: Broadcast::Both,
    },
    OpSpec {
        name: "gteq",
        types: TypeClass::Numeric,
        params: BINARY,
        ret: BoolVector,
        bodies: &[(TypeClass::Numeric, "return {@bvec:a.{c} >= b.{c}};")],
        broadcast: Broadcast::Both,
    },
];
