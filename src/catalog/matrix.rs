// This module declares the matrix operations. A matrix is an array of column vectors,
// so element-wise rows loop over the columns and call the column vector operation of
// the arithmetic table, while transpose and identity index the raw column-major array
// directly. mulv takes a vector with one component per column and returns a column.
// identity only exists for square shapes; every other row applies to all nine shapes.

//! Matrix operation table.

use super::{Broadcast, OpSpec, ShapeClass, ValueType};
use crate::taxonomy::TypeClass;

use ValueType::{Column, Element, Operand, Row, Transposed};

const BINARY: &[(&str, ValueType)] = &[("a", Operand), ("b", Operand)];

pub const OPERATIONS: &[OpSpec] = &[
    OpSpec {
        name: "add",
        types: TypeClass::Numeric,
        params: BINARY,
        ret: Operand,
        bodies: &[(
            TypeClass::Numeric,
            "{V} r;\n\
             for (usize k = 0; k < {C}; ++k) {\n\
             \x20   r.cols[k] = rm_add_{VC}(a.cols[k], b.cols[k]);\n\
             }\n\
             return r;",
        )],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "sub",
        types: TypeClass::Numeric,
        params: BINARY,
        ret: Operand,
        bodies: &[(
            TypeClass::Numeric,
            "{V} r;\n\
             for (usize k = 0; k < {C}; ++k) {\n\
             \x20   r.cols[k] = rm_sub_{VC}(a.cols[k], b.cols[k]);\n\
             }\n\
             return r;",
        )],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "neg",
        types: TypeClass::SignedOrFloat,
        params: &[("m", Operand)],
        ret: Operand,
        bodies: &[(
            TypeClass::SignedOrFloat,
            "{V} r;\n\
             for (usize k = 0; k < {C}; ++k) {\n\
             \x20   r.cols[k] = rm_neg_{VC}(m.cols[k]);\n\
             }\n\
             return r;",
        )],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "scale",
        types: TypeClass::Numeric,
        params: &[("m", Operand), ("s", Element)],
        ret: Operand,
        bodies: &[(
            TypeClass::Numeric,
            "{V} r;\n\
             for (usize k = 0; k < {C}; ++k) {\n\
             \x20   r.cols[k] = rm_muls_{VC}(m.cols[k], s);\n\
             }\n\
             return r;",
        )],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "transpose",
        types: TypeClass::Numeric,
        params: &[("m", Operand)],
        ret: Transposed,
        bodies: &[(
            TypeClass::Numeric,
            "{VT} r;\n\
             for (usize k = 0; k < {C}; ++k) {\n\
             \x20   for (usize j = 0; j < {R}; ++j) {\n\
             \x20       r.raw[j][k] = m.raw[k][j];\n\
             \x20   }\n\
             }\n\
             return r;",
        )],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "mulv",
        types: TypeClass::Numeric,
        params: &[("m", Operand), ("v", Row)],
        ret: Column,
        bodies: &[(
            TypeClass::Numeric,
            "{VC} r = rm_{VC}s(0);\n\
             for (usize k = 0; k < {C}; ++k) {\n\
             \x20   r = rm_add_{VC}(r, rm_muls_{VC}(m.cols[k], v.raw[k]));\n\
             }\n\
             return r;",
        )],
        broadcast: Broadcast::None,
    },
    OpSpec {
        name: "identity",
        types: TypeClass::Numeric,
        params: &[],
        ret: Operand,
        bodies: &[(
            TypeClass::Numeric,
            "{V} r;\n\
             for (usize k = 0; k < {C}; ++k) {\n\
             \x20   for (usize j = 0; j < {R}; ++j) {\n\
             \x20       r.raw[k][j] = ({T})(k == j);\n\
             \x20   }\n\
             }\n\
             return r;",
        )],
        broadcast: Broadcast::None,
    },
];

/// Shapes the matrix operation `name` is instantiated for.
pub fn shape_class(name: &str) -> ShapeClass {
    match name {
        "identity" => ShapeClass::SquareMatrix,
        _ => ShapeClass::Matrix,
    }
}
