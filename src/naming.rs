// This module implements the deterministic symbol naming scheme of the generated header.
// A SymbolKey identifies one instantiation (operation, scalar type, shape and broadcast
// variant) and canonical_name maps it to the C identifier the header declares. The
// scheme encodes the operation first, then the broadcast marker, then the operand type
// token, so that names stay readable (rm_add_f32x3, rm_adds_f32x3, rm_ssub_f32x3) and
// stable under regeneration. Comparisons are named after their operand shape, never
// their boolean result shape. Signature renders the declared prototype line.

//! Canonical symbol names and signatures.

use std::fmt;

use crate::taxonomy::{ScalarType, Shape};

/// Prefix shared by every generated function and constructor macro.
pub const SYMBOL_PREFIX: &str = "rm";

/// Which rendering of an operation a symbol is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variant {
    /// The operation as declared in the catalog.
    Base,
    /// `op(vector, scalar)`, derived from a binary vector operation.
    VectorScalar,
    /// `op(scalar, vector)`, derived from a non-commutative binary vector operation.
    ScalarVector,
}

impl Variant {
    pub fn describe(self) -> &'static str {
        match self {
            Variant::Base => "base",
            Variant::VectorScalar => "vector-scalar",
            Variant::ScalarVector => "scalar-vector",
        }
    }
}

/// One instantiation of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolKey {
    pub op: &'static str,
    pub ty: ScalarType,
    pub shape: Shape,
    pub variant: Variant,
}

impl SymbolKey {
    pub fn new(op: &'static str, ty: ScalarType, shape: Shape) -> Self {
        Self {
            op,
            ty,
            shape,
            variant: Variant::Base,
        }
    }

    pub fn with_variant(self, variant: Variant) -> Self {
        Self { variant, ..self }
    }

    /// Operand type token (`f32x3`).
    pub fn type_token(&self) -> String {
        self.shape.token(self.ty)
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}, {}]", self.op, self.type_token(), self.variant.describe())
    }
}

/// Canonical identifier of `key`.
///
/// `rm_` + (`s` for scalar-vector) + op + (`s` for vector-scalar) + `_` +
/// operand type token. A scalar shape has no shape suffix: its token is the
/// bare type.
pub fn canonical_name(key: &SymbolKey) -> String {
    let (before, after) = match key.variant {
        Variant::Base => ("", ""),
        Variant::VectorScalar => ("", "s"),
        Variant::ScalarVector => ("s", ""),
    };
    format!(
        "{}_{}{}{}_{}",
        SYMBOL_PREFIX,
        before,
        key.op,
        after,
        key.type_token()
    )
}

/// Name of the component-wise constructor macro (`rm_f32x3`).
pub fn constructor_name(ty: ScalarType, shape: Shape) -> String {
    format!("{}_{}", SYMBOL_PREFIX, shape.token(ty))
}

/// Name of the broadcast constructor macro (`rm_f32x3s`).
pub fn splat_name(ty: ScalarType, shape: Shape) -> String {
    format!("{}_{}s", SYMBOL_PREFIX, shape.token(ty))
}

const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch",
    "typedef", "union", "unsigned", "void", "volatile", "while", "bool",
];

/// Whether `name` can be declared as a C identifier.
pub fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let first_ok = matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic());
    first_ok
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        && !C_KEYWORDS.contains(&name)
}

/// A declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub ty: String,
}

/// Return type and parameter list of a generated function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub ret: String,
    pub params: Vec<Param>,
}

impl Signature {
    /// Prototype line without the opening brace:
    /// `RM_INLINE f32x2 rm_add_f32x2(const f32x2 a, const f32x2 b)`.
    pub fn render(&self, inline_macro: &str, name: &str) -> String {
        let params = if self.params.is_empty() {
            "void".to_string()
        } else {
            self.params
                .iter()
                .map(|p| format!("const {} {}", p.ty, p.name))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!("{} {} {}({})", inline_macro, self.ret, name, params)
    }
}
