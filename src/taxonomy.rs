// This module defines the type taxonomy that every other part of the generator is keyed
// on: the scalar kinds and bit widths the emitted header supports, the vector widths
// and matrix shapes built from them, and the type classes operation predicates are
// written against. Everything here is a fixed, ordered enumeration. The order is part
// of the contract because the emission pipeline walks types and shapes in exactly this
// order, which is what keeps the generated header byte-for-byte reproducible.

//! Scalar types, shapes and type classes.
//!
//! The scalar list and the shape list per scalar are both fixed and ordered.
//! A [`Taxonomy`] is the value handed to the pipeline; it is either the full
//! standard list or a subset of it that keeps the standard order.

use std::fmt;

/// Fundamental kind of a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarKind {
    Bool,
    Unsigned,
    Signed,
    Float,
}

/// A scalar element type such as `u16` or `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScalarType {
    kind: ScalarKind,
    bits: u8,
}

impl ScalarType {
    pub const BOOL: Self = Self::new(ScalarKind::Bool, 0);
    pub const U8: Self = Self::new(ScalarKind::Unsigned, 8);
    pub const U16: Self = Self::new(ScalarKind::Unsigned, 16);
    pub const U32: Self = Self::new(ScalarKind::Unsigned, 32);
    pub const U64: Self = Self::new(ScalarKind::Unsigned, 64);
    pub const I8: Self = Self::new(ScalarKind::Signed, 8);
    pub const I16: Self = Self::new(ScalarKind::Signed, 16);
    pub const I32: Self = Self::new(ScalarKind::Signed, 32);
    pub const I64: Self = Self::new(ScalarKind::Signed, 64);
    pub const F32: Self = Self::new(ScalarKind::Float, 32);
    pub const F64: Self = Self::new(ScalarKind::Float, 64);

    const fn new(kind: ScalarKind, bits: u8) -> Self {
        Self { kind, bits }
    }

    pub const fn kind(self) -> ScalarKind {
        self.kind
    }

    /// Bit width, `None` for `bool`.
    pub const fn bits(self) -> Option<u8> {
        match self.kind {
            ScalarKind::Bool => None,
            _ => Some(self.bits),
        }
    }

    /// Type token used in the header (`u8`, `f32`, `bool`).
    pub const fn token(self) -> &'static str {
        match (self.kind, self.bits) {
            (ScalarKind::Bool, _) => "bool",
            (ScalarKind::Unsigned, 8) => "u8",
            (ScalarKind::Unsigned, 16) => "u16",
            (ScalarKind::Unsigned, 32) => "u32",
            (ScalarKind::Unsigned, _) => "u64",
            (ScalarKind::Signed, 8) => "i8",
            (ScalarKind::Signed, 16) => "i16",
            (ScalarKind::Signed, 32) => "i32",
            (ScalarKind::Signed, _) => "i64",
            (ScalarKind::Float, 32) => "f32",
            (ScalarKind::Float, _) => "f64",
        }
    }

    /// Upper-case token used in macro names (`F32`).
    pub fn upper_token(self) -> String {
        self.token().to_ascii_uppercase()
    }

    /// The C type a primitive alias is declared from. `bool` comes from
    /// `<stdbool.h>` and has no alias.
    pub const fn c_type(self) -> Option<&'static str> {
        match (self.kind, self.bits) {
            (ScalarKind::Bool, _) => None,
            (ScalarKind::Unsigned, 8) => Some("uint8_t"),
            (ScalarKind::Unsigned, 16) => Some("uint16_t"),
            (ScalarKind::Unsigned, 32) => Some("uint32_t"),
            (ScalarKind::Unsigned, _) => Some("uint64_t"),
            (ScalarKind::Signed, 8) => Some("int8_t"),
            (ScalarKind::Signed, 16) => Some("int16_t"),
            (ScalarKind::Signed, 32) => Some("int32_t"),
            (ScalarKind::Signed, _) => Some("int64_t"),
            (ScalarKind::Float, 32) => Some("float"),
            (ScalarKind::Float, _) => Some("double"),
        }
    }

    pub const fn is_numeric(self) -> bool {
        !matches!(self.kind, ScalarKind::Bool)
    }

    pub const fn is_float(self) -> bool {
        matches!(self.kind, ScalarKind::Float)
    }

    /// Signed integer of the same width, used to truncate floats.
    pub const fn same_width_signed(self) -> Option<ScalarType> {
        match self.kind {
            ScalarKind::Float if self.bits == 32 => Some(Self::I32),
            ScalarKind::Float => Some(Self::I64),
            _ => None,
        }
    }

    /// Unsigned integer of the same width, used by the bit-cast overlays.
    pub const fn same_width_unsigned(self) -> Option<ScalarType> {
        match self.kind {
            ScalarKind::Float if self.bits == 32 => Some(Self::U32),
            ScalarKind::Float => Some(Self::U64),
            _ => None,
        }
    }

    /// Suffix for floating point literals of this type.
    pub const fn literal_suffix(self) -> Option<&'static str> {
        match self.kind {
            ScalarKind::Float if self.bits == 32 => Some("F"),
            ScalarKind::Float => Some(""),
            _ => None,
        }
    }

    /// Smallest magnitude at which every value of the type is integral
    /// (2^23 for f32, 2^52 for f64), as a C literal.
    pub const fn exact_integer_threshold(self) -> Option<&'static str> {
        match self.kind {
            ScalarKind::Float if self.bits == 32 => Some("8388608.0F"),
            ScalarKind::Float => Some("4503599627370496.0"),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Every supported scalar type in declaration order.
pub const SCALAR_TYPES: [ScalarType; 11] = [
    ScalarType::BOOL,
    ScalarType::U8,
    ScalarType::U16,
    ScalarType::U32,
    ScalarType::U64,
    ScalarType::I8,
    ScalarType::I16,
    ScalarType::I32,
    ScalarType::I64,
    ScalarType::F32,
    ScalarType::F64,
];

/// Ordered sequence of all scalar types.
pub fn scalar_types() -> &'static [ScalarType] {
    &SCALAR_TYPES
}

/// Positional component names; color and texture names alias the same slots.
pub const POSITIONAL: [&str; 4] = ["x", "y", "z", "w"];

/// Component count of a vector, or one dimension of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Width {
    Two = 2,
    Three = 3,
    Four = 4,
}

impl Width {
    pub const ALL: [Width; 3] = [Width::Two, Width::Three, Width::Four];

    pub const fn get(self) -> usize {
        self as usize
    }

    pub fn from_count(count: usize) -> Option<Width> {
        match count {
            2 => Some(Width::Two),
            3 => Some(Width::Three),
            4 => Some(Width::Four),
            _ => None,
        }
    }

    /// Positional component names for this width (`x, y, z`).
    pub fn components(self) -> &'static [&'static str] {
        &POSITIONAL[..self.get()]
    }
}

/// Arity of a generated type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shape {
    Scalar,
    Vector(Width),
    /// `cols` column vectors of `rows` components each, column-major.
    Matrix { cols: Width, rows: Width },
}

impl Shape {
    /// Type token of `ty` in this shape: `f32`, `f32x3`, `f32x2x4`.
    ///
    /// Matrices are written rows first (`{T}x{rows}x{cols}`), so the token
    /// starts with the token of the column vector type.
    pub fn token(self, ty: ScalarType) -> String {
        match self {
            Shape::Scalar => ty.token().to_string(),
            Shape::Vector(n) => format!("{}x{}", ty.token(), n.get()),
            Shape::Matrix { cols, rows } => format!("{}x{}x{}", ty.token(), rows.get(), cols.get()),
        }
    }

    pub fn is_scalar(self) -> bool {
        matches!(self, Shape::Scalar)
    }

    pub fn is_vector(self) -> bool {
        matches!(self, Shape::Vector(_))
    }

    pub fn is_matrix(self) -> bool {
        matches!(self, Shape::Matrix { .. })
    }

    pub fn is_square(self) -> bool {
        matches!(self, Shape::Matrix { cols, rows } if cols == rows)
    }

    /// Component count of a vector shape.
    pub fn width(self) -> Option<Width> {
        match self {
            Shape::Vector(n) => Some(n),
            _ => None,
        }
    }

    /// Column vector shape of a matrix.
    pub fn column(self) -> Option<Shape> {
        match self {
            Shape::Matrix { rows, .. } => Some(Shape::Vector(rows)),
            _ => None,
        }
    }

    /// Row vector shape of a matrix (one component per column).
    pub fn row(self) -> Option<Shape> {
        match self {
            Shape::Matrix { cols, .. } => Some(Shape::Vector(cols)),
            _ => None,
        }
    }

    pub fn transposed(self) -> Option<Shape> {
        match self {
            Shape::Matrix { cols, rows } => Some(Shape::Matrix { cols: rows, rows: cols }),
            _ => None,
        }
    }
}

/// Ordered shapes supported by `ty`: the scalar itself, vectors by ascending
/// width, then matrices ordered by rows and then columns.
pub fn shapes_for(_ty: ScalarType) -> Vec<Shape> {
    let mut shapes = Vec::with_capacity(1 + Width::ALL.len() * (1 + Width::ALL.len()));
    shapes.push(Shape::Scalar);
    shapes.extend(Width::ALL.iter().map(|&n| Shape::Vector(n)));
    for &rows in &Width::ALL {
        for &cols in &Width::ALL {
            shapes.push(Shape::Matrix { cols, rows });
        }
    }
    shapes
}

/// A set of scalar types an operation predicate is written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    Any,
    Numeric,
    Integer,
    SignedOrFloat,
    Float,
}

impl TypeClass {
    pub fn contains(self, ty: ScalarType) -> bool {
        match self {
            TypeClass::Any => true,
            TypeClass::Numeric => ty.is_numeric(),
            TypeClass::Integer => matches!(ty.kind(), ScalarKind::Unsigned | ScalarKind::Signed),
            TypeClass::SignedOrFloat => matches!(ty.kind(), ScalarKind::Signed | ScalarKind::Float),
            TypeClass::Float => ty.is_float(),
        }
    }
}

/// The scalar types a generation run expands over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    types: Vec<ScalarType>,
}

impl Taxonomy {
    /// Every supported scalar type.
    pub fn standard() -> Self {
        Self {
            types: SCALAR_TYPES.to_vec(),
        }
    }

    /// A subset of the standard types. The standard order is kept no matter
    /// the order of `types`, and duplicates collapse.
    pub fn new(types: impl IntoIterator<Item = ScalarType>) -> Self {
        let wanted: Vec<ScalarType> = types.into_iter().collect();
        Self {
            types: SCALAR_TYPES
                .iter()
                .copied()
                .filter(|ty| wanted.contains(ty))
                .collect(),
        }
    }

    pub fn scalar_types(&self) -> &[ScalarType] {
        &self.types
    }

    pub fn contains(&self, ty: ScalarType) -> bool {
        self.types.contains(&ty)
    }

    /// Types that get vector structs and constructors. Comparisons of every
    /// type return bool vectors, so bool is declared whenever any type is.
    pub fn vector_types(&self) -> Vec<ScalarType> {
        SCALAR_TYPES
            .iter()
            .copied()
            .filter(|&ty| self.contains(ty) || (ty == ScalarType::BOOL && !self.types.is_empty()))
            .collect()
    }

    /// Every non-scalar (type, shape) that needs a struct: vectors of
    /// [`Taxonomy::vector_types`] by type and width, then matrices of the
    /// taxonomy's own types.
    pub fn declared_shapes(&self) -> Vec<(ScalarType, Shape)> {
        let mut shapes: Vec<(ScalarType, Shape)> = self
            .vector_types()
            .into_iter()
            .flat_map(|ty| Width::ALL.into_iter().map(move |w| (ty, Shape::Vector(w))))
            .collect();
        shapes.extend(self.combinations().filter(|(_, shape)| shape.is_matrix()));
        shapes
    }

    /// Every (type, shape) pair in emission order.
    pub fn combinations(&self) -> impl Iterator<Item = (ScalarType, Shape)> + '_ {
        self.types
            .iter()
            .flat_map(|&ty| shapes_for(ty).into_iter().map(move |shape| (ty, shape)))
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::standard()
    }
}
