// This module holds the declarative operation catalog the header is expanded from. Each
// category (scalar, boolean, arithmetic, matrix) is an explicit data table of OpSpec rows:
// the operation name, the type class and shape class it applies to, its parameters and
// return type as shape-relative value types, one or more body templates keyed by type
// class, and a broadcast rule. Catalog::standard parses every template up front, so a
// malformed or unknown placeholder aborts before any instantiation happens. Instantiating
// an operation for one (type, shape) pair yields its base GeneratedSymbol followed by the
// derived vector-scalar and scalar-vector renderings its broadcast rule asks for. Those
// derived forms are produced here from the base symbol, never written by hand.

//! Operation catalog and instantiation.

pub mod arithmetic;
pub mod boolean;
pub mod matrix;
pub mod reference;
pub mod scalar;

use std::fmt::Write as _;

use crate::error::{GenError, GenResult};
use crate::naming::{canonical_name, splat_name, Param, Signature, SymbolKey, Variant};
use crate::taxonomy::{ScalarType, Shape, Taxonomy, TypeClass};
use crate::template::{Bindings, Template};

/// Section of the header an operation is emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Scalar,
    Boolean,
    Arithmetic,
    Matrix,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Scalar,
        Category::Boolean,
        Category::Arithmetic,
        Category::Matrix,
    ];

    pub fn describe(self) -> &'static str {
        match self {
            Category::Scalar => "scalar",
            Category::Boolean => "boolean",
            Category::Arithmetic => "arithmetic",
            Category::Matrix => "matrix",
        }
    }
}

/// Shapes an operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeClass {
    Scalar,
    Vector,
    Matrix,
    SquareMatrix,
}

impl ShapeClass {
    pub fn contains(self, shape: Shape) -> bool {
        match self {
            ShapeClass::Scalar => shape.is_scalar(),
            ShapeClass::Vector => shape.is_vector(),
            ShapeClass::Matrix => shape.is_matrix(),
            ShapeClass::SquareMatrix => shape.is_square(),
        }
    }
}

/// A parameter or return type, relative to the instantiated (type, shape).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// The operand shape itself.
    Operand,
    /// The element scalar type.
    Element,
    /// Scalar `bool`.
    Bool,
    /// `bool` vector of the operand width.
    BoolVector,
    /// Row vector of a matrix.
    Row,
    /// Column vector of a matrix.
    Column,
    /// Transposed matrix.
    Transposed,
}

impl ValueType {
    pub fn token(self, ty: ScalarType, shape: Shape) -> Option<String> {
        match self {
            ValueType::Operand => Some(shape.token(ty)),
            ValueType::Element => Some(ty.token().to_string()),
            ValueType::Bool => Some(ScalarType::BOOL.token().to_string()),
            ValueType::BoolVector => shape.width().map(|w| Shape::Vector(w).token(ScalarType::BOOL)),
            ValueType::Row => shape.row().map(|s| s.token(ty)),
            ValueType::Column => shape.column().map(|s| s.token(ty)),
            ValueType::Transposed => shape.transposed().map(|s| s.token(ty)),
        }
    }
}

/// Which derived broadcast forms a binary vector operation gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Broadcast {
    None,
    /// `op(v, s)` only; used for commutative operations.
    VectorScalar,
    /// `op(v, s)` and `op(s, v)`.
    Both,
}

/// One row of a catalog table.
#[derive(Debug, Clone, Copy)]
pub struct OpSpec {
    pub name: &'static str,
    pub types: TypeClass,
    pub params: &'static [(&'static str, ValueType)],
    pub ret: ValueType,
    /// Body templates, the first whose class contains the type wins.
    pub bodies: &'static [(TypeClass, &'static str)],
    pub broadcast: Broadcast,
}

/// A catalog operation with parsed bodies.
#[derive(Debug, Clone)]
pub struct Operation {
    pub name: &'static str,
    pub category: Category,
    pub types: TypeClass,
    pub shapes: ShapeClass,
    pub params: &'static [(&'static str, ValueType)],
    pub ret: ValueType,
    pub bodies: Vec<(TypeClass, Template)>,
    pub broadcast: Broadcast,
}

/// A fully rendered function of the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSymbol {
    pub key: SymbolKey,
    pub name: String,
    pub signature: Signature,
    pub body: String,
}

impl GeneratedSymbol {
    /// Definition text, body indented by four spaces.
    pub fn render(&self, inline_macro: &str) -> String {
        let mut out = self.signature.render(inline_macro, &self.name);
        out.push_str(" {\n");
        for line in self.body.lines() {
            if line.is_empty() {
                out.push('\n');
            } else {
                let _ = writeln!(out, "    {}", line);
            }
        }
        out.push_str("}\n");
        out
    }
}

impl Operation {
    pub fn from_spec(spec: &OpSpec, category: Category, shapes: ShapeClass) -> GenResult<Self> {
        let bodies = spec
            .bodies
            .iter()
            .map(|(class, source)| Ok((*class, Template::parse(spec.name, source)?)))
            .collect::<GenResult<Vec<_>>>()?;
        Ok(Self {
            name: spec.name,
            category,
            types: spec.types,
            shapes,
            params: spec.params,
            ret: spec.ret,
            bodies,
            broadcast: spec.broadcast,
        })
    }

    pub fn applies_to(&self, ty: ScalarType, shape: Shape) -> bool {
        self.types.contains(ty) && self.shapes.contains(shape)
    }

    /// Body template for `ty`.
    pub fn body_for(&self, ty: ScalarType) -> GenResult<&Template> {
        self.bodies
            .iter()
            .find(|(class, _)| class.contains(ty))
            .map(|(_, template)| template)
            .ok_or_else(|| GenError::MissingBody {
                op: self.name.to_string(),
                ty: ty.token().to_string(),
            })
    }

    /// Both parameters have the operand shape.
    pub fn is_binary_elementwise(&self) -> bool {
        self.params.len() == 2 && self.params.iter().all(|(_, vt)| *vt == ValueType::Operand)
    }

    /// Derived variants emitted after the base symbol for `shape`.
    pub fn variants(&self, shape: Shape) -> &'static [Variant] {
        if !shape.is_vector() || !self.is_binary_elementwise() {
            return &[];
        }
        match self.broadcast {
            Broadcast::None => &[],
            Broadcast::VectorScalar => &[Variant::VectorScalar],
            Broadcast::Both => &[Variant::VectorScalar, Variant::ScalarVector],
        }
    }

    fn value_token(&self, vt: ValueType, ty: ScalarType, shape: Shape) -> GenResult<String> {
        vt.token(ty, shape).ok_or_else(|| GenError::UnresolvedPlaceholder {
            placeholder: format!("{:?}", vt),
            op: self.name.to_string(),
            shape: shape.token(ty),
        })
    }

    fn signature_with(
        &self,
        params: &[(&'static str, ValueType)],
        ty: ScalarType,
        shape: Shape,
    ) -> GenResult<Signature> {
        let params = params
            .iter()
            .map(|(name, vt)| {
                Ok(Param {
                    name: *name,
                    ty: self.value_token(*vt, ty, shape)?,
                })
            })
            .collect::<GenResult<Vec<_>>>()?;
        Ok(Signature {
            ret: self.value_token(self.ret, ty, shape)?,
            params,
        })
    }

    pub fn signature(&self, ty: ScalarType, shape: Shape) -> GenResult<Signature> {
        self.signature_with(self.params, ty, shape)
    }

    /// Base symbol followed by its broadcast variants.
    pub fn instantiate(&self, ty: ScalarType, shape: Shape) -> GenResult<Vec<GeneratedSymbol>> {
        let key = SymbolKey::new(self.name, ty, shape);
        let base_name = canonical_name(&key);
        let body = self.body_for(ty)?.render(&Bindings::new(ty, shape))?;
        let mut symbols = vec![GeneratedSymbol {
            key,
            name: base_name.clone(),
            signature: self.signature(ty, shape)?,
            body,
        }];

        for &variant in self.variants(shape) {
            let (a, b) = (self.params[0].0, self.params[1].0);
            let splat = splat_name(ty, shape);
            let (params, body) = match variant {
                Variant::VectorScalar => (
                    [(a, ValueType::Operand), (b, ValueType::Element)],
                    format!("return {}({}, {}({}));", base_name, a, splat, b),
                ),
                _ => (
                    [(a, ValueType::Element), (b, ValueType::Operand)],
                    format!("return {}({}({}), {});", base_name, splat, a, b),
                ),
            };
            let key = key.with_variant(variant);
            symbols.push(GeneratedSymbol {
                key,
                name: canonical_name(&key),
                signature: self.signature_with(&params, ty, shape)?,
                body,
            });
        }
        Ok(symbols)
    }
}

/// Symbol count of one operation over a taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coverage {
    pub op: &'static str,
    pub category: Category,
    pub symbols: usize,
}

/// The full ordered set of operations.
#[derive(Debug, Clone)]
pub struct Catalog {
    ops: Vec<Operation>,
}

impl Catalog {
    /// Every operation of every category, templates parsed.
    pub fn standard() -> GenResult<Self> {
        let tables: [(Category, ShapeClass, &[OpSpec]); 4] = [
            (Category::Scalar, ShapeClass::Scalar, scalar::OPERATIONS),
            (Category::Boolean, ShapeClass::Vector, boolean::OPERATIONS),
            (Category::Arithmetic, ShapeClass::Vector, arithmetic::OPERATIONS),
            (Category::Matrix, ShapeClass::Matrix, matrix::OPERATIONS),
        ];

        let mut ops = Vec::new();
        for (category, shapes, table) in tables {
            for spec in table {
                let shapes = if category == Category::Matrix {
                    matrix::shape_class(spec.name)
                } else {
                    shapes
                };
                ops.push(Operation::from_spec(spec, category, shapes)?);
            }
        }
        log::debug!("catalog: {} operations", ops.len());
        Ok(Self { ops })
    }

    /// Build a catalog from explicit operations.
    pub fn from_operations(ops: Vec<Operation>) -> Self {
        Self { ops }
    }

    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    pub fn operation(&self, category: Category, name: &str) -> Option<&Operation> {
        self.ops.iter().find(|op| op.category == category && op.name == name)
    }

    /// Operations of `category` applicable to (`ty`, `shape`), in declared order.
    pub fn operations_for(
        &self,
        category: Category,
        ty: ScalarType,
        shape: Shape,
    ) -> impl Iterator<Item = &Operation> + '_ {
        self.ops
            .iter()
            .filter(move |op| op.category == category && op.applies_to(ty, shape))
    }

    /// Symbols each operation contributes over `taxonomy`, derived forms included.
    pub fn coverage(&self, taxonomy: &Taxonomy) -> Vec<Coverage> {
        self.ops
            .iter()
            .map(|op| Coverage {
                op: op.name,
                category: op.category,
                symbols: taxonomy
                    .combinations()
                    .filter(|&(ty, shape)| op.applies_to(ty, shape))
                    .map(|(_, shape)| 1 + op.variants(shape).len())
                    .sum(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Width;

    fn catalog() -> Catalog {
        Catalog::standard().unwrap_or_else(|e| panic!("catalog: {}", e))
    }

    #[test]
    fn test_standard_catalog_parses() {
        let catalog = catalog();
        assert!(catalog.operations().len() > 50);
        assert!(catalog.operation(Category::Scalar, "round").is_some());
        assert!(catalog.operation(Category::Matrix, "identity").is_some());
    }

    #[test]
    fn test_every_operation_has_coverage() {
        let catalog = catalog();
        for entry in catalog.coverage(&Taxonomy::standard()) {
            assert!(entry.symbols > 0, "{} ({:?}) has no symbols", entry.op, entry.category);
        }
    }

    #[test]
    fn test_every_applicable_pair_has_a_body() {
        let catalog = catalog();
        for (ty, shape) in Taxonomy::standard().combinations() {
            for category in Category::ALL {
                for op in catalog.operations_for(category, ty, shape) {
                    op.body_for(ty)
                        .unwrap_or_else(|e| panic!("{} {}: {}", op.name, shape.token(ty), e));
                }
            }
        }
    }

    #[test]
    fn test_commutative_ops_skip_scalar_vector() {
        let catalog = catalog();
        let shape = Shape::Vector(Width::Three);
        let add = catalog.operation(Category::Arithmetic, "add").unwrap();
        let sub = catalog.operation(Category::Arithmetic, "sub").unwrap();
        assert_eq!(add.variants(shape), &[Variant::VectorScalar]);
        assert_eq!(sub.variants(shape), &[Variant::VectorScalar, Variant::ScalarVector]);
        assert!(sub.variants(Shape::Scalar).is_empty());
    }

    #[test]
    fn test_scalar_vector_broadcasts_first() {
        let catalog = catalog();
        let sub = catalog.operation(Category::Arithmetic, "sub").unwrap();
        let symbols = sub.instantiate(ScalarType::F32, Shape::Vector(Width::Two)).unwrap();
        let names: Vec<_> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["rm_sub_f32x2", "rm_subs_f32x2", "rm_ssub_f32x2"]);
        assert_eq!(symbols[1].body, "return rm_sub_f32x2(a, rm_f32x2s(b));");
        assert_eq!(symbols[2].body, "return rm_sub_f32x2(rm_f32x2s(a), b);");
        assert_eq!(
            symbols[2].signature.render("RM_INLINE", &symbols[2].name),
            "RM_INLINE f32x2 rm_ssub_f32x2(const f32 a, const f32x2 b)"
        );
    }

    #[test]
    fn test_comparison_broadcast_returns_bool_vector() {
        let catalog = catalog();
        let lt = catalog.operation(Category::Boolean, "lt").unwrap();
        let symbols = lt.instantiate(ScalarType::I32, Shape::Vector(Width::Four)).unwrap();
        assert_eq!(symbols.len(), 3);
        for symbol in &symbols {
            assert_eq!(symbol.signature.ret, "boolx4");
        }
    }

    #[test]
    fn test_any_takes_its_own_width() {
        let catalog = catalog();
        let any = catalog.operation(Category::Boolean, "any").unwrap();
        for width in Width::ALL {
            let shape = Shape::Vector(width);
            let symbols = any.instantiate(ScalarType::U16, shape).unwrap();
            assert_eq!(symbols[0].signature.params[0].ty, shape.token(ScalarType::U16));
            assert_eq!(symbols[0].signature.ret, "bool");
        }
    }

    #[test]
    fn test_missing_body_is_reported() {
        let spec = OpSpec {
            name: "half",
            types: TypeClass::Numeric,
            params: &[("x", ValueType::Operand)],
            ret: ValueType::Operand,
            bodies: &[(TypeClass::Float, "return x * 0.5{L};")],
            broadcast: Broadcast::None,
        };
        let op = Operation::from_spec(&spec, Category::Scalar, ShapeClass::Scalar).unwrap();
        let err = op.instantiate(ScalarType::U8, Shape::Scalar).unwrap_err();
        assert!(matches!(err, GenError::MissingBody { .. }));
    }

    #[test]
    fn test_rendered_definition() {
        let catalog = catalog();
        let floor = catalog.operation(Category::Scalar, "floor").unwrap();
        let symbol = floor.instantiate(ScalarType::F64, Shape::Scalar).unwrap().remove(0);
        let text = symbol.render("RM_INLINE");
        assert!(text.starts_with("RM_INLINE f64 rm_floor_f64(const f64 x) {\n    "));
        assert!(text.ends_with("\n}\n"));
    }
}
