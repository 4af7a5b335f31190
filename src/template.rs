// This module implements the small template language operation bodies are written in.
// A template is parsed once, when the catalog is built, into typed segments: literal C
// text, placeholders drawn from a closed set ({T}, {V}, {I}, {VC}, ...) and per-component
// expansions such as {@vec:a.{c} + b.{c}} that repeat an expression once per vector
// component and join the results into a constructor call, a ||/&& chain, a sum or a
// nested call chain. Rendering resolves every placeholder against the bindings of one
// (scalar type, shape) instantiation. A name outside the closed set fails at parse time;
// a placeholder that has no value for the bindings (the integer type of a float on u8,
// the column vector of a plain vector) fails at render time, so no unresolved placeholder can
// reach the artifact.

//! Body templates and their placeholders.
//!
//! A `{` that does not open a `{NAME}` or `{@...}` placeholder is literal C
//! text, so loop bodies and blocks can be written as-is.

use std::fmt;

use crate::error::{GenError, GenResult};
use crate::naming::constructor_name;
use crate::taxonomy::{ScalarType, Shape};

/// Every substitution a template may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// Element scalar type (`f32`).
    Elem,
    /// Operand type in its shape (`f32x3`, `f32x2x4`).
    Operand,
    /// Same-width signed integer of a float (`i32`).
    Int,
    /// Float literal suffix (`F` or nothing).
    Suffix,
    /// Exact-integer threshold literal of a float.
    Exact,
    /// Upper-case element token (`F32`).
    Upper,
    /// Current component name inside an expansion (`x`).
    Component,
    /// Rows of a matrix.
    Rows,
    /// Columns of a matrix.
    Cols,
    /// Column vector of a matrix.
    ColVec,
    /// Transposed matrix type.
    Transposed,
}

impl Placeholder {
    pub const ALL: [Placeholder; 11] = [
        Placeholder::Elem,
        Placeholder::Operand,
        Placeholder::Int,
        Placeholder::Suffix,
        Placeholder::Exact,
        Placeholder::Upper,
        Placeholder::Component,
        Placeholder::Rows,
        Placeholder::Cols,
        Placeholder::ColVec,
        Placeholder::Transposed,
    ];

    /// Name as written between braces.
    pub const fn name(self) -> &'static str {
        match self {
            Placeholder::Elem => "T",
            Placeholder::Operand => "V",
            Placeholder::Int => "I",
            Placeholder::Suffix => "L",
            Placeholder::Exact => "EXACT",
            Placeholder::Upper => "TU",
            Placeholder::Component => "c",
            Placeholder::Rows => "R",
            Placeholder::Cols => "C",
            Placeholder::ColVec => "VC",
            Placeholder::Transposed => "VT",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Only meaningful inside a per-component expansion.
    pub const fn is_per_component(self) -> bool {
        matches!(self, Placeholder::Component)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.name())
    }
}

/// How the per-component results of an expansion are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// `rm_{V}(e0, e1, ...)`
    Vector,
    /// `rm_{B}(e0, e1, ...)`
    BoolVector,
    /// `(e0 || e1 || ...)`
    Any,
    /// `(e0 && e1 && ...)`
    All,
    /// `(e0 + e1 + ...)`
    Sum,
    /// `f(f(e0, e1), e2)`
    Chain,
}

impl Expansion {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "vec" => Some(Expansion::Vector),
            "bvec" => Some(Expansion::BoolVector),
            "any" => Some(Expansion::Any),
            "all" => Some(Expansion::All),
            "sum" => Some(Expansion::Sum),
            "chain" => Some(Expansion::Chain),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Expansion::Vector => "@vec",
            Expansion::BoolVector => "@bvec",
            Expansion::Any => "@any",
            Expansion::All => "@all",
            Expansion::Sum => "@sum",
            Expansion::Chain => "@chain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Hole(Placeholder),
    Expand {
        kind: Expansion,
        func: Vec<Segment>,
        expr: Vec<Segment>,
    },
}

/// What a template is instantiated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    pub ty: ScalarType,
    pub shape: Shape,
}

impl Bindings {
    pub fn new(ty: ScalarType, shape: Shape) -> Self {
        Self { ty, shape }
    }

    /// Value of `placeholder`, with `component` set inside an expansion.
    pub fn resolve(&self, placeholder: Placeholder, component: Option<usize>) -> Option<String> {
        let ty = self.ty;
        let shape = self.shape;
        match placeholder {
            Placeholder::Elem => Some(ty.token().to_string()),
            Placeholder::Operand => Some(shape.token(ty)),
            Placeholder::Int => ty.same_width_signed().map(|i| i.token().to_string()),
            Placeholder::Suffix => ty.literal_suffix().map(str::to_string),
            Placeholder::Exact => ty.exact_integer_threshold().map(str::to_string),
            Placeholder::Upper => Some(ty.upper_token()),
            Placeholder::Component => {
                let width = shape.width()?;
                component.and_then(|k| width.components().get(k).map(|c| (*c).to_string()))
            }
            Placeholder::Rows => match shape {
                Shape::Matrix { rows, .. } => Some(rows.get().to_string()),
                _ => None,
            },
            Placeholder::Cols => match shape {
                Shape::Matrix { cols, .. } => Some(cols.get().to_string()),
                _ => None,
            },
            Placeholder::ColVec => shape.column().map(|s| s.token(ty)),
            Placeholder::Transposed => shape.transposed().map(|s| s.token(ty)),
        }
    }

    fn describe(&self) -> String {
        self.shape.token(self.ty)
    }
}

/// A parsed body template of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    op: &'static str,
    segments: Vec<Segment>,
}

fn is_name_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

/// Byte index of the `}` closing the `{` at `open`.
fn matching_brace(source: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, c) in source[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + idx);
                }
            }
            _ => {}
        }
    }
    None
}

struct Parser {
    op: &'static str,
}

impl Parser {
    fn malformed(&self, reason: impl Into<String>) -> GenError {
        GenError::MalformedTemplate {
            op: self.op.to_string(),
            reason: reason.into(),
        }
    }

    fn parse(&self, source: &str, in_expansion: bool) -> GenResult<Vec<Segment>> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut pos = 0;

        while pos < source.len() {
            let rest = &source[pos..];
            let Some(c) = rest.chars().next() else {
                break;
            };

            if c == '{' && rest[1..].starts_with('@') {
                if in_expansion {
                    return Err(self.malformed("nested expansion"));
                }
                let close = matching_brace(source, pos)
                    .ok_or_else(|| self.malformed("unterminated expansion"))?;
                let inner = &source[pos + 2..close];
                flush(&mut text, &mut segments);
                segments.push(self.parse_expansion(inner)?);
                pos = close + 1;
                continue;
            }

            if c == '{' {
                let name: String = rest[1..].chars().take_while(|&c| is_name_char(c)).collect();
                if !name.is_empty() && rest[1 + name.len()..].starts_with('}') {
                    let placeholder =
                        Placeholder::from_name(&name).ok_or_else(|| GenError::UnknownPlaceholder {
                            name: name.clone(),
                            op: self.op.to_string(),
                        })?;
                    if placeholder.is_per_component() && !in_expansion {
                        return Err(self.malformed(format!("{} outside an expansion", placeholder)));
                    }
                    flush(&mut text, &mut segments);
                    segments.push(Segment::Hole(placeholder));
                    pos += name.len() + 2;
                    continue;
                }
            }

            text.push(c);
            pos += c.len_utf8();
        }

        flush(&mut text, &mut segments);
        Ok(segments)
    }

    /// `kind:expr` or `chain:func:expr`.
    fn parse_expansion(&self, inner: &str) -> GenResult<Segment> {
        let (kind_name, rest) = inner
            .split_once(':')
            .ok_or_else(|| self.malformed(format!("expansion `{}` has no body", inner)))?;
        let kind = Expansion::from_name(kind_name)
            .ok_or_else(|| self.malformed(format!("unknown expansion `@{}`", kind_name)))?;

        let (func, expr) = if kind == Expansion::Chain {
            let (func, expr) = rest
                .split_once(':')
                .ok_or_else(|| self.malformed("chain expansion needs a function"))?;
            (self.parse(func, false)?, self.parse(expr, true)?)
        } else {
            (Vec::new(), self.parse(rest, true)?)
        };

        if expr.is_empty() {
            return Err(self.malformed(format!("empty {} expansion", kind.name())));
        }
        Ok(Segment::Expand { kind, func, expr })
    }
}

fn flush(text: &mut String, segments: &mut Vec<Segment>) {
    if !text.is_empty() {
        segments.push(Segment::Text(std::mem::take(text)));
    }
}

impl Template {
    /// Parse `source` as the body template of `op`.
    pub fn parse(op: &'static str, source: &str) -> GenResult<Self> {
        let segments = Parser { op }.parse(source, false)?;
        Ok(Self { op, segments })
    }

    fn unresolved(&self, what: impl fmt::Display, bindings: &Bindings) -> GenError {
        GenError::UnresolvedPlaceholder {
            placeholder: what.to_string(),
            op: self.op.to_string(),
            shape: bindings.describe(),
        }
    }

    fn render_segments(
        &self,
        segments: &[Segment],
        bindings: &Bindings,
        component: Option<usize>,
        out: &mut String,
    ) -> GenResult<()> {
        for segment in segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Hole(p) => {
                    let value = bindings
                        .resolve(*p, component)
                        .ok_or_else(|| self.unresolved(p, bindings))?;
                    out.push_str(&value);
                }
                Segment::Expand { kind, func, expr } => {
                    let width = bindings
                        .shape
                        .width()
                        .ok_or_else(|| self.unresolved(kind.name(), bindings))?;
                    let mut items = Vec::with_capacity(width.get());
                    for k in 0..width.get() {
                        let mut item = String::new();
                        self.render_segments(expr, bindings, Some(k), &mut item)?;
                        items.push(item);
                    }
                    out.push_str(&self.join(*kind, func, items, bindings)?);
                }
            }
        }
        Ok(())
    }

    fn join(
        &self,
        kind: Expansion,
        func: &[Segment],
        items: Vec<String>,
        bindings: &Bindings,
    ) -> GenResult<String> {
        Ok(match kind {
            Expansion::Vector => format!(
                "{}({})",
                constructor_name(bindings.ty, bindings.shape),
                items.join(", ")
            ),
            Expansion::BoolVector => format!(
                "{}({})",
                constructor_name(ScalarType::BOOL, bindings.shape),
                items.join(", ")
            ),
            Expansion::Any => format!("({})", items.join(" || ")),
            Expansion::All => format!("({})", items.join(" && ")),
            Expansion::Sum => format!("({})", items.join(" + ")),
            Expansion::Chain => {
                let mut name = String::new();
                self.render_segments(func, bindings, None, &mut name)?;
                let mut items = items.into_iter();
                let first = items
                    .next()
                    .ok_or_else(|| self.unresolved(kind.name(), bindings))?;
                items.fold(first, |acc, item| format!("{}({}, {})", name, acc, item))
            }
        })
    }

    /// Render the template for one instantiation.
    pub fn render(&self, bindings: &Bindings) -> GenResult<String> {
        let mut out = String::new();
        self.render_segments(&self.segments, bindings, None, &mut out)?;
        Ok(out)
    }
}
