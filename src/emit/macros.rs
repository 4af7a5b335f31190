// This module renders the support macros the operation bodies are written against: the
// primitive type aliases and the inline specifier, the constructor and splat macros of
// every vector type, the composite constructors that build a vector from scalars and a
// smaller vector, the float constants spelled as exact bit patterns through the overlay
// casts, and the generic RM_* helpers the scalar bodies expand to. Every macro is
// returned as a MacroDef so the pipeline can claim its name in the session before the
// text is appended.

//! Constructor, constant and utility macros.

use std::fmt;

use crate::layout::overlay::OVERLAY_TYPES;
use crate::naming::{constructor_name, splat_name, SYMBOL_PREFIX};
use crate::taxonomy::{scalar_types, ScalarType, Shape, Taxonomy, Width, POSITIONAL};

/// A `#define` with an optional parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroDef {
    pub name: String,
    pub params: Option<Vec<String>>,
    pub body: String,
}

impl MacroDef {
    pub fn object(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: None,
            body: body.into(),
        }
    }

    pub fn function(name: impl Into<String>, params: Vec<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Some(params),
            body: body.into(),
        }
    }
}

impl fmt::Display for MacroDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.params {
            Some(params) => write!(f, "#define {}({}) {}", self.name, params.join(", "), self.body),
            None => write!(f, "#define {} {}", self.name, self.body),
        }
    }
}

/// Standard headers, primitive aliases and `usize`.
pub fn render_primitives() -> String {
    let mut out = String::from("#include <stdint.h>\n#include <stdbool.h>\n#include <stddef.h>\n\n");
    for ty in scalar_types() {
        if let Some(c_type) = ty.c_type() {
            out.push_str(&format!("typedef {} {};\n", c_type, ty.token()));
        }
    }
    out.push_str("typedef size_t usize;\n");
    out
}

/// The inline specifier macro. `RM_NO_INLINE` keeps the functions static
/// but drops the inline hint.
pub fn render_inline(name: &str) -> String {
    format!(
        "#if !defined(RM_NO_INLINE)\n\
         #if defined(_MSC_VER)\n\
         #define {name} static __forceinline\n\
         #elif defined(__GNUC__) || defined(__clang__)\n\
         #define {name} static inline __attribute((always_inline))\n\
         #else\n\
         #define {name} static inline\n\
         #endif\n\
         #else\n\
         #define {name} static\n\
         #endif /* RM_NO_INLINE */\n",
        name = name
    )
}

/// A run of consecutive components in a composite constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Scalar,
    Vector(usize),
}

/// Composite constructors per width, named after their parts.
const COMPOSITES: &[(Width, &str, &[Part])] = &[
    (Width::Three, "sv2", &[Part::Scalar, Part::Vector(2)]),
    (Width::Three, "v2s", &[Part::Vector(2), Part::Scalar]),
    (Width::Four, "sv2", &[Part::Scalar, Part::Scalar, Part::Vector(2)]),
    (Width::Four, "v2s", &[Part::Vector(2), Part::Scalar, Part::Scalar]),
    (Width::Four, "sv2s", &[Part::Scalar, Part::Vector(2), Part::Scalar]),
    (Width::Four, "sv3", &[Part::Scalar, Part::Vector(3)]),
    (Width::Four, "v3s", &[Part::Vector(3), Part::Scalar]),
];

fn initializer(token: &str, fields: &[(&str, String)]) -> String {
    let fields: Vec<String> = fields
        .iter()
        .map(|(component, value)| format!(".{} = {}", component, value))
        .collect();
    format!("(({}){{{}}})", token, fields.join(", "))
}

fn composite(ty: ScalarType, width: Width, suffix: &str, parts: &[Part]) -> MacroDef {
    let components = width.components();
    let mut params = Vec::new();
    let mut fields = Vec::new();
    let mut at = 0;
    for part in parts {
        match *part {
            Part::Scalar => {
                params.push(format!("_{}", components[at]));
                fields.push((components[at], format!("(_{})", components[at])));
                at += 1;
            }
            Part::Vector(n) => {
                params.push("_v".to_string());
                for source in &POSITIONAL[..n] {
                    fields.push((components[at], format!("(_v).{}", source)));
                    at += 1;
                }
            }
        }
    }
    let shape = Shape::Vector(width);
    MacroDef::function(
        format!("{}{}", constructor_name(ty, shape), suffix),
        params,
        initializer(&shape.token(ty), &fields),
    )
}

/// Constructors of one vector type: full, splat, then composites.
pub fn vector_constructors(ty: ScalarType, width: Width) -> Vec<MacroDef> {
    let shape = Shape::Vector(width);
    let token = shape.token(ty);
    let components = width.components();

    let full: Vec<(&str, String)> = components.iter().map(|c| (*c, format!("(_{})", c))).collect();
    let splat: Vec<(&str, String)> = components.iter().map(|c| (*c, "(_s)".to_string())).collect();

    let mut defs = vec![
        MacroDef::function(
            constructor_name(ty, shape),
            components.iter().map(|c| format!("_{}", c)).collect(),
            initializer(&token, &full),
        ),
        MacroDef::function(splat_name(ty, shape), vec!["_s".to_string()], initializer(&token, &splat)),
    ];
    defs.extend(
        COMPOSITES
            .iter()
            .filter(|(w, _, _)| *w == width)
            .map(|(_, suffix, parts)| composite(ty, width, suffix, parts)),
    );
    defs
}

/// Every constructor macro of the vector types of `taxonomy`, per type and
/// width, followed by the component list helpers.
pub fn constructors(taxonomy: &Taxonomy) -> Vec<MacroDef> {
    let mut defs = Vec::new();
    for ty in taxonomy.vector_types() {
        for width in Width::ALL {
            defs.extend(vector_constructors(ty, width));
        }
    }
    for width in Width::ALL {
        let n = width.get();
        let body: Vec<String> = POSITIONAL[..n].iter().map(|c| format!("(_v).{}", c)).collect();
        defs.push(MacroDef::function(
            format!("{}_splat{}", SYMBOL_PREFIX, n),
            vec!["_v".to_string()],
            body.join(", "),
        ));
    }
    defs
}

/// Named float constants as (name, f32 bits, f64 bits).
pub const CONSTANTS: &[(&str, u32, u64)] = &[
    ("HUGE", 0x7f7fffff, 0x7fefffffffffffff),
    ("INF", 0x7f800000, 0x7ff0000000000000),
    ("NAN", 0x7fc00000, 0x7ff8000000000000),
    ("PI", 0x40490fdb, 0x400921fb54442d18),
    ("2PI", 0x40c90fdb, 0x401921fb54442d18),
    ("PISQ", 0x411de9e7, 0x4023bd3cc9be45de),
    ("SQRTPI", 0x3fe2dfc5, 0x3ffc5bf891b4ef6a),
    ("RSQRTPI", 0x3f106eba, 0x3fe20dd750429b6d),
    ("PIO2", 0x3fc90fdb, 0x3ff921fb54442d18),
    ("1OPI", 0x3ea2f983, 0x3fd45f306dc9c883),
    ("2OPI", 0x3f22f983, 0x3fe45f306dc9c883),
    ("DEG2RAD", 0x3c8efa35, 0x3f91df46a2529d39),
    ("RAD2DEG", 0x42652ee0, 0x404ca5dc1a63c1f8),
];

/// `RM_PI_F32`
pub fn constant_name(name: &str, float: ScalarType) -> String {
    format!("{}_{}_{}", SYMBOL_PREFIX.to_ascii_uppercase(), name, float.upper_token())
}

/// Every constant for both float widths.
pub fn constants() -> Vec<MacroDef> {
    let mut defs = Vec::new();
    for &(name, bits32, bits64) in CONSTANTS {
        for float in OVERLAY_TYPES {
            let body = match float.bits() {
                Some(32) => format!("u32_as_f32(0x{:08x})", bits32),
                _ => format!("u64_as_f64(0x{:016x})", bits64),
            };
            defs.push(MacroDef::object(constant_name(name, float), body));
        }
    }
    defs
}

/// Generic helpers the scalar bodies expand to.
pub fn utilities() -> Vec<MacroDef> {
    let f = |name: &str, params: &[&str], body: &str| {
        MacroDef::function(name, params.iter().map(|p| p.to_string()).collect(), body)
    };
    vec![
        f("RM_ABS", &["_x"], "(((_x) < 0) ? -(_x) : (_x))"),
        f("RM_MIN", &["_a", "_b"], "(((_a) < (_b)) ? (_a) : (_b))"),
        f("RM_MAX", &["_a", "_b"], "(((_a) > (_b)) ? (_a) : (_b))"),
        f("RM_POW2", &["_x"], "((_x) * (_x))"),
        f(
            "RM_CLAMP",
            &["_v", "_lo", "_hi"],
            "(RM_MIN(RM_MAX((_v), (_lo)), (_hi)))",
        ),
        f("RM_SIGN", &["_x"], "(((_x) > 0) - ((_x) < 0))"),
    ]
}
