// This module lays out the vector and matrix structs of the generated header. A vector is a
// union of alias groups over the same storage: positional x/y/z/w, color r/g/b/a, texture
// u/v on 2-vectors, and sub-vector slices such as xy, yzw or gb on 3- and 4-vectors. Each
// group is a list of slots, either a named member whose component count is the length of
// its name or an anonymous padding scalar, and every group covers the full width so each
// anonymous struct has exactly the size of raw. Matrices are column-major: cols column
// vectors aliasing raw[cols][rows].

//! Vector alias groups, struct and typedef rendering.

use std::fmt::Write as _;

use crate::taxonomy::{ScalarType, Shape, Taxonomy, Width};

/// A slot of an alias group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Member covering `name.len()` components.
    Named(&'static str),
    /// One anonymous padding component.
    Pad,
}

use Slot::{Named, Pad};

const GROUPS_X2: &[&[Slot]] = &[
    &[Named("x"), Named("y")],
    &[Named("r"), Named("g")],
    &[Named("u"), Named("v")],
];

const GROUPS_X3: &[&[Slot]] = &[
    &[Named("x"), Named("y"), Named("z")],
    &[Named("r"), Named("g"), Named("b")],
    &[Named("xy"), Pad],
    &[Pad, Named("yz")],
    &[Named("rg"), Pad],
    &[Pad, Named("gb")],
];

const GROUPS_X4: &[&[Slot]] = &[
    &[Named("x"), Named("y"), Named("z"), Named("w")],
    &[Named("r"), Named("g"), Named("b"), Named("a")],
    &[Named("xy"), Named("zw")],
    &[Named("rg"), Named("ba")],
    &[Named("xyz"), Pad],
    &[Pad, Named("yzw")],
    &[Named("rgb"), Pad],
    &[Pad, Named("gba")],
    &[Pad, Named("yz"), Pad],
    &[Pad, Named("gb"), Pad],
];

/// Alias groups of a vector of `width` components.
pub fn alias_groups(width: Width) -> &'static [&'static [Slot]] {
    match width {
        Width::Two => GROUPS_X2,
        Width::Three => GROUPS_X3,
        Width::Four => GROUPS_X4,
    }
}

/// Component alphabet a member name is drawn from.
pub fn alphabet_of(name: &str) -> Option<&'static str> {
    ["xyzw", "rgba", "uv"]
        .into_iter()
        .find(|alphabet| name.chars().all(|c| alphabet.contains(c)))
}

/// A laid out struct member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    /// Offset in components from the start of `raw`.
    pub offset: usize,
    pub components: usize,
}

/// Members of every alias group, with padding numbered `_0, _1, ...` across
/// the whole struct.
pub fn members(width: Width) -> Vec<Vec<Member>> {
    let mut pad = 0;
    alias_groups(width)
        .iter()
        .map(|group| {
            let mut offset = 0;
            group
                .iter()
                .map(|slot| {
                    let member = match slot {
                        Named(name) => Member {
                            name: (*name).to_string(),
                            offset,
                            components: name.len(),
                        },
                        Pad => {
                            pad += 1;
                            Member {
                                name: format!("_{}", pad - 1),
                                offset,
                                components: 1,
                            }
                        }
                    };
                    offset += member.components;
                    member
                })
                .collect()
        })
        .collect()
}

fn member_type(ty: ScalarType, components: usize) -> String {
    match Width::from_count(components) {
        Some(width) => Shape::Vector(width).token(ty),
        None => ty.token().to_string(),
    }
}

/// `struct {f32 _4; f32x2 yz; f32 _5;};`, merging runs of the same type.
fn render_group(ty: ScalarType, group: &[Member]) -> String {
    let mut decls: Vec<(String, Vec<&str>)> = Vec::new();
    for member in group {
        let member_ty = member_type(ty, member.components);
        match decls.last_mut() {
            Some((last_ty, names)) if *last_ty == member_ty => names.push(member.name.as_str()),
            _ => decls.push((member_ty, vec![member.name.as_str()])),
        };
    }
    let body = decls
        .iter()
        .map(|(member_ty, names)| format!("{} {};", member_ty, names.join(", ")))
        .collect::<Vec<_>>()
        .join(" ");
    format!("struct {{{}}};", body)
}

/// `f32x3_t`
pub fn struct_name(ty: ScalarType, shape: Shape) -> String {
    format!("{}_t", shape.token(ty))
}

pub fn render_vector_struct(ty: ScalarType, width: Width) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "struct {} {{", struct_name(ty, Shape::Vector(width)));
    out.push_str("    union {\n");
    for group in members(width) {
        let _ = writeln!(out, "        {}", render_group(ty, &group));
    }
    out.push('\n');
    let _ = writeln!(out, "        {} raw[{}];", ty.token(), width.get());
    out.push_str("    };\n};\n");
    out
}

pub fn render_matrix_struct(ty: ScalarType, cols: Width, rows: Width) -> String {
    let shape = Shape::Matrix { cols, rows };
    let mut out = String::new();
    let _ = writeln!(out, "struct {} {{", struct_name(ty, shape));
    out.push_str("    union {\n");
    let _ = writeln!(out, "        {} cols[{}];", Shape::Vector(rows).token(ty), cols.get());
    let _ = writeln!(out, "        {} raw[{}][{}];", ty.token(), cols.get(), rows.get());
    out.push_str("    };\n};\n");
    out
}

/// Typedefs for every declared shape, vectors of all types first.
pub fn render_typedefs(taxonomy: &Taxonomy) -> String {
    let mut out = String::new();
    for (ty, shape) in taxonomy.declared_shapes() {
        let _ = writeln!(out, "typedef struct {} {};", struct_name(ty, shape), shape.token(ty));
    }
    out
}

/// Vector structs (per type x2, x3, x4) followed by matrix structs.
pub fn render_structs(taxonomy: &Taxonomy) -> String {
    let mut out = String::new();
    for (ty, shape) in taxonomy.declared_shapes() {
        match shape {
            Shape::Vector(width) => out.push_str(&render_vector_struct(ty, width)),
            Shape::Matrix { cols, rows } => out.push_str(&render_matrix_struct(ty, cols, rows)),
            Shape::Scalar => {}
        }
    }
    out
}
