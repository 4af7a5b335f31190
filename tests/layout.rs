//! Layout tests over the emitted header text.
//!
//! Parses the vector structs back out of a generated header and checks that
//! every alias group spans exactly the raw storage and that each named member
//! sits at the offset its letters imply.

use ranmath_gen::catalog::Catalog;
use ranmath_gen::config::GeneratorConfig;
use ranmath_gen::detect;
use ranmath_gen::emit;
use ranmath_gen::taxonomy::{ScalarType, Taxonomy};

/// Component count of a member type: `f32` is one, `f32x3` is three.
fn components_of(member_ty: &str, scalar: &str) -> usize {
    match member_ty.strip_prefix(scalar).and_then(|rest| rest.strip_prefix('x')) {
        Some(count) => count.parse().unwrap_or_else(|e| panic!("bad type {}: {}", member_ty, e)),
        None => 1,
    }
}

/// `(name, offset, components)` of each member of `struct {f32 _1; f32x3 yzw;};`.
fn parse_group(line: &str, scalar: &str) -> Vec<(String, usize, usize)> {
    let inner = line
        .trim()
        .strip_prefix("struct {")
        .and_then(|rest| rest.strip_suffix("};"))
        .unwrap_or_else(|| panic!("not an alias group: {}", line));

    let mut members = Vec::new();
    let mut offset = 0;
    for decl in inner.split(';').map(str::trim).filter(|d| !d.is_empty()) {
        let (member_ty, names) = decl
            .split_once(' ')
            .unwrap_or_else(|| panic!("bad declaration: {}", decl));
        let width = components_of(member_ty, scalar);
        for name in names.split(',').map(str::trim) {
            members.push((name.to_string(), offset, width));
            offset += width;
        }
    }
    members
}

/// Vector struct bodies of `ty` in `text`, keyed by width.
fn vector_structs<'a>(text: &'a str, ty: &str) -> Vec<(usize, Vec<&'a str>)> {
    let mut out = Vec::new();
    for width in 2..=4 {
        let header = format!("struct {}x{}_t {{", ty, width);
        let start = text
            .find(&header)
            .unwrap_or_else(|| panic!("{} missing", header));
        let body: Vec<&str> = text[start..]
            .lines()
            .skip(2)
            .take_while(|line| !line.trim().starts_with("};"))
            .collect();
        out.push((width, body));
    }
    out
}

#[test]
fn test_alias_groups_cover_raw_storage() {
    let _ = env_logger::builder().is_test(true).try_init();

    let types = [ScalarType::U8, ScalarType::I64, ScalarType::F32];
    let catalog = Catalog::standard().unwrap_or_else(|e| panic!("catalog: {}", e));
    let artifact = emit::generate(
        &catalog,
        &Taxonomy::new(types),
        &detect::detection_tree(),
        &GeneratorConfig::default(),
    )
    .unwrap_or_else(|e| panic!("generate: {}", e));

    for ty in types {
        let scalar = ty.token();
        for (width, body) in vector_structs(&artifact.text, scalar) {
            let raw = format!("{} raw[{}];", scalar, width);
            assert!(
                body.iter().any(|line| line.trim() == raw),
                "{}x{} has no raw member",
                scalar,
                width
            );

            let groups: Vec<_> = body
                .iter()
                .filter(|line| line.trim().starts_with("struct {"))
                .map(|line| parse_group(line, scalar))
                .collect();
            assert!(!groups.is_empty());

            for group in &groups {
                let span: usize = group.iter().map(|(_, _, n)| n).sum();
                assert_eq!(span, width, "{}x{}: {:?}", scalar, width, group);

                for (name, offset, count) in group {
                    if name.starts_with('_') {
                        assert_eq!(*count, 1, "padding {} wider than one component", name);
                        continue;
                    }
                    assert_eq!(name.len(), *count, "{} declared with {} components", name, count);
                    let alphabet = ["xyzw", "rgba", "uv"]
                        .into_iter()
                        .find(|a| a.contains(name.as_str()))
                        .unwrap_or_else(|| panic!("{} is not a contiguous swizzle", name));
                    assert_eq!(
                        alphabet.find(name.as_str()),
                        Some(*offset),
                        "{} at offset {} in {}x{}",
                        name,
                        offset,
                        scalar,
                        width
                    );
                }
            }
        }
    }
}

#[test]
fn test_two_vectors_drop_upper_aliases() {
    let catalog = Catalog::standard().unwrap_or_else(|e| panic!("catalog: {}", e));
    let artifact = emit::generate(
        &catalog,
        &Taxonomy::new([ScalarType::I32]),
        &detect::detection_tree(),
        &GeneratorConfig::default(),
    )
    .unwrap_or_else(|e| panic!("generate: {}", e));

    let (_, body) = vector_structs(&artifact.text, "i32").remove(0);
    let text = body.join("\n");
    assert!(text.contains("i32 u, v;"));
    for absent in [" z", " w", " b", " a;"] {
        assert!(!text.contains(absent), "i32x2 declares{}", absent);
    }
}
