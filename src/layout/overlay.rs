// This module generates the bit-reinterpretation overlays: for every float width a union
// named f{N}_cvt that views the same storage as the float, the same-width unsigned integer
// and the same-width signed integer. The f64 overlay also exposes its two 32-bit halves,
// where index 0 is always the most significant half. Which half sits at the lower address
// depends on the byte order the detection block resolved, so the half members are emitted
// under an RM_BYTE_ORDER chain with an #error for any other value. The bit-cast macros
// built on the overlays are the only type punning the emitted operations rely on.

//! Float/integer overlays and bit-cast macros.

use std::fmt::Write as _;

use crate::detect::{ByteOrder, Cond, BYTE_ORDER};
use crate::taxonomy::ScalarType;

/// Float types that get an overlay, in emission order.
pub const OVERLAY_TYPES: [ScalarType; 2] = [ScalarType::F32, ScalarType::F64];

/// `f32_cvt`
pub fn overlay_name(float: ScalarType) -> String {
    format!("{}_cvt", float.token())
}

/// Half members in declaration order (lowest address first) for `order`.
///
/// Index 0 is the most significant half, so it comes first on big-endian
/// targets and second on little-endian ones.
pub const fn half_members(order: ByteOrder) -> [usize; 2] {
    match order {
        ByteOrder::Big => [0, 1],
        ByteOrder::Little => [1, 0],
    }
}

/// `typedef struct f32_cvt_t f32_cvt;` for every overlay.
pub fn render_typedefs() -> String {
    let mut out = String::new();
    for float in OVERLAY_TYPES {
        let name = overlay_name(float);
        let _ = writeln!(out, "typedef struct {}_t {};", name, name);
    }
    out
}

fn render_halves(out: &mut String) {
    out.push_str("/* [ui]0 is the most significant half */\n");
    for (idx, order) in [ByteOrder::Big, ByteOrder::Little].into_iter().enumerate() {
        let directive = if idx == 0 { "#if" } else { "#elif" };
        let cond = Cond::macro_eq(BYTE_ORDER, order.macro_name());
        let _ = writeln!(out, "{} {}", directive, cond.render());
        let [first, second] = half_members(order);
        for prefix in ["u", "i"] {
            let _ = writeln!(
                out,
                "        struct {{{p}32 {p}{a}, {p}{b};}};",
                p = prefix,
                a = first,
                b = second
            );
        }
    }
    out.push_str("#else\n#error unsupported byte order\n#endif /* RM_BYTE_ORDER */\n");
}

/// Struct definition of the overlay for `float`.
pub fn render_overlay(float: ScalarType) -> String {
    let mut out = String::new();
    let (Some(unsigned), Some(signed)) = (float.same_width_unsigned(), float.same_width_signed()) else {
        return out;
    };

    let _ = writeln!(out, "struct {}_t {{", overlay_name(float));
    out.push_str("    union {\n");
    let _ = writeln!(out, "        {} f;", float.token());
    let _ = writeln!(out, "        {} u;", unsigned.token());
    let _ = writeln!(out, "        {} i;", signed.token());
    if float == ScalarType::F64 {
        render_halves(&mut out);
    }
    out.push_str("    };\n};\n");
    out
}

/// Overlay type names with their struct tags.
pub fn overlay_names() -> Vec<String> {
    OVERLAY_TYPES
        .iter()
        .flat_map(|&float| {
            let name = overlay_name(float);
            [format!("{}_t", name), name]
        })
        .collect()
}

const HALF_ACCESSORS: [&str; 3] = ["u32_as_f64", "f64_hi_u32", "f64_lo_u32"];

/// Names of the macros [`render_bitcasts`] defines, in definition order.
pub fn bitcast_names() -> Vec<String> {
    let mut names = Vec::new();
    for float in OVERLAY_TYPES {
        if let Some(unsigned) = float.same_width_unsigned() {
            names.push(format!("{}_as_{}", float.token(), unsigned.token()));
        }
    }
    for float in OVERLAY_TYPES {
        if let Some(unsigned) = float.same_width_unsigned() {
            names.push(format!("{}_as_{}", unsigned.token(), float.token()));
        }
    }
    names.extend(HALF_ACCESSORS.iter().map(|name| name.to_string()));
    names
}

/// Bit-cast macros in both directions plus the f64 half accessors.
pub fn render_bitcasts() -> String {
    let mut out = String::new();
    for float in OVERLAY_TYPES {
        if let Some(unsigned) = float.same_width_unsigned() {
            let _ = writeln!(
                out,
                "#define {f}_as_{u}(_x) ((({cvt}){{.f = (_x)}}).u)",
                f = float.token(),
                u = unsigned.token(),
                cvt = overlay_name(float)
            );
        }
    }
    for float in OVERLAY_TYPES {
        if let Some(unsigned) = float.same_width_unsigned() {
            let _ = writeln!(
                out,
                "#define {u}_as_{f}(_x) ((({cvt}){{.u = (_x)}}).f)",
                f = float.token(),
                u = unsigned.token(),
                cvt = overlay_name(float)
            );
        }
    }
    out.push_str("#define u32_as_f64(_hi, _lo) (((f64_cvt){.u0 = (_hi), .u1 = (_lo)}).f)\n");
    out.push_str("#define f64_hi_u32(_x) (((f64_cvt){.f = (_x)}).u0)\n");
    out.push_str("#define f64_lo_u32(_x) (((f64_cvt){.f = (_x)}).u1)\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reads the half members of `order` back out of rendered text.
    fn declared_halves(text: &str, order: ByteOrder) -> Vec<String> {
        let marker = format!("RM_BYTE_ORDER == {}", order.macro_name());
        let start = text.find(&marker).expect("branch present");
        let line = text[start..].lines().nth(1).expect("u line");
        let inner = line.trim().trim_start_matches("struct {u32 ").trim_end_matches(";};");
        inner.split(", ").map(str::to_string).collect()
    }

    /// Memory image of `value` on a target of `order`, split in two u32 reads.
    fn read_halves(value: f64, order: ByteOrder) -> [u32; 2] {
        let bytes = match order {
            ByteOrder::Big => value.to_be_bytes(),
            ByteOrder::Little => value.to_le_bytes(),
        };
        let read = |chunk: &[u8]| {
            let arr = [chunk[0], chunk[1], chunk[2], chunk[3]];
            match order {
                ByteOrder::Big => u32::from_be_bytes(arr),
                ByteOrder::Little => u32::from_le_bytes(arr),
            }
        };
        [read(&bytes[..4]), read(&bytes[4..])]
    }

    #[test]
    fn test_halves_follow_byte_order() {
        let text = render_overlay(ScalarType::F64);
        assert_eq!(declared_halves(&text, ByteOrder::Big), ["u0", "u1"]);
        assert_eq!(declared_halves(&text, ByteOrder::Little), ["u1", "u0"]);
        assert!(text.contains("#error unsupported byte order"));
    }

    #[test]
    fn test_u0_is_most_significant_on_both_orders() {
        let text = render_overlay(ScalarType::F64);
        for order in [ByteOrder::Big, ByteOrder::Little] {
            let names = declared_halves(&text, order);
            let words = read_halves(std::f64::consts::PI, order);
            let u0 = names.iter().position(|n| n == "u0").map(|idx| words[idx]);
            let u1 = names.iter().position(|n| n == "u1").map(|idx| words[idx]);
            assert_eq!(u0, Some(0x4009_21fb), "{:?}", order);
            assert_eq!(u1, Some(0x5444_2d18), "{:?}", order);

            let rebuilt = f64::from_bits((u64::from(0x4009_21fb_u32) << 32) | u64::from(0x5444_2d18_u32));
            assert_eq!(rebuilt, std::f64::consts::PI);
        }
    }

    #[test]
    fn test_f32_overlay_has_no_halves() {
        let text = render_overlay(ScalarType::F32);
        assert!(text.starts_with("struct f32_cvt_t {\n"));
        assert!(text.contains("        f32 f;\n        u32 u;\n        i32 i;\n"));
        assert!(!text.contains("u0"));
    }

    #[test]
    fn test_bitcast_macros() {
        let text = render_bitcasts();
        assert!(text.contains("#define f32_as_u32(_x) (((f32_cvt){.f = (_x)}).u)\n"));
        assert!(text.contains("#define u64_as_f64(_x) (((f64_cvt){.u = (_x)}).f)\n"));
        assert!(text.contains("#define u32_as_f64(_hi, _lo)"));
        assert!(text.contains("#define f64_hi_u32(_x)"));
    }

    #[test]
    fn test_bitcast_names_match_definitions() {
        let text = render_bitcasts();
        let defined: Vec<_> = text
            .lines()
            .filter_map(|line| line.strip_prefix("#define "))
            .filter_map(|rest| rest.split_once('(').map(|(name, _)| name.to_string()))
            .collect();
        assert_eq!(defined, bitcast_names());
        assert_eq!(overlay_names(), ["f32_cvt_t", "f32_cvt", "f64_cvt_t", "f64_cvt"]);
    }
}
