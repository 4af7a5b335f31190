// This module builds the platform/architecture/byte-order/SIMD detection block that the
// generated header opens with. The block is a typed tree of FeatureGuard nodes rather
// than a text literal: the same tree is rendered into the header by tree::render and
// evaluated against a set of predefined compiler macros by resolve::resolve, which is
// how the tests prove that every supported target picks exactly one platform and one
// architecture and that unsupported ones end in an #error. The tier list of x86 SIMD
// extensions is ordered lowest first; each tier is implied by the next higher one and
// RM_SIMD carries the cumulative mask of the highest enabled tier.

//! Platform, architecture, byte order and SIMD detection.

pub mod resolve;
pub mod targets;
pub mod tree;

pub use resolve::{resolve, Diagnostic, Resolution};
pub use targets::{supported_targets, Arch, Platform, TargetDescriptor};
pub use tree::{defined_names, render, Branch, Cond, DefineValue, Fallback, FeatureGuard};

pub const PLATFORM: &str = "RM_PLATFORM";
pub const PLATFORM_LINUX: &str = "RM_PLATFORM_LINUX";
pub const PLATFORM_WINDOWS: &str = "RM_PLATFORM_WINDOWS";

pub const ARCH: &str = "RM_ARCH";
pub const ARCH_X86: &str = "RM_ARCH_X86";
pub const ARCH_ARM: &str = "RM_ARCH_ARM";
pub const ARCH_AARCH32: &str = "RM_ARCH_AARCH32";
pub const ARCH_AARCH64: &str = "RM_ARCH_AARCH64";
/// Instruction sets the ARM target can execute.
pub const ARCH_ARM_ISA: &str = "RM_ARCH_ARM_ISA";
pub const ARCH_BITS: &str = "RM_ARCH_BITS";

pub const BYTE_ORDER: &str = "RM_BYTE_ORDER";
pub const BYTE_ORDER_BIG: &str = "RM_BYTE_ORDER_BIG_ENDIAN";
pub const BYTE_ORDER_LITTLE: &str = "RM_BYTE_ORDER_LITTLE_ENDIAN";

pub const SIMD: &str = "RM_SIMD";
pub const NO_INTRINSICS: &str = "RM_NO_INTRINSICS";

/// Resolved byte order of the downstream target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Big,
    Little,
}

impl ByteOrder {
    /// Value of the `RM_BYTE_ORDER_*` macro.
    pub const fn value(self) -> i64 {
        match self {
            ByteOrder::Big => 4321,
            ByteOrder::Little => 1234,
        }
    }

    pub const fn macro_name(self) -> &'static str {
        match self {
            ByteOrder::Big => BYTE_ORDER_BIG,
            ByteOrder::Little => BYTE_ORDER_LITTLE,
        }
    }

    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            4321 => Some(ByteOrder::Big),
            1234 => Some(ByteOrder::Little),
            _ => None,
        }
    }
}

/// One SIMD extension level.
#[derive(Debug, Clone)]
pub struct SimdTier {
    /// Macro defined when the tier is enabled (`RM_SSE4_1`).
    pub name: &'static str,
    pub bit: u32,
    /// Any of these enables the tier directly.
    pub triggers: Vec<Cond>,
    /// Intrinsics header of the tier.
    pub header: &'static str,
    pub label: &'static str,
}

/// x86 tiers, lowest first.
pub fn x86_tiers() -> Vec<SimdTier> {
    let msvc_fp = |level| {
        Cond::All(vec![
            Cond::defined("_M_IX86_FP"),
            Cond::int_eq("_M_IX86_FP", level),
        ])
    };
    vec![
        SimdTier {
            name: "RM_SSE",
            bit: 0,
            triggers: vec![Cond::defined("__SSE__"), msvc_fp(1)],
            header: "xmmintrin.h",
            label: "SSE INTRINSICS",
        },
        SimdTier {
            name: "RM_SSE2",
            bit: 1,
            triggers: vec![
                Cond::defined("__SSE2__"),
                msvc_fp(2),
                // x64 MSVC has SSE2 as baseline and does not set _M_IX86_FP.
                Cond::defined("_M_X64"),
            ],
            header: "emmintrin.h",
            label: "SSE2 INTRINSICS",
        },
        SimdTier {
            name: "RM_SSE3",
            bit: 2,
            triggers: vec![Cond::defined("__SSE3__")],
            header: "pmmintrin.h",
            label: "SSE3 INTRINSICS",
        },
        SimdTier {
            name: "RM_SSSE3",
            bit: 3,
            triggers: vec![Cond::defined("__SSSE3__")],
            header: "tmmintrin.h",
            label: "SSSE3 INTRINSICS",
        },
        SimdTier {
            name: "RM_SSE4_1",
            bit: 4,
            triggers: vec![Cond::defined("__SSE4_1__")],
            header: "smmintrin.h",
            label: "SSE4.1 INTRINSICS",
        },
        SimdTier {
            name: "RM_SSE4_2",
            bit: 5,
            triggers: vec![Cond::defined("__SSE4_2__")],
            header: "nmmintrin.h",
            label: "SSE4.2 INTRINSICS",
        },
        SimdTier {
            name: "RM_AVX",
            bit: 6,
            triggers: vec![Cond::defined("__AVX__")],
            header: "immintrin.h",
            label: "AVX INTRINSICS",
        },
        SimdTier {
            name: "RM_AVX2",
            bit: 7,
            triggers: vec![Cond::defined("__AVX2__")],
            header: "immintrin.h",
            label: "AVX2 INTRINSICS",
        },
    ]
}

/// ARM tiers, lowest first.
pub fn arm_tiers() -> Vec<SimdTier> {
    vec![SimdTier {
        name: "RM_NEON",
        bit: 0,
        triggers: vec![
            Cond::All(vec![
                Cond::any_defined(&["__ARM_NEON__", "__ARM_NEON"]),
                Cond::any_defined(&["__ARM_NEON_FP__", "__ARM_NEON_FP"]),
            ]),
            Cond::defined("_M_ARM64"),
        ],
        header: "arm_neon.h",
        label: "NEON INTRINSICS",
    }]
}

/// The complete detection block, in emission order.
pub fn detection_tree() -> Vec<FeatureGuard> {
    let mut tree = Vec::new();
    tree.extend(platform_block());
    tree.push(FeatureGuard::Blank);
    tree.extend(architecture_block());
    tree.push(FeatureGuard::Blank);
    tree.extend(byte_order_block());
    tree.push(FeatureGuard::Blank);
    tree.extend(simd_block());
    tree
}

fn platform_block() -> Vec<FeatureGuard> {
    let windows_defaults = ["WIN32_LEAN_AND_MEAN", "NOMINMAX", "_CRT_SECURE_NO_WARNINGS"]
        .into_iter()
        .map(|name| FeatureGuard::default_define(name, DefineValue::Flag));

    vec![
        FeatureGuard::define(PLATFORM_LINUX, DefineValue::Hex(0x1)),
        FeatureGuard::define(PLATFORM_WINDOWS, DefineValue::Hex(0x2)),
        FeatureGuard::chain(
            "CHECK PLATFORM",
            vec![
                Branch::new(
                    Cond::defined("__linux__"),
                    vec![FeatureGuard::define(PLATFORM, DefineValue::Macro(PLATFORM_LINUX))],
                ),
                Branch::new(
                    Cond::defined("_WIN32"),
                    std::iter::once(FeatureGuard::define(
                        PLATFORM,
                        DefineValue::Macro(PLATFORM_WINDOWS),
                    ))
                    .chain(windows_defaults)
                    .collect(),
                ),
            ],
            Fallback::Fail("unsupported platform"),
        ),
    ]
}

fn architecture_block() -> Vec<FeatureGuard> {
    let x86 = |bits| {
        vec![
            FeatureGuard::define(ARCH, DefineValue::Macro(ARCH_X86)),
            FeatureGuard::define(ARCH_BITS, DefineValue::Int(bits)),
        ]
    };
    let arm = |isa, bits| {
        vec![
            FeatureGuard::define(ARCH, DefineValue::Macro(ARCH_ARM)),
            FeatureGuard::define(ARCH_ARM_ISA, isa),
            FeatureGuard::define(ARCH_BITS, DefineValue::Int(bits)),
        ]
    };

    vec![
        FeatureGuard::define(ARCH_X86, DefineValue::Hex(0x1)),
        FeatureGuard::define(ARCH_ARM, DefineValue::Hex(0x2)),
        FeatureGuard::Comment("32-bit and 64-bit arm, RM_ARCH_ARM_ISA holds the supported sets"),
        FeatureGuard::define(ARCH_AARCH32, DefineValue::Bit(0)),
        FeatureGuard::define(ARCH_AARCH64, DefineValue::Bit(1)),
        FeatureGuard::chain(
            "CHECK ARCHITECTURE",
            vec![
                Branch::new(
                    Cond::any_defined(&["__x86_64__", "_M_X64", "__amd64__", "_M_AMD64"]),
                    x86(64),
                ),
                Branch::new(Cond::any_defined(&["__i386__", "_M_IX86"]), x86(32)),
                Branch::new(
                    Cond::any_defined(&["__aarch64__", "_M_ARM64"]),
                    arm(
                        DefineValue::Or(vec![
                            DefineValue::Macro(ARCH_AARCH64),
                            DefineValue::Macro(ARCH_AARCH32),
                        ]),
                        64,
                    ),
                ),
                Branch::new(
                    Cond::any_defined(&["__arm__", "_M_ARM"]),
                    arm(DefineValue::Macro(ARCH_AARCH32), 32),
                ),
            ],
            Fallback::Fail("unsupported architecture"),
        ),
    ]
}

fn byte_order_block() -> Vec<FeatureGuard> {
    let set = |order: ByteOrder| FeatureGuard::define(BYTE_ORDER, DefineValue::Macro(order.macro_name()));

    let reported = FeatureGuard::chain(
        "__BYTE_ORDER__",
        vec![
            Branch::new(
                Cond::macro_eq("__BYTE_ORDER__", "__ORDER_BIG_ENDIAN__"),
                vec![set(ByteOrder::Big)],
            ),
            Branch::new(
                Cond::macro_eq("__BYTE_ORDER__", "__ORDER_LITTLE_ENDIAN__"),
                vec![set(ByteOrder::Little)],
            ),
        ],
        Fallback::Fail("unsupported byte order"),
    );

    let arm = FeatureGuard::chain(
        "",
        vec![Branch::new(
            Cond::any_defined(&["__BIG_ENDIAN", "__ARM_BIG_ENDIAN"]),
            vec![set(ByteOrder::Big)],
        )],
        Fallback::Else(vec![set(ByteOrder::Little)]),
    );

    vec![
        FeatureGuard::define(BYTE_ORDER_BIG, DefineValue::Int(ByteOrder::Big.value())),
        FeatureGuard::define(BYTE_ORDER_LITTLE, DefineValue::Int(ByteOrder::Little.value())),
        FeatureGuard::chain(
            "CHECK BYTE ORDER",
            vec![
                Branch::new(
                    Cond::All(vec![
                        Cond::macro_eq(PLATFORM, PLATFORM_LINUX),
                        Cond::defined("__BYTE_ORDER__"),
                    ]),
                    vec![reported],
                ),
                Branch::new(Cond::macro_eq(ARCH, ARCH_X86), vec![set(ByteOrder::Little)]),
                Branch::new(
                    Cond::macro_eq(ARCH, ARCH_ARM),
                    vec![
                        FeatureGuard::Comment("arm is bi-endian, the compiler reports big-endian targets"),
                        arm,
                    ],
                ),
            ],
            Fallback::Fail("unsupported byte order"),
        ),
    ]
}

/// Tier macros, RM_SIMD mask and intrinsics include for one family.
fn tier_guards(tiers: &[SimdTier]) -> Vec<FeatureGuard> {
    let mut out = Vec::new();

    for (idx, tier) in tiers.iter().enumerate().rev() {
        let mut triggers = tier.triggers.clone();
        if let Some(higher) = tiers.get(idx + 1) {
            triggers.push(Cond::defined(higher.name));
        }
        out.push(FeatureGuard::when(
            tier.label,
            Cond::Any(triggers),
            vec![FeatureGuard::default_define(tier.name, DefineValue::Bit(tier.bit))],
        ));
    }

    let mask_branches = (0..tiers.len())
        .rev()
        .map(|top| {
            let mask = tiers[..=top]
                .iter()
                .rev()
                .map(|t| DefineValue::Macro(t.name))
                .collect::<Vec<_>>();
            let value = if mask.len() == 1 {
                DefineValue::Macro(tiers[top].name)
            } else {
                DefineValue::Or(mask)
            };
            Branch::new(
                Cond::defined(tiers[top].name),
                vec![FeatureGuard::define(SIMD, value)],
            )
        })
        .collect();
    out.push(FeatureGuard::chain("SIMD MASK", mask_branches, Fallback::Nothing));

    let include_branches = (0..tiers.len())
        .rev()
        .map(|top| {
            Branch::new(
                Cond::defined(tiers[top].name),
                vec![FeatureGuard::Include(tiers[top].header)],
            )
        })
        .collect();
    out.push(FeatureGuard::chain("INTRINSICS HEADER", include_branches, Fallback::Nothing));
    out
}

fn simd_block() -> Vec<FeatureGuard> {
    vec![
        FeatureGuard::when(
            "NO INTRINSICS",
            Cond::not_defined(NO_INTRINSICS),
            vec![FeatureGuard::chain(
                "SIMD INTRINSICS",
                vec![
                    Branch::new(Cond::macro_eq(ARCH, ARCH_X86), tier_guards(&x86_tiers())),
                    Branch::new(Cond::macro_eq(ARCH, ARCH_ARM), tier_guards(&arm_tiers())),
                ],
                Fallback::Nothing,
            )],
        ),
        FeatureGuard::default_define(SIMD, DefineValue::Int(0)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_are_ordered() {
        let tiers = x86_tiers();
        assert_eq!(tiers.first().map(|t| t.name), Some("RM_SSE"));
        assert_eq!(tiers.last().map(|t| t.name), Some("RM_AVX2"));
        for (idx, tier) in tiers.iter().enumerate() {
            assert_eq!(tier.bit as usize, idx);
        }
    }

    #[test]
    fn test_rendered_block_shape() {
        let text = render(&detection_tree());
        assert!(text.contains("#define RM_ARCH_X86 0x1\n"));
        assert!(text.contains("#define RM_ARCH_ARM 0x2\n"));
        assert!(text.contains("#error unsupported platform\n"));
        assert!(text.contains("#error unsupported architecture\n"));
        assert!(text.contains("#if !defined(RM_NO_INTRINSICS)\n"));
        assert!(text.contains("#if defined(__AVX__) || defined(RM_AVX2)\n"));
        assert!(text.contains("#endif /* CHECK BYTE ORDER */\n"));
    }

    #[test]
    fn test_tier_implied_by_higher() {
        let text = render(&detection_tree());
        let tiers = x86_tiers();
        for pair in tiers.windows(2) {
            let needle = format!("defined({})\n#if !defined({})", pair[1].name, pair[0].name);
            assert!(text.contains(&needle), "{} does not imply {}", pair[1].name, pair[0].name);
        }
    }

    #[test]
    fn test_byte_order_values() {
        assert_eq!(ByteOrder::from_value(4321), Some(ByteOrder::Big));
        assert_eq!(ByteOrder::from_value(1234), Some(ByteOrder::Little));
        assert_eq!(ByteOrder::from_value(3412), None);
    }
}
