//! Detection block tests
//!
//! Resolves the generated detection tree against the macros each supported
//! compiler/target predefines and checks that exactly one platform,
//! architecture and byte order come out, and that SIMD tiers are cumulative.

use ranmath_gen::detect::{
    self, detection_tree, resolve, supported_targets, x86_tiers, Arch, ByteOrder, Platform,
    Resolution, TargetDescriptor,
};

fn resolve_target(target: &TargetDescriptor) -> Resolution {
    resolve(&detection_tree(), target.predefines()).unwrap_or_else(|e| {
        panic!(
            "{:?}/{:?}/{:?} failed to resolve: {}",
            target.platform, target.arch, target.byte_order, e
        )
    })
}

#[test]
fn test_every_target_resolves_uniquely() {
    let _ = env_logger::builder().is_test(true).try_init();

    for target in supported_targets() {
        let res = resolve_target(&target);

        let platform = match target.platform {
            Platform::Linux => res.value(detect::PLATFORM_LINUX),
            Platform::Windows => res.value(detect::PLATFORM_WINDOWS),
        };
        assert_eq!(res.value(detect::PLATFORM), platform, "{:?}", target);

        let arch = if target.arch.is_x86() {
            res.value(detect::ARCH_X86)
        } else {
            res.value(detect::ARCH_ARM)
        };
        assert_eq!(res.value(detect::ARCH), arch, "{:?}", target);
        assert_eq!(res.value(detect::ARCH_BITS), Some(target.arch.bits()), "{:?}", target);

        let order = res
            .value(detect::BYTE_ORDER)
            .and_then(ByteOrder::from_value)
            .unwrap_or_else(|| panic!("{:?} has no byte order", target));
        assert_eq!(order, target.byte_order, "{:?}", target);

        assert!(res.is_defined(detect::SIMD), "{:?} leaves RM_SIMD undefined", target);
    }
}

#[test]
fn test_arm_isa_sets() {
    let aarch64 = resolve_target(&TargetDescriptor::new(Platform::Linux, Arch::Aarch64, ByteOrder::Little));
    assert_eq!(aarch64.value(detect::ARCH_ARM_ISA), Some(0b11));

    let arm = resolve_target(&TargetDescriptor::new(Platform::Windows, Arch::Arm, ByteOrder::Little));
    assert_eq!(arm.value(detect::ARCH_ARM_ISA), Some(0b01));
    assert!(!arm.is_defined("RM_NEON"));
    assert_eq!(arm.value(detect::SIMD), Some(0));
}

#[test]
fn test_default_x86_64_has_sse2() {
    for platform in [Platform::Linux, Platform::Windows] {
        let res = resolve_target(&TargetDescriptor::new(platform, Arch::X86_64, ByteOrder::Little));
        assert!(res.is_defined("RM_SSE"), "{:?}", platform);
        assert!(res.is_defined("RM_SSE2"), "{:?}", platform);
        assert!(!res.is_defined("RM_SSE3"), "{:?}", platform);
        assert_eq!(res.value(detect::SIMD), Some(0b11), "{:?}", platform);
        assert_eq!(res.includes(), &["emmintrin.h"], "{:?}", platform);
    }
}

#[test]
fn test_highest_tier_implies_all_lower() {
    let target = TargetDescriptor::new(Platform::Linux, Arch::X86_64, ByteOrder::Little).with("__AVX2__", 1);
    let res = resolve_target(&target);

    for tier in x86_tiers() {
        assert_eq!(res.value(tier.name), Some(1 << tier.bit), "{} not enabled", tier.name);
    }
    assert_eq!(res.value(detect::SIMD), Some(0xff));
    assert_eq!(res.includes(), &["immintrin.h"]);
}

#[test]
fn test_middle_tier_stops_at_its_level() {
    let target = TargetDescriptor::new(Platform::Linux, Arch::X86_64, ByteOrder::Little).with("__SSE4_1__", 1);
    let res = resolve_target(&target);

    assert!(res.is_defined("RM_SSSE3"));
    assert!(res.is_defined("RM_SSE4_1"));
    assert!(!res.is_defined("RM_SSE4_2"));
    assert!(!res.is_defined("RM_AVX"));
    assert_eq!(res.value(detect::SIMD), Some(0b1_1111));
    assert_eq!(res.includes(), &["smmintrin.h"]);
}

#[test]
fn test_neon_on_aarch64() {
    for platform in [Platform::Linux, Platform::Windows] {
        let res = resolve_target(&TargetDescriptor::new(platform, Arch::Aarch64, ByteOrder::Little));
        assert_eq!(res.value("RM_NEON"), Some(1), "{:?}", platform);
        assert_eq!(res.value(detect::SIMD), Some(1), "{:?}", platform);
        assert_eq!(res.includes(), &["arm_neon.h"], "{:?}", platform);
    }
}

#[test]
fn test_no_intrinsics_opt_out() {
    let target = TargetDescriptor::new(Platform::Linux, Arch::X86_64, ByteOrder::Little)
        .with("__AVX2__", 1)
        .with(detect::NO_INTRINSICS, 1);
    let res = resolve_target(&target);

    assert_eq!(res.value(detect::SIMD), Some(0));
    assert!(res.includes().is_empty());
    assert!(!res.is_defined("RM_SSE"));
}

#[test]
fn test_user_simd_override_is_kept() {
    let target = TargetDescriptor::new(Platform::Linux, Arch::X86, ByteOrder::Little).with(detect::SIMD, 7);
    let res = resolve_target(&target);
    assert_eq!(res.value(detect::SIMD), Some(7));
}

#[test]
fn test_unsupported_platform() {
    let err = resolve(&detection_tree(), &[("__APPLE__", 1), ("__x86_64__", 1)])
        .expect_err("apple is not a supported platform");
    assert_eq!(err.message, "unsupported platform");
}

#[test]
fn test_unsupported_architecture() {
    let err = resolve(&detection_tree(), &[("__linux__", 1), ("__riscv", 1)])
        .expect_err("riscv is not a supported architecture");
    assert_eq!(err.message, "unsupported architecture");
}

#[test]
fn test_unsupported_byte_order() {
    let predefined = [
        ("__linux__", 1),
        ("__arm__", 1),
        ("__ORDER_LITTLE_ENDIAN__", 1234),
        ("__ORDER_BIG_ENDIAN__", 4321),
        ("__ORDER_PDP_ENDIAN__", 3412),
        ("__BYTE_ORDER__", 3412),
    ];
    let err = resolve(&detection_tree(), &predefined).expect_err("pdp byte order is rejected");
    assert_eq!(err.message, "unsupported byte order");
}

#[test]
fn test_windows_lean_defaults() {
    let res = resolve_target(&TargetDescriptor::new(Platform::Windows, Arch::X86_64, ByteOrder::Little));
    for name in ["WIN32_LEAN_AND_MEAN", "NOMINMAX", "_CRT_SECURE_NO_WARNINGS"] {
        assert!(res.is_defined(name), "{} missing", name);
    }

    let linux = resolve_target(&TargetDescriptor::new(Platform::Linux, Arch::X86_64, ByteOrder::Little));
    assert!(!linux.is_defined("NOMINMAX"));
}
