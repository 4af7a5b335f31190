// This module lists the targets the detection block supports and, for each, the macros a
// typical compiler predefines there: GCC/Clang style on Linux (__linux__, the __BYTE_ORDER__
// family, __aarch64__ ...) and MSVC style on Windows (_WIN32, _M_X64, _M_ARM64 ...). A
// TargetDescriptor can be extended with extra flags such as __AVX2__ to model compiler
// options. The descriptors feed resolve::resolve in the detection tests.

//! Supported target descriptors.

use super::ByteOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    Windows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86_64,
    X86,
    Aarch64,
    Arm,
}

impl Arch {
    pub fn is_x86(self) -> bool {
        matches!(self, Arch::X86_64 | Arch::X86)
    }

    pub fn bits(self) -> i64 {
        match self {
            Arch::X86_64 | Arch::Aarch64 => 64,
            Arch::X86 | Arch::Arm => 32,
        }
    }
}

/// A (platform, architecture, byte order) triple and its predefined macros.
#[derive(Debug, Clone)]
pub struct TargetDescriptor {
    pub platform: Platform,
    pub arch: Arch,
    pub byte_order: ByteOrder,
    predefines: Vec<(&'static str, i64)>,
}

impl TargetDescriptor {
    pub fn new(platform: Platform, arch: Arch, byte_order: ByteOrder) -> Self {
        let mut predefines = Vec::new();
        match platform {
            Platform::Linux => {
                predefines.push(("__linux__", 1));
                predefines.push(("__GNUC__", 13));
                predefines.push(("__ORDER_LITTLE_ENDIAN__", 1234));
                predefines.push(("__ORDER_BIG_ENDIAN__", 4321));
                let order = match byte_order {
                    ByteOrder::Little => 1234,
                    ByteOrder::Big => 4321,
                };
                predefines.push(("__BYTE_ORDER__", order));
                predefines.extend(match arch {
                    Arch::X86_64 => vec![("__x86_64__", 1), ("__amd64__", 1), ("__SSE__", 1), ("__SSE2__", 1)],
                    Arch::X86 => vec![("__i386__", 1)],
                    Arch::Aarch64 => vec![("__aarch64__", 1), ("__ARM_NEON", 1), ("__ARM_NEON_FP", 0xe)],
                    Arch::Arm => vec![("__arm__", 1)],
                });
                if byte_order == ByteOrder::Big && !arch.is_x86() {
                    predefines.push(("__ARM_BIG_ENDIAN", 1));
                }
            }
            Platform::Windows => {
                predefines.push(("_WIN32", 1));
                predefines.push(("_MSC_VER", 1930));
                predefines.extend(match arch {
                    Arch::X86_64 => vec![("_WIN64", 1), ("_M_X64", 100), ("_M_AMD64", 100)],
                    Arch::X86 => vec![("_M_IX86", 600), ("_M_IX86_FP", 2)],
                    Arch::Aarch64 => vec![("_WIN64", 1), ("_M_ARM64", 1)],
                    Arch::Arm => vec![("_M_ARM", 7)],
                });
            }
        }
        Self {
            platform,
            arch,
            byte_order,
            predefines,
        }
    }

    /// Add a predefined macro, e.g. a `-mavx2` style flag.
    pub fn with(mut self, name: &'static str, value: i64) -> Self {
        self.predefines.push((name, value));
        self
    }

    pub fn predefines(&self) -> &[(&'static str, i64)] {
        &self.predefines
    }
}

/// Every target the detection block claims to support.
pub fn supported_targets() -> Vec<TargetDescriptor> {
    let mut targets = Vec::new();
    for arch in [Arch::X86_64, Arch::X86, Arch::Aarch64, Arch::Arm] {
        targets.push(TargetDescriptor::new(Platform::Linux, arch, ByteOrder::Little));
        if !arch.is_x86() {
            targets.push(TargetDescriptor::new(Platform::Linux, arch, ByteOrder::Big));
        }
        targets.push(TargetDescriptor::new(Platform::Windows, arch, ByteOrder::Little));
    }
    targets
}
