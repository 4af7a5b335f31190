// This module holds the generation settings that are not part of the catalog or taxonomy:
// the include guard macro, the optional license text placed at the top of the header and
// the name of the inline specifier macro every function is declared with. The binary
// builds a GeneratorConfig from its command line; library callers and tests use the
// defaults. License text is external boilerplate, so it is only wrapped into a comment
// block when it is not one already, and any comment terminator inside wrapped text is
// broken up so the block cannot close early.

//! Generator configuration.

use crate::error::{GenError, GenResult};
use crate::naming::is_c_identifier;

pub const DEFAULT_GUARD: &str = "RANMATH_H";
pub const DEFAULT_INLINE_MACRO: &str = "RM_INLINE";

/// Settings of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub include_guard: String,
    /// License or banner text, emitted before the include guard.
    pub license: Option<String>,
    pub inline_macro: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            include_guard: DEFAULT_GUARD.to_string(),
            license: None,
            inline_macro: DEFAULT_INLINE_MACRO.to_string(),
        }
    }
}

impl GeneratorConfig {
    pub fn with_guard(mut self, guard: impl Into<String>) -> Self {
        self.include_guard = guard.into();
        self
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    /// Reject guard and inline macro names that cannot be C identifiers.
    pub fn validate(&self) -> GenResult<()> {
        for name in [&self.include_guard, &self.inline_macro] {
            if !is_c_identifier(name) {
                return Err(GenError::InvalidIdentifier { name: name.clone() });
            }
        }
        Ok(())
    }

    /// Leading comment block of the header.
    pub fn banner(&self) -> String {
        let mut out = String::new();
        if let Some(license) = &self.license {
            let text = license.trim_end();
            if text.starts_with("/*") || text.starts_with("//") {
                out.push_str(text);
                out.push('\n');
            } else {
                out.push_str("/*\n");
                for line in text.lines() {
                    if line.is_empty() {
                        out.push_str(" *\n");
                    } else {
                        out.push_str(" * ");
                        out.push_str(&line.replace("*/", "* /"));
                        out.push('\n');
                    }
                }
                out.push_str(" */\n");
            }
            out.push('\n');
        }
        out.push_str("/* Generated by ranmath-gen. Do not edit. */\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_banner() {
        let config = GeneratorConfig::default();
        assert_eq!(config.banner(), "/* Generated by ranmath-gen. Do not edit. */\n");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_plain_license_is_wrapped() {
        let config = GeneratorConfig::default().with_license("MIT License\n\nCopyright\n");
        assert!(config.banner().starts_with("/*\n * MIT License\n *\n * Copyright\n */\n\n"));
    }

    #[test]
    fn test_wrapped_license_cannot_close_comment() {
        let config = GeneratorConfig::default().with_license("see */ here\nint x;*/");
        let banner = config.banner();
        assert!(banner.starts_with("/*\n * see * / here\n * int x;* /\n */\n\n"));
        assert_eq!(banner.matches("*/").count(), 2);
    }

    #[test]
    fn test_comment_license_kept_verbatim() {
        let config = GeneratorConfig::default().with_license("// SPDX-License-Identifier: MIT\n");
        assert!(config.banner().starts_with("// SPDX-License-Identifier: MIT\n\n/* Generated"));
    }

    #[test]
    fn test_invalid_guard_rejected() {
        let config = GeneratorConfig::default().with_guard("RANMATH-H");
        assert!(matches!(
            config.validate(),
            Err(GenError::InvalidIdentifier { ref name }) if name == "RANMATH-H"
        ));
    }
}
