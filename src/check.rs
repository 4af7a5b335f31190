// This module provides a FileCheck-style matcher for the generated header. A check file
// lists directives as C line comments (// CHECK:, // CHECK-LABEL:, // CHECK-NEXT:,
// // CHECK-NOT:, // CHECK-EMPTY, // COM:) and Checker walks the artifact once from top
// to bottom, so a sequence of CHECK lines asserts both presence and relative order.
// CHECK-NOT asserts that a pattern does not occur between the previous match and the
// next positive match (or the end of the artifact). Tests use it to pin the section
// order and selected definitions without comparing the whole file.

//! FileCheck-style ordering checks over emitted text.

/// A directive extracted from a check file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckDirective {
    /// `CHECK: pattern`, found at or after the current line.
    Check(String),
    /// `CHECK-LABEL: pattern`, a section anchor.
    CheckLabel(String),
    /// `CHECK-NEXT: pattern`, on the line right after the previous match.
    CheckNext(String),
    /// `CHECK-NOT: pattern`, absent up to the next match.
    CheckNot(String),
    /// `CHECK-EMPTY`, the next line is blank.
    CheckEmpty,
    /// `COM: comment`, ignored.
    Comment(String),
}

/// Directives of one check file, in order.
#[derive(Debug, Default)]
pub struct CheckSpec {
    pub directives: Vec<CheckDirective>,
}

const PREFIX: &str = "//";

impl CheckSpec {
    /// Parse `content`; lines that are not directives are ignored.
    pub fn parse(content: &str) -> Result<Self, String> {
        let mut directives = Vec::new();

        for (number, line) in content.lines().enumerate() {
            let Some(rest) = line.trim().strip_prefix(PREFIX) else {
                continue;
            };
            let rest = rest.trim_start();

            let directive = if let Some(p) = rest.strip_prefix("CHECK-LABEL:") {
                CheckDirective::CheckLabel(p.trim().to_string())
            } else if let Some(p) = rest.strip_prefix("CHECK-NEXT:") {
                CheckDirective::CheckNext(p.trim().to_string())
            } else if let Some(p) = rest.strip_prefix("CHECK-NOT:") {
                CheckDirective::CheckNot(p.trim().to_string())
            } else if rest.starts_with("CHECK-EMPTY") {
                CheckDirective::CheckEmpty
            } else if let Some(p) = rest.strip_prefix("CHECK:") {
                CheckDirective::Check(p.trim().to_string())
            } else if let Some(c) = rest.strip_prefix("COM:") {
                CheckDirective::Comment(c.trim().to_string())
            } else if rest.starts_with("CHECK") {
                return Err(format!("line {}: unknown directive `{}`", number + 1, rest));
            } else {
                continue;
            };

            let empty_pattern = matches!(
                &directive,
                CheckDirective::Check(p)
                    | CheckDirective::CheckLabel(p)
                    | CheckDirective::CheckNext(p)
                    | CheckDirective::CheckNot(p) if p.is_empty()
            );
            if empty_pattern {
                return Err(format!("line {}: empty pattern", number + 1));
            }
            directives.push(directive);
        }

        Ok(Self { directives })
    }
}

/// Matches directives against an artifact.
#[derive(Debug, Default)]
pub struct Checker;

impl Checker {
    pub fn new() -> Self {
        Self
    }

    /// Validate `output` against `directives`.
    pub fn validate_output(&self, output: &str, directives: &[CheckDirective]) -> Result<(), String> {
        let lines: Vec<&str> = output.lines().collect();
        let mut line_idx = 0;
        let mut pending_not: Vec<&str> = Vec::new();

        for directive in directives {
            match directive {
                CheckDirective::Comment(_) => continue,

                CheckDirective::CheckNot(pattern) => pending_not.push(pattern),

                CheckDirective::Check(pattern) | CheckDirective::CheckLabel(pattern) => {
                    let found = lines
                        .iter()
                        .skip(line_idx)
                        .position(|line| line.contains(pattern.as_str()));

                    let Some(idx) = found else {
                        return Err(format!("{:?}: pattern '{}' not found", directive, pattern));
                    };
                    check_absent(&lines[line_idx..line_idx + idx], &pending_not)?;
                    pending_not.clear();
                    line_idx += idx + 1;
                    log::debug!("'{}' found at line {}", pattern, line_idx);
                }

                CheckDirective::CheckNext(pattern) => {
                    let Some(line) = lines.get(line_idx) else {
                        return Err(format!("CHECK-NEXT: no more lines, expected '{}'", pattern));
                    };
                    if !line.contains(pattern.as_str()) {
                        return Err(format!("CHECK-NEXT: expected '{}' but got '{}'", pattern, line));
                    }
                    pending_not.clear();
                    line_idx += 1;
                }

                CheckDirective::CheckEmpty => {
                    let Some(line) = lines.get(line_idx) else {
                        continue;
                    };
                    if !line.trim().is_empty() {
                        return Err(format!("CHECK-EMPTY: expected empty line but got '{}'", line));
                    }
                    line_idx += 1;
                }
            }
        }

        check_absent(&lines[line_idx.min(lines.len())..], &pending_not)
    }

    /// Parse `check_file` and validate `output` against it.
    pub fn run(&self, check_file: &str, output: &str) -> Result<(), String> {
        let spec = CheckSpec::parse(check_file)?;
        self.validate_output(output, &spec.directives)
    }
}

fn check_absent(lines: &[&str], patterns: &[&str]) -> Result<(), String> {
    for pattern in patterns {
        if let Some(line) = lines.iter().find(|line| line.contains(pattern)) {
            return Err(format!("CHECK-NOT: '{}' found in '{}'", pattern, line));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directives() {
        let content = "// CHECK: #ifndef RANMATH_H\n\
                       // CHECK-LABEL: /* scalar */\n\
                       // CHECK-NEXT: RM_INLINE f32 rm_abs_f32\n\
                       // COM: comment\n\
                       // CHECK-NOT: {T}\n\
                       not a directive\n";

        let spec = CheckSpec::parse(content).unwrap();
        assert_eq!(spec.directives.len(), 5);
        assert_eq!(spec.directives[4], CheckDirective::CheckNot("{T}".to_string()));
    }

    #[test]
    fn test_unknown_directive_rejected() {
        assert!(CheckSpec::parse("// CHECK-SAME: x").is_err());
        assert!(CheckSpec::parse("// CHECK:   ").is_err());
    }

    #[test]
    fn test_check_matching() {
        let checker = Checker::new();
        let output = "/* scalar */\nRM_INLINE f32 rm_abs_f32(const f32 x) {\n\n}\n";

        let directives = vec![
            CheckDirective::CheckLabel("/* scalar */".to_string()),
            CheckDirective::CheckNext("rm_abs_f32".to_string()),
            CheckDirective::CheckEmpty,
            CheckDirective::Check("}".to_string()),
        ];
        assert!(checker.validate_output(output, &directives).is_ok());
    }

    #[test]
    fn test_order_is_enforced() {
        let checker = Checker::new();
        let output = "b\na\n";
        let directives = vec![
            CheckDirective::Check("a".to_string()),
            CheckDirective::Check("b".to_string()),
        ];
        assert!(checker.validate_output(output, &directives).is_err());
    }

    #[test]
    fn test_check_not_between_matches() {
        let checker = Checker::new();
        let output = "start\nbad\nend\n";
        let between = vec![
            CheckDirective::Check("start".to_string()),
            CheckDirective::CheckNot("bad".to_string()),
            CheckDirective::Check("end".to_string()),
        ];
        assert!(checker.validate_output(output, &between).is_err());

        let trailing = vec![
            CheckDirective::Check("bad".to_string()),
            CheckDirective::CheckNot("start".to_string()),
        ];
        assert!(checker.validate_output(output, &trailing).is_ok());
    }
}
