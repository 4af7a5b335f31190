// This module defines the node types of the platform, architecture, byte order and SIMD
// decision tree that opens the generated header. A Chain is an #if/#elif sequence with an
// explicit fallback (nothing, an #else body or an always-failing #error), so every chain
// states what happens when no branch matches. Conditions are built from defined(),
// equality tests, negation and ||/&& groups; long groups are wrapped with backslash
// continuations when rendered.

//! Typed conditional-compilation tree and its rendering.
//!
//! Conditions and define values are data, not text, so the same tree can be
//! rendered into the header and evaluated by [`super::resolve`].

use std::fmt::Write as _;

/// Preprocessor lines longer than this wrap with a trailing backslash.
const MAX_LINE: usize = 78;

/// Operand of an `==` comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Macro(&'static str),
    Int(i64),
}

impl Operand {
    fn render(&self) -> String {
        match self {
            Operand::Macro(name) => (*name).to_string(),
            Operand::Int(value) => value.to_string(),
        }
    }
}

/// A preprocessor condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cond {
    Defined(&'static str),
    Eq(Operand, Operand),
    Not(Box<Cond>),
    Any(Vec<Cond>),
    All(Vec<Cond>),
}

impl Cond {
    pub fn defined(name: &'static str) -> Self {
        Cond::Defined(name)
    }

    pub fn not_defined(name: &'static str) -> Self {
        Cond::Not(Box::new(Cond::Defined(name)))
    }

    pub fn macro_eq(lhs: &'static str, rhs: &'static str) -> Self {
        Cond::Eq(Operand::Macro(lhs), Operand::Macro(rhs))
    }

    pub fn int_eq(lhs: &'static str, rhs: i64) -> Self {
        Cond::Eq(Operand::Macro(lhs), Operand::Int(rhs))
    }

    /// `defined(a) || defined(b) || ...`
    pub fn any_defined(names: &[&'static str]) -> Self {
        Cond::Any(names.iter().map(|&n| Cond::Defined(n)).collect())
    }

    /// Top-level terms, used for line wrapping.
    fn terms(&self) -> (Vec<String>, &'static str) {
        match self {
            Cond::Any(items) => (items.iter().map(|c| c.render_nested()).collect(), "||"),
            Cond::All(items) => (items.iter().map(|c| c.render_nested()).collect(), "&&"),
            other => (vec![other.render()], ""),
        }
    }

    /// Render as a complete `#if` expression.
    pub fn render(&self) -> String {
        match self {
            Cond::Defined(name) => format!("defined({})", name),
            Cond::Eq(lhs, rhs) => format!("{} == {}", lhs.render(), rhs.render()),
            Cond::Not(inner) => match inner.as_ref() {
                Cond::Defined(name) => format!("!defined({})", name),
                other => format!("!({})", other.render()),
            },
            Cond::Any(_) | Cond::All(_) => {
                let (terms, op) = self.terms();
                terms.join(&format!(" {} ", op))
            }
        }
    }

    /// Render as an operand of `||` or `&&`.
    fn render_nested(&self) -> String {
        match self {
            Cond::Any(items) | Cond::All(items) if items.len() > 1 => format!("({})", self.render()),
            _ => self.render(),
        }
    }

    /// Render after `directive`, wrapping long `||`/`&&` chains.
    fn render_line(&self, directive: &str) -> String {
        let single = format!("{} {}", directive, self.render());
        if single.len() <= MAX_LINE {
            return single;
        }

        let (terms, op) = self.terms();
        let mut lines: Vec<String> = Vec::new();
        let mut current = format!("{} ", directive);
        let mut on_line = 0;
        for (idx, term) in terms.iter().enumerate() {
            let last = idx + 1 == terms.len();
            let piece = if last {
                term.clone()
            } else {
                format!("{} {} ", term, op)
            };
            if on_line > 0 && current.len() + piece.len() > MAX_LINE {
                lines.push(format!("{}\\", current));
                current = "    ".to_string();
                on_line = 0;
            }
            current.push_str(&piece);
            on_line += 1;
        }
        lines.push(current);
        lines.join("\n")
    }
}

/// Value of a `#define`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefineValue {
    /// `1`
    Flag,
    Int(i64),
    Hex(i64),
    /// `(1 << n)`
    Bit(u32),
    Macro(&'static str),
    /// `(a | b | ...)`
    Or(Vec<DefineValue>),
}

impl DefineValue {
    pub fn render(&self) -> String {
        match self {
            DefineValue::Flag => "1".to_string(),
            DefineValue::Int(v) => v.to_string(),
            DefineValue::Hex(v) => format!("0x{:x}", v),
            DefineValue::Bit(n) => format!("(1 << {})", n),
            DefineValue::Macro(name) => (*name).to_string(),
            DefineValue::Or(parts) => format!(
                "({})",
                parts.iter().map(|p| p.render()).collect::<Vec<_>>().join(" | ")
            ),
        }
    }
}

/// One mutually exclusive branch of a [`FeatureGuard::Chain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub cond: Cond,
    pub body: Vec<FeatureGuard>,
}

impl Branch {
    pub fn new(cond: Cond, body: Vec<FeatureGuard>) -> Self {
        Self { cond, body }
    }
}

/// What a chain does when none of its branches match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    Nothing,
    Else(Vec<FeatureGuard>),
    /// Always-failing `#error` directive.
    Fail(&'static str),
}

/// A node of the platform/architecture/SIMD decision tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureGuard {
    /// `#if / #elif ... / #else / #endif /* label */`
    Chain {
        label: &'static str,
        branches: Vec<Branch>,
        fallback: Fallback,
    },
    Define {
        name: &'static str,
        value: DefineValue,
    },
    /// `#define` that keeps a user-supplied definition.
    DefaultDefine {
        name: &'static str,
        value: DefineValue,
    },
    Include(&'static str),
    Error(&'static str),
    Comment(&'static str),
    Blank,
}

impl FeatureGuard {
    pub fn define(name: &'static str, value: DefineValue) -> Self {
        FeatureGuard::Define { name, value }
    }

    pub fn default_define(name: &'static str, value: DefineValue) -> Self {
        FeatureGuard::DefaultDefine { name, value }
    }

    pub fn chain(label: &'static str, branches: Vec<Branch>, fallback: Fallback) -> Self {
        FeatureGuard::Chain {
            label,
            branches,
            fallback,
        }
    }

    /// Single-branch `#if` without fallback.
    pub fn when(label: &'static str, cond: Cond, body: Vec<FeatureGuard>) -> Self {
        Self::chain(label, vec![Branch::new(cond, body)], Fallback::Nothing)
    }

    fn render_into(&self, out: &mut String) {
        match self {
            FeatureGuard::Chain {
                label,
                branches,
                fallback,
            } => {
                for (idx, branch) in branches.iter().enumerate() {
                    let directive = if idx == 0 { "#if" } else { "#elif" };
                    out.push_str(&branch.cond.render_line(directive));
                    out.push('\n');
                    render_nodes_into(&branch.body, out);
                }
                match fallback {
                    Fallback::Nothing => {}
                    Fallback::Else(body) => {
                        out.push_str("#else\n");
                        render_nodes_into(body, out);
                    }
                    Fallback::Fail(message) => {
                        out.push_str("#else\n");
                        let _ = writeln!(out, "#error {}", message);
                    }
                }
                if label.is_empty() {
                    out.push_str("#endif\n");
                } else {
                    let _ = writeln!(out, "#endif /* {} */", label);
                }
            }
            FeatureGuard::Define { name, value } => {
                let _ = writeln!(out, "#define {} {}", name, value.render());
            }
            FeatureGuard::DefaultDefine { name, value } => {
                let _ = writeln!(out, "#if !defined({})", name);
                let _ = writeln!(out, "#define {} {}", name, value.render());
                out.push_str("#endif\n");
            }
            FeatureGuard::Include(header) => {
                let _ = writeln!(out, "#include <{}>", header);
            }
            FeatureGuard::Error(message) => {
                let _ = writeln!(out, "#error {}", message);
            }
            FeatureGuard::Comment(text) => {
                let _ = writeln!(out, "/* {} */", text);
            }
            FeatureGuard::Blank => out.push('\n'),
        }
    }
}

fn render_nodes_into(nodes: &[FeatureGuard], out: &mut String) {
    for node in nodes {
        node.render_into(out);
    }
}

/// Macro names the nodes `#define` on any path, each once, in order of
/// first appearance.
pub fn defined_names(nodes: &[FeatureGuard]) -> Vec<&'static str> {
    let mut names = Vec::new();
    collect_defined(nodes, &mut names);
    names
}

fn collect_defined(nodes: &[FeatureGuard], names: &mut Vec<&'static str>) {
    for node in nodes {
        match node {
            FeatureGuard::Chain { branches, fallback, .. } => {
                for branch in branches {
                    collect_defined(&branch.body, names);
                }
                if let Fallback::Else(body) = fallback {
                    collect_defined(body, names);
                }
            }
            FeatureGuard::Define { name, .. } | FeatureGuard::DefaultDefine { name, .. } => {
                if !names.contains(name) {
                    names.push(*name);
                }
            }
            _ => {}
        }
    }
}

/// Render a sequence of guards as preprocessor text.
pub fn render(nodes: &[FeatureGuard]) -> String {
    let mut out = String::new();
    render_nodes_into(nodes, &mut out);
    out
}
