// This module evaluates a FeatureGuard tree the way the downstream C preprocessor would,
// given the set of macros a compiler predefines for one target. Nodes are walked in
// order; defines and default-defines update the macro table, chains evaluate their
// branch conditions top to bottom and take the first match or their fallback, and an
// #error node stops the walk with a Diagnostic. Undefined macros evaluate to 0 inside
// conditions and define values, matching #if semantics. The resolver never runs
// during generation; it exists so the detection block can be checked target by target.

//! Preprocessor model for the detection tree.

use std::collections::BTreeMap;

use thiserror::Error;

use super::tree::{Cond, DefineValue, Fallback, FeatureGuard, Operand};

/// An `#error` reached while resolving.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("#error {message}")]
pub struct Diagnostic {
    pub message: &'static str,
}

/// Macro table and includes after resolving a tree.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    macros: BTreeMap<String, i64>,
    includes: Vec<&'static str>,
}

impl Resolution {
    pub fn is_defined(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn value(&self, name: &str) -> Option<i64> {
        self.macros.get(name).copied()
    }

    /// Headers included, in order.
    pub fn includes(&self) -> &[&'static str] {
        &self.includes
    }
}

struct Resolver {
    state: Resolution,
}

impl Resolver {
    fn lookup(&self, name: &str) -> i64 {
        self.state.value(name).unwrap_or(0)
    }

    fn operand(&self, operand: &Operand) -> i64 {
        match operand {
            Operand::Macro(name) => self.lookup(name),
            Operand::Int(value) => *value,
        }
    }

    fn eval(&self, cond: &Cond) -> bool {
        match cond {
            Cond::Defined(name) => self.state.is_defined(name),
            Cond::Eq(lhs, rhs) => self.operand(lhs) == self.operand(rhs),
            Cond::Not(inner) => !self.eval(inner),
            Cond::Any(items) => items.iter().any(|c| self.eval(c)),
            Cond::All(items) => items.iter().all(|c| self.eval(c)),
        }
    }

    fn value(&self, value: &DefineValue) -> i64 {
        match value {
            DefineValue::Flag => 1,
            DefineValue::Int(v) | DefineValue::Hex(v) => *v,
            DefineValue::Bit(n) => 1_i64 << n,
            DefineValue::Macro(name) => self.lookup(name),
            DefineValue::Or(parts) => parts.iter().fold(0, |acc, p| acc | self.value(p)),
        }
    }

    fn define(&mut self, name: &str, value: &DefineValue) {
        let value = self.value(value);
        self.state.macros.insert(name.to_string(), value);
    }

    fn walk(&mut self, nodes: &[FeatureGuard]) -> Result<(), Diagnostic> {
        for node in nodes {
            match node {
                FeatureGuard::Chain {
                    branches, fallback, ..
                } => {
                    let taken = branches.iter().find(|b| self.eval(&b.cond));
                    match (taken, fallback) {
                        (Some(branch), _) => self.walk(&branch.body)?,
                        (None, Fallback::Nothing) => {}
                        (None, Fallback::Else(body)) => self.walk(body)?,
                        (None, Fallback::Fail(message)) => {
                            return Err(Diagnostic { message: *message })
                        }
                    }
                }
                FeatureGuard::Define { name, value } => self.define(name, value),
                FeatureGuard::DefaultDefine { name, value } => {
                    if !self.state.is_defined(name) {
                        self.define(name, value);
                    }
                }
                FeatureGuard::Include(header) => self.state.includes.push(*header),
                FeatureGuard::Error(message) => return Err(Diagnostic { message: *message }),
                FeatureGuard::Comment(_) | FeatureGuard::Blank => {}
            }
        }
        Ok(())
    }
}

/// Resolve `tree` for a compiler that predefines `predefined`.
pub fn resolve(tree: &[FeatureGuard], predefined: &[(&str, i64)]) -> Result<Resolution, Diagnostic> {
    let mut resolver = Resolver {
        state: Resolution {
            macros: predefined
                .iter()
                .map(|(name, value)| ((*name).to_string(), *value))
                .collect(),
            includes: Vec::new(),
        },
    };
    resolver.walk(tree)?;
    log::trace!("resolved detection tree: {} macros", resolver.state.macros.len());
    Ok(resolver.state)
}
