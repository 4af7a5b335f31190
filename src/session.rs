// This module provides the per-run generation session. GenerationSession owns nothing but
// borrows a bumpalo arena for the duration of one run: every emitted identifier is
// interned there once, and the symbol table that detects collisions is a hashbrown map
// allocated in the same arena, so the whole table is released in one step when the run
// ends. Registering a name validates it as a C identifier and fails with NameCollision
// when another instantiation already claimed it, naming both claimants. SessionStats
// counts what the run produced and renders as a short summary for the --stats flag.

//! Arena-backed generation session and symbol table.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;

use bumpalo::Bump;
use hashbrown::{DefaultHashBuilder, HashMap, HashSet};

use crate::catalog::{Category, GeneratedSymbol};
use crate::error::{GenError, GenResult};
use crate::naming::{is_c_identifier, Variant};

type ArenaMap<'arena, K, V> = HashMap<K, V, DefaultHashBuilder, &'arena Bump>;
type ArenaSet<'arena, K> = HashSet<K, DefaultHashBuilder, &'arena Bump>;

/// State of one generation run.
pub struct GenerationSession<'arena> {
    arena: &'arena Bump,

    /// Interned identifier text.
    strings: RefCell<ArenaSet<'arena, &'arena str>>,

    /// Every claimed identifier and a description of its owner.
    symbols: RefCell<ArenaMap<'arena, &'arena str, &'arena str>>,

    stats: RefCell<SessionStats>,
}

impl<'arena> GenerationSession<'arena> {
    pub fn new(arena: &'arena Bump) -> Self {
        Self {
            arena,
            strings: RefCell::new(HashSet::new_in(arena)),
            symbols: RefCell::new(HashMap::new_in(arena)),
            stats: RefCell::new(SessionStats::default()),
        }
    }

    /// Intern a string in the arena.
    pub fn intern_str(&self, s: &str) -> &'arena str {
        let mut strings = self.strings.borrow_mut();
        if let Some(&interned) = strings.get(s) {
            return interned;
        }
        let interned: &'arena str = self.arena.alloc_str(s);
        strings.insert(interned);
        interned
    }

    /// Claim `name` for `owner`.
    pub fn claim(&self, name: &str, owner: &str) -> GenResult<&'arena str> {
        if !is_c_identifier(name) {
            return Err(GenError::InvalidIdentifier {
                name: name.to_string(),
            });
        }
        let mut symbols = self.symbols.borrow_mut();
        if let Some(first) = symbols.get(name) {
            return Err(GenError::NameCollision {
                name: name.to_string(),
                first: (*first).to_string(),
                second: owner.to_string(),
            });
        }
        let name = self.intern_str(name);
        let owner = self.intern_str(owner);
        symbols.insert(name, owner);
        log::trace!("claimed {} for {}", name, owner);
        Ok(name)
    }

    /// Claim the name of a generated function.
    pub fn register_symbol(&self, category: Category, symbol: &GeneratedSymbol) -> GenResult<&'arena str> {
        let name = self.claim(&symbol.name, &symbol.key.to_string())?;
        let mut stats = self.stats.borrow_mut();
        stats.symbols += 1;
        if symbol.key.variant != Variant::Base {
            stats.derived_symbols += 1;
        }
        *stats.per_category.entry(category.describe()).or_insert(0) += 1;
        Ok(name)
    }

    /// Claim a macro or type name.
    pub fn register_macro(&self, name: &str, owner: &str) -> GenResult<&'arena str> {
        let name = self.claim(name, owner)?;
        self.stats.borrow_mut().macros += 1;
        Ok(name)
    }

    /// Owner description of a claimed name.
    pub fn owner_of(&self, name: &str) -> Option<&'arena str> {
        self.symbols.borrow().get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.borrow().is_empty()
    }

    pub fn record_section(&self, name: &str, bytes: usize) {
        let mut stats = self.stats.borrow_mut();
        stats.sections += 1;
        stats.artifact_bytes += bytes;
        log::debug!("section {}: {} bytes", name, bytes);
    }

    pub fn stats(&self) -> SessionStats {
        self.stats.borrow().clone()
    }
}

/// Generation statistics.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// Functions emitted, derived forms included.
    pub symbols: usize,

    /// Vector-scalar and scalar-vector forms among `symbols`.
    pub derived_symbols: usize,

    /// Macro, struct tag and type names claimed.
    pub macros: usize,

    pub sections: usize,

    /// Size of the finished artifact.
    pub artifact_bytes: usize,

    /// Function count per catalog category.
    pub per_category: BTreeMap<&'static str, usize>,
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generation Statistics:")?;
        writeln!(f, "  Functions emitted: {}", self.symbols)?;
        writeln!(f, "  Derived broadcast forms: {}", self.derived_symbols)?;
        writeln!(f, "  Macros and types: {}", self.macros)?;
        writeln!(f, "  Sections: {}", self.sections)?;
        writeln!(f, "  Artifact size: {} bytes", self.artifact_bytes)?;

        if !self.per_category.is_empty() {
            writeln!(f, "  Per category:")?;
            for (category, count) in &self.per_category {
                writeln!(f, "    {}: {}", category, count)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::taxonomy::{ScalarType, Shape, Width};

    #[test]
    fn test_string_interning() {
        let arena = Bump::new();
        let session = GenerationSession::new(&arena);

        let s1 = session.intern_str("rm_add_f32x3");
        let s2 = session.intern_str("rm_add_f32x3");
        let s3 = session.intern_str("rm_sub_f32x3");

        assert_eq!(s1.as_ptr(), s2.as_ptr());
        assert_ne!(s1.as_ptr(), s3.as_ptr());
    }

    #[test]
    fn test_collision_names_both_owners() {
        let arena = Bump::new();
        let session = GenerationSession::new(&arena);

        session.claim("rm_f32x3", "constructor f32x3").unwrap();
        let err = session.claim("rm_f32x3", "add[f32x3, base]").unwrap_err();
        match err {
            GenError::NameCollision { name, first, second } => {
                assert_eq!(name, "rm_f32x3");
                assert_eq!(first, "constructor f32x3");
                assert_eq!(second, "add[f32x3, base]");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_invalid_identifiers_rejected() {
        let arena = Bump::new();
        let session = GenerationSession::new(&arena);

        assert!(matches!(
            session.claim("3rm", "test"),
            Err(GenError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            session.claim("bool", "test"),
            Err(GenError::InvalidIdentifier { .. })
        ));
        assert!(session.is_empty());
    }

    #[test]
    fn test_session_statistics() {
        let arena = Bump::new();
        let session = GenerationSession::new(&arena);
        let catalog = Catalog::standard().unwrap();
        let sub = catalog.operation(Category::Arithmetic, "sub").unwrap();

        for symbol in sub.instantiate(ScalarType::F32, Shape::Vector(Width::Two)).unwrap() {
            session.register_symbol(Category::Arithmetic, &symbol).unwrap();
        }
        session.register_macro("rm_f32x2", "constructor f32x2").unwrap();
        session.record_section("arithmetic", 512);

        let stats = session.stats();
        assert_eq!(stats.symbols, 3);
        assert_eq!(stats.derived_symbols, 2);
        assert_eq!(stats.macros, 1);
        assert_eq!(stats.artifact_bytes, 512);
        assert_eq!(stats.per_category["arithmetic"], 3);
        assert_eq!(session.owner_of("rm_ssub_f32x2"), Some("sub[f32x2, scalar-vector]"));
    }

    #[test]
    fn test_statistics_display() {
        let arena = Bump::new();
        let session = GenerationSession::new(&arena);
        session.claim("rm_abs_f32", "abs[f32, base]").unwrap();
        session.record_section("scalar", 64);

        let output = format!("{}", session.stats());
        assert!(output.contains("Generation Statistics:"));
        assert!(output.contains("Sections: 1"));
        assert!(output.contains("Artifact size: 64 bytes"));
    }
}
