// This module implements the emission pipeline that turns the catalog, the taxonomy and the
// detection tree into the finished header. generate walks a fixed section order (banner,
// include guard, detection, primitives, overlays, shapes, constructors, constants,
// then the scalar, boolean, arithmetic and matrix operation bodies) and inside each
// operation section walks types in taxonomy order, shapes in shape order and operations
// in catalog order, with derived broadcast forms right after their base. Bool vectors
// are declared for any non-empty taxonomy since every comparison returns one. Every
// macro, struct tag, type and function name, the detection macros included, is claimed
// in the run's GenerationSession as it is produced, so a collision aborts the run. The whole header is built in memory first; only a
// complete artifact is ever handed to a sink, and write_artifact replaces its target
// through a temporary file so a failed write never leaves a partial header behind.

//! Header emission pipeline.

pub mod macros;

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use bumpalo::Bump;

use crate::catalog::{Catalog, Category};
use crate::config::GeneratorConfig;
use crate::detect::{self, FeatureGuard};
use crate::error::GenResult;
use crate::layout::{overlay, shapes};
use crate::session::{GenerationSession, SessionStats};
use crate::taxonomy::{scalar_types, Taxonomy};

use macros::MacroDef;

pub const SECTION_DETECTION: &str = "detection";
pub const SECTION_PRIMITIVES: &str = "primitives";
pub const SECTION_OVERLAYS: &str = "overlays";
pub const SECTION_SHAPES: &str = "shapes";
pub const SECTION_CONSTRUCTORS: &str = "constructors";
pub const SECTION_CONSTANTS: &str = "constants";

/// Section titles in emission order.
pub fn section_order() -> Vec<&'static str> {
    let mut order = vec![
        SECTION_DETECTION,
        SECTION_PRIMITIVES,
        SECTION_OVERLAYS,
        SECTION_SHAPES,
        SECTION_CONSTRUCTORS,
        SECTION_CONSTANTS,
    ];
    order.extend(Category::ALL.iter().map(|c| c.describe()));
    order
}

/// Comment line that opens a section.
pub fn section_banner(title: &str) -> String {
    format!("/* ==== {} ==== */", title)
}

/// A finished header.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub text: String,
    pub stats: SessionStats,
}

struct Emitter<'s, 'arena> {
    session: &'s GenerationSession<'arena>,
    config: &'s GeneratorConfig,
    out: String,
}

impl<'s, 'arena> Emitter<'s, 'arena> {
    fn section(&mut self, title: &str, body: &str) {
        log::info!("emitting {}", title);
        let _ = writeln!(self.out, "{}\n", section_banner(title));
        self.out.push_str(body);
        self.out.push('\n');
        self.session.record_section(title, body.len());
    }

    /// Claim and render `defs`, one per line.
    fn macro_block(&self, defs: &[MacroDef], owner: &str) -> GenResult<String> {
        let mut body = String::new();
        for def in defs {
            self.session.register_macro(&def.name, owner)?;
            let _ = writeln!(body, "{}", def);
        }
        Ok(body)
    }

    fn primitives(&mut self) -> GenResult<()> {
        for ty in scalar_types() {
            if ty.c_type().is_some() {
                self.session.register_macro(ty.token(), "primitive type")?;
            }
        }
        self.session.register_macro("usize", "primitive type")?;
        self.session.register_macro(&self.config.inline_macro, "inline specifier")?;

        let mut body = macros::render_primitives();
        body.push('\n');
        body.push_str(&macros::render_inline(&self.config.inline_macro));
        self.section(SECTION_PRIMITIVES, &body);
        Ok(())
    }

    fn detection(&mut self, detection: &[FeatureGuard]) -> GenResult<()> {
        for name in detect::defined_names(detection) {
            self.session.register_macro(name, "detection macro")?;
        }
        self.section(SECTION_DETECTION, &detect::render(detection));
        Ok(())
    }

    fn overlays(&mut self) -> GenResult<()> {
        for name in overlay::overlay_names() {
            self.session.register_macro(&name, "overlay type")?;
        }
        for name in overlay::bitcast_names() {
            self.session.register_macro(&name, "bit-cast macro")?;
        }
        let mut body = overlay::render_typedefs();
        body.push('\n');
        for float in overlay::OVERLAY_TYPES {
            body.push_str(&overlay::render_overlay(float));
            body.push('\n');
        }
        body.push_str(&overlay::render_bitcasts());
        self.section(SECTION_OVERLAYS, &body);
        Ok(())
    }

    fn shapes(&mut self, taxonomy: &Taxonomy) -> GenResult<()> {
        for (ty, shape) in taxonomy.declared_shapes() {
            self.session.register_macro(&shapes::struct_name(ty, shape), "shape struct")?;
            self.session.register_macro(&shape.token(ty), "shape type")?;
        }
        let mut body = shapes::render_typedefs(taxonomy);
        body.push('\n');
        body.push_str(&shapes::render_structs(taxonomy));
        self.section(SECTION_SHAPES, &body);
        Ok(())
    }

    fn constructors(&mut self, taxonomy: &Taxonomy) -> GenResult<()> {
        let body = self.macro_block(&macros::constructors(taxonomy), "constructor")?;
        self.section(SECTION_CONSTRUCTORS, &body);
        Ok(())
    }

    fn constants(&mut self) -> GenResult<()> {
        let mut body = self.macro_block(&macros::constants(), "constant")?;
        body.push('\n');
        body.push_str(&self.macro_block(&macros::utilities(), "utility macro")?);
        self.section(SECTION_CONSTANTS, &body);
        Ok(())
    }

    fn operations(&mut self, catalog: &Catalog, taxonomy: &Taxonomy, category: Category) -> GenResult<()> {
        let mut body = String::new();
        let mut count = 0usize;
        for (ty, shape) in taxonomy.combinations() {
            for op in catalog.operations_for(category, ty, shape) {
                for symbol in op.instantiate(ty, shape)? {
                    self.session.register_symbol(category, &symbol)?;
                    log::trace!("{} -> {}", symbol.key, symbol.name);
                    body.push_str(&symbol.render(&self.config.inline_macro));
                    body.push('\n');
                    count += 1;
                }
            }
        }
        log::debug!("{}: {} functions", category.describe(), count);
        self.section(category.describe(), &body);
        Ok(())
    }
}

/// Build the complete header in memory.
pub fn generate(
    catalog: &Catalog,
    taxonomy: &Taxonomy,
    detection: &[FeatureGuard],
    config: &GeneratorConfig,
) -> GenResult<Artifact> {
    config.validate()?;

    let arena = Bump::new();
    let session = GenerationSession::new(&arena);
    let guard = &config.include_guard;
    session.register_macro(guard, "include guard")?;

    let mut emitter = Emitter {
        session: &session,
        config,
        out: String::new(),
    };

    emitter.out.push_str(&config.banner());
    let _ = write!(emitter.out, "\n#ifndef {guard}\n#define {guard}\n\n", guard = guard);

    emitter.detection(detection)?;
    emitter.primitives()?;
    emitter.overlays()?;
    emitter.shapes(taxonomy)?;
    emitter.constructors(taxonomy)?;
    emitter.constants()?;
    for category in Category::ALL {
        emitter.operations(catalog, taxonomy, category)?;
    }

    let _ = writeln!(emitter.out, "#endif /* {} */", guard);

    let text = emitter.out;
    let mut stats = session.stats();
    stats.artifact_bytes = text.len();
    log::info!(
        "generated {} functions ({} derived), {} bytes",
        stats.symbols,
        stats.derived_symbols,
        stats.artifact_bytes
    );
    Ok(Artifact { text, stats })
}

/// Generate the header and write it to `sink` in one piece.
pub fn emit_to<W: Write>(
    catalog: &Catalog,
    taxonomy: &Taxonomy,
    detection: &[FeatureGuard],
    config: &GeneratorConfig,
    mut sink: W,
) -> GenResult<SessionStats> {
    let artifact = generate(catalog, taxonomy, detection, config)?;
    sink.write_all(artifact.text.as_bytes())?;
    sink.flush()?;
    Ok(artifact.stats)
}

/// Replace `path` with `artifact`, through a temporary file in the same directory.
pub fn write_artifact(artifact: &Artifact, path: &Path) -> GenResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(artifact.text.as_bytes())?;
    file.flush()?;
    file.persist(path)?;
    log::info!("wrote {}", path.display());
    Ok(())
}
