//! ranmath-gen - Portable C math header generator.
//!
//! Expands a declarative catalog of numeric operations over scalar types,
//! vector widths and matrix shapes into one self-contained C11 header,
//! `ranmath.h`. The output is a deterministic function of the catalog, the
//! taxonomy, the detection tree and the configuration.
//!
//! # Primary Usage
//!
//! ```ignore
//! use ranmath_gen::{catalog::Catalog, config::GeneratorConfig, detect, emit, taxonomy::Taxonomy};
//!
//! let catalog = Catalog::standard()?;
//! let artifact = emit::generate(
//!     &catalog,
//!     &Taxonomy::standard(),
//!     &detect::detection_tree(),
//!     &GeneratorConfig::default(),
//! )?;
//! emit::write_artifact(&artifact, "ranmath.h".as_ref())?;
//! ```
//!
//! # Architecture
//!
//! - [`taxonomy`] - Scalar types, shapes and type classes
//! - [`naming`] - Canonical symbol names and signatures
//! - [`detect`] - Platform, architecture, byte order and SIMD detection
//! - [`layout`] - Overlays and vector/matrix struct layouts
//! - [`template`] - Body template language
//! - [`catalog`] - Operation tables and instantiation
//! - [`emit`] - Emission pipeline and support macros
//! - [`session`] - Per-run arena and symbol table

pub mod catalog;
pub mod detect;
pub mod emit;
pub mod layout;
pub mod naming;
pub mod session;
pub mod taxonomy;
pub mod template;

// Support modules
pub mod check;
pub mod config;
pub mod error;

pub use catalog::Catalog;
pub use config::GeneratorConfig;
pub use emit::{generate, write_artifact, Artifact};
pub use error::{GenError, GenResult};
pub use session::{GenerationSession, SessionStats};
pub use taxonomy::Taxonomy;
