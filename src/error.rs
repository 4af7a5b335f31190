// This module defines the error types for ranmath-gen using the thiserror crate for
// idiomatic Rust error handling. GenError is the main error enum covering every way a
// generation run can abort: two combinations rendering the same symbol name, a body
// template referencing a substitution that is not available for the instantiated
// type and shape, malformed or unknown template placeholders, an operation that
// applies to a type but carries no body for it, and names that are not valid C
// identifiers. The I/O variants only occur in the final write of a finished artifact.
// GenResult<T> is the convenience alias used throughout the crate.

//! Error types for the header generator.
//!
//! Every variant except the I/O ones is raised before a single byte of the
//! artifact reaches its destination.

use thiserror::Error;

/// Main error type for a generation run.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("Symbol name collision: `{name}` produced by both {first} and {second}")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    #[error("Unresolved placeholder `{placeholder}` in `{op}` for `{shape}`")]
    UnresolvedPlaceholder {
        placeholder: String,
        op: String,
        shape: String,
    },

    #[error("Unknown placeholder `{name}` in template of `{op}`")]
    UnknownPlaceholder { name: String, op: String },

    #[error("Malformed template for `{op}`: {reason}")]
    MalformedTemplate { op: String, reason: String },

    #[error("Operation `{op}` applies to `{ty}` but has no body for it")]
    MissingBody { op: String, ty: String },

    #[error("Not a valid C identifier: `{name}`")]
    InvalidIdentifier { name: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to persist artifact: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Result type alias for generation operations.
pub type GenResult<T> = Result<T, GenError>;
