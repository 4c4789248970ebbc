//! Error taxonomy.
//!
//! All failures are local and synchronous: this is a build-time tool, so the
//! policy is stop-and-report with every violation enumerated, never silent
//! degradation.

use thiserror::Error;

use crate::expression::ExpressionError;

/// Library-wide result alias.
pub type Result<T> = std::result::Result<T, OntoforgeError>;

/// Everything that can go wrong between loading a document and saving the
/// materialized world.
#[derive(Debug, Error)]
pub enum OntoforgeError {
    /// The document declares a version newer than this crate supports.
    /// Fatal before any entity is created.
    #[error("document version {found} is newer than the supported {supported}")]
    VersionTooNew {
        /// Version declared by the document.
        found: String,
        /// Highest version this crate accepts.
        supported: String,
    },

    /// A prefix was used with no IRI mapping. Fatal at load time.
    #[error("no IRI registered for prefix `{0}`")]
    PrefixResolution(String),

    /// Names referenced but never defined, reported as one diagnostic by the
    /// terminal consistency gate.
    #[error("missing definitions for: {}", .0.join(", "))]
    MissingEntities(Vec<String>),

    /// A value failed the declared range of its property.
    #[error("value `{value}` violates the declared range of `{property}`")]
    RestrictionViolation {
        /// Property whose range was violated.
        property: String,
        /// Offending value, rendered for the diagnostic.
        value: String,
    },

    /// The materialized form of a never-actualized entity was requested.
    /// A programmer error, always fatal.
    #[error("entity `{0}` has not been actualized")]
    NotActualized(String),

    /// An unintended cycle in the reference graph. The inverse-property
    /// 2-cycle is handled as a named exception and never reaches this.
    #[error("cyclic reference while actualizing `{0}`")]
    CyclicReference(String),

    /// A name that should have been `prefix:local` but was not.
    #[error("`{0}` is not a qualified name")]
    InvalidName(String),

    /// The class-expression subsystem could not reduce an expression.
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    /// The document's declared version is not a semantic version.
    #[error("invalid version string: {0}")]
    Version(#[from] semver::Error),

    /// The document could not be deserialized.
    #[error("malformed document: {0}")]
    Document(#[from] serde_yaml::Error),

    /// A boundary I/O operation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
