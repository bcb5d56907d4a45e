//! Error taxonomy for schema and entity operations.

/// All errors raised by entity construction, mutation, traversal, and value
/// conversion.
///
/// Every variant is a synchronous programmer/input error: an operation either
/// fully succeeds or fails immediately with one of these. There is no retry
/// and no partial rollback. Constraint failures are deliberately absent --
/// they are data, returned as
/// [`ConstraintViolation`](crate::validate::ConstraintViolation) lists by
/// `validate()`, never as errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A `set`/`get` or path expression referenced a name the schema does
    /// not declare.
    #[error("unknown attribute '{name}' on schema '{schema}'")]
    UnknownAttribute { schema: String, name: String },

    /// A supplied or requested value kind cannot be reconciled with the
    /// declared kind, and no conversion exists.
    #[error("type mismatch for '{attribute}': expected {expected}, got {got}")]
    TypeMismatch {
        attribute: String,
        expected: String,
        got: String,
    },

    /// `add` was called on an attribute that is not `List`-kind.
    #[error("attribute '{attribute}' is not a list")]
    NotAList { attribute: String },

    /// A path expression could not be parsed or resolved.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// The conversion registry has no entry for the requested kind pair.
    #[error("no conversion from {from} to {to}")]
    UnsupportedConversion { from: String, to: String },

    /// A related schema name could not be resolved.
    ///
    /// Raised by the external schema resolver during map application and
    /// propagated unmodified by this crate.
    #[error("related schema '{name}' could not be resolved")]
    MissingRelatedSchema { name: String },
}

impl ModelError {
    /// Fill in the attribute name on a `TypeMismatch` produced below the
    /// attribute level (value accessors, converters). Other variants pass
    /// through untouched.
    pub(crate) fn for_attribute(self, name: &str) -> ModelError {
        match self {
            ModelError::TypeMismatch {
                attribute,
                expected,
                got,
            } if attribute.is_empty() => ModelError::TypeMismatch {
                attribute: name.to_string(),
                expected,
                got,
            },
            other => other,
        }
    }
}
