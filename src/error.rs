//! Error types for signature parsing, handle invocation and host definitions.
//!
//! A symbol that cannot be found is never an error: lookups return
//! `Ok(None)`. Everything in [`ReflectError`] is a failure the caller has to
//! deal with.

use thiserror::Error;

use crate::base::constants::MAX_ARRAY_DIMENSIONS;
use crate::host::Fault;

/// Boxed error raised by target code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ReflectError>;

/// Errors reported by the resolver.
#[derive(Debug, Error)]
pub enum ReflectError {
    /// The signature lacks an opening or closing parenthesis.
    #[error("Parenthesis '{parenthesis}' not found in signature `{signature}`")]
    MissingParenthesis {
        signature: String,
        parenthesis: char,
    },

    /// A method signature without a `.` between owner type and member name.
    #[error("Member name not found in method signature `{signature}`")]
    MissingMemberName { signature: String },

    /// A parameter token with more `[]` suffixes than supported.
    #[error(
        "The maximum array dimension is {max} (`{token}` has {dimensions})",
        max = MAX_ARRAY_DIMENSIONS
    )]
    ArrayDimension { token: String, dimensions: usize },

    /// A fixed-arity entry point called with the wrong number of arguments.
    #[error("Expected number of parameters is {expected} ({supplied} supplied)")]
    ArityMismatch { expected: usize, supplied: usize },

    /// The underlying platform call failed.
    #[error("Invocation error for {label}: {source}")]
    Invocation {
        label: String,
        #[source]
        source: Fault,
    },

    /// Failure raised by the invoked target itself, passed through untouched.
    #[error(transparent)]
    Target(BoxError),

    /// A registry already holds a type with this name.
    #[error("Type already defined: {name}")]
    DuplicateType { name: String },

    /// A name that cannot be defined as a type (empty, primitive or array).
    #[error("Invalid type name: `{name}`")]
    InvalidTypeName { name: String },

    /// A configuration value that could not be parsed.
    #[error("Invalid value for {key}: `{value}`")]
    InvalidConfig { key: &'static str, value: String },
}

impl ReflectError {
    /// Create a missing parenthesis error.
    pub fn missing_parenthesis(signature: impl Into<String>, parenthesis: char) -> Self {
        Self::MissingParenthesis {
            signature: signature.into(),
            parenthesis,
        }
    }

    /// Create a missing member name error.
    pub fn missing_member_name(signature: impl Into<String>) -> Self {
        Self::MissingMemberName {
            signature: signature.into(),
        }
    }

    /// Create an array dimension error.
    pub fn array_dimension(token: impl Into<String>, dimensions: usize) -> Self {
        Self::ArrayDimension {
            token: token.into(),
            dimensions,
        }
    }

    /// Map a platform fault to the error reported by a handle labelled `label`.
    ///
    /// Faults raised by the target's own logic are unwrapped; everything else
    /// is wrapped with the label attached.
    pub fn from_fault(label: impl Into<String>, fault: Fault) -> Self {
        match fault {
            Fault::Target(err) => Self::Target(err),
            other => Self::Invocation {
                label: label.into(),
                source: other,
            },
        }
    }

    /// True for errors caused by a malformed signature string.
    pub fn is_malformed_signature(&self) -> bool {
        matches!(
            self,
            Self::MissingParenthesis { .. }
                | Self::MissingMemberName { .. }
                | Self::ArrayDimension { .. }
        )
    }

    pub fn is_arity_mismatch(&self) -> bool {
        matches!(self, Self::ArityMismatch { .. })
    }
}
