//! Error types for the protots-core library.
//!
//! This module provides comprehensive error handling using the `thiserror` crate,
//! with detailed error variants for different failure modes.
//!
//! No variant is recoverable mid-run: the pipeline either translates the
//! entire descriptor set or fails the whole invocation. A partial declaration
//! set could silently compile against missing cross-file references.

use thiserror::Error;

/// Result type alias for protots operations
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error type for all protots operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The input byte stream could not be parsed into a code generator request
    #[error("failed to decode request: {0}")]
    RequestDecode(#[from] prost::DecodeError),

    /// The response message could not be serialized
    #[error("failed to encode response: {0}")]
    ResponseEncode(#[from] prost::EncodeError),

    /// Two distinct descriptors resolve to the same fully-qualified type path
    #[error("duplicate type path '{path}': defined in both '{first}' and '{second}'")]
    DuplicateTypePath {
        /// The contested fully-qualified path
        path: String,
        /// File that defined the path first
        first: String,
        /// File that attempted to redefine it
        second: String,
    },

    /// A field or method references a type path absent from the index
    #[error("'{referrer}' references unknown type '{path}'")]
    UnresolvedReference {
        /// The fully-qualified field or method holding the reference
        referrer: String,
        /// The fully-qualified path that failed to resolve
        path: String,
    },

    /// A descriptor shape the type mapper has no rule for
    #[error("'{referrer}' has unsupported shape: {details}")]
    UnsupportedShape {
        /// The fully-qualified field or method with the unsupported shape
        referrer: String,
        /// Description of the shape
        details: String,
    },

    /// A descriptor violates structural expectations (e.g. a map entry
    /// without key/value fields)
    #[error("malformed descriptor '{path}': {details}")]
    MalformedDescriptor {
        /// The fully-qualified path of the malformed descriptor
        path: String,
        /// Description of the structural problem
        details: String,
    },
}

impl Error {
    /// Creates a new duplicate type path error
    pub fn duplicate_type_path(
        path: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::DuplicateTypePath {
            path: path.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Creates a new unresolved reference error
    pub fn unresolved_reference(referrer: impl Into<String>, path: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            referrer: referrer.into(),
            path: path.into(),
        }
    }

    /// Creates a new unsupported shape error
    pub fn unsupported_shape(referrer: impl Into<String>, details: impl Into<String>) -> Self {
        Self::UnsupportedShape {
            referrer: referrer.into(),
            details: details.into(),
        }
    }

    /// Creates a new malformed descriptor error
    pub fn malformed_descriptor(path: impl Into<String>, details: impl Into<String>) -> Self {
        Self::MalformedDescriptor {
            path: path.into(),
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_type_path_display() {
        let err = Error::duplicate_type_path(".pkg.Foo", "a.proto", "b.proto");
        assert!(err.to_string().contains(".pkg.Foo"));
        assert!(err.to_string().contains("a.proto"));
        assert!(err.to_string().contains("b.proto"));
    }

    #[test]
    fn test_unresolved_reference_display() {
        let err = Error::unresolved_reference("pkg.Baz.foo", ".pkg.Foo");
        assert!(err.to_string().contains("pkg.Baz.foo"));
        assert!(err.to_string().contains(".pkg.Foo"));
    }

    #[test]
    fn test_unsupported_shape_display() {
        let err = Error::unsupported_shape("pkg.Foo.legacy", "group");
        assert!(err.to_string().contains("group"));
    }
}
