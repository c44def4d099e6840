//! Error types of registration and archiving.

use alloc::string::String;
use core::fmt;

use thiserror::Error;

use crate::tag::TypeTag;

/// A reference to a type that is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnregisteredRef {
    /// A binary tag, or the tag reported by an object being written.
    Tag(TypeTag),
    /// A type path read from a text archive.
    Path(String),
}

impl fmt::Display for UnregisteredRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => write!(f, "tag `{tag}`"),
            Self::Path(path) => write!(f, "type path `{path}`"),
        }
    }
}

/// An error occurring while registering a type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegisterError {
    /// A different type already owns the tag or the type path.
    #[error("`{incoming}` collides with registered type `{existing}` on tag `{tag}`")]
    DuplicateTagCollision {
        tag: TypeTag,
        existing: &'static str,
        incoming: &'static str,
    },
    /// The type must be registered before this operation.
    #[error("type `{type_path}` is not registered")]
    NotRegistered { type_path: &'static str },
    /// The field list of the type is malformed.
    #[error("invalid schema of `{type_path}`: {reason}")]
    InvalidSchema {
        type_path: &'static str,
        reason: String,
    },
}

/// An error occurring while writing or reading an archive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArchiveError {
    /// The archive or the object refers to a type missing from the registry.
    #[error("unregistered type: {0}")]
    UnregisteredType(UnregisteredRef),
    /// The archived object is not of the requested family.
    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// The bytes are malformed, truncated or inconsistent with the schema.
    #[error("codec error at `{field}`: {message}")]
    Codec { field: String, message: String },
    /// Object nesting went deeper than the configured limit.
    #[error("nesting depth exceeded the limit of {limit}")]
    DepthExceeded { limit: usize },
    /// The archived version of a type differs from the registered one.
    #[error("version mismatch of `{type_path}`: expected {expected}, found {found}")]
    VersionMismatch {
        type_path: &'static str,
        expected: u32,
        found: u32,
    },
}

impl ArchiveError {
    /// Creates a codec error that is not tied to a field.
    pub(crate) fn codec_at_root(message: impl fmt::Display) -> Self {
        use alloc::string::ToString;

        Self::Codec {
            field: String::from("<root>"),
            message: message.to_string(),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};

    use super::{ArchiveError, RegisterError, UnregisteredRef};
    use crate::tag::TypeTag;

    #[test]
    fn messages() {
        let err = ArchiveError::UnregisteredType(UnregisteredRef::Path(String::from("zoo::Dog")));
        assert_eq!(err.to_string(), "unregistered type: type path `zoo::Dog`");

        let err = ArchiveError::UnregisteredType(UnregisteredRef::Tag(TypeTag::new(1)));
        assert_eq!(err.to_string(), "unregistered type: tag `0000000000000001`");

        let err = RegisterError::DuplicateTagCollision {
            tag: TypeTag::new(2),
            existing: "zoo::Dog",
            incoming: "zoo::Cat",
        };
        assert_eq!(
            err.to_string(),
            "`zoo::Cat` collides with registered type `zoo::Dog` on tag `0000000000000002`"
        );
    }

    #[test]
    fn root_codec() {
        let err = ArchiveError::codec_at_root("unexpected end");
        assert_eq!(err.to_string(), "codec error at `<root>`: unexpected end");
    }
}
