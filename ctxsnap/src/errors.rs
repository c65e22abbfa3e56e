use std::path::PathBuf;
use std::thread::ThreadId;

use thiserror::Error;

use crate::id::ObjectId;
use crate::value::AttributeKind;

/// Error returned by the checked snapshot constructors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The context was touched from a thread other than the one that owns it.
    #[error("persistence context is owned by thread {owner:?} but was snapshotted from {current:?}")]
    ForeignExecutionContext { owner: ThreadId, current: ThreadId },
}

/// Errors raised by the in-memory managed object context.
#[derive(Debug, Error)]
pub enum ContextError {
    /// No object with this id is tracked by the context.
    #[error("object {object_id} not found")]
    ObjectNotFound { object_id: ObjectId },

    /// The object is pending deletion and can no longer be modified.
    #[error("object {object_id} is pending deletion")]
    ObjectDeleted { object_id: ObjectId },

    /// An update supplied a value of a different entity than the tracked object.
    #[error("entity mismatch (expected {expected}, found {found})")]
    EntityMismatch { expected: String, found: String },

    /// The attribute is not declared by the entity's descriptor.
    #[error("entity '{entity}' has no attribute '{attribute}'")]
    UnknownAttribute { entity: String, attribute: String },

    /// The value's kind does not match the declared attribute kind.
    #[error("attribute '{entity}.{attribute}' expects {expected}, found {found}")]
    AttributeKindMismatch {
        entity: String,
        attribute: String,
        expected: AttributeKind,
        found: AttributeKind,
    },

    /// A required attribute was absent or null.
    #[error("attribute '{entity}.{attribute}' is required")]
    MissingAttribute { entity: String, attribute: String },
}

/// Errors raised while loading or compiling snapshot configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An ignored-attribute pattern is not a valid regular expression.
    #[error("invalid attribute pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type ContextResult<T> = Result<T, ContextError>;
