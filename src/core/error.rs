//! Error types shared by the registry, stores and table codecs

use thiserror::Error;

/// Result alias for registry operations
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Everything that can go wrong while recording or reading metadata shards.
///
/// Nothing here is recovered locally: every variant propagates to the caller,
/// which retries at the granularity of a whole caching pass or retrieval.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Object store I/O failure on read, write or list
    #[error("object store I/O failed for {key}: {source}")]
    Store {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The requested object does not exist
    #[error("object not found: {key}")]
    NotFound { key: String },

    /// Table header does not match the entry's declared columns
    #[error("schema mismatch in {file}: expected columns {expected:?}, found {found:?}")]
    Schema {
        file: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// A row could not be decoded into an entry
    #[error("failed to decode {file} at line {line}: {message}")]
    Decode {
        file: String,
        line: u64,
        message: String,
    },

    /// Entries could not be serialized into a table
    #[error("failed to encode metadata table: {message}")]
    Encode { message: String },

    /// Field extraction asked for an attribute entries do not declare
    #[error("unknown metadata field: {field}")]
    UnknownField { field: String },

    /// A root location could not be split into bucket and prefix
    #[error("invalid object store uri {uri:?}: {reason}")]
    InvalidUri { uri: String, reason: String },
}

impl MetadataError {
    pub fn store(key: impl Into<String>, source: std::io::Error) -> Self {
        let key = key.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            MetadataError::NotFound { key }
        } else {
            MetadataError::Store { key, source }
        }
    }
}
