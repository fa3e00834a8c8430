// File: src/error.rs
use thiserror::Error;

/// Crate-wide error taxonomy.
///
/// None of these are process-fatal: the worst outcome anywhere in the
/// dictionary layer is a stale or empty suggestion result.
#[derive(Error, Debug)]
pub enum DictError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] bincode::Error),

    #[error("word list parse error: {0}")]
    WordList(#[from] serde_json::Error),

    /// The configured binary-dictionary writer cannot produce the requested
    /// format version. Permanent for the current configuration; not retried.
    #[error("unsupported dictionary format version: {0}")]
    UnsupportedFormat(u32),

    #[error("reload of '{dict_type}' dictionary failed: {reason}")]
    Reload { dict_type: String, reason: String },

    #[error("traversal session error: {0}")]
    Session(String),

    /// One or more members of an aggregate failed to close. Raised only
    /// after every member's close was attempted.
    #[error("{failed} of {total} dictionary members failed to close")]
    CloseFanout { failed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, DictError>;
