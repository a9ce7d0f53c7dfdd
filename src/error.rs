//! Error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KernelError {
    /// The cleaned payload root was not a mapping.
    #[error("canonical root must be a mapping, found {found}")]
    NonMappingRoot { found: &'static str },
    /// A scalar could not be rendered as JSON text.
    #[error("JSON encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
    /// The dedicated verification pool could not be built.
    #[error("failed to build verification thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// The block source could not deliver the raw records.
    #[error("failed to retrieve block records: {0}")]
    Retrieval(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type KernelResult<T> = core::result::Result<T, KernelError>;
