pub mod error;
pub mod query;
pub mod file;
pub mod memory;
pub mod fixtures;

pub use error::{StoreError, Result};
pub use file::JsonFileSource;
pub use memory::MemorySource;
pub use query::ProvenanceStore;
