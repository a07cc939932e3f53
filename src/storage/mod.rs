pub mod cache_file;
pub mod error;

pub use cache_file::{CacheFile, dump};
pub use error::{StorageError, StorageResult};
