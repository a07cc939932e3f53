pub mod autoload;
pub mod cli;
pub mod config;
pub mod error;
pub mod indexing;
pub mod logging;
pub mod parsing;
pub mod storage;
pub mod types;

pub use autoload::{
    AutoloadError, Autoloader, CacheStatus, ChainOptions, NamespaceEntry, NamespaceRegistry,
    ResolverChain, SymbolResolver,
};
pub use config::Settings;
pub use error::{ClassMapError, ClassMapResult};
pub use indexing::{ClassMapGenerator, FileWalker, merge_maps};
pub use parsing::{Dialect, SymbolScanner};
pub use storage::{CacheFile, StorageError};
pub use types::{Ambiguity, ClassMap, GeneratedMap, SymbolName};
