//! Run-time symbol resolution: namespace registry, resolution cache and
//! the resolver chain an `Autoloader` plugs into.

pub mod autoloader;
pub mod cache;
pub mod chain;
pub mod composer;
pub mod error;
pub mod probe;
pub mod registry;

pub use autoloader::{Autoloader, AutoloaderBuilder};
pub use cache::{CacheState, CacheStatus, ResolutionCache};
pub use chain::{ChainOptions, Resolution, ResolverChain, SymbolResolver};
pub use composer::composer_entries;
pub use error::{AutoloadError, AutoloadResult};
pub use probe::{FileProbe, FsProbe, LoadOnce, NoopLoader, SourceLoader};
pub use registry::{NamespaceEntry, NamespaceRegistry, read_entries};
