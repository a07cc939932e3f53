//! Symbol resolver backed by a persisted class map and a namespace registry.
//!
//! Lookup order for a name:
//! 1. the resolution cache (seeded from the class-map file, no filesystem access)
//! 2. registered namespace prefixes, longest first, probing each base directory
//!
//! A successful namespace lookup is cached and handed to the source loader.

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::autoload::cache::{CacheState, CacheStatus, ResolutionCache};
use crate::autoload::chain::{ChainOptions, ResolverChain, SymbolResolver};
use crate::autoload::probe::{FileProbe, FsProbe, LoadOnce, NoopLoader, SourceLoader};
use crate::autoload::registry::{NamespaceEntry, NamespaceRegistry};
use crate::autoload::AutoloadResult;
use crate::parsing::Dialect;
use crate::storage::CacheFile;

pub struct AutoloaderBuilder {
    dialect: Dialect,
    cache_file: Option<CacheFile>,
    probe: Arc<dyn FileProbe>,
    loader: Arc<dyn SourceLoader>,
    namespaces: Vec<NamespaceEntry>,
}

impl Default for AutoloaderBuilder {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            cache_file: None,
            probe: Arc::new(FsProbe),
            loader: Arc::new(LoadOnce::new(NoopLoader)),
            namespaces: Vec::new(),
        }
    }
}

impl AutoloaderBuilder {
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn cache_file(mut self, cache_file: CacheFile) -> Self {
        self.cache_file = Some(cache_file);
        self
    }

    pub fn probe(mut self, probe: Arc<dyn FileProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn loader(mut self, loader: Arc<dyn SourceLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn namespaces(mut self, entries: impl IntoIterator<Item = NamespaceEntry>) -> Self {
        self.namespaces.extend(entries);
        self
    }

    /// Build the resolver, seeding its cache from the configured file.
    pub fn build(self) -> Autoloader {
        let mut cache = ResolutionCache::new();
        let cache_status = cache.initialize(self.cache_file.as_ref());

        let mut registry = NamespaceRegistry::new(self.dialect.separator);
        registry.register_batch(&self.namespaces);

        tracing::debug!(
            "[autoload] ready: cache {cache_status:?}, {} namespace prefix(es)",
            registry.len()
        );

        Autoloader {
            separator: self.dialect.separator,
            extension: self.dialect.primary_extension().to_string(),
            registry: RwLock::new(registry),
            cache: RwLock::new(cache),
            cache_status,
            probe: self.probe,
            loader: self.loader,
        }
    }
}

pub struct Autoloader {
    separator: char,
    extension: String,
    registry: RwLock<NamespaceRegistry>,
    cache: RwLock<ResolutionCache>,
    cache_status: CacheStatus,
    probe: Arc<dyn FileProbe>,
    loader: Arc<dyn SourceLoader>,
}

impl std::fmt::Debug for Autoloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Autoloader")
            .field("separator", &self.separator)
            .field("extension", &self.extension)
            .field("namespaces", &self.registry.read().len())
            .field("cached", &self.cache.read().len())
            .field("cache_status", &self.cache_status)
            .finish()
    }
}

impl Autoloader {
    pub fn builder() -> AutoloaderBuilder {
        AutoloaderBuilder::default()
    }

    pub fn register(&self, namespace: &str, directory: impl AsRef<Path>) {
        self.registry.write().register(namespace, directory);
    }

    pub fn register_batch<'a>(&self, entries: impl IntoIterator<Item = &'a NamespaceEntry>) {
        self.registry.write().register_batch(entries);
    }

    pub fn list_namespaces(&self) -> IndexMap<String, Vec<PathBuf>> {
        self.registry.read().list_namespaces().clone()
    }

    pub fn cache_status(&self) -> &CacheStatus {
        &self.cache_status
    }

    pub fn cache_state(&self) -> CacheState {
        self.cache.read().state()
    }

    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }

    /// Find the file defining `symbol`, loading it on success.
    pub fn resolve(&self, symbol: &str) -> AutoloadResult<Option<PathBuf>> {
        let canonical = symbol.trim_start_matches(self.separator);
        if canonical.is_empty() {
            return Ok(None);
        }

        let cached = self.cache.read().get(canonical).map(Path::to_path_buf);
        if let Some(path) = cached {
            tracing::trace!("[autoload] cache hit {canonical} -> {}", path.display());
            self.loader.load(canonical, &path)?;
            return Ok(Some(path));
        }

        let Some(path) = self.search_namespaces(canonical) else {
            tracing::trace!("[autoload] no file for {canonical}");
            return Ok(None);
        };

        self.cache
            .write()
            .insert(canonical.to_string(), path.clone());
        self.loader.load(canonical, &path)?;
        Ok(Some(path))
    }

    fn search_namespaces(&self, canonical: &str) -> Option<PathBuf> {
        let sep = self.separator;
        let sep_len = sep.len_utf8();
        let qualified = if canonical.contains(sep) {
            canonical.to_string()
        } else {
            format!("{sep}{canonical}")
        };

        let mut end = qualified.len();
        while let Some(pos) = qualified[..end].rfind(sep) {
            let prefix = &qualified[..pos + sep_len];
            let relative = &qualified[pos + sep_len..];

            // Copied out so existence checks run without the registry lock.
            let directories = self
                .registry
                .read()
                .directories(prefix)
                .map(<[PathBuf]>::to_vec);
            if let Some(directories) = directories {
                let file_name = format!("{}.{}", relative.replace(sep, "/"), self.extension);
                for directory in directories {
                    let candidate = directory.join(&file_name);
                    if self.probe.is_file(&candidate) {
                        tracing::debug!(
                            "[autoload] {canonical} -> {} via {prefix}",
                            candidate.display()
                        );
                        return Some(candidate);
                    }
                }
            }

            end = pos;
        }
        None
    }

    /// Install this resolver in `chain`. Returns `false` if already installed.
    pub fn activate(self: &Arc<Self>, chain: &mut ResolverChain, options: ChainOptions) -> bool {
        let resolver: Arc<dyn SymbolResolver> = self.clone();
        chain.register(resolver, options)
    }

    /// Remove this resolver from `chain`. Returns `false` if it was not installed.
    pub fn deactivate(self: &Arc<Self>, chain: &mut ResolverChain) -> bool {
        let resolver: Arc<dyn SymbolResolver> = self.clone();
        chain.unregister(&resolver)
    }
}

impl SymbolResolver for Autoloader {
    fn name(&self) -> &str {
        "classmap"
    }

    fn resolve(&self, symbol: &str) -> AutoloadResult<Option<PathBuf>> {
        Autoloader::resolve(self, symbol)
    }
}
