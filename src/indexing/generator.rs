//! Class map generation: walk, filter, scan, merge.
//!
//! Files are scanned in parallel and merged in enumeration order, so the
//! first file to declare a symbol always wins regardless of scheduling.

use rayon::prelude::*;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::error::{ClassMapError, ClassMapResult};
use crate::indexing::FileWalker;
use crate::parsing::SymbolScanner;
use crate::storage::CacheFile;
use crate::types::{Ambiguity, ClassMap, GeneratedMap, Insertion, SymbolName};

/// Builds class maps from files and directories.
#[derive(Debug, Clone)]
pub struct ClassMapGenerator {
    scanner: SymbolScanner,
    walker: FileWalker,
    blacklist: Option<Regex>,
    namespace: Option<String>,
    parallel: bool,
}

impl ClassMapGenerator {
    pub fn new(scanner: SymbolScanner) -> Self {
        Self {
            scanner,
            walker: FileWalker::new(),
            blacklist: None,
            namespace: None,
            parallel: true,
        }
    }

    /// Exclude files whose `/`-separated path matches `pattern`.
    pub fn with_blacklist(mut self, pattern: &str) -> ClassMapResult<Self> {
        let regex =
            Regex::new(pattern).map_err(|e| ClassMapError::invalid_pattern(pattern, e))?;
        self.blacklist = Some(regex);
        Ok(self)
    }

    /// Keep only symbols starting with `prefix`.
    pub fn with_namespace_filter(mut self, prefix: impl Into<String>) -> Self {
        self.namespace = Some(prefix.into());
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_walker(mut self, walker: FileWalker) -> Self {
        self.walker = walker;
        self
    }

    pub fn scanner(&self) -> &SymbolScanner {
        &self.scanner
    }

    /// Map a single file or every file under a directory.
    pub fn create_map(&self, path: &Path) -> ClassMapResult<GeneratedMap> {
        let files = self.walker.walk(path)?;
        self.aggregate(files)
    }

    /// Walk each root in order and merge everything into one map.
    pub fn aggregate_roots(&self, roots: &[PathBuf]) -> ClassMapResult<GeneratedMap> {
        let mut files = Vec::new();
        for root in roots {
            files.extend(self.walker.walk(root)?);
        }
        self.aggregate(files)
    }

    /// Scan a pre-enumerated set of files and merge the results.
    pub fn aggregate<I>(&self, files: I) -> ClassMapResult<GeneratedMap>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let candidates: Vec<PathBuf> = files
            .into_iter()
            .filter(|path| self.scanner.dialect().accepts(path))
            .collect();

        let scanned: Vec<ClassMapResult<Option<(PathBuf, Vec<SymbolName>)>>> = if self.parallel {
            candidates.par_iter().map(|p| self.scan_candidate(p)).collect()
        } else {
            candidates.iter().map(|p| self.scan_candidate(p)).collect()
        };

        let mut generated = GeneratedMap::default();
        for result in scanned {
            let Some((path, symbols)) = result? else {
                continue;
            };
            self.merge_symbols(&mut generated, &path, symbols);
        }

        tracing::info!(
            "[generator] {} symbols from {} candidate files ({} ambiguous)",
            generated.map.len(),
            candidates.len(),
            generated.ambiguities.len()
        );
        Ok(generated)
    }

    /// Aggregate `roots` and write the result to `cache`.
    pub fn dump_roots(&self, roots: &[PathBuf], cache: &CacheFile) -> ClassMapResult<GeneratedMap> {
        let generated = self.aggregate_roots(roots)?;
        cache.save(&generated.map)?;
        Ok(generated)
    }

    /// Resolve, filter and scan one candidate. `Ok(None)` when blacklisted.
    fn scan_candidate(&self, path: &Path) -> ClassMapResult<Option<(PathBuf, Vec<SymbolName>)>> {
        let real = path
            .canonicalize()
            .map_err(|e| ClassMapError::unreadable(path, &e))?;

        if let Some(blacklist) = &self.blacklist {
            let normalized = real.to_string_lossy().replace('\\', "/");
            if blacklist.is_match(&normalized) {
                tracing::trace!("[generator] blacklisted {}", real.display());
                return Ok(None);
            }
        }

        let symbols = self.scanner.scan_file(&real)?;
        Ok(Some((real, symbols)))
    }

    fn merge_symbols(&self, generated: &mut GeneratedMap, path: &Path, symbols: Vec<SymbolName>) {
        for symbol in symbols {
            if let Some(prefix) = &self.namespace {
                if !symbol.starts_with(prefix.as_str()) {
                    continue;
                }
            }

            if let Insertion::Ambiguous(ambiguity) =
                generated.map.insert(symbol, path.to_path_buf())
            {
                warn_ambiguous(&ambiguity);
                generated.ambiguities.push(ambiguity);
            }
        }
    }
}

fn warn_ambiguous(ambiguity: &Ambiguity) {
    tracing::warn!(
        "Ambiguous class resolution, \"{}\" was found in both \"{}\" and \"{}\", the first will be used.",
        ambiguity.symbol,
        ambiguity.kept.display(),
        ambiguity.ignored.display()
    );
}

/// Merge maps produced separately, first map first.
pub fn merge_maps(maps: impl IntoIterator<Item = ClassMap>) -> GeneratedMap {
    let mut generated = GeneratedMap::default();
    for map in maps {
        for ambiguity in generated.map.merge(map) {
            warn_ambiguous(&ambiguity);
            generated.ambiguities.push(ambiguity);
        }
    }
    generated
}
