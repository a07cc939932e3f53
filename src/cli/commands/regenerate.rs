//! Regenerate command: scan roots, merge, dump the cache file.

use anyhow::Context;
use std::path::PathBuf;

use crate::config::Settings;
use crate::indexing::ClassMapGenerator;
use crate::parsing::SymbolScanner;
use crate::storage::CacheFile;
use crate::types::GeneratedMap;

/// Command-line overrides for `[scan]`.
#[derive(Debug, Default, Clone)]
pub struct RegenerateOptions {
    pub paths: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub blacklist: Option<String>,
    pub namespace: Option<String>,
    pub sequential: bool,
}

/// Build the generator described by `settings` and `options`.
pub fn build_generator(
    settings: &Settings,
    options: &RegenerateOptions,
) -> anyhow::Result<ClassMapGenerator> {
    let scanner = SymbolScanner::new(settings.dialect.clone())?;
    let mut generator = ClassMapGenerator::new(scanner)
        .with_parallel(settings.scan.parallel && !options.sequential);

    if let Some(pattern) = options.blacklist.as_ref().or(settings.scan.blacklist.as_ref()) {
        generator = generator.with_blacklist(pattern)?;
    }
    if let Some(prefix) = options
        .namespace
        .as_ref()
        .or(settings.scan.namespace_filter.as_ref())
    {
        generator = generator.with_namespace_filter(prefix.clone());
    }
    Ok(generator)
}

pub fn run_regenerate(
    settings: &Settings,
    options: &RegenerateOptions,
) -> anyhow::Result<(CacheFile, GeneratedMap)> {
    let generator = build_generator(settings, options)?;

    let roots: Vec<PathBuf> = if options.paths.is_empty() {
        settings
            .scan
            .roots
            .iter()
            .map(|root| settings.resolve_path(root))
            .collect()
    } else {
        options.paths.clone()
    };
    let cache = CacheFile::new(
        options
            .output
            .clone()
            .unwrap_or_else(|| settings.resolve_path(&settings.scan.cache_file)),
    );

    tracing::info!(
        "[regenerate] scanning {} root(s) into {}",
        roots.len(),
        cache.path().display()
    );

    let generated = generator
        .dump_roots(&roots, &cache)
        .with_context(|| format!("Could not generate {}", cache.path().display()))?;
    Ok((cache, generated))
}
