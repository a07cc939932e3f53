//! Resolve and Namespaces commands.

use anyhow::Context;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::autoload::{Autoloader, NamespaceEntry, composer_entries, read_entries};
use crate::config::Settings;
use crate::storage::CacheFile;

/// Extra namespace sources given on the command line.
#[derive(Debug, Default, Clone)]
pub struct NamespaceSources {
    pub composer: Option<PathBuf>,
    pub namespaces: Option<PathBuf>,
}

/// Configured entries first, then composer.json, then the JSON file.
pub fn collect_entries(
    settings: &Settings,
    sources: &NamespaceSources,
) -> anyhow::Result<Vec<NamespaceEntry>> {
    let mut entries: Vec<NamespaceEntry> = settings
        .namespaces
        .iter()
        .map(|entry| NamespaceEntry::new(entry.namespace.clone(), settings.resolve_path(&entry.path)))
        .collect();

    if let Some(composer) = &sources.composer {
        entries.extend(composer_entries(composer)?);
    }
    if let Some(file) = &sources.namespaces {
        entries.extend(read_entries(file)?);
    }
    Ok(entries)
}

pub fn build_autoloader(
    settings: &Settings,
    sources: &NamespaceSources,
) -> anyhow::Result<Autoloader> {
    let entries = collect_entries(settings, sources)?;
    let cache = CacheFile::new(settings.resolve_path(&settings.scan.cache_file));

    Ok(Autoloader::builder()
        .dialect(settings.dialect.clone())
        .cache_file(cache)
        .namespaces(entries)
        .build())
}

#[derive(Debug, Serialize)]
struct ResolveOutput<'a> {
    symbol: &'a str,
    path: Option<&'a Path>,
}

/// Print the file for `name`. Returns whether it was found.
pub fn run_resolve(
    settings: &Settings,
    sources: &NamespaceSources,
    name: &str,
    json: bool,
) -> anyhow::Result<bool> {
    let autoloader = build_autoloader(settings, sources)?;
    let found = autoloader
        .resolve(name)
        .with_context(|| format!("Could not resolve '{name}'"))?;

    if json {
        let output = ResolveOutput {
            symbol: name,
            path: found.as_deref(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        match &found {
            Some(path) => println!("{}", path.display()),
            None => eprintln!("'{name}' not found"),
        }
    }
    Ok(found.is_some())
}

pub fn run_namespaces(settings: &Settings, sources: &NamespaceSources) -> anyhow::Result<()> {
    let autoloader = build_autoloader(settings, sources)?;
    let namespaces = autoloader.list_namespaces();

    if namespaces.is_empty() {
        println!("No namespaces registered.");
        return Ok(());
    }

    for (prefix, directories) in &namespaces {
        println!("{prefix}");
        for directory in directories {
            println!("  {}", directory.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collect_entries_orders_sources() {
        let temp_dir = TempDir::new().unwrap();
        let composer = temp_dir.path().join("composer.json");
        fs::write(&composer, r#"{"autoload": {"psr-4": {"Vendor\\": "vendor/src"}}}"#).unwrap();
        let json = temp_dir.path().join("namespaces.json");
        fs::write(&json, r#"[{"namespace": "Extra", "path": "/extra"}]"#).unwrap();

        let mut settings = Settings {
            workspace_root: Some(temp_dir.path().to_path_buf()),
            ..Settings::default()
        };
        settings.namespaces.push(NamespaceEntry::new("App", "src"));

        let entries = collect_entries(
            &settings,
            &NamespaceSources {
                composer: Some(composer),
                namespaces: Some(json),
            },
        )
        .unwrap();

        let prefixes: Vec<_> = entries.iter().map(|e| e.namespace.as_str()).collect();
        assert_eq!(prefixes, vec!["App", "Vendor\\", "Extra"]);
        assert_eq!(entries[0].path, temp_dir.path().join("src"));
    }

    #[test]
    fn test_resolve_through_configured_namespace() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("src/Sub")).unwrap();
        fs::write(temp_dir.path().join("src/Sub/Widget.php"), "<?php").unwrap();

        let mut settings = Settings {
            workspace_root: Some(temp_dir.path().to_path_buf()),
            ..Settings::default()
        };
        settings.namespaces.push(NamespaceEntry::new("App", "src"));

        let autoloader = build_autoloader(&settings, &NamespaceSources::default()).unwrap();

        assert_eq!(
            autoloader.resolve("App\\Sub\\Widget").unwrap(),
            Some(temp_dir.path().join("src").join("Sub/Widget.php"))
        );
        assert!(!run_resolve(&settings, &NamespaceSources::default(), "App\\Missing", false).unwrap());
    }
}
