//! Core data types: symbol names, the class map and its diagnostics.

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Fully-qualified symbol name in the dialect's canonical separator,
/// without a leading separator.
pub type SymbolName = String;

static FIXTURE_PATH: OnceLock<Regex> = OnceLock::new();

fn fixture_pattern() -> &'static Regex {
    FIXTURE_PATH.get_or_init(|| {
        Regex::new(r"(?i)/(test|fixture|example|stub)s?/").expect("fixture pattern is valid")
    })
}

/// True when either path sits in a test/fixture/example/stub directory.
pub fn is_fixture_pair(first: &Path, second: &Path) -> bool {
    let joined = format!("{} {}", first.display(), second.display()).replace('\\', "/");
    fixture_pattern().is_match(&joined)
}

/// Same symbol declared by two files; the first one was kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ambiguity {
    pub symbol: SymbolName,
    pub kept: PathBuf,
    pub ignored: PathBuf,
}

/// Outcome of inserting a declaration into a [`ClassMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// First declaration of the symbol.
    Added,
    /// Symbol already mapped to this same file.
    Duplicate,
    /// Symbol already mapped elsewhere but one side is a fixture path.
    Shadowed,
    /// Symbol already mapped to another non-fixture file.
    Ambiguous(Ambiguity),
}

/// Ordered symbol → file mapping. Iteration follows insertion order, which
/// keeps the dumped cache file stable across regenerations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMap {
    entries: IndexMap<SymbolName, PathBuf>,
}

impl ClassMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert with first-wins semantics.
    pub fn insert(&mut self, symbol: SymbolName, path: PathBuf) -> Insertion {
        match self.entries.get(&symbol) {
            None => {
                self.entries.insert(symbol, path);
                Insertion::Added
            }
            Some(existing) if *existing == path => Insertion::Duplicate,
            Some(existing) if is_fixture_pair(existing, &path) => Insertion::Shadowed,
            Some(existing) => Insertion::Ambiguous(Ambiguity {
                symbol,
                kept: existing.clone(),
                ignored: path,
            }),
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&Path> {
        self.entries.get(symbol).map(PathBuf::as_path)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }

    /// Merge `other` into `self` under the same first-wins policy,
    /// returning the ambiguities encountered.
    pub fn merge(&mut self, other: ClassMap) -> Vec<Ambiguity> {
        other
            .entries
            .into_iter()
            .filter_map(|(symbol, path)| match self.insert(symbol, path) {
                Insertion::Ambiguous(ambiguity) => Some(ambiguity),
                _ => None,
            })
            .collect()
    }
}

impl IntoIterator for ClassMap {
    type Item = (SymbolName, PathBuf);
    type IntoIter = indexmap::map::IntoIter<SymbolName, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(SymbolName, PathBuf)> for ClassMap {
    fn from_iter<I: IntoIterator<Item = (SymbolName, PathBuf)>>(iter: I) -> Self {
        let mut map = ClassMap::new();
        for (symbol, path) in iter {
            map.insert(symbol, path);
        }
        map
    }
}

/// A class map together with the ambiguity diagnostics raised while building it.
#[derive(Debug, Clone, Default)]
pub struct GeneratedMap {
    pub map: ClassMap,
    pub ambiguities: Vec<Ambiguity>,
}
