//! Ordered chain of symbol resolvers, tried in turn until one answers.

use std::path::PathBuf;
use std::sync::Arc;

use crate::autoload::AutoloadResult;

/// One entry of a resolver chain.
pub trait SymbolResolver: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(None)` means "not mine", letting the next resolver try.
    fn resolve(&self, symbol: &str) -> AutoloadResult<Option<PathBuf>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainOptions {
    /// Stop the chain and return the error when this resolver fails.
    pub throw: bool,
    /// Insert at the front instead of the back.
    pub prepend: bool,
}

impl Default for ChainOptions {
    fn default() -> Self {
        Self {
            throw: true,
            prepend: false,
        }
    }
}

/// A successful chain lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub path: PathBuf,
    pub resolver: String,
}

struct ChainEntry {
    resolver: Arc<dyn SymbolResolver>,
    throw: bool,
}

#[derive(Default)]
pub struct ResolverChain {
    entries: Vec<ChainEntry>,
}

impl std::fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| e.resolver.name()))
            .finish()
    }
}

fn same_resolver(a: &Arc<dyn SymbolResolver>, b: &Arc<dyn SymbolResolver>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `resolver`. Returns `false` if it is already installed.
    pub fn register(&mut self, resolver: Arc<dyn SymbolResolver>, options: ChainOptions) -> bool {
        if self.contains(&resolver) {
            return false;
        }

        let entry = ChainEntry {
            resolver,
            throw: options.throw,
        };
        if options.prepend {
            self.entries.insert(0, entry);
        } else {
            self.entries.push(entry);
        }
        true
    }

    /// Remove `resolver`. Returns `false` if it was not installed.
    pub fn unregister(&mut self, resolver: &Arc<dyn SymbolResolver>) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|entry| !same_resolver(&entry.resolver, resolver));
        self.entries.len() != before
    }

    pub fn contains(&self, resolver: &Arc<dyn SymbolResolver>) -> bool {
        self.entries
            .iter()
            .any(|entry| same_resolver(&entry.resolver, resolver))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolver names in chain order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.resolver.name()).collect()
    }

    /// Ask each resolver in order; the first hit wins.
    pub fn resolve(&self, symbol: &str) -> AutoloadResult<Option<Resolution>> {
        for entry in &self.entries {
            match entry.resolver.resolve(symbol) {
                Ok(Some(path)) => {
                    return Ok(Some(Resolution {
                        path,
                        resolver: entry.resolver.name().to_string(),
                    }));
                }
                Ok(None) => continue,
                Err(e) if entry.throw => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        "[chain] resolver '{}' failed for '{symbol}': {e}",
                        entry.resolver.name()
                    );
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autoload::AutoloadError;

    struct Fixed {
        name: &'static str,
        answers: &'static [(&'static str, &'static str)],
    }

    impl SymbolResolver for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn resolve(&self, symbol: &str) -> AutoloadResult<Option<PathBuf>> {
            Ok(self
                .answers
                .iter()
                .find(|(s, _)| *s == symbol)
                .map(|(_, p)| PathBuf::from(p)))
        }
    }

    struct Failing;

    impl SymbolResolver for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn resolve(&self, symbol: &str) -> AutoloadResult<Option<PathBuf>> {
            Err(AutoloadError::ResolverFailed {
                resolver: "failing".to_string(),
                symbol: symbol.to_string(),
                reason: "boom".to_string(),
            })
        }
    }

    fn fixed(name: &'static str, answers: &'static [(&'static str, &'static str)]) -> Arc<dyn SymbolResolver> {
        Arc::new(Fixed { name, answers })
    }

    #[test]
    fn test_first_hit_wins_and_misses_fall_through() {
        let mut chain = ResolverChain::new();
        chain.register(fixed("first", &[("A", "/first/A.php")]), ChainOptions::default());
        chain.register(
            fixed("second", &[("A", "/second/A.php"), ("B", "/second/B.php")]),
            ChainOptions::default(),
        );

        let a = chain.resolve("A").unwrap().unwrap();
        let b = chain.resolve("B").unwrap().unwrap();

        assert_eq!(a.resolver, "first");
        assert_eq!(b.path, PathBuf::from("/second/B.php"));
        assert!(chain.resolve("C").unwrap().is_none());
    }

    #[test]
    fn test_prepend_and_duplicate_registration() {
        let mut chain = ResolverChain::new();
        let back = fixed("back", &[]);
        chain.register(back.clone(), ChainOptions::default());
        chain.register(
            fixed("front", &[]),
            ChainOptions {
                prepend: true,
                ..ChainOptions::default()
            },
        );

        assert!(!chain.register(back.clone(), ChainOptions::default()));
        assert_eq!(chain.names(), vec!["front", "back"]);

        assert!(chain.unregister(&back));
        assert!(!chain.unregister(&back));
        assert_eq!(chain.names(), vec!["front"]);
    }

    #[test]
    fn test_failure_with_and_without_throw() {
        let mut throwing = ResolverChain::new();
        throwing.register(Arc::new(Failing), ChainOptions::default());
        throwing.register(fixed("after", &[("A", "/a.php")]), ChainOptions::default());
        assert!(throwing.resolve("A").is_err());

        let mut quiet = ResolverChain::new();
        quiet.register(
            Arc::new(Failing),
            ChainOptions {
                throw: false,
                prepend: false,
            },
        );
        quiet.register(fixed("after", &[("A", "/a.php")]), ChainOptions::default());
        let found = quiet.resolve("A").unwrap().unwrap();
        assert_eq!(found.resolver, "after");
    }
}
