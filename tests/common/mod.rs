// Shared test helpers for blockmark.

use std::collections::HashMap;

use blockmark::{AssetResolver, ResolveError};

/// Resolver stub backed by a source → destination map.
///
/// Unknown URLs report not-found; call `fail_hard` to make a URL fail
/// fatally instead.
pub struct StubResolver {
    known: HashMap<String, String>,
    fatal: Vec<String>,
    pub calls: Vec<String>,
}

impl StubResolver {
    pub fn new() -> Self {
        Self {
            known: HashMap::new(),
            fatal: Vec::new(),
            calls: Vec::new(),
        }
    }

    pub fn map(mut self, from: &str, to: &str) -> Self {
        self.known.insert(from.to_string(), to.to_string());
        self
    }

    pub fn fail_hard(mut self, url: &str) -> Self {
        self.fatal.push(url.to_string());
        self
    }
}

impl AssetResolver for StubResolver {
    fn resolve(&mut self, source: &str) -> Result<String, ResolveError> {
        self.calls.push(source.to_string());
        if self.fatal.iter().any(|u| u == source) {
            return Err(ResolveError::Failed("upstream returned 500".into()));
        }
        match self.known.get(source) {
            Some(destination) => Ok(destination.clone()),
            None => Err(ResolveError::NotFound(source.to_string())),
        }
    }
}
