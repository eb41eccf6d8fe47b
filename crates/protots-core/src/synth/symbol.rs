//! Per-file import alias allocation.
//!
//! Every dependency file referenced during one file's synthesis gets exactly
//! one freshly minted alias identifier, used to qualify references to that
//! file's types. Alias state is scoped to a single file: the allocator is
//! created at the start of a file's synthesis, owned by it, and dropped (or
//! [`reset`](ImportAllocator::reset)) before the next file begins, so no
//! alias numbering ever leaks across files.

use std::collections::HashMap;
use std::fmt;
use tracing::trace;

/// Identifier the Emitter binds the message runtime import to
pub const MESSAGE_RUNTIME_ALIAS: &str = "pb";

/// Identifier the Emitter binds the RPC runtime import to
pub const RPC_RUNTIME_ALIAS: &str = "grpc";

/// A generated import identifier bound to exactly one dependency file path.
///
/// Valid only within the synthesis of the file whose allocator minted it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alias(String);

impl Alias {
    /// Returns the identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scoped registry of import aliases for one file's synthesis session.
#[derive(Debug, Default)]
pub struct ImportAllocator {
    aliases: HashMap<String, Alias>,
    // Insertion order, so import declarations come out deterministically.
    order: Vec<String>,
    next: usize,
}

impl ImportAllocator {
    /// Creates an empty allocator for a new file session
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the alias for a dependency file path, minting one on first
    /// request and returning the same alias on every subsequent request
    /// within this session.
    ///
    /// Minted identifiers follow the `dep_<n>` scheme, which can never
    /// collide with each other nor with the runtime import identifiers
    /// ([`MESSAGE_RUNTIME_ALIAS`], [`RPC_RUNTIME_ALIAS`]).
    pub fn alias(&mut self, dependency: &str) -> Alias {
        if let Some(existing) = self.aliases.get(dependency) {
            return existing.clone();
        }

        self.next += 1;
        let alias = Alias(format!("dep_{}", self.next));
        trace!("minted alias {} for {}", alias, dependency);

        self.aliases.insert(dependency.to_string(), alias.clone());
        self.order.push(dependency.to_string());
        alias
    }

    /// Returns the alias previously minted for a dependency, if any
    pub fn get(&self, dependency: &str) -> Option<&Alias> {
        self.aliases.get(dependency)
    }

    /// Iterates `(dependency path, alias)` pairs in mint order
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &Alias)> {
        self.order
            .iter()
            .map(move |dep| (dep.as_str(), &self.aliases[dep]))
    }

    /// Number of distinct dependencies seen this session
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no alias has been minted this session
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Discards all mappings, ending the current session
    pub fn reset(&mut self) {
        self.aliases.clear();
        self.order.clear();
        self.next = 0;
    }
}
