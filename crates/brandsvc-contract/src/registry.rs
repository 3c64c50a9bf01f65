//! # Documentation Registry
//!
//! Deduplicating name table used while emitting documentation metadata,
//! so a schema reused across endpoints is described once. Names are
//! write-once for the registry's lifetime: entries are added, never
//! removed. Uniqueness is by declared model name, not structural
//! identity — two models that happen to produce structurally identical
//! schemas are still documented separately.
//!
//! The registry is the contract layer's only mutable shared state. It is
//! owned by the documentation builder and initialized explicitly at
//! start-up; the `parking_lot::Mutex` keeps it safe if documentation is
//! introspected during live traffic.

use std::collections::HashSet;

use parking_lot::Mutex;

use crate::schema::Schema;

/// Outcome of resolving a schema name against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedName {
    /// First sighting: the caller should emit the full definition.
    First(String),
    /// The name was already emitted; reference it instead.
    AlreadySeen,
}

/// Process-lifetime deduplicating table of emitted schema names.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    seen: Mutex<HashSet<String>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a schema's documentation name.
    ///
    /// The first call for a given name returns [`ResolvedName::First`];
    /// every later call for the same name returns
    /// [`ResolvedName::AlreadySeen`], regardless of which handler asks.
    pub fn resolve(&self, schema: &Schema) -> ResolvedName {
        self.resolve_name(schema.model().name())
    }

    /// Resolve by declared name directly.
    pub fn resolve_name(&self, name: &str) -> ResolvedName {
        let mut seen = self.seen.lock();
        if seen.insert(name.to_string()) {
            ResolvedName::First(name.to_string())
        } else {
            ResolvedName::AlreadySeen
        }
    }

    /// Number of names emitted so far.
    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.lock().is_empty()
    }
}
