//! Tracking of flags already explicitly assigned during a resolution run.

use indexmap::IndexSet;

use crate::registry::FlagRegistry;

/// The set of flag names that have received an explicit value so far.
///
/// Consulted before every lower-priority assignment to enforce precedence.
/// The set only ever grows: it is refreshed from the registry after each
/// phase and never shrinks within a run.
#[derive(Debug, Default)]
pub struct ProvidedSet {
    names: IndexSet<String>,
}

impl ProvidedSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the named flag has already been explicitly assigned.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Merge every flag the registry reports as explicitly set.
    pub fn record(&mut self, registry: &dyn FlagRegistry) {
        registry.visit(&mut |name| {
            self.names.insert(name.to_string());
        });
    }

    /// Number of flags recorded so far.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no flag has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
