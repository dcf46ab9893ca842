//! Flow catalog — the static registry of flow templates.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::flows::definition::FlowDefinition;
use crate::flows::library;

/// Registry of flow templates, keyed by flow id.
///
/// Lookups fail soft: a missing id is `None`, and callers treat that as a
/// silent no-op rather than an error.
pub struct FlowCatalog {
    flows: HashMap<String, Arc<FlowDefinition>>,
}

impl FlowCatalog {
    /// Create an empty catalog (for tests).
    pub fn empty() -> Self {
        Self {
            flows: HashMap::new(),
        }
    }

    /// Build the default catalog with the seven shipped flows.
    pub fn with_default_flows() -> Self {
        let mut catalog = Self::empty();
        catalog.register(library::symptom::definition());
        catalog.register(library::diet::definition());
        catalog.register(library::exercise::definition());
        catalog.register(library::sleep::definition());
        catalog.register(library::water::definition());
        catalog.register(library::medication::definition());
        catalog.register(library::appointment::definition());
        catalog
    }

    /// Register a flow template. Later registrations replace earlier ones
    /// with the same id.
    pub fn register(&mut self, flow: FlowDefinition) {
        debug!(flow_id = %flow.id, steps = flow.steps.len(), "Registered flow");
        self.flows.insert(flow.id.clone(), Arc::new(flow));
    }

    /// Look up a flow by id. Missing ids are a soft miss.
    pub fn lookup(&self, flow_id: &str) -> Option<Arc<FlowDefinition>> {
        self.flows.get(flow_id).cloned()
    }

    /// Whether a flow id is known.
    pub fn has(&self, flow_id: &str) -> bool {
        self.flows.contains_key(flow_id)
    }

    /// All registered flow ids (unordered).
    pub fn ids(&self) -> Vec<String> {
        self.flows.keys().cloned().collect()
    }
}

impl Default for FlowCatalog {
    fn default() -> Self {
        Self::with_default_flows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_all_flows() {
        let catalog = FlowCatalog::with_default_flows();
        for id in [
            library::symptom::FLOW_ID,
            library::diet::FLOW_ID,
            library::exercise::FLOW_ID,
            library::sleep::FLOW_ID,
            library::water::FLOW_ID,
            library::medication::FLOW_ID,
            library::appointment::FLOW_ID,
        ] {
            assert!(catalog.has(id), "missing flow {id}");
        }
        assert_eq!(catalog.ids().len(), 7);
    }

    #[test]
    fn unknown_id_is_soft_miss() {
        let catalog = FlowCatalog::with_default_flows();
        assert!(catalog.lookup("log-mood").is_none());
    }

    #[test]
    fn re_registration_replaces() {
        let mut catalog = FlowCatalog::empty();
        catalog.register(FlowDefinition::new("f", "First", vec![]));
        catalog.register(FlowDefinition::new("f", "Second", vec![]));
        assert_eq!(catalog.lookup("f").unwrap().title, "Second");
    }
}
