//! Entity registry.
//!
//! Holds the deployment's registered entities in registration order. The
//! order is significant: multi-search responses are returned per entity in
//! this order.

use std::sync::Arc;

use serde::Deserialize;

use crate::entity::{EntityDescriptor, EntityMapping};
use crate::inflect;

/// Ordered collection of registered entities.
#[derive(Default)]
pub struct EntityRegistry {
    entities: Vec<Arc<dyn EntityMapping>>,
}

/// Shape of the deployment's entities file.
#[derive(Deserialize)]
struct EntitiesFile {
    entities: Vec<EntityDescriptor>,
}

impl EntityRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from config-driven descriptors, preserving order.
    pub fn from_descriptors(descriptors: Vec<EntityDescriptor>) -> Self {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(Arc::new(descriptor));
        }
        registry
    }

    /// Parse a registry from the entities file contents.
    ///
    /// The file is a JSON object: `{ "entities": [ <descriptor>, ... ] }`.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        let file: EntitiesFile = serde_json::from_str(contents)?;
        Ok(Self::from_descriptors(file.entities))
    }

    /// Register an entity. Later registrations keep their relative order.
    pub fn register(&mut self, entity: Arc<dyn EntityMapping>) {
        self.entities.push(entity);
    }

    /// Look up an entity by identifier or by its kebab-case document kind.
    pub fn get(&self, name: &str) -> Option<Arc<dyn EntityMapping>> {
        let kind = inflect::kebab_case(name);
        self.entities
            .iter()
            .find(|e| e.name() == name || e.doc_kind() == kind)
            .cloned()
    }

    /// Iterate entities in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn EntityMapping>> + '_ {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
