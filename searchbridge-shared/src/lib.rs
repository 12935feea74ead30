//! # Searchbridge Shared
//!
//! Shared types and contracts for the searchbridge system: the entity
//! mapping contract, field declarations, identifier inflection, and the
//! entity registry.

pub mod entity;
pub mod inflect;
pub mod registry;

pub use entity::{EntityDescriptor, EntityMapping, FieldDef, FieldMap, FieldType, Record};
pub use registry::EntityRegistry;
