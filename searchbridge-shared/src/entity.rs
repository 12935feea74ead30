//! Entity mapping contract.
//!
//! An entity mapping describes how one relational model is projected into
//! one search index: the derived index and document-kind names, the field
//! declarations, and the per-record document shape. `EntityMapping` is the
//! contract; `EntityDescriptor` is the config-driven implementation used by
//! the console binary. Custom implementations can override any of the
//! default hooks (document body, id extraction, table name).

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::inflect;

/// A relational record as fetched from the backing store.
///
/// Records are opaque key-value rows; the only required key is a unique
/// `id` (string or integer).
pub type Record = Map<String, Value>;

/// Search-engine field type for a mapped attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Keyword,
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    Date,
}

impl FieldType {
    /// Wire name of the type as it appears in mapping bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Keyword => "keyword",
            FieldType::Integer => "integer",
            FieldType::Long => "long",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
        }
    }
}

/// Declaration of a single mapped field.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDef {
    /// Search-engine type of the field.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the field is searchable. Non-indexed fields are stored but
    /// excluded from matching.
    #[serde(default = "default_indexed")]
    pub indexed: bool,
}

fn default_indexed() -> bool {
    true
}

impl FieldDef {
    /// An indexed field of the given type.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            indexed: true,
        }
    }

    /// A stored-but-not-searchable field of the given type.
    pub fn unindexed(field_type: FieldType) -> Self {
        Self {
            field_type,
            indexed: false,
        }
    }
}

/// Field declarations for an entity, keyed by field name.
pub type FieldMap = BTreeMap<String, FieldDef>;

/// Describes how one relational model maps to one search index.
///
/// The derivation defaults follow a single convention: for an identifier
/// `BlogPost`, the index is `blog-posts`, the document kind `blog-post`,
/// and the backing table `blog_post`. Implementations override the hooks
/// they need; most override nothing beyond `name` and `properties`.
pub trait EntityMapping: Send + Sync {
    /// UpperCamelCase identifier for this entity, e.g. `BlogPost`.
    fn name(&self) -> &str;

    /// Field declarations for the mapped document.
    fn properties(&self) -> &FieldMap;

    /// Name of the index this entity's documents are stored in.
    fn index(&self) -> String {
        inflect::pluralize(&inflect::kebab_case(self.name()))
    }

    /// Name of the document kind (non-pluralized).
    fn doc_kind(&self) -> String {
        inflect::kebab_case(self.name())
    }

    /// Backing-store table the records are read from.
    fn table(&self) -> String {
        inflect::snake_case(self.name())
    }

    /// Column names selected from the backing store.
    ///
    /// Always includes the unique `id` column, whether or not it is
    /// declared as a mapped field.
    fn attributes(&self) -> Vec<String> {
        let mut columns = vec!["id".to_string()];
        columns.extend(
            self.properties()
                .keys()
                .filter(|name| name.as_str() != "id")
                .cloned(),
        );
        columns
    }

    /// Fields eligible for free-text matching.
    fn text_fields(&self) -> Vec<String> {
        self.properties()
            .iter()
            .filter(|(_, def)| def.field_type == FieldType::Text && def.indexed)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Unique document id for a record, taken from its `id` column.
    fn doc_id(&self, record: &Record) -> Option<String> {
        match record.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Document body submitted to the search engine for a record.
    ///
    /// The default is a straight projection of the fetched row.
    fn body(&self, record: &Record) -> Value {
        Value::Object(record.clone())
    }

    /// Mapping body applied to this entity's index.
    fn mapping_body(&self) -> Value {
        let mut properties = Map::new();
        for (field, def) in self.properties() {
            let mut prop = Map::new();
            prop.insert("type".to_string(), json!(def.field_type.as_str()));
            if !def.indexed {
                prop.insert("index".to_string(), json!(false));
            }
            properties.insert(field.clone(), Value::Object(prop));
        }
        json!({ "properties": properties })
    }
}

/// Config-driven entity mapping.
///
/// Deserialized from the deployment's entities file; see the registry for
/// the file shape.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityDescriptor {
    /// UpperCamelCase identifier, e.g. `BlogPost`.
    pub name: String,
    /// Backing table override. Defaults to the snake_case identifier.
    #[serde(default)]
    pub table: Option<String>,
    /// Field declarations.
    pub fields: FieldMap,
}

impl EntityMapping for EntityDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn properties(&self) -> &FieldMap {
        &self.fields
    }

    fn table(&self) -> String {
        self.table
            .clone()
            .unwrap_or_else(|| inflect::snake_case(&self.name))
    }
}
