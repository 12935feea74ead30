//! Elasticsearch query builders.
//!
//! One query body per entity: a fuzzy multi-field text match over the
//! entity's text fields, with exact term clauses for whatever caller
//! filters survive restriction to the entity's declared fields.

use serde_json::{json, Map, Value};

use searchbridge_shared::EntityMapping;

/// Build the search body for one entity.
///
/// The text match uses `AUTO` fuzziness for typo tolerance. Entities with
/// no text fields fall back to `match_all` so term filters still apply.
pub fn build_entity_query(
    entity: &dyn EntityMapping,
    term: &str,
    filters: &Map<String, Value>,
) -> Value {
    let text_fields = entity.text_fields();

    let must = if text_fields.is_empty() {
        json!({ "match_all": {} })
    } else {
        json!({
            "multi_match": {
                "query": term,
                "fields": text_fields,
                "fuzziness": "AUTO"
            }
        })
    };

    let filter_clauses: Vec<Value> = restrict_filters(entity, filters)
        .into_iter()
        .map(|(field, value)| json!({ "term": { field: value } }))
        .collect();

    json!({
        "query": {
            "bool": {
                "must": [must],
                "filter": filter_clauses
            }
        }
    })
}

/// Keep only the filters whose field the entity declares.
pub fn restrict_filters(
    entity: &dyn EntityMapping,
    filters: &Map<String, Value>,
) -> Vec<(String, Value)> {
    filters
        .iter()
        .filter(|(field, _)| entity.properties().contains_key(*field))
        .map(|(field, value)| (field.clone(), value.clone()))
        .collect()
}
