//! Marshalling between property bags and the driver's wire shapes.
//!
//! - [`to_query_props`] renders a bag as a Cypher property-map literal.
//! - [`create_props`] rebuilds a bag from a positional result record.

use crate::error::{NeoformError, Result};
use crate::types::{NeoProperties, NeoRecord};

/// Render a property bag as a Cypher property-map literal.
///
/// Produces `{}` for an empty bag, otherwise `{ k1: v1, k2: v2 }` with keys
/// in insertion order and values encoded as JSON literals. Values are not
/// validated here; run [`crate::Schema::validate`] first.
pub fn to_query_props(props: &NeoProperties) -> String {
    if props.is_empty() {
        return "{}".to_string();
    }

    let pairs: Vec<String> = props
        .iter()
        .map(|(key, value)| format!("{}: {}", property_key(key), value.to_json()))
        .collect();

    format!("{{ {} }}", pairs.join(", "))
}

/// Keys that are not plain identifiers are backtick-quoted.
fn property_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        format!("`{}`", key.replace('`', "``"))
    }
}

/// True for names usable unquoted as Cypher keys or labels.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Rebuild a named property bag from a positional record.
///
/// Keys pair with fields by index; a repeated key keeps the later field.
pub fn create_props(record: &NeoRecord) -> Result<NeoProperties> {
    let (keys, fields) = (record.keys(), record.fields());
    if keys.len() != fields.len() {
        tracing::warn!(
            keys = keys.len(),
            fields = fields.len(),
            "Record keys and fields are misaligned"
        );
        return Err(NeoformError::MalformedRecord {
            keys: keys.len(),
            fields: fields.len(),
        });
    }

    Ok(keys.iter().cloned().zip(fields.iter().cloned()).collect())
}
