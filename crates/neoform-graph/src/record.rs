//! Decoding of query rows into schema-typed property bags.
//!
//! Node queries return the node's property keys alongside each property
//! value encoded as JSON text, which keeps decoding independent of the
//! driver's own value model.

use neoform_core::{create_props, is_identifier, NeoProperties, NeoRecord, NeoValue, Schema};
use serde::Serialize;

use crate::client::GraphError;

/// RETURN clause shared by every node query; binds the node as `n`.
pub(crate) const RETURN_NODE: &str = "RETURN id(n) AS id, keys(n) AS keys,
       [k IN keys(n) | apoc.convert.toJson(n[k])] AS fields";

/// A stored node: its internal id plus its properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeoNode {
    pub id: i64,
    pub props: NeoProperties,
}

/// Build a record from returned keys and JSON-encoded fields.
pub fn record_from_parts(keys: Vec<String>, encoded: &[String]) -> Result<NeoRecord, GraphError> {
    let fields = encoded
        .iter()
        .map(|text| -> Result<NeoValue, GraphError> {
            let json: serde_json::Value = serde_json::from_str(text)
                .map_err(|e| GraphError::Deserialization(format!("Invalid field JSON: {e}")))?;
            Ok(NeoValue::from_json(&json)?)
        })
        .collect::<Result<Vec<_>, GraphError>>()?;
    Ok(NeoRecord::new(keys, fields))
}

/// Decode a `RETURN_NODE` row, restoring declared kinds from the schema.
pub(crate) fn node_from_row(row: &neo4rs::Row, schema: &Schema) -> Result<NeoNode, GraphError> {
    let id: i64 = row
        .get("id")
        .map_err(|e| GraphError::Deserialization(format!("Failed to get node id: {e}")))?;
    let keys: Vec<String> = row
        .get("keys")
        .map_err(|e| GraphError::Deserialization(format!("Failed to get keys: {e}")))?;
    let fields: Vec<String> = row
        .get("fields")
        .map_err(|e| GraphError::Deserialization(format!("Failed to get fields: {e}")))?;

    let record = record_from_parts(keys, &fields)?;
    let props = create_props(&record)?;
    Ok(NeoNode {
        id,
        props: schema.hydrate(props),
    })
}

/// Read the `cnt` column of an optional count row; no row counts as zero.
pub(crate) fn count_from_row(row: Option<&neo4rs::Row>) -> Result<i64, GraphError> {
    decode_count(row.map(|row| row.get::<i64>("cnt")))
}

fn decode_count<E: std::fmt::Display>(cnt: Option<Result<i64, E>>) -> Result<i64, GraphError> {
    match cnt {
        Some(decoded) => decoded
            .map_err(|e| GraphError::Deserialization(format!("Failed to get count: {e}"))),
        None => Ok(0),
    }
}

/// Reject labels that would need quoting inside a Cypher pattern.
pub(crate) fn check_label(label: &str) -> Result<(), GraphError> {
    if is_identifier(label) {
        Ok(())
    } else {
        Err(GraphError::InvalidLabel(label.to_string()))
    }
}
