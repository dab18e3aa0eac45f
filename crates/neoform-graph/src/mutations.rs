//! Write operations for schema-validated nodes.
//!
//! Properties are validated against the node's schema and then inlined
//! into the query as a property-map literal.

use neo4rs::query;

use neoform_core::{to_query_props, NeoProperties, Schema};

use crate::client::{GraphClient, GraphError};
use crate::record::{check_label, count_from_row, node_from_row, NeoNode, RETURN_NODE};

impl GraphClient {
    // ── Node Writes ──────────────────────────────────────────────

    /// Validate `props` and create a node with them.
    pub async fn create_node(
        &self,
        label: &str,
        schema: &Schema,
        props: &NeoProperties,
    ) -> Result<NeoNode, GraphError> {
        check_label(label)?;
        let validated = schema.validate(props)?;
        let cypher = create_cypher(label, &to_query_props(&validated));
        tracing::debug!(label, cypher = %cypher, "Creating node");

        let row = self
            .query_one(query(&cypher))
            .await?
            .ok_or_else(|| GraphError::Deserialization("CREATE returned no row".to_string()))?;
        let node = node_from_row(&row, schema)?;

        tracing::info!(label, id = node.id, "Created node");
        Ok(node)
    }

    /// Merge `changes` into an existing node.
    ///
    /// The merged property set is validated as a whole, so required
    /// properties already stored need not be repeated.
    pub async fn update_node(
        &self,
        label: &str,
        schema: &Schema,
        id: i64,
        changes: &NeoProperties,
    ) -> Result<NeoNode, GraphError> {
        let existing = self.find_by_id(label, schema, id).await?;

        let mut merged = existing.props;
        merged.extend(changes.iter().map(|(k, v)| (k, v.clone())));
        let validated = schema.validate(&merged)?;

        let changed: NeoProperties = changes
            .keys()
            .filter_map(|k| validated.get(k).map(|v| (k, v.clone())))
            .collect();
        let cypher = update_cypher(label, &to_query_props(&changed));
        tracing::debug!(label, id, cypher = %cypher, "Updating node");

        let row = self
            .query_one(query(&cypher).param("id", id))
            .await?
            .ok_or_else(|| GraphError::NotFound {
                label: label.to_string(),
                id,
            })?;
        let node = node_from_row(&row, schema)?;

        tracing::info!(label, id, changed = changed.len(), "Updated node");
        Ok(node)
    }

    /// Delete a node and its relationships. Returns whether a node was removed.
    pub async fn delete_node(&self, label: &str, id: i64) -> Result<bool, GraphError> {
        check_label(label)?;
        let cypher = format!(
            "MATCH (n:{label}) WHERE id(n) = $id
             DETACH DELETE n
             RETURN count(n) AS cnt"
        );

        let row = self.query_one(query(&cypher).param("id", id)).await?;
        let deleted = count_from_row(row.as_ref())?;

        if deleted > 0 {
            tracing::info!(label, id, "Deleted node");
        }
        Ok(deleted > 0)
    }
}

// ── Cypher ───────────────────────────────────────────────────────

fn create_cypher(label: &str, literal: &str) -> String {
    format!("CREATE (n:{label} {literal})\n{RETURN_NODE}")
}

fn update_cypher(label: &str, literal: &str) -> String {
    format!("MATCH (n:{label}) WHERE id(n) = $id\nSET n += {literal}\n{RETURN_NODE}")
}
