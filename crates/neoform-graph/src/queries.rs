//! Read operations returning schema-typed nodes.

use neo4rs::query;

use neoform_core::{to_query_props, NeoProperties, Schema};

use crate::client::{GraphClient, GraphError};
use crate::record::{check_label, count_from_row, node_from_row, NeoNode, RETURN_NODE};

impl GraphClient {
    /// Get a node by label and internal id.
    pub async fn find_by_id(
        &self,
        label: &str,
        schema: &Schema,
        id: i64,
    ) -> Result<NeoNode, GraphError> {
        check_label(label)?;
        let cypher = format!("MATCH (n:{label}) WHERE id(n) = $id\n{RETURN_NODE}");

        match self.query_one(query(&cypher).param("id", id)).await? {
            Some(row) => node_from_row(&row, schema),
            None => Err(GraphError::NotFound {
                label: label.to_string(),
                id,
            }),
        }
    }

    /// List nodes whose properties equal every entry of `filter`.
    pub async fn find_nodes(
        &self,
        label: &str,
        schema: &Schema,
        filter: &NeoProperties,
        limit: u32,
    ) -> Result<Vec<NeoNode>, GraphError> {
        check_label(label)?;
        let filter = schema.validate_partial(filter)?;
        let cypher = format!("{}\n{RETURN_NODE}\nLIMIT $limit", match_clause(label, &filter));
        tracing::debug!(label, cypher = %cypher, "Finding nodes");

        let rows = self
            .query_rows(query(&cypher).param("limit", limit as i64))
            .await?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            results.push(node_from_row(&row, schema)?);
        }
        Ok(results)
    }

    /// Count nodes whose properties equal every entry of `filter`.
    pub async fn count_nodes(
        &self,
        label: &str,
        schema: &Schema,
        filter: &NeoProperties,
    ) -> Result<i64, GraphError> {
        check_label(label)?;
        let filter = schema.validate_partial(filter)?;
        let cypher = format!("{}\nRETURN count(n) AS cnt", match_clause(label, &filter));

        let row = self.query_one(query(&cypher)).await?;
        count_from_row(row.as_ref())
    }
}

fn match_clause(label: &str, filter: &NeoProperties) -> String {
    if filter.is_empty() {
        format!("MATCH (n:{label})")
    } else {
        format!("MATCH (n:{label} {})", to_query_props(filter))
    }
}
