//! neoform-graph: Neo4j adapter for neoform property bags.
//!
//! Renders validated property bags into Cypher property-map literals,
//! runs them through neo4rs, and decodes returned rows back into
//! schema-typed property bags.

pub mod client;
pub mod mutations;
pub mod queries;
pub mod record;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use record::NeoNode;
