//! neoform-core: schema types, runtime type checking, and property marshalling.
//!
//! This crate holds everything between application property bags and the
//! Neo4j driver's wire shapes:
//! - Type tags and values (`SchemaType`, `NeoValue`, `NeoProperties`, `NeoRecord`)
//! - Schema declarations and validation (`PropDef`, `Schema`, `RelationSchema`)
//! - Runtime type checking (`check_type`)
//! - Property-map literal rendering and record decoding (`to_query_props`, `create_props`)
//! - Configuration loading and the common error type

pub mod check;
pub mod config;
pub mod error;
pub mod props;
pub mod relation;
pub mod schema;
pub mod types;

pub use check::{check_prop_def, check_type};
pub use error::{NeoformError, Result};
pub use props::{create_props, is_identifier, to_query_props};
pub use relation::{is_relation_type_opts, RelationPropDef, RelationSchema, RelationTypeOpts};
pub use schema::{is_schema_type_opts, PropDef, Schema, SchemaProperties, SchemaTypeOpts};
pub use types::{ElementType, NeoList, NeoProperties, NeoRecord, NeoValue, SchemaType};
