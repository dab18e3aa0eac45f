//! Relationship property declarations.
//!
//! Relationships carry a smaller descriptor than nodes: a type, an optional
//! `required` flag, and an optional default filled in when the key is absent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::check::check_type;
use crate::error::{NeoformError, Result};
use crate::types::{NeoProperties, NeoValue, SchemaType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationTypeOpts {
    #[serde(rename = "type")]
    pub kind: SchemaType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<NeoValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationPropDef {
    Type(SchemaType),
    Opts(RelationTypeOpts),
}

impl RelationPropDef {
    pub fn schema_type(&self) -> SchemaType {
        match self {
            Self::Type(kind) => *kind,
            Self::Opts(opts) => opts.kind,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Self::Opts(RelationTypeOpts { required: true, .. }))
    }

    pub fn default_value(&self) -> Option<&NeoValue> {
        match self {
            Self::Type(_) => None,
            Self::Opts(opts) => opts.default.as_ref(),
        }
    }
}

impl From<SchemaType> for RelationPropDef {
    fn from(kind: SchemaType) -> Self {
        Self::Type(kind)
    }
}

impl From<RelationTypeOpts> for RelationPropDef {
    fn from(opts: RelationTypeOpts) -> Self {
        Self::Opts(opts)
    }
}

/// True iff the relation descriptor is an options record.
pub fn is_relation_type_opts(prop_def: &RelationPropDef) -> bool {
    matches!(prop_def, RelationPropDef::Opts(_))
}

pub type RelationProperties = BTreeMap<String, RelationPropDef>;

/// Declared properties of one relationship type.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RelationProperties")]
pub struct RelationSchema {
    properties: RelationProperties,
}

impl RelationSchema {
    /// Build a relation schema; every declared default must match its type.
    ///
    /// Defaults are restored to the declared type first, so `[]` and ISO
    /// date text are accepted for list and date properties.
    pub fn new(mut properties: RelationProperties) -> Result<Self> {
        for (key, def) in properties.iter_mut() {
            let RelationPropDef::Opts(opts) = def else {
                continue;
            };
            if let Some(default) = opts.default.take() {
                let default = default.hydrate_as(opts.kind);
                check_type(key, &default, opts.kind)?;
                opts.default = Some(default);
            }
        }
        Ok(Self { properties })
    }

    pub fn properties(&self) -> &RelationProperties {
        &self.properties
    }

    /// Validate relationship properties, filling in declared defaults.
    pub fn validate(&self, props: &NeoProperties) -> Result<NeoProperties> {
        let mut out = NeoProperties::new();

        for (key, value) in props.iter() {
            let def = self
                .properties
                .get(key)
                .ok_or_else(|| NeoformError::UnknownProperty {
                    key: key.to_string(),
                })?;
            check_type(key, value, def.schema_type())?;
            out.insert(key, value.clone());
        }

        for (key, def) in &self.properties {
            if out.contains_key(key) {
                continue;
            }
            match def.default_value() {
                Some(default) => {
                    out.insert(key.clone(), default.clone());
                }
                None if def.is_required() => {
                    return Err(NeoformError::MissingRequired { key: key.clone() });
                }
                None => {}
            }
        }

        Ok(out)
    }
}

impl TryFrom<RelationProperties> for RelationSchema {
    type Error = NeoformError;

    fn try_from(properties: RelationProperties) -> Result<Self> {
        Self::new(properties)
    }
}
