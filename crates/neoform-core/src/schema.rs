//! Schema declarations: per-property type descriptors and the node schema
//! that validates property bags against them.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::check::{check_prop_def, check_type};
use crate::error::{NeoformError, Result};
use crate::types::{NeoList, NeoProperties, NeoValue, SchemaType};

// ── Type Descriptors ──────────────────────────────────────────────

/// Options record for a property: a bare type plus constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaTypeOpts {
    #[serde(rename = "type")]
    pub kind: SchemaType,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub index: bool,
    #[serde(default)]
    pub lowercase: bool,
    #[serde(default)]
    pub uppercase: bool,
    /// Closed set of allowed values.
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<NeoValue>>,
    /// Regular expression text values must match.
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl SchemaTypeOpts {
    pub fn new(kind: SchemaType) -> Self {
        Self {
            kind,
            unique: false,
            required: false,
            index: false,
            lowercase: false,
            uppercase: false,
            allowed: None,
            pattern: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn index(mut self) -> Self {
        self.index = true;
        self
    }

    pub fn lowercase(mut self) -> Self {
        self.lowercase = true;
        self
    }

    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    pub fn one_of<V: Into<NeoValue>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn matching(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}

/// Declared shape of one property: a bare type tag or an options record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropDef {
    Type(SchemaType),
    Opts(SchemaTypeOpts),
}

impl PropDef {
    pub fn is_opts(&self) -> bool {
        matches!(self, Self::Opts(_))
    }

    /// The underlying bare type tag.
    pub fn schema_type(&self) -> SchemaType {
        match self {
            Self::Type(kind) => *kind,
            Self::Opts(opts) => opts.kind,
        }
    }

    pub fn opts(&self) -> Option<&SchemaTypeOpts> {
        match self {
            Self::Type(_) => None,
            Self::Opts(opts) => Some(opts),
        }
    }
}

impl From<SchemaType> for PropDef {
    fn from(kind: SchemaType) -> Self {
        Self::Type(kind)
    }
}

impl From<SchemaTypeOpts> for PropDef {
    fn from(opts: SchemaTypeOpts) -> Self {
        Self::Opts(opts)
    }
}

/// True iff the descriptor is an options record rather than a bare tag.
pub fn is_schema_type_opts(prop_def: &PropDef) -> bool {
    prop_def.is_opts()
}

/// Property key to descriptor.
pub type SchemaProperties = BTreeMap<String, PropDef>;

// ── Node Schema ───────────────────────────────────────────────────

/// A node schema built once from its declared properties.
///
/// Read-only after construction and safe to share across threads.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "SchemaProperties")]
pub struct Schema {
    properties: SchemaProperties,
    patterns: HashMap<String, Regex>,
    required_props: Vec<String>,
    unique_props: Vec<String>,
    indexes: Vec<String>,
}

impl Schema {
    /// Build a schema, compiling any `match` patterns.
    ///
    /// `enum` entries are restored to the declared element kind and must
    /// match it.
    pub fn new(mut properties: SchemaProperties) -> Result<Self> {
        let mut patterns = HashMap::new();
        let mut required_props = Vec::new();
        let mut unique_props = Vec::new();
        let mut indexes = Vec::new();

        for (key, def) in properties.iter_mut() {
            let PropDef::Opts(opts) = def else {
                continue;
            };
            if let Some(allowed) = opts.allowed.take() {
                opts.allowed = Some(allowed_values(key, opts.kind, allowed)?);
            }
            if let Some(pattern) = &opts.pattern {
                let regex = Regex::new(pattern).map_err(|source| NeoformError::InvalidPattern {
                    key: key.clone(),
                    source,
                })?;
                patterns.insert(key.clone(), regex);
            }
            if opts.required {
                required_props.push(key.clone());
            }
            if opts.unique {
                unique_props.push(key.clone());
            }
            if opts.index {
                indexes.push(key.clone());
            }
        }

        Ok(Self {
            properties,
            patterns,
            required_props,
            unique_props,
            indexes,
        })
    }

    /// Load a schema from a JSON file mapping keys to descriptors.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| NeoformError::Config(format!("{}: {e}", path.display())))?;
        let properties: SchemaProperties = serde_json::from_str(&raw)?;
        Self::new(properties)
    }

    pub fn properties(&self) -> &SchemaProperties {
        &self.properties
    }

    pub fn get(&self, key: &str) -> Option<&PropDef> {
        self.properties.get(key)
    }

    pub fn required_props(&self) -> &[String] {
        &self.required_props
    }

    pub fn unique_props(&self) -> &[String] {
        &self.unique_props
    }

    pub fn indexes(&self) -> &[String] {
        &self.indexes
    }

    pub fn indexed(&self) -> bool {
        !self.indexes.is_empty()
    }

    /// Validate a property bag and return its normalized form.
    ///
    /// Rejects undeclared keys, type-checks every value, applies case
    /// normalization, then enforces `enum`, `match`, and `required`.
    pub fn validate(&self, props: &NeoProperties) -> Result<NeoProperties> {
        let normalized = self.validate_partial(props)?;

        if let Some(key) = self
            .required_props
            .iter()
            .find(|key| !normalized.contains_key(key))
        {
            tracing::debug!(key = %key, "Required property missing");
            return Err(NeoformError::MissingRequired { key: key.clone() });
        }

        Ok(normalized)
    }

    /// Validate the properties present without enforcing `required`.
    ///
    /// Used for match filters and partial updates.
    pub fn validate_partial(&self, props: &NeoProperties) -> Result<NeoProperties> {
        let mut normalized = NeoProperties::new();

        for (key, value) in props.iter() {
            let value = self.validate_entry(key, value).map_err(|e| {
                tracing::debug!(key, error = %e, "Property failed validation");
                e
            })?;
            normalized.insert(key, value);
        }

        Ok(normalized)
    }

    fn validate_entry(&self, key: &str, value: &NeoValue) -> Result<NeoValue> {
        let def = self.get(key).ok_or_else(|| NeoformError::UnknownProperty {
            key: key.to_string(),
        })?;
        check_prop_def(key, value, def)?;

        let Some(opts) = def.opts() else {
            return Ok(value.clone());
        };

        let value = normalize_case(value.clone(), opts);

        if let Some(allowed) = &opts.allowed {
            if let Some(bad) = elements(&value).into_iter().find(|v| !allowed.contains(v)) {
                return Err(NeoformError::NotInEnum {
                    key: key.to_string(),
                    value: bad.to_json().to_string(),
                });
            }
        }

        if let Some(regex) = self.patterns.get(key) {
            let mismatch = elements(&value)
                .iter()
                .filter_map(NeoValue::as_str)
                .any(|s| !regex.is_match(s));
            if mismatch {
                return Err(NeoformError::PatternMismatch {
                    key: key.to_string(),
                    pattern: regex.as_str().to_string(),
                });
            }
        }

        Ok(value)
    }

    /// Restore declared value kinds lost in JSON transit.
    ///
    /// Dates come back from the database as the ISO text the serializer
    /// wrote, and empty lists carry no element kind. Text that does not
    /// parse as a date is left unchanged.
    pub fn hydrate(&self, props: NeoProperties) -> NeoProperties {
        props
            .into_iter()
            .map(|(key, value)| {
                let value = match self.get(&key) {
                    Some(def) => value.hydrate_as(def.schema_type()),
                    None => value,
                };
                (key, value)
            })
            .collect()
    }
}

impl TryFrom<SchemaProperties> for Schema {
    type Error = NeoformError;

    fn try_from(properties: SchemaProperties) -> Result<Self> {
        Self::new(properties)
    }
}

fn normalize_case(value: NeoValue, opts: &SchemaTypeOpts) -> NeoValue {
    if !opts.lowercase && !opts.uppercase {
        return value;
    }
    let apply = |s: String| {
        let s = if opts.lowercase { s.to_lowercase() } else { s };
        if opts.uppercase {
            s.to_uppercase()
        } else {
            s
        }
    };
    match value {
        NeoValue::String(s) => NeoValue::String(apply(s)),
        NeoValue::List(NeoList::Strings(v)) => {
            NeoValue::List(NeoList::Strings(v.into_iter().map(apply).collect()))
        }
        other => other,
    }
}

/// Hydrate and type-check `enum` entries against the scalar kind of `kind`.
fn allowed_values(key: &str, kind: SchemaType, allowed: Vec<NeoValue>) -> Result<Vec<NeoValue>> {
    let scalar = match kind {
        SchemaType::List(element) => SchemaType::scalar(element),
        other => other,
    };
    allowed
        .into_iter()
        .map(|value| {
            let value = value.hydrate_as(scalar);
            check_type(key, &value, scalar)?;
            Ok(value)
        })
        .collect()
}

/// Scalars of a value: itself, or each list element.
fn elements(value: &NeoValue) -> Vec<NeoValue> {
    match value {
        NeoValue::List(NeoList::Strings(v)) => v.iter().cloned().map(NeoValue::String).collect(),
        NeoValue::List(NeoList::Numbers(v)) => v.iter().copied().map(NeoValue::Number).collect(),
        NeoValue::List(NeoList::Booleans(v)) => v.iter().copied().map(NeoValue::Boolean).collect(),
        NeoValue::List(NeoList::Dates(v)) => v.iter().copied().map(NeoValue::Date).collect(),
        scalar => vec![scalar.clone()],
    }
}
