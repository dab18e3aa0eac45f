//! Value and type-tag model shared by the schema and the marshalling layer.
//!
//! Every property value carries its own [`SchemaType`] tag, so type checking
//! is plain tag equality over a closed set of kinds.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::NeoformError;

/// Largest integer a JSON number can carry without losing precision.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

// ── Type Tags ─────────────────────────────────────────────────────

/// Element kind of a homogeneous list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    String,
    Number,
    Boolean,
    Date,
}

impl ElementType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Number => "Number",
            Self::Boolean => "Boolean",
            Self::Date => "Date",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "date" => Some(Self::Date),
            _ => None,
        }
    }
}

/// A bare property type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SchemaType {
    String,
    Number,
    Boolean,
    Date,
    List(ElementType),
}

impl SchemaType {
    /// The scalar tag matching a list element kind.
    pub fn scalar(element: ElementType) -> Self {
        match element {
            ElementType::String => Self::String,
            ElementType::Number => Self::Number,
            ElementType::Boolean => Self::Boolean,
            ElementType::Date => Self::Date,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("String"),
            Self::Number => f.write_str("Number"),
            Self::Boolean => f.write_str("Boolean"),
            Self::Date => f.write_str("Date"),
            Self::List(element) => write!(f, "{}[]", element.name()),
        }
    }
}

impl FromStr for SchemaType {
    type Err = NeoformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed.strip_suffix("[]") {
            Some(element) => ElementType::parse(element).map(Self::List),
            None => ElementType::parse(trimmed).map(Self::scalar),
        };
        parsed.ok_or_else(|| NeoformError::UnknownType(s.to_string()))
    }
}

impl TryFrom<String> for SchemaType {
    type Error = NeoformError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SchemaType> for String {
    fn from(value: SchemaType) -> Self {
        value.to_string()
    }
}

// ── Values ────────────────────────────────────────────────────────

/// A homogeneous list value.
#[derive(Debug, Clone, PartialEq)]
pub enum NeoList {
    Strings(Vec<String>),
    Numbers(Vec<f64>),
    Booleans(Vec<bool>),
    Dates(Vec<DateTime<Utc>>),
}

impl NeoList {
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Strings(_) => ElementType::String,
            Self::Numbers(_) => ElementType::Number,
            Self::Booleans(_) => ElementType::Boolean,
            Self::Dates(_) => ElementType::Date,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Strings(v) => v.len(),
            Self::Numbers(v) => v.len(),
            Self::Booleans(v) => v.len(),
            Self::Dates(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// An empty list of the given element kind.
    pub fn empty(element: ElementType) -> Self {
        match element {
            ElementType::String => Self::Strings(Vec::new()),
            ElementType::Number => Self::Numbers(Vec::new()),
            ElementType::Boolean => Self::Booleans(Vec::new()),
            ElementType::Date => Self::Dates(Vec::new()),
        }
    }
}

/// A single property value.
#[derive(Debug, Clone, PartialEq)]
pub enum NeoValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
    List(NeoList),
}

impl NeoValue {
    /// The runtime type tag of this value.
    pub fn schema_type(&self) -> SchemaType {
        match self {
            Self::String(_) => SchemaType::String,
            Self::Number(_) => SchemaType::Number,
            Self::Boolean(_) => SchemaType::Boolean,
            Self::Date(_) => SchemaType::Date,
            Self::List(list) => SchemaType::List(list.element_type()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Encode as the JSON literal a JavaScript host would produce.
    ///
    /// Integral numbers drop the fractional part, non-finite numbers become
    /// `null`, and dates render as ISO-8601 UTC with millisecond precision.
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Number(n) => number_to_json(*n),
            Self::Boolean(b) => Value::Bool(*b),
            Self::Date(d) => Value::String(date_to_iso(d)),
            Self::List(NeoList::Strings(v)) => {
                Value::Array(v.iter().cloned().map(Value::String).collect())
            }
            Self::List(NeoList::Numbers(v)) => {
                Value::Array(v.iter().copied().map(number_to_json).collect())
            }
            Self::List(NeoList::Booleans(v)) => {
                Value::Array(v.iter().copied().map(Value::Bool).collect())
            }
            Self::List(NeoList::Dates(v)) => {
                Value::Array(v.iter().map(|d| Value::String(date_to_iso(d))).collect())
            }
        }
    }

    /// Decode a JSON value.
    ///
    /// JSON has no date type, so ISO strings stay text here; use
    /// [`crate::Schema::hydrate`] to restore declared dates. An empty array
    /// decodes as an empty `String[]`.
    pub fn from_json(json: &Value) -> Result<Self, NeoformError> {
        match json {
            Value::String(s) => Ok(Self::String(s.clone())),
            Value::Number(n) => n
                .as_f64()
                .map(Self::Number)
                .ok_or_else(|| NeoformError::UnsupportedValue(n.to_string())),
            Value::Bool(b) => Ok(Self::Boolean(*b)),
            Value::Array(items) => list_from_json(items).map(Self::List),
            other => Err(NeoformError::UnsupportedValue(other.to_string())),
        }
    }

    /// Restore the declared shape lost in JSON: ISO text becomes `Date`
    /// (or `Date[]`) and an empty list takes the declared element kind.
    ///
    /// Text that does not parse is left unchanged for the checker to report.
    pub fn hydrate_as(self, declared: SchemaType) -> Self {
        match (declared, self) {
            (SchemaType::Date, Self::String(s)) => match parse_date(&s) {
                Some(date) => Self::Date(date),
                None => Self::String(s),
            },
            (SchemaType::List(element), Self::List(list)) if list.is_empty() => {
                Self::List(NeoList::empty(element))
            }
            (SchemaType::List(ElementType::Date), Self::List(NeoList::Strings(v))) => {
                match v.iter().map(|s| parse_date(s)).collect::<Option<Vec<_>>>() {
                    Some(dates) => Self::List(NeoList::Dates(dates)),
                    None => Self::List(NeoList::Strings(v)),
                }
            }
            (_, value) => value,
        }
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

fn list_from_json(items: &[Value]) -> Result<NeoList, NeoformError> {
    let unsupported = || NeoformError::UnsupportedValue(Value::Array(items.to_vec()).to_string());

    match items.first() {
        None => Ok(NeoList::Strings(Vec::new())),
        Some(Value::String(_)) => items
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(NeoList::Strings)
            .ok_or_else(unsupported),
        Some(Value::Number(_)) => items
            .iter()
            .map(Value::as_f64)
            .collect::<Option<Vec<_>>>()
            .map(NeoList::Numbers)
            .ok_or_else(unsupported),
        Some(Value::Bool(_)) => items
            .iter()
            .map(Value::as_bool)
            .collect::<Option<Vec<_>>>()
            .map(NeoList::Booleans)
            .ok_or_else(unsupported),
        Some(_) => Err(unsupported()),
    }
}

fn number_to_json(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn date_to_iso(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl Serialize for NeoValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NeoValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = Value::deserialize(deserializer)?;
        NeoValue::from_json(&json).map_err(serde::de::Error::custom)
    }
}

impl From<&str> for NeoValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for NeoValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for NeoValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for NeoValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for NeoValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for NeoValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<DateTime<Utc>> for NeoValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl From<Vec<String>> for NeoValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(NeoList::Strings(value))
    }
}

impl From<Vec<&str>> for NeoValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(NeoList::Strings(
            value.into_iter().map(str::to_string).collect(),
        ))
    }
}

impl From<Vec<f64>> for NeoValue {
    fn from(value: Vec<f64>) -> Self {
        Self::List(NeoList::Numbers(value))
    }
}

impl From<Vec<bool>> for NeoValue {
    fn from(value: Vec<bool>) -> Self {
        Self::List(NeoList::Booleans(value))
    }
}

impl From<Vec<DateTime<Utc>>> for NeoValue {
    fn from(value: Vec<DateTime<Utc>>) -> Self {
        Self::List(NeoList::Dates(value))
    }
}

impl From<NeoList> for NeoValue {
    fn from(value: NeoList) -> Self {
        Self::List(value)
    }
}

// ── Property Bag ──────────────────────────────────────────────────

/// Insertion-ordered mapping from property key to value.
///
/// Assigning to an existing key replaces its value in place, so iteration
/// order is the order in which keys were first inserted.
#[derive(Debug, Clone, Default)]
pub struct NeoProperties {
    entries: Vec<(String, NeoValue)>,
}

impl NeoProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set `key` to `value`, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<NeoValue>) -> Option<NeoValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&NeoValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<NeoValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NeoValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Equality ignores key order, like comparing two maps.
impl PartialEq for NeoProperties {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Into<String>, V: Into<NeoValue>> FromIterator<(K, V)> for NeoProperties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Self::new();
        props.extend(iter);
        props
    }
}

impl<K: Into<String>, V: Into<NeoValue>> Extend<(K, V)> for NeoProperties {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for NeoProperties {
    type Item = (String, NeoValue);
    type IntoIter = std::vec::IntoIter<(String, NeoValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for NeoProperties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NeoProperties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PropsVisitor;

        impl<'de> Visitor<'de> for PropsVisitor {
            type Value = NeoProperties;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of property values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut props = NeoProperties::new();
                while let Some((key, value)) = access.next_entry::<String, NeoValue>()? {
                    props.insert(key, value);
                }
                Ok(props)
            }
        }

        deserializer.deserialize_map(PropsVisitor)
    }
}

// ── Query Result Record ───────────────────────────────────────────

/// One row returned by the driver: keys paired positionally with fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawRecord")]
pub struct NeoRecord {
    keys: Vec<String>,
    fields: Vec<NeoValue>,
    field_lookup: HashMap<String, usize>,
}

#[derive(Deserialize)]
struct RawRecord {
    keys: Vec<String>,
    fields: Vec<NeoValue>,
}

impl From<RawRecord> for NeoRecord {
    fn from(raw: RawRecord) -> Self {
        Self::new(raw.keys, raw.fields)
    }
}

impl NeoRecord {
    pub fn new(keys: Vec<String>, fields: Vec<NeoValue>) -> Self {
        let field_lookup = keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), i))
            .collect();
        Self {
            keys,
            fields,
            field_lookup,
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn fields(&self) -> &[NeoValue] {
        &self.fields
    }

    /// Number of keys in the record.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn field_lookup(&self) -> &HashMap<String, usize> {
        &self.field_lookup
    }

    /// Look a field up by key through the auxiliary index.
    pub fn get(&self, key: &str) -> Option<&NeoValue> {
        self.field_lookup.get(key).and_then(|&i| self.fields.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_schema_type_names_round_trip() {
        for name in [
            "String", "Number", "Boolean", "Date", "String[]", "Number[]", "Boolean[]", "Date[]",
        ] {
            let ty: SchemaType = name.parse().unwrap();
            assert_eq!(ty.to_string(), name);
        }
        assert_eq!("number".parse::<SchemaType>().unwrap(), SchemaType::Number);
        assert!(matches!(
            "Object".parse::<SchemaType>(),
            Err(NeoformError::UnknownType(_))
        ));
    }

    #[test]
    fn test_value_reports_its_type() {
        assert_eq!(NeoValue::from("x").schema_type(), SchemaType::String);
        assert_eq!(NeoValue::from(1.5).schema_type(), SchemaType::Number);
        assert_eq!(NeoValue::from(true).schema_type(), SchemaType::Boolean);
        assert_eq!(
            NeoValue::from(Vec::<DateTime<Utc>>::new()).schema_type(),
            SchemaType::List(ElementType::Date)
        );
    }

    #[test]
    fn test_number_json_encoding() {
        assert_eq!(NeoValue::from(30).to_json().to_string(), "30");
        assert_eq!(NeoValue::from(2.5).to_json().to_string(), "2.5");
        assert_eq!(NeoValue::from(-0.0).to_json().to_string(), "0");
        assert_eq!(NeoValue::from(f64::NAN).to_json(), Value::Null);
        assert_eq!(NeoValue::from(f64::INFINITY).to_json(), Value::Null);
    }

    #[test]
    fn test_date_json_encoding() {
        let date = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            NeoValue::from(date).to_json().to_string(),
            "\"2020-01-02T03:04:05.000Z\""
        );
    }

    #[test]
    fn test_from_json_lists() {
        let json: Value = serde_json::from_str(r#"[1, 2, 3]"#).unwrap();
        assert_eq!(
            NeoValue::from_json(&json).unwrap(),
            NeoValue::from(vec![1.0, 2.0, 3.0])
        );

        let empty: Value = serde_json::from_str("[]").unwrap();
        assert_eq!(
            NeoValue::from_json(&empty).unwrap().schema_type(),
            SchemaType::List(ElementType::String)
        );

        let mixed: Value = serde_json::from_str(r#"[1, "a"]"#).unwrap();
        assert!(matches!(
            NeoValue::from_json(&mixed),
            Err(NeoformError::UnsupportedValue(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_null_and_objects() {
        assert!(NeoValue::from_json(&Value::Null).is_err());
        assert!(NeoValue::from_json(&serde_json::json!({"a": 1})).is_err());
    }

    #[test]
    fn test_properties_keep_insertion_order() {
        let mut props = NeoProperties::new();
        props.insert("name", "Ada");
        props.insert("age", 30);
        assert_eq!(props.insert("name", "Grace"), Some(NeoValue::from("Ada")));

        let keys: Vec<&str> = props.keys().collect();
        assert_eq!(keys, vec!["name", "age"]);
        assert_eq!(props.get("name"), Some(&NeoValue::from("Grace")));
    }

    #[test]
    fn test_properties_equality_ignores_order() {
        let a: NeoProperties = [("x", 1), ("y", 2)].into_iter().collect();
        let b: NeoProperties = [("y", 2), ("x", 1)].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_properties_deserialize_in_document_order() {
        let props: NeoProperties =
            serde_json::from_str(r#"{"zeta": "z", "alpha": ["a", "b"], "mid": false}"#).unwrap();
        let keys: Vec<&str> = props.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(props.get("alpha"), Some(&NeoValue::from(vec!["a", "b"])));
    }

    #[test]
    fn test_record_lookup_last_index_wins() {
        let record = NeoRecord::new(
            vec!["a".into(), "b".into(), "a".into()],
            vec![NeoValue::from(1), NeoValue::from(2), NeoValue::from(3)],
        );
        assert_eq!(record.len(), 3);
        assert_eq!(record.field_lookup().get("a"), Some(&2));
        assert_eq!(record.get("a"), Some(&NeoValue::from(3)));
    }

    #[test]
    fn test_record_exposes_keys_and_fields_read_only() {
        let record = NeoRecord::new(
            vec!["name".into(), "age".into()],
            vec![NeoValue::from("Ada"), NeoValue::from(30)],
        );
        assert_eq!(record.keys(), ["name".to_string(), "age".to_string()]);
        assert_eq!(record.fields(), [NeoValue::from("Ada"), NeoValue::from(30)]);
        assert_eq!(record.get("age"), Some(&NeoValue::from(30)));
    }

    #[test]
    fn test_properties_serialize_in_insertion_order() {
        let mut props = NeoProperties::new();
        props.insert("name", "Ada");
        props.insert("email", "ada@example.com");
        props.insert("age", 30);
        assert_eq!(
            serde_json::to_string(&props).unwrap(),
            r#"{"name":"Ada","email":"ada@example.com","age":30}"#
        );
    }

    #[test]
    fn test_hydrate_as_restores_declared_shape() {
        let born = Utc.with_ymd_and_hms(1815, 12, 10, 0, 0, 0).unwrap();
        assert_eq!(
            NeoValue::from("1815-12-10T00:00:00.000Z").hydrate_as(SchemaType::Date),
            NeoValue::from(born)
        );
        assert_eq!(
            NeoValue::from(Vec::<String>::new())
                .hydrate_as(SchemaType::List(ElementType::Number))
                .schema_type(),
            SchemaType::List(ElementType::Number)
        );
        assert_eq!(
            NeoValue::from("not a date").hydrate_as(SchemaType::Date),
            NeoValue::from("not a date")
        );
        assert_eq!(
            NeoValue::from("1815-12-10T00:00:00.000Z").hydrate_as(SchemaType::String),
            NeoValue::from("1815-12-10T00:00:00.000Z")
        );
    }

    #[test]
    fn test_record_deserializes_from_json() {
        let record: NeoRecord =
            serde_json::from_str(r#"{"keys": ["name"], "fields": ["Ada"]}"#).unwrap();
        assert_eq!(record.get("name"), Some(&NeoValue::from("Ada")));
    }
}
