//! Command implementations. Each returns the text to print.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use neoform_core::{create_props, to_query_props, NeoProperties, NeoRecord, Schema};
use neoform_graph::GraphClient;

use crate::config::CliConfig;
use crate::error::{CliError, Result};

/// Read and parse a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CliError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Load the schema named on the command line, else the configured one.
pub fn load_schema(arg: Option<&Path>, config: &CliConfig) -> Result<Schema> {
    let path = arg
        .map(Path::to_path_buf)
        .or_else(|| config.schema.as_ref().map(Into::into))
        .ok_or(CliError::NoSchema)?;
    tracing::debug!(path = %path.display(), "Loading schema");
    Ok(Schema::from_path(&path)?)
}

/// Validate a property bag and return its normalized form as JSON.
///
/// Input JSON carries dates as ISO text, so declared dates are restored
/// before validation.
pub fn check(schema: &Schema, props: &NeoProperties) -> Result<String> {
    let normalized = schema.validate(&schema.hydrate(props.clone()))?;
    pretty(&normalized)
}

/// Validate a property bag and return its property-map literal.
pub fn render(schema: &Schema, props: &NeoProperties) -> Result<String> {
    let normalized = schema.validate(&schema.hydrate(props.clone()))?;
    Ok(to_query_props(&normalized))
}

/// Decode a positional record into a schema-typed bag, as JSON.
pub fn decode(schema: &Schema, record: &NeoRecord) -> Result<String> {
    let props = schema.hydrate(create_props(record)?);
    pretty(&props)
}

/// Create a node and return it as JSON.
pub async fn create(
    client: &GraphClient,
    label: &str,
    schema: &Schema,
    props: &NeoProperties,
) -> Result<String> {
    let props = schema.hydrate(props.clone());
    let node = client.create_node(label, schema, &props).await?;
    pretty(&node)
}

/// Find nodes matching a filter and return them as a JSON array.
pub async fn find(
    client: &GraphClient,
    label: &str,
    schema: &Schema,
    filter: &NeoProperties,
    limit: u32,
) -> Result<String> {
    let filter = schema.hydrate(filter.clone());
    let nodes = client.find_nodes(label, schema, &filter, limit).await?;
    pretty(&nodes)
}

/// Pretty JSON through the order-preserving `Serialize` impls.
fn pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(CliError::Output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use neoform_core::NeoformError;

    const SCHEMA: &str = r#"{
        "name": { "type": "String", "required": true },
        "email": { "type": "String", "lowercase": true },
        "age": "Number",
        "born": "Date"
    }"#;

    fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn schema() -> Schema {
        serde_json::from_str(SCHEMA).unwrap()
    }

    #[test]
    fn test_render() {
        let props: NeoProperties =
            serde_json::from_str(r#"{ "name": "Ada", "age": 30 }"#).unwrap();
        assert_eq!(
            render(&schema(), &props).unwrap(),
            r#"{ name: "Ada", age: 30 }"#
        );
    }

    #[test]
    fn test_check_normalizes() {
        let props: NeoProperties =
            serde_json::from_str(r#"{ "name": "Ada", "email": "ADA@EXAMPLE.COM" }"#).unwrap();
        let out = check(&schema(), &props).unwrap();
        assert!(out.contains("ada@example.com"));
    }

    #[test]
    fn test_check_reports_mismatch() {
        let props: NeoProperties =
            serde_json::from_str(r#"{ "name": "Ada", "age": "thirty" }"#).unwrap();
        let err = check(&schema(), &props).unwrap_err();
        assert!(matches!(
            err,
            CliError::Schema(NeoformError::TypeMismatch { .. })
        ));
        assert!(err.to_string().contains("expected age to be Number"));
    }

    #[test]
    fn test_check_accepts_iso_dates() {
        let props: NeoProperties = serde_json::from_str(
            r#"{ "name": "Ada", "born": "1815-12-10T00:00:00.000Z" }"#,
        )
        .unwrap();
        let out = check(&schema(), &props).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["born"], "1815-12-10T00:00:00.000Z");
    }

    #[test]
    fn test_render_accepts_iso_dates() {
        let props: NeoProperties = serde_json::from_str(
            r#"{ "name": "Ada", "born": "1815-12-10T00:00:00.000Z" }"#,
        )
        .unwrap();
        assert_eq!(
            render(&schema(), &props).unwrap(),
            r#"{ name: "Ada", born: "1815-12-10T00:00:00.000Z" }"#
        );
    }

    #[test]
    fn test_check_rejects_unparseable_date() {
        let props: NeoProperties =
            serde_json::from_str(r#"{ "name": "Ada", "born": "yesterday" }"#).unwrap();
        assert!(matches!(
            check(&schema(), &props),
            Err(CliError::Schema(NeoformError::TypeMismatch { .. }))
        ));
    }

    #[test]
    fn test_output_keeps_key_order() {
        let props: NeoProperties = serde_json::from_str(
            r#"{ "name": "Ada", "email": "ada@example.com", "age": 30 }"#,
        )
        .unwrap();
        let out = check(&schema(), &props).unwrap();
        let name = out.find("\"name\"").unwrap();
        let email = out.find("\"email\"").unwrap();
        let age = out.find("\"age\"").unwrap();
        assert!(name < email && email < age, "{out}");

        let record: NeoRecord = serde_json::from_str(
            r#"{ "keys": ["name", "email", "age"], "fields": ["Ada", "a@b", 30] }"#,
        )
        .unwrap();
        let out = decode(&schema(), &record).unwrap();
        assert!(out.find("\"name\"").unwrap() < out.find("\"age\"").unwrap());
    }

    #[test]
    fn test_decode_hydrates_dates() {
        let record: NeoRecord = serde_json::from_str(
            r#"{ "keys": ["name", "born"], "fields": ["Ada", "1815-12-10T00:00:00.000Z"] }"#,
        )
        .unwrap();
        let out = decode(&schema(), &record).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["name"], "Ada");
        assert_eq!(json["born"], "1815-12-10T00:00:00.000Z");
    }

    #[test]
    fn test_decode_rejects_misaligned_record() {
        let record: NeoRecord =
            serde_json::from_str(r#"{ "keys": ["name", "age"], "fields": ["Ada"] }"#).unwrap();
        assert!(matches!(
            decode(&schema(), &record),
            Err(CliError::Schema(NeoformError::MalformedRecord { .. }))
        ));
    }

    #[test]
    fn test_load_schema_prefers_argument() {
        let dir = tempfile::tempdir().unwrap();
        let arg = write(dir.path(), "arg.json", r#"{ "a": "String" }"#);
        let configured = write(dir.path(), "cfg.json", r#"{ "b": "Number" }"#);
        let config = CliConfig {
            schema: Some(configured.to_str().unwrap().to_string()),
            ..CliConfig::default()
        };

        let schema = load_schema(Some(&arg), &config).unwrap();
        assert!(schema.get("a").is_some());

        let schema = load_schema(None, &config).unwrap();
        assert!(schema.get("b").is_some());
    }

    #[test]
    fn test_load_schema_requires_a_source() {
        assert!(matches!(
            load_schema(None, &CliConfig::default()),
            Err(CliError::NoSchema)
        ));
    }

    #[test]
    fn test_read_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "bad.json", "{ nope");
        let err = read_json::<NeoProperties>(&path).unwrap_err();
        assert!(matches!(err, CliError::Json { .. }));
        assert!(err.to_string().contains("bad.json"));
    }
}
