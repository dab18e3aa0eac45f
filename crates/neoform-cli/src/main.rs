//! CLI entry point for neoform.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use neoform_core::{NeoProperties, NeoRecord};
use neoform_graph::GraphClient;

use neoform_cli::commands;
use neoform_cli::config;

#[derive(Parser)]
#[command(name = "neoform")]
#[command(about = "Validate, render, and store Neo4j property bags against a schema")]
struct Cli {
    /// Schema file (JSON map of property key to type descriptor).
    #[arg(short, long, global = true)]
    schema: Option<PathBuf>,

    /// Config file prefix (default: neoform).
    #[arg(short, long, global = true, default_value = "neoform")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a property bag and print its normalized form.
    Check {
        /// JSON file holding the property bag.
        props: PathBuf,
    },
    /// Validate a property bag and print its Cypher property-map literal.
    Render {
        /// JSON file holding the property bag.
        props: PathBuf,
    },
    /// Decode a `{ "keys": [...], "fields": [...] }` record.
    Decode {
        /// JSON file holding the record.
        record: PathBuf,
    },
    /// Create a node in Neo4j.
    Create {
        /// JSON file holding the property bag.
        props: PathBuf,
        /// Node label (otherwise read from config).
        #[arg(short, long)]
        label: Option<String>,
    },
    /// Find nodes in Neo4j whose properties match a filter.
    Find {
        /// JSON file holding the filter; omit to match every node.
        filter: Option<PathBuf>,
        /// Node label (otherwise read from config).
        #[arg(short, long)]
        label: Option<String>,
        /// Maximum nodes returned (otherwise read from config).
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let (cli_config, graph_config) = config::load(&cli.config)?;
    let schema = commands::load_schema(cli.schema.as_deref(), &cli_config)?;

    let output = match cli.command {
        Command::Check { props } => {
            let props: NeoProperties = commands::read_json(&props)?;
            commands::check(&schema, &props)?
        }
        Command::Render { props } => {
            let props: NeoProperties = commands::read_json(&props)?;
            commands::render(&schema, &props)?
        }
        Command::Decode { record } => {
            let record: NeoRecord = commands::read_json(&record)?;
            commands::decode(&schema, &record)?
        }
        Command::Create { props, label } => {
            let props: NeoProperties = commands::read_json(&props)?;
            let label = label.unwrap_or_else(|| cli_config.label.clone());
            let client = GraphClient::connect(&graph_config).await?;
            commands::create(&client, &label, &schema, &props).await?
        }
        Command::Find {
            filter,
            label,
            limit,
        } => {
            let filter: NeoProperties = match filter {
                Some(path) => commands::read_json(&path)?,
                None => NeoProperties::new(),
            };
            let label = label.unwrap_or_else(|| cli_config.label.clone());
            let limit = limit.unwrap_or(cli_config.limit);
            let client = GraphClient::connect(&graph_config).await?;
            commands::find(&client, &label, &schema, &filter, limit).await?
        }
    };

    println!("{output}");
    Ok(())
}
