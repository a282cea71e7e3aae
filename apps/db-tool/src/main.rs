//! CLI tool for record encoding and data import.
//!
//! Provides commands for:
//! - Encoding a JSON record into a blob
//! - Decoding a blob back into JSON
//! - Importing JSON records into a configured storage engine
//!
//! Schemas are JSON type descriptors, e.g.
//! `{"name": "Person", "fields": [{"name": "id", "kind": "string"}]}`.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use record_store_core::codec::Codec;
use record_store_core::{json, DbConfig, EngineRegistry, TypeDescriptor};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the record tool.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a JSON record into a blob
    Encode {
        /// Path to the JSON schema
        #[arg(short, long)]
        schema: PathBuf,

        /// Path to the JSON record (stdin when absent)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Decode a blob into JSON
    Decode {
        /// Path to the JSON schema
        #[arg(short, long)]
        schema: PathBuf,

        /// Encoded record
        blob: String,

        /// Path to a TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Import an array of JSON records into a table
    Import {
        /// Path to the JSON schema
        #[arg(short, long)]
        schema: PathBuf,

        /// Primary key field
        #[arg(short, long)]
        primary_key: String,

        /// Path to a JSON array of records
        #[arg(short, long)]
        records: PathBuf,

        /// Print the record with this key after importing
        #[arg(short, long)]
        get: Option<String>,

        /// Path to a TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Encode { schema, input } => {
            let desc = load_schema(&schema)?;
            let text = match input {
                Some(path) => fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read record {}", path.display()))?,
                None => {
                    let mut text = String::new();
                    std::io::stdin()
                        .read_to_string(&mut text)
                        .context("Failed to read record from stdin")?;
                    text
                }
            };
            println!("{}", encode_record(&desc, &text)?);
        }
        Commands::Decode {
            schema,
            blob,
            config,
        } => {
            let desc = load_schema(&schema)?;
            let config = load_config(config.as_deref())?;
            println!("{}", decode_record(&config, &desc, &blob)?);
        }
        Commands::Import {
            schema,
            primary_key,
            records,
            get,
            config,
        } => {
            let desc = load_schema(&schema)?;
            let config = load_config(config.as_deref())?;
            let text = fs::read_to_string(&records)
                .with_context(|| format!("Failed to read records {}", records.display()))?;
            let found = import_records(&config, desc, &primary_key, &text, get.as_deref())?;
            if let Some(found) = found {
                println!("{}", found);
            }
        }
    }
    Ok(())
}

fn load_schema(path: &Path) -> Result<TypeDescriptor> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid schema {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<DbConfig> {
    let mut config = match path {
        Some(path) => DbConfig::from_file(path)?,
        None => DbConfig::default(),
    };
    config.apply_env_overrides()?;
    Ok(config)
}

fn encode_record(desc: &TypeDescriptor, text: &str) -> Result<String> {
    let doc: serde_json::Value = serde_json::from_str(text).context("Record is not valid JSON")?;
    let value = json::record_from_json(&doc, desc)?;
    Ok(Codec::new().encode(&value)?)
}

/// Decodes with the configured emptiness collapse rule.
fn decode_record(config: &DbConfig, desc: &TypeDescriptor, blob: &str) -> Result<String> {
    let codec = Codec::with_empty_collapse(config.empty_collapse);
    let value = codec.decode(blob.trim(), desc)?;
    Ok(serde_json::to_string_pretty(&json::from_value(&value))?)
}

/// Imports records and returns the pretty JSON of the record named by `get`.
fn import_records(
    config: &DbConfig,
    desc: TypeDescriptor,
    primary_key: &str,
    text: &str,
    get: Option<&str>,
) -> Result<Option<String>> {
    let doc: serde_json::Value = serde_json::from_str(text).context("Records are not valid JSON")?;
    let serde_json::Value::Array(items) = doc else {
        bail!("Records must be a JSON array");
    };

    let registry = EngineRegistry::with_config(config);
    let engine = registry.open(config)?;
    let table = desc.name.clone();
    engine.create_table(desc.clone(), primary_key)?;

    for (i, item) in items.iter().enumerate() {
        let value = json::record_from_json(item, &desc)?;
        engine
            .insert(value)
            .with_context(|| format!("Failed to insert record {}", i))?;
    }
    tracing::info!(table = %table, count = items.len(), "Imported records");

    match get {
        Some(key) => {
            let value = engine.get(&table, key)?;
            Ok(Some(serde_json::to_string_pretty(&json::from_value(&value))?))
        }
        None => Ok(None),
    }
}
