//! Device repository CLI: inspect a repository graph from the command line
//!
//! Connects to the SPARQL endpoint named in the config file or environment.

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use device_repo::{Config, DeviceRepository, HttpSparqlStore, Persistence};
use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "device-repo", version, about = "IoT device repository CLI")]
struct Cli {
    /// JSON or YAML config file; environment variables override it
    #[arg(long, global = true, env = "DEVICE_REPO_CONFIG")]
    config: Option<String>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether an id is typed in the repository graph
    Exists { id: String },
    /// Check whether an id is an instance of a class
    Class { id: String, entity: String },
    /// Print the stored triples of an id
    Triples { id: String },
    /// List vendors
    Vendors {
        #[arg(long, default_value_t = 100)]
        limit: u64,
        #[arg(long, default_value_t = 0)]
        offset: u64,
    },
    /// Show a device type
    DeviceType {
        id: String,
        /// Levels of nested values to load; negative loads everything
        #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
        depth: i32,
    },
    /// Search value types by name, or list them
    ValueTypes {
        query: Option<String>,
        #[arg(long, default_value_t = 100)]
        limit: u64,
        #[arg(long, default_value_t = 0)]
        offset: u64,
    },
    /// Search protocols by name, or list them
    Protocols {
        query: Option<String>,
        #[arg(long, default_value_t = 100)]
        limit: u64,
        #[arg(long, default_value_t = 0)]
        offset: u64,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.apply_env()?;
    config.validate()?;

    let store = HttpSparqlStore::from_config(&config)?;
    let repo = DeviceRepository::new(Persistence::from_config(store, &config)?);
    let db = repo.persistence();
    let format = &cli.format;

    match cli.command {
        Commands::Exists { id } => {
            let exists = db.id_exists(&id).await?;
            print_flag("exists", exists, format)?;
        }
        Commands::Class { id, entity } => {
            let matches = db.id_has_class(&id, &entity).await?;
            print_flag("is_of_class", matches, format)?;
        }
        Commands::Triples { id } => {
            let triples = db.fetch_triples(&id).await?;
            let rows: Vec<TripleRow> = triples
                .iter()
                .map(|t| TripleRow {
                    subject: t.subject.as_ref().map(|s| s.to_string()).unwrap_or_default(),
                    predicate: t.predicate.to_string(),
                    object: t.object.to_string(),
                })
                .collect();
            print_rows(&rows, format)?;
        }
        Commands::Vendors { limit, offset } => {
            let vendors = repo.list_vendors(limit, offset).await?;
            print_rows(&vendors, format)?;
        }
        Commands::DeviceType { id, depth } => {
            let device_type = repo.device_type(&id, depth).await?;
            print_entity(&device_type, format)?;
        }
        Commands::ValueTypes { query, limit, offset } => {
            let query = query.unwrap_or_default();
            let value_types = repo.search_value_types(&query, limit, offset).await?;
            print_rows(&value_types, format)?;
        }
        Commands::Protocols { query, limit, offset } => {
            let query = query.unwrap_or_default();
            let protocols = repo.search_protocols(&query, limit, offset).await?;
            print_rows(&protocols, format)?;
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct TripleRow {
    subject: String,
    predicate: String,
    object: String,
}

fn print_flag(name: &str, value: bool, format: &OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            let mut map = serde_json::Map::new();
            map.insert(name.to_string(), serde_json::Value::Bool(value));
            println!("{}", serde_json::Value::Object(map));
        }
        OutputFormat::Table => println!("{}", value),
    }
    Ok(())
}

/// One row per item, one column per top-level JSON key
fn print_rows<T: Serialize>(items: &[T], format: &OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let values: Vec<serde_json::Value> = items
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&values)?);
        }
        OutputFormat::Table => {
            if values.is_empty() {
                println!("(no results)");
                return Ok(());
            }

            let mut columns: Vec<String> = Vec::new();
            for value in &values {
                if let serde_json::Value::Object(map) = value {
                    for key in map.keys() {
                        if !columns.contains(key) {
                            columns.push(key.clone());
                        }
                    }
                }
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(&columns);
            for value in &values {
                let cells: Vec<String> = columns
                    .iter()
                    .map(|c| value.get(c).map(format_table_value).unwrap_or_default())
                    .collect();
                table.add_row(cells);
            }

            println!("{}", table);
            println!("{} row(s)", values.len());
        }
    }
    Ok(())
}

/// Field / value table of one entity
fn print_entity<T: Serialize>(item: &T, format: &OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let value = serde_json::to_value(item)?;
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["field", "value"]);
            if let serde_json::Value::Object(map) = &value {
                for (key, field) in map {
                    table.add_row(vec![key.clone(), format_table_value(field)]);
                }
            }
            println!("{}", table);
        }
    }
    Ok(())
}

fn format_table_value(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Object(map) => {
            // Nested entities show as their id when they have one
            if let Some(serde_json::Value::String(id)) = map.get("id") {
                if let Some(serde_json::Value::String(name)) = map.get("name") {
                    return format!("{} ({})", name, id);
                }
                return id.clone();
            }
            serde_json::to_string(v).unwrap_or_default()
        }
        serde_json::Value::Array(items) => {
            let cells: Vec<String> = items.iter().map(format_table_value).collect();
            cells.join(", ")
        }
    }
}
