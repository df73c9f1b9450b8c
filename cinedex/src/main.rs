//! cinedex - URI-addressed movie catalog store
//!
//! Thin command-line surface over the provider: get-type, query, insert,
//! update, and delete, each addressed by a resource URI.

use anyhow::{Context, Result};
use cinedex_core::{Config, Database, Provider, ResourceUri, SqlValue, Values};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cinedex", version, about = "URI-addressed movie catalog store")]
struct Cli {
    /// Database file (defaults to the configured XDG data path)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the content type for a resource URI
    GetType {
        /// Resource URI, e.g. cinedex://cinedex.catalog/genre/3
        uri: String,
    },
    /// Query a collection or item URI, printing rows as JSON
    Query {
        uri: String,
        /// Comma-separated column list
        #[arg(long)]
        projection: Option<String>,
        /// Row filter predicate with ? placeholders
        #[arg(long = "where")]
        selection: Option<String>,
        /// Positional values for the filter placeholders
        #[arg(long, num_args = 0..)]
        args: Vec<String>,
        /// Sort order expression
        #[arg(long)]
        order: Option<String>,
    },
    /// Insert a row from col=value pairs, printing the new item URI
    Insert {
        uri: String,
        /// Column assignments, e.g. name=Family
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Update rows from col=value pairs, printing the affected row count
    Update {
        uri: String,
        /// Column assignments, e.g. name=Adventure
        #[arg(required = true)]
        values: Vec<String>,
        /// Row filter predicate with ? placeholders
        #[arg(long = "where")]
        selection: Option<String>,
        /// Positional values for the filter placeholders
        #[arg(long, num_args = 0..)]
        args: Vec<String>,
    },
    /// Delete rows, printing the affected row count
    Delete {
        uri: String,
        /// Row filter predicate with ? placeholders
        #[arg(long = "where")]
        selection: Option<String>,
        /// Positional values for the filter placeholders
        #[arg(long, num_args = 0..)]
        args: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard =
        cinedex_core::logging::init(&config.logging).context("failed to initialize logging")?;

    let db_path = cli.db.clone().unwrap_or_else(|| config.database_path());
    tracing::info!(path = %db_path.display(), "Opening database");

    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;
    let provider = Provider::new(db);

    match cli.command {
        Command::GetType { uri } => {
            println!("{}", provider.get_type(&parse_uri(&uri)?)?);
        }
        Command::Query {
            uri,
            projection,
            selection,
            args,
            order,
        } => {
            let columns: Option<Vec<&str>> =
                projection.as_deref().map(|p| p.split(',').map(str::trim).collect());
            let rows = provider.query(
                &parse_uri(&uri)?,
                columns.as_deref(),
                selection.as_deref(),
                &parse_args(&args),
                order.as_deref(),
            )?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Command::Insert { uri, values } => {
            let item = provider.insert(&parse_uri(&uri)?, &parse_values(&values)?)?;
            println!("{item}");
        }
        Command::Update {
            uri,
            values,
            selection,
            args,
        } => {
            let affected = provider.update(
                &parse_uri(&uri)?,
                &parse_values(&values)?,
                selection.as_deref(),
                &parse_args(&args),
            )?;
            println!("{affected}");
        }
        Command::Delete {
            uri,
            selection,
            args,
        } => {
            let affected = provider.delete(
                &parse_uri(&uri)?,
                selection.as_deref(),
                &parse_args(&args),
            )?;
            println!("{affected}");
        }
    }

    Ok(())
}

fn parse_uri(raw: &str) -> Result<ResourceUri> {
    ResourceUri::parse(raw).with_context(|| format!("invalid resource uri: {raw}"))
}

fn parse_values(pairs: &[String]) -> Result<Values> {
    let mut values = Values::new();
    for pair in pairs {
        let (column, raw) = pair
            .split_once('=')
            .with_context(|| format!("expected col=value, got: {pair}"))?;
        values.put(column, parse_sql_value(raw));
    }
    Ok(values)
}

fn parse_args(args: &[String]) -> Vec<SqlValue> {
    args.iter().map(|raw| parse_sql_value(raw)).collect()
}

/// Interpret a raw CLI token as a SQL value: integer, real, null, or text.
fn parse_sql_value(raw: &str) -> SqlValue {
    if raw.eq_ignore_ascii_case("null") {
        SqlValue::Null
    } else if let Ok(v) = raw.parse::<i64>() {
        SqlValue::Integer(v)
    } else if let Ok(v) = raw.parse::<f64>() {
        SqlValue::Real(v)
    } else {
        SqlValue::Text(raw.to_string())
    }
}
