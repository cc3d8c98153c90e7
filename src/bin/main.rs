//! Quarry CLI - inspect catalogs and preview the SQL a model would run
//!
//! Usage:
//!   quarry [--config <file>] [--catalog <file>] entities
//!   quarry find <entity> <id> [--with <relation>]... [--columns <column>]...
//!   quarry insert <entity> --set <column>=<value>...
//!   quarry update <entity> <id> --set <column>=<value>...
//!   quarry delete <entity> <id>
//!   quarry tree <entity> <rows.json>
//!
//! Statement commands run against a dry-run executor. With `[query] debug`
//! set they print the SQL with literals inlined, one statement per line;
//! otherwise each statement is printed with placeholders, followed by its
//! binds.

use clap::{Parser, Subcommand};
use quarry::config::Settings;
use quarry::sql::SelectColumn;
use quarry::prelude::equal;
use quarry::{tree, Catalog, ColumnType, DryRun, Entity, Model, Record, Value};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quarry")]
#[command(about = "Quarry - fluent SQL composition over an entity catalog")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to QUARRY_CONFIG, ./quarry.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Entity catalog, overriding `[catalog] path`
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List entities with their columns and relations
    Entities,

    /// Preview the SELECT that finds one record
    Find {
        entity: String,
        id: String,

        /// Relation to INNER JOIN (repeatable)
        #[arg(short, long = "with")]
        with: Vec<String>,

        /// Column to select (repeatable, defaults to `*`)
        #[arg(short, long = "columns")]
        columns: Vec<String>,
    },

    /// Preview an INSERT
    Insert {
        entity: String,

        /// Assignment `column=value` (repeatable)
        #[arg(short, long = "set", required = true)]
        set: Vec<String>,
    },

    /// Preview an UPDATE by primary key
    Update {
        entity: String,
        id: String,

        #[arg(short, long = "set", required = true)]
        set: Vec<String>,
    },

    /// Preview a DELETE by primary key
    Delete { entity: String, id: String },

    /// Assemble a result tree from `{ "columns": [...], "rows": [[...]] }`
    Tree { entity: String, rows: PathBuf },
}

#[derive(Deserialize)]
struct RowsFile {
    columns: Vec<String>,
    rows: Vec<Vec<serde_json::Value>>,
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, settings: &Settings) -> CliResult<()> {
    let path = match cli.catalog {
        Some(path) => path,
        None => settings.catalog.resolved_path()?,
    };
    debug!(path = %path.display(), "loading catalog");
    let catalog = Arc::new(Catalog::from_file_with_schema(
        &path,
        &settings.catalog.default_schema,
    )?);

    match cli.command {
        Commands::Entities => cmd_entities(&catalog),
        Commands::Find {
            entity,
            id,
            with,
            columns,
        } => {
            let mut model = model(&catalog, &entity, settings)?;
            let columns = if columns.is_empty() {
                vec!["*".to_string()]
            } else {
                columns
            };
            model.with(&with)?.find(id, &columns)?;
            print_sql(&mut model);
            Ok(())
        }
        Commands::Insert { entity, set } => {
            let mut model = model(&catalog, &entity, settings)?;
            let record = parse_assignments(model.entity(), &set)?;
            model.insert(&record)?;
            print_sql(&mut model);
            Ok(())
        }
        Commands::Update { entity, id, set } => {
            let mut model = model(&catalog, &entity, settings)?;
            let record = parse_assignments(model.entity(), &set)?;
            if model.is_debug() {
                model.update_by_id(id, &record)?;
            } else {
                // A dry run has no rows to check the record against.
                let pk = model.entity().primary_key.clone();
                model.filter(equal(pk, id))?.update(&record)?;
            }
            print_sql(&mut model);
            Ok(())
        }
        Commands::Delete { entity, id } => {
            let mut model = model(&catalog, &entity, settings)?;
            model.delete_by_id(id)?;
            print_sql(&mut model);
            Ok(())
        }
        Commands::Tree { entity, rows } => cmd_tree(&catalog, &entity, rows),
    }
}

fn model(catalog: &Arc<Catalog>, entity: &str, settings: &Settings) -> CliResult<Model<DryRun>> {
    Ok(Model::new(catalog.clone(), entity, DryRun::new())?.debug(settings.query.debug))
}

fn print_sql(model: &mut Model<DryRun>) {
    if model.is_debug() {
        for sql in model.take_sql() {
            println!("{}", sql);
        }
        return;
    }
    for executed in model.executor().executed() {
        println!("{}", executed.sql);
        for bind in &executed.binds {
            println!("  :{} = {}", bind.name, bind.value);
        }
    }
}

fn cmd_entities(catalog: &Catalog) -> CliResult<()> {
    if catalog.is_empty() {
        println!("No entities defined.");
        return Ok(());
    }

    for entity in catalog.iter() {
        println!(
            "{} ({}, primary key: {})",
            entity.name,
            entity.qualified_table(),
            entity.primary_key
        );
        for column in &entity.columns {
            println!("  - {}: {}", column.name, column.column_type.as_str());
        }
        for relation in &entity.relations {
            println!(
                "  -> {} ({}.{} = {}.{})",
                relation.name,
                relation.entity,
                relation.foreign_key,
                entity.table_name(),
                relation.local_key
            );
        }
    }
    Ok(())
}

fn cmd_tree(catalog: &Catalog, entity: &str, rows: PathBuf) -> CliResult<()> {
    let entity = catalog.get(entity)?;
    let source = fs::read_to_string(&rows)
        .map_err(|e| format!("reading '{}': {}", rows.display(), e))?;
    let file: RowsFile = serde_json::from_str(&source)?;

    let index: Vec<SelectColumn> = file.columns.iter().map(|c| SelectColumn::parse(c)).collect();
    let rows = file
        .rows
        .iter()
        .map(|row| row.iter().map(Value::from_json).collect())
        .collect();

    let tree = tree::assemble(catalog, &entity, &index, rows)?;
    println!("{}", serde_json::to_string_pretty(&tree)?);
    Ok(())
}

/// Parse `column=value` pairs, typing each value by its declared column.
fn parse_assignments(entity: &Entity, assignments: &[String]) -> CliResult<Record> {
    let mut record = Record::new();
    for assignment in assignments {
        let (column, raw) = assignment
            .split_once('=')
            .ok_or_else(|| format!("expected column=value, got '{}'", assignment))?;
        let column = column.trim();
        let value = match entity.column_type(column) {
            _ if raw.eq_ignore_ascii_case("null") => Value::Null,
            Some(ColumnType::Integer) => Value::Int(raw.parse()?),
            Some(ColumnType::Decimal) => Value::Float(raw.parse()?),
            Some(ColumnType::Boolean) => Value::Bool(raw.parse()?),
            _ => Value::Text(raw.to_string()),
        };
        record.push((column.to_string(), value));
    }
    Ok(record)
}
