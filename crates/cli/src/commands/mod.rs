use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;
use showroom_store::{Filter, Result, Store, StoreConfig, StoreError};
use tracing::{debug, error};

/// Aggregate command module.
mod aggregate;
/// Count command module.
mod count;
/// Delete command module.
mod delete;
/// Drop command module.
mod drop_collection;
/// Find command module.
mod find;
/// Get command module.
mod get;
/// Insert command module.
mod insert;
/// List command module.
mod list;
/// Update command module.
mod update;

/// The CLI for the Showroom document store.
///
/// Every command opens the store, performs one operation and prints its result
/// as JSON on stdout.
#[derive(Parser)]
#[command(name = "showroom", version, about)]
pub struct Cli {
    #[command(subcommand)]
    /// The subcommand to execute.
    pub command: Commands,

    /// Storage root directory (overrides the configuration file) [default: data]
    #[arg(long, value_name = "PATH", global = true)]
    pub store: Option<PathBuf>,

    /// JSON configuration file for the store
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase verbosity (can be used multiple times: -v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Enumeration of all available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List the collections that have a backing file.
    List,
    /// Delete a collection file.
    Drop(drop_collection::DropArgs),
    /// Insert a document, or every element of a JSON array.
    Insert(insert::InsertArgs),
    /// Find documents, optionally sorted, paged and projected.
    Find(find::FindArgs),
    /// Print a document by `_id`.
    Get(get::GetArgs),
    /// Count documents matching a filter.
    Count(count::CountArgs),
    /// Update the first document matching an `_id` or a filter.
    Update(update::UpdateArgs),
    /// Delete the first, or every, document matching an `_id` or a filter.
    Delete(delete::DeleteArgs),
    /// Run an aggregation pipeline.
    Aggregate(aggregate::AggregateArgs),
}

/// Resolve the store configuration, open the store and run the command.
pub async fn run_command(cli: Cli) -> Result<()> {
    let config = resolve_config(cli.config.as_ref(), cli.store).await?;
    debug!("Using store configuration {:?}", config);
    let store = Store::open_with_config(config).await;

    let output = match cli.command {
        Commands::List => list::run(&store).await,
        Commands::Drop(args) => drop_collection::run(&store, args).await,
        Commands::Insert(args) => insert::run(&store, args).await,
        Commands::Find(args) => find::run(&store, args).await,
        Commands::Get(args) => get::run(&store, args).await,
        Commands::Count(args) => count::run(&store, args).await,
        Commands::Update(args) => update::run(&store, args).await,
        Commands::Delete(args) => delete::run(&store, args).await,
        Commands::Aggregate(args) => aggregate::run(&store, args).await,
    }?;
    print_json(&output)
}

/// Configuration file first, then `--store` on top.
async fn resolve_config(config_path: Option<&PathBuf>, store: Option<PathBuf>) -> Result<StoreConfig> {
    let mut config = match config_path {
        Some(path) => StoreConfig::load(path).await?,
        None => StoreConfig::default(),
    };
    if let Some(root) = store {
        config.root_path = root;
    }
    Ok(config)
}

/// Parse a JSON command-line argument.
fn parse_json(flag: &str, raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|e| {
        error!("Argument {} is not valid JSON: {}", flag, e);
        StoreError::Json {
            source: e,
        }
    })
}

/// Build the filter targeted by `--id` or `--filter`; neither means every document.
fn target_filter(id: Option<&str>, filter: Option<&str>) -> Result<Filter> {
    match (id, filter) {
        (Some(id), _) => Ok(Filter::by_id(id)),
        (None, Some(raw)) => Filter::from_value(&parse_json("--filter", raw)?),
        (None, None) => Ok(Filter::new()),
    }
}

#[allow(clippy::print_stdout, reason = "CLI output")]
fn print_json(value: &Value) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        error!("Failed to serialize command output: {}", e);
        e
    })?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["showroom", "--store", "/tmp/store", "list"]).unwrap();
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/store")));
        assert!(matches!(cli.command, Commands::List));

        let cli = Cli::try_parse_from([
            "showroom",
            "find",
            "cars",
            "--filter",
            r#"{"brand": "BMW"}"#,
            "--sort",
            r#"{"price": -1}"#,
            "--skip",
            "2",
            "--limit",
            "5",
            "--project",
            "brand,price",
        ])
        .unwrap();
        match cli.command {
            Commands::Find(args) => {
                assert_eq!(args.collection, "cars");
                assert_eq!(args.skip, Some(2));
                assert_eq!(args.limit, Some(5));
                assert_eq!(args.project.as_deref(), Some("brand,price"));
            },
            _ => panic!("Expected Find command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["showroom", "count", "cars", "-vv", "--json", "--store", "db"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
        assert_eq!(cli.store, Some(PathBuf::from("db")));
    }

    #[test]
    fn test_update_requires_a_target() {
        assert!(Cli::try_parse_from(["showroom", "update", "cars", "--data", "{}"]).is_err());
        assert!(Cli::try_parse_from([
            "showroom", "update", "cars", "--id", "a", "--filter", "{}", "--data", "{}"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["showroom", "update", "cars", "--id", "a", "--data", "{}"]).is_ok());
    }

    #[test]
    fn test_invalid_command() {
        assert!(Cli::try_parse_from(["showroom", "vacuum"]).is_err());
        assert!(Cli::try_parse_from(["showroom", "get", "cars"]).is_err());
    }

    #[test]
    fn test_target_filter() {
        assert_eq!(target_filter(Some("x"), None).unwrap().conditions().len(), 1);
        assert!(target_filter(None, None).unwrap().is_empty());
        assert_eq!(
            target_filter(None, Some(r#"{"a": 1, "b": 2}"#))
                .unwrap()
                .conditions()
                .len(),
            2
        );
        assert!(matches!(
            target_filter(None, Some("{oops")),
            Err(StoreError::Json { .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("showroom.json");
        tokio::fs::write(&path, r#"{"root_path": "/srv/cars", "atomic_writes": false}"#)
            .await
            .unwrap();

        let config = resolve_config(Some(&path), None).await.unwrap();
        assert_eq!(config.root_path, PathBuf::from("/srv/cars"));
        assert!(!config.atomic_writes);

        let config = resolve_config(Some(&path), Some(PathBuf::from("/tmp/other")))
            .await
            .unwrap();
        assert_eq!(config.root_path, PathBuf::from("/tmp/other"));
        assert!(!config.atomic_writes);

        let config = resolve_config(None, None).await.unwrap();
        assert_eq!(config, StoreConfig::default());
    }
}
