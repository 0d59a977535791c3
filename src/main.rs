use clap::{Parser, Subcommand};
use std::path::PathBuf;

use stockpile::commands::{
    AddCommand, ConfigCommand, ListCommand, RemoveCommand, SearchCommand, WatchCommand,
};
use stockpile::config::Config;
use stockpile::inventory::Inventory;
use stockpile::store::HttpStore;

#[derive(Parser)]
#[command(name = "stockpile")]
#[command(version)]
#[command(about = "An inventory tracker backed by a remote document store", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of an item
    Add(AddCommand),

    /// Remove one unit of an item
    Remove(RemoveCommand),

    /// List the inventory
    List(ListCommand),

    /// Search items by name
    Search(SearchCommand),

    /// Watch the inventory for changes
    Watch(WatchCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockpile=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Add(cmd)) => {
            let mut inventory = connect(&config);
            cmd.run(&mut inventory).await?;
        }
        Some(Commands::Remove(cmd)) => {
            let mut inventory = connect(&config);
            cmd.run(&mut inventory).await?;
        }
        Some(Commands::List(cmd)) => {
            let mut inventory = connect(&config);
            cmd.run(&mut inventory).await?;
        }
        Some(Commands::Search(cmd)) => {
            let mut inventory = connect(&config);
            cmd.run(&mut inventory).await?;
        }
        Some(Commands::Watch(cmd)) => {
            let mut inventory = connect(&config);
            cmd.run(&mut inventory).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

/// Builds a synchronizer over the configured server and collection.
fn connect(config: &Config) -> Inventory<HttpStore> {
    let store = HttpStore::new(config.server_url.value.clone());
    Inventory::new(store, config.collection.value.clone())
}
