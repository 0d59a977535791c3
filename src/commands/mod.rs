mod add;
mod config_cmd;
mod list;
mod remove;
mod search;
mod watch;

pub use add::AddCommand;
pub use config_cmd::ConfigCommand;
pub use list::ListCommand;
pub use remove::RemoveCommand;
pub use search::SearchCommand;
pub use watch::WatchCommand;

use clap::ValueEnum;

use crate::models::InventoryItem;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Prints a snapshot (or a filtered view of one) in the chosen format.
fn print_items(
    items: &[InventoryItem],
    format: &OutputFormat,
    empty_message: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(items)?);
        }
        OutputFormat::Text => {
            if items.is_empty() {
                println!("{}", empty_message);
            } else {
                for item in items {
                    println!("{}", item);
                }
            }
        }
    }
    Ok(())
}
