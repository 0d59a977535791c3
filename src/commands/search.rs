use clap::Args;

use super::{print_items, OutputFormat};
use crate::inventory::{filter, Inventory};
use crate::store::DocumentStore;

/// Search the inventory by name
#[derive(Args)]
pub struct SearchCommand {
    /// Case-insensitive substring to match against item names
    pub query: String,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl SearchCommand {
    pub async fn run<S: DocumentStore>(
        &self,
        inventory: &mut Inventory<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        inventory.refresh().await?;

        let matches = filter(inventory.snapshot(), &self.query);
        let empty_message = format!("No items matching '{}'.", self.query);
        print_items(&matches, &self.format, &empty_message)
    }
}
