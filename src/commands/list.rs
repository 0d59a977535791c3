use clap::Args;

use super::{print_items, OutputFormat};
use crate::inventory::Inventory;
use crate::store::DocumentStore;

/// List the full inventory
#[derive(Args)]
pub struct ListCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ListCommand {
    pub async fn run<S: DocumentStore>(
        &self,
        inventory: &mut Inventory<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        inventory.refresh().await?;
        print_items(inventory.snapshot(), &self.format, "Inventory is empty.")
    }
}
