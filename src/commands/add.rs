use clap::Args;

use crate::inventory::Inventory;
use crate::store::DocumentStore;

/// Add one unit of an item, creating it if new
#[derive(Args)]
pub struct AddCommand {
    /// Item name
    pub name: String,
}

impl AddCommand {
    pub async fn run<S: DocumentStore>(
        &self,
        inventory: &mut Inventory<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        inventory.add_item(&self.name).await?;

        let name = self.name.trim();
        if let Some(item) = inventory.snapshot().iter().find(|i| i.name == name) {
            println!("{}", item);
        }

        Ok(())
    }
}
