use clap::Args;

use crate::inventory::Inventory;
use crate::store::DocumentStore;

/// Remove one unit of an item, deleting it at zero
#[derive(Args)]
pub struct RemoveCommand {
    /// Item name
    pub name: String,
}

impl RemoveCommand {
    pub async fn run<S: DocumentStore>(
        &self,
        inventory: &mut Inventory<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        inventory.remove_item(&self.name).await?;

        let name = self.name.trim();
        match inventory.snapshot().iter().find(|i| i.name == name) {
            Some(item) => println!("{}", item),
            None => println!("{}  x0", name),
        }

        Ok(())
    }
}
