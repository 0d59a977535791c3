use std::time::Duration;

use clap::Args;

use crate::inventory::Inventory;
use crate::models::InventoryItem;
use crate::store::DocumentStore;

/// Watch the inventory, re-printing the list whenever it changes
#[derive(Args)]
pub struct WatchCommand {
    /// Seconds between refreshes
    #[arg(long, short, default_value_t = 2)]
    pub interval: u64,
}

impl WatchCommand {
    pub async fn run<S: DocumentStore>(
        &self,
        inventory: &mut Inventory<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut rx = inventory.subscribe();

        inventory.refresh().await?;
        print_snapshot(&rx.borrow_and_update());

        let mut ticker = tokio::time::interval(Duration::from_secs(self.interval.max(1)));
        ticker.tick().await; // first tick completes immediately

        loop {
            ticker.tick().await;

            // A slow or unreachable server just delays the next render.
            if let Err(e) = inventory.refresh().await {
                tracing::warn!("refresh failed: {}", e);
                continue;
            }

            if rx.has_changed()? {
                let snapshot = rx.borrow_and_update().clone();
                println!();
                print_snapshot(&snapshot);
            }
        }
    }
}

fn print_snapshot(items: &[InventoryItem]) {
    if items.is_empty() {
        println!("Inventory is empty.");
    } else {
        for item in items {
            println!("{}", item);
        }
    }
}
