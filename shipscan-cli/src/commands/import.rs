//! `shipscan import` -- bulk-import shipments from CSV.

use anyhow::{Context, Result};

use shipscan_core::store::DynShipmentStore;
use shipscan_flow::import_shipments;

use crate::cli::ImportArgs;

pub async fn run(args: ImportArgs, store: &dyn DynShipmentStore) -> Result<()> {
    let file = std::fs::File::open(&args.file)
        .with_context(|| format!("failed to open {}", args.file.display()))?;

    let count = import_shipments(store, file).await?;
    println!("Imported {count} shipments.");
    Ok(())
}
