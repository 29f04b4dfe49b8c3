//! `shipscan export` -- export shipments to CSV.

use anyhow::{Context, Result};

use shipscan_core::store::DynShipmentStore;
use shipscan_flow::export_shipments;

use crate::cli::ExportArgs;

pub async fn run(args: ExportArgs, store: &dyn DynShipmentStore) -> Result<()> {
    match args.output_file {
        Some(path) => {
            let file = std::fs::File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let count = export_shipments(store, args.date, file).await?;
            println!("Exported {count} shipments to {}.", path.display());
        }
        None => {
            let count = export_shipments(store, args.date, std::io::stdout().lock()).await?;
            eprintln!("Exported {count} shipments.");
        }
    }
    Ok(())
}
