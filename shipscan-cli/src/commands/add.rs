//! `shipscan add` -- register a single shipment.

use anyhow::Result;

use shipscan_core::store::DynShipmentStore;
use shipscan_core::types::NewShipment;

use crate::cli::{AddArgs, OutputFormat};
use crate::output::print_shipment;

pub async fn run(args: AddArgs, store: &dyn DynShipmentStore, format: OutputFormat) -> Result<()> {
    let inserted = store
        .insert(NewShipment::new(
            args.track_code,
            args.client_code,
            args.description,
        ))
        .await?;

    print_shipment(&inserted, format)?;
    Ok(())
}
