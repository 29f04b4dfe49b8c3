//! `shipscan list` -- list stored shipments.

use anyhow::Result;

use shipscan_core::store::DynShipmentStore;

use crate::cli::{ListArgs, OutputFormat};
use crate::output::print_shipments;

pub async fn run(args: ListArgs, store: &dyn DynShipmentStore, format: OutputFormat) -> Result<()> {
    let shipments = store.list(args.date).await?;
    print_shipments(&shipments, format)
}
