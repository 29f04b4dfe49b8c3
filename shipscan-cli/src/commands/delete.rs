//! `shipscan delete` -- delete a shipment by track code.

use anyhow::Result;

use shipscan_core::store::DynShipmentStore;

use crate::cli::DeleteArgs;

pub async fn run(args: DeleteArgs, store: &dyn DynShipmentStore) -> Result<()> {
    let affected = store.delete_by_track_code(&args.track_code).await?;
    if affected > 0 {
        println!("Deleted '{}'.", args.track_code);
    } else {
        println!("No shipment found for '{}'.", args.track_code);
    }
    Ok(())
}
