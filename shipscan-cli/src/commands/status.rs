//! `shipscan status` -- update arrival/issuance flags.

use anyhow::Result;

use shipscan_core::store::DynShipmentStore;

use crate::cli::{OutputFormat, StatusArgs};
use crate::output::print_shipment;

pub async fn run(
    args: StatusArgs,
    store: &dyn DynShipmentStore,
    format: OutputFormat,
) -> Result<()> {
    let Some(current) = store.find_by_track_code(&args.track_code).await? else {
        println!("No shipment found for '{}'.", args.track_code);
        return Ok(());
    };

    // 지정하지 않은 플래그는 현재 값 유지
    let arrived = args.arrived.unwrap_or(current.arrived);
    let issued = args.issued.unwrap_or(current.issued);
    store
        .update_status(&current.track_code, arrived, issued)
        .await?;

    let Some(updated) = store.find_by_track_code(&current.track_code).await? else {
        println!("Record disappeared during update.");
        return Ok(());
    };
    print_shipment(&updated, format)?;
    Ok(())
}
