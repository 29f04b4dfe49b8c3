//! Rendering helpers for command output.
//!
//! Keeps table/JSON formatting out of the command handlers.

use anyhow::Result;

use shipscan_core::types::{Shipment, flag_label};

use crate::cli::OutputFormat;

/// Print a list of shipments in the requested format.
pub fn print_shipments(shipments: &[Shipment], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(shipments)?);
        }
        OutputFormat::Text => {
            if shipments.is_empty() {
                println!("No shipments.");
                return Ok(());
            }
            println!(
                "{:<20} {:<12} {:<25} {:<8} {:<8} {}",
                "Track code", "Client", "Created", "Arrived", "Issued", "Description"
            );
            println!("{}", "-".repeat(92));
            for shipment in shipments {
                println!(
                    "{:<20} {:<12} {:<25} {:<8} {:<8} {}",
                    shipment.track_code,
                    shipment.client_code,
                    shipment.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    flag_label(shipment.arrived),
                    flag_label(shipment.issued),
                    shipment.description,
                );
            }
        }
    }
    Ok(())
}

/// Print a single shipment record.
pub fn print_shipment(shipment: &Shipment, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(shipment)?);
        }
        OutputFormat::Text => {
            println!("Track code:  {}", shipment.track_code);
            println!("Client code: {}", shipment.client_code);
            println!("Description: {}", shipment.description);
            println!(
                "Created at:  {}",
                shipment.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            println!("Arrived:     {}", flag_label(shipment.arrived));
            println!("Issued:      {}", flag_label(shipment.issued));
        }
    }
    Ok(())
}
