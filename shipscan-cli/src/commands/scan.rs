//! `shipscan scan` -- decode an image and reconcile each detected code.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};

use shipscan_core::config::ShipscanConfig;
use shipscan_core::store::DynShipmentStore;
use shipscan_decode::{DecodeOptions, ImageDecoder};
use shipscan_flow::{LookupResult, PendingUpdate, ReconcileFlow, ScanOutcome};

use crate::cli::{OutputFormat, ScanArgs};
use crate::output::print_shipment;

pub async fn run(
    args: ScanArgs,
    store: Arc<dyn DynShipmentStore>,
    config: &ShipscanConfig,
    format: OutputFormat,
) -> Result<()> {
    let bytes = tokio::fs::read(&args.image)
        .await
        .with_context(|| format!("failed to read image {}", args.image.display()))?;
    let name_hint = args.image.file_name().and_then(|n| n.to_str());

    let decoder = Arc::new(ImageDecoder::new(DecodeOptions {
        crop_margin_fraction: config.decoder.crop_margin_fraction,
    }));
    let flow = ReconcileFlow::new(store, decoder);

    match flow.scan(&bytes, name_hint).await? {
        ScanOutcome::NoCode => {
            println!("No barcode or QR code detected.");
        }
        ScanOutcome::Codes(results) => {
            for result in results {
                println!();
                println!("Detected: {}", result.raw);
                match result.lookup {
                    LookupResult::NotFound => {
                        println!("No shipment found for '{}'.", result.track_code);
                    }
                    LookupResult::Found { shipment, pending } => {
                        print_shipment(&shipment, format)?;

                        let mut update = pending;
                        if let Some(arrived) = args.arrived {
                            update.arrived = arrived;
                        }
                        if let Some(issued) = args.issued {
                            update.issued = issued;
                        }

                        // 스캔만으로는 상태가 바뀌지 않음 -- 명시적 확인 시에만 커밋
                        let confirmed = args.yes || prompt_confirmation(&update)?;
                        if confirmed {
                            let affected = flow.commit(&update).await?;
                            if affected > 0 {
                                println!(
                                    "Updated '{}': arrived={} issued={}",
                                    update.track_code, update.arrived, update.issued
                                );
                            } else {
                                println!(
                                    "No record matched '{}' at commit time.",
                                    update.track_code
                                );
                            }
                        } else {
                            println!("Left '{}' unchanged.", update.track_code);
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

fn prompt_confirmation(update: &PendingUpdate) -> Result<bool> {
    print!(
        "Apply arrived={} issued={} to '{}'? [y/N] ",
        update.arrived, update.issued, update.track_code
    );
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}
