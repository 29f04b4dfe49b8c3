//! Subcommand handlers.

mod add;
mod config;
mod delete;
mod export;
mod import;
mod list;
mod scan;
mod status;

use std::sync::Arc;

use anyhow::Result;

use shipscan_core::config::ShipscanConfig;
use shipscan_core::store::DynShipmentStore;
use shipscan_store::build_store;

use crate::cli::{Cli, Commands};

/// Route a parsed command line to its handler.
///
/// The store handle is only opened for commands that touch persistence;
/// `config` subcommands run without one.
pub async fn dispatch(cli: Cli, config: ShipscanConfig) -> Result<()> {
    match cli.command {
        Commands::Config(args) => config::run(args, &config, cli.output),
        command => {
            let store: Arc<dyn DynShipmentStore> = Arc::from(build_store(&config.store)?);
            match command {
                Commands::Scan(args) => scan::run(args, store, &config, cli.output).await,
                Commands::Add(args) => add::run(args, store.as_ref(), cli.output).await,
                Commands::List(args) => list::run(args, store.as_ref(), cli.output).await,
                Commands::Import(args) => import::run(args, store.as_ref()).await,
                Commands::Export(args) => export::run(args, store.as_ref()).await,
                Commands::Delete(args) => delete::run(args, store.as_ref()).await,
                Commands::Status(args) => status::run(args, store.as_ref(), cli.output).await,
                Commands::Config(_) => unreachable!("handled above"),
            }
        }
    }
}
