//! `shipscan config` -- validate and display effective configuration.

use anyhow::Result;

use shipscan_core::config::ShipscanConfig;

use crate::cli::{ConfigAction, ConfigArgs, OutputFormat};

pub fn run(args: ConfigArgs, config: &ShipscanConfig, format: OutputFormat) -> Result<()> {
    match args.action {
        ConfigAction::Validate => {
            // 여기 도달했다면 로드 시 검증을 이미 통과한 상태
            config.validate()?;
            println!("Configuration is valid.");
            Ok(())
        }
        ConfigAction::Show { section } => show(config, section.as_deref(), format),
    }
}

fn show(config: &ShipscanConfig, section: Option<&str>, format: OutputFormat) -> Result<()> {
    let rendered = match section {
        None => render(config, format)?,
        Some("general") => render(&config.general, format)?,
        Some("store") => render(&config.store, format)?,
        Some("decoder") => render(&config.decoder, format)?,
        Some(other) => {
            anyhow::bail!("unknown section '{other}', expected one of: general, store, decoder")
        }
    };
    println!("{rendered}");
    Ok(())
}

fn render<T: serde::Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(toml::to_string_pretty(value)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
    }
}
