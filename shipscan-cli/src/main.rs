//! Shipscan CLI 진입점
//!
//! 설정 로드 → 로깅 초기화 → 스토어 구성 → 서브커맨드 디스패치 순서로
//! 동작합니다. 스토어 핸들은 여기서 한 번 열려 명령 처리기에
//! 전달됩니다 (전역 상태 없음).

mod cli;
mod commands;
mod logging;
mod output;

use anyhow::Result;
use clap::Parser;

use shipscan_core::config::ShipscanConfig;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ShipscanConfig::load_or_default(&cli.config).await?;
    if let Some(level) = &cli.log_level {
        config.general.log_level = level.clone();
        config.validate()?;
    }
    logging::init_tracing(&config.general)?;

    tracing::debug!(config = %cli.config.display(), "shipscan starting");
    commands::dispatch(cli, config).await
}
