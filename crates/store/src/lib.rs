#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`memory`]: BTreeMap 기반 인메모리 백엔드
//! - [`sqlite`]: `Mutex<Connection>`으로 직렬화된 SQLite 백엔드
//! - [`cache`]: TTL 캐시와 읽기-통과 래퍼
//!
//! # 공통 규약
//!
//! 모든 백엔드는 키 인자에 [`normalize`](shipscan_core::code::normalize)를 적용하고,
//! `created_at`을 마이크로초 정밀도로 잘라 저장합니다. 날짜 필터는
//! 로컬 타임존의 달력일을 양 끝 포함 구간으로 해석합니다.

use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

use shipscan_core::code::normalize;
use shipscan_core::config::StoreConfig;
use shipscan_core::error::{ConfigError, ShipscanError, StoreError, ValidationError};
use shipscan_core::store::DynShipmentStore;
use shipscan_core::types::NewShipment;

pub mod cache;
pub mod memory;
pub mod sqlite;

// --- 주요 타입 re-export ---

pub use cache::{CachedStore, TtlCache};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// 설정에 따라 스토어 백엔드를 구성합니다.
///
/// `[store] backend`로 엔진을 고르고, `[store.cache] enabled`이면
/// [`CachedStore`]로 감쌉니다. 반환된 핸들은 기동 시 한 번 만들어
/// 플로우/CLI에 전달됩니다 (전역 상태 없음).
pub fn build_store(config: &StoreConfig) -> Result<Box<dyn DynShipmentStore>, ShipscanError> {
    let backend: Box<dyn DynShipmentStore> = match config.backend.as_str() {
        "memory" => Box::new(MemoryStore::new()),
        "sqlite" => Box::new(SqliteStore::open(&config.sqlite_path)?),
        other => {
            return Err(ConfigError::InvalidValue {
                field: "store.backend".to_owned(),
                reason: format!("unknown backend '{other}'"),
            }
            .into());
        }
    };

    if config.cache.enabled {
        tracing::debug!(
            backend = %config.backend,
            ttl_secs = config.cache.ttl_secs,
            "wrapping store with list cache"
        );
        Ok(Box::new(CachedStore::new(
            backend,
            Duration::from_secs(config.cache.ttl_secs),
            config.cache.max_entries,
        )))
    } else {
        Ok(backend)
    }
}

/// 삽입 입력을 정규화하고 필수 필드를 검증합니다.
///
/// 모든 백엔드의 insert 경로가 이 헬퍼를 거치므로, 수동 입력/임포트/
/// 스캔 어느 경로로 들어와도 동일한 키가 만들어집니다.
pub(crate) fn prepare(new: NewShipment) -> Result<NewShipment, ShipscanError> {
    let track_code = normalize(&new.track_code);
    if track_code.is_empty() {
        return Err(ValidationError::EmptyField {
            field: "track_code".to_owned(),
        }
        .into());
    }
    let client_code = normalize(&new.client_code);
    if client_code.is_empty() {
        return Err(ValidationError::EmptyField {
            field: "client_code".to_owned(),
        }
        .into());
    }
    Ok(NewShipment {
        track_code,
        client_code,
        description: new.description,
    })
}

/// 로컬 달력일을 UTC 닫힌 구간 `[start, end]`로 변환합니다.
///
/// `end`는 다음 날 로컬 자정에서 1마이크로초를 뺀 시각입니다
/// (저장 정밀도가 마이크로초이므로 닫힌 구간과 반개구간이 일치).
pub(crate) fn local_day_bounds(
    day: NaiveDate,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ShipscanError> {
    let start = local_midnight(day)?;
    let next_day = day.succ_opt().ok_or_else(|| {
        ShipscanError::Store(StoreError::Query(format!("date out of range: {day}")))
    })?;
    let end = local_midnight(next_day)? - chrono::Duration::microseconds(1);
    Ok((start, end))
}

fn local_midnight(day: NaiveDate) -> Result<DateTime<Utc>, ShipscanError> {
    let naive = day.and_time(NaiveTime::MIN);
    // DST 전환으로 로컬 자정이 존재하지 않는 타임존에서는 가장 이른 유효 시각을 사용
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            ShipscanError::Store(StoreError::Query(format!(
                "no valid local midnight for {day}"
            )))
        })
}
