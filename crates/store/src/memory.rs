//! 인메모리 스토어 백엔드
//!
//! `BTreeMap<track_code, Shipment>` 위에 구현된 가장 단순한 백엔드입니다.
//! 프로세스 종료와 함께 데이터가 사라지므로 테스트와 일회성 세션에
//! 사용합니다. 맵 키가 곧 트랙 코드이므로 유일성이 구조적으로 보장됩니다.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{NaiveDate, SubsecRound, Utc};
use metrics::counter;

use shipscan_core::code::normalize;
use shipscan_core::error::{ShipscanError, StoreError};
use shipscan_core::metrics::{
    LABEL_BACKEND, STORE_DELETES_TOTAL, STORE_INSERTS_TOTAL, STORE_LOOKUPS_TOTAL,
    STORE_STATUS_UPDATES_TOTAL,
};
use shipscan_core::store::ShipmentStore;
use shipscan_core::types::{NewShipment, Shipment};

use crate::{local_day_bounds, prepare};

/// 인메모리 화물 스토어
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, Shipment>>,
}

impl MemoryStore {
    /// 빈 스토어를 생성합니다.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    fn lock_poisoned() -> ShipscanError {
        StoreError::Connection("memory store lock poisoned".to_owned()).into()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ShipmentStore for MemoryStore {
    async fn insert(&self, new: NewShipment) -> Result<Shipment, ShipscanError> {
        let new = prepare(new)?;
        let mut records = self.records.write().map_err(|_| Self::lock_poisoned())?;
        if records.contains_key(&new.track_code) {
            return Err(StoreError::Duplicate {
                track_code: new.track_code,
            }
            .into());
        }

        let shipment = Shipment {
            track_code: new.track_code.clone(),
            client_code: new.client_code,
            description: new.description,
            created_at: Utc::now().trunc_subsecs(6),
            arrived: false,
            issued: false,
        };
        records.insert(new.track_code, shipment.clone());

        counter!(STORE_INSERTS_TOTAL, LABEL_BACKEND => "memory").increment(1);
        tracing::debug!(track_code = %shipment.track_code, "inserted shipment");
        Ok(shipment)
    }

    async fn insert_batch(&self, rows: Vec<NewShipment>) -> Result<usize, ShipscanError> {
        // 전부-또는-전무: 쓰기 전에 전 행을 검증하고 중복을 확인
        let mut prepared = Vec::with_capacity(rows.len());
        for row in rows {
            prepared.push(prepare(row)?);
        }

        let mut records = self.records.write().map_err(|_| Self::lock_poisoned())?;
        let mut seen = std::collections::BTreeSet::new();
        for row in &prepared {
            if records.contains_key(&row.track_code) || !seen.insert(row.track_code.clone()) {
                return Err(StoreError::Duplicate {
                    track_code: row.track_code.clone(),
                }
                .into());
            }
        }

        let count = prepared.len();
        let created_at = Utc::now().trunc_subsecs(6);
        for row in prepared {
            let shipment = Shipment {
                track_code: row.track_code.clone(),
                client_code: row.client_code,
                description: row.description,
                created_at,
                arrived: false,
                issued: false,
            };
            records.insert(row.track_code, shipment);
        }

        counter!(STORE_INSERTS_TOTAL, LABEL_BACKEND => "memory").increment(count as u64);
        Ok(count)
    }

    async fn find_by_track_code(&self, track_code: &str) -> Result<Option<Shipment>, ShipscanError> {
        let key = normalize(track_code);
        let records = self.records.read().map_err(|_| Self::lock_poisoned())?;
        counter!(STORE_LOOKUPS_TOTAL, LABEL_BACKEND => "memory").increment(1);
        Ok(records.get(&key).cloned())
    }

    async fn list(&self, date_filter: Option<NaiveDate>) -> Result<Vec<Shipment>, ShipscanError> {
        let bounds = match date_filter {
            Some(day) => Some(local_day_bounds(day)?),
            None => None,
        };

        let records = self.records.read().map_err(|_| Self::lock_poisoned())?;
        let mut result: Vec<Shipment> = records
            .values()
            .filter(|s| match bounds {
                Some((start, end)) => s.created_at >= start && s.created_at <= end,
                None => true,
            })
            .cloned()
            .collect();
        result.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.track_code.cmp(&b.track_code))
        });
        Ok(result)
    }

    async fn update_status(
        &self,
        track_code: &str,
        arrived: bool,
        issued: bool,
    ) -> Result<u64, ShipscanError> {
        let key = normalize(track_code);
        let mut records = self.records.write().map_err(|_| Self::lock_poisoned())?;
        counter!(STORE_STATUS_UPDATES_TOTAL, LABEL_BACKEND => "memory").increment(1);
        match records.get_mut(&key) {
            Some(shipment) => {
                shipment.arrived = arrived;
                shipment.issued = issued;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_track_code(&self, track_code: &str) -> Result<u64, ShipscanError> {
        let key = normalize(track_code);
        let mut records = self.records.write().map_err(|_| Self::lock_poisoned())?;
        counter!(STORE_DELETES_TOTAL, LABEL_BACKEND => "memory").increment(1);
        Ok(if records.remove(&key).is_some() { 1 } else { 0 })
    }
}
