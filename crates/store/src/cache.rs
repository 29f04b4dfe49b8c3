//! 목록 쿼리 캐시 -- TTL 캐시 및 읽기-통과 래퍼
//!
//! [`CachedStore`]는 임의의 스토어를 감싸 무필터 `list` 쿼리만 캐싱합니다.
//! 직원이 도착/출고 상태를 항상 최신으로 봐야 하므로, 어떤 쓰기든
//! 성공하면 캐시 전체를 비웁니다 (선택적 무효화 없음 -- 적중률보다
//! 정합성 우선). 날짜 필터가 있는 쿼리는 캐시를 거치지 않습니다.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use metrics::counter;

use shipscan_core::error::{ShipscanError, StoreError};
use shipscan_core::metrics::{
    CACHE_HITS_TOTAL, CACHE_INVALIDATIONS_TOTAL, CACHE_MISSES_TOTAL,
};
use shipscan_core::store::{DynShipmentStore, ShipmentStore};
use shipscan_core::types::{NewShipment, Shipment};

/// 시간 제한 캐시
///
/// 엔트리는 고정 TTL이 지나면 만료되고, 용량 초과 시 가장 오래전에
/// 삽입된 엔트리부터 제거됩니다. 조회 시점에 만료를 검사하는
/// 지연(lazy) 방식입니다.
pub struct TtlCache<K, V> {
    ttl: Duration,
    capacity: usize,
    entries: HashMap<K, Entry<V>>,
    order: VecDeque<K>,
}

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

impl<K: Eq + Hash + Clone, V: Clone> TtlCache<K, V> {
    /// 새 캐시를 생성합니다. `capacity`는 1 이상이어야 합니다.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// 키에 해당하는 값을 반환합니다. 만료된 엔트리는 제거하고 미스 처리합니다.
    pub fn get(&mut self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&mut self, key: &K, now: Instant) -> Option<V> {
        match self.entries.get(key) {
            Some(entry) if now.duration_since(entry.inserted_at) < self.ttl => {
                Some(entry.value.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                self.order.retain(|k| k != key);
                None
            }
            None => None,
        }
    }

    /// 값을 저장합니다. 용량이 가득 차면 가장 오래된 엔트리를 제거합니다.
    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    fn insert_at(&mut self, key: K, value: V, now: Instant) {
        if self.entries.contains_key(&key) {
            self.order.retain(|k| k != &key);
        } else if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(
            key.clone(),
            Entry {
                value,
                inserted_at: now,
            },
        );
        self.order.push_back(key);
    }

    /// 모든 엔트리를 제거합니다.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// 현재 엔트리 수를 반환합니다 (만료 검사 없이).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 캐시가 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 캐시 키 -- 캐싱 대상 쿼리 형태는 무필터 목록 하나뿐입니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ListKey {
    All,
}

/// 읽기-통과 캐시 래퍼
///
/// 어떤 [`DynShipmentStore`]든 감싸서 같은 trait으로 노출합니다.
/// 캐시는 유일한 프로세스 내 공유 가변 상태이며, 쓰기 성공 시 전체
/// 무효화가 이 컴포넌트의 유일한 동시성 계약입니다: 어느 세션의
/// 쓰기든 성공한 뒤에는 갱신 전 데이터가 다시 조회되지 않습니다.
pub struct CachedStore {
    inner: Box<dyn DynShipmentStore>,
    cache: Mutex<TtlCache<ListKey, Vec<Shipment>>>,
}

impl CachedStore {
    /// 스토어를 캐시로 감쌉니다.
    pub fn new(inner: Box<dyn DynShipmentStore>, ttl: Duration, max_entries: usize) -> Self {
        Self {
            inner,
            cache: Mutex::new(TtlCache::new(max_entries, ttl)),
        }
    }

    fn lock_poisoned() -> ShipscanError {
        StoreError::Connection("list cache lock poisoned".to_owned()).into()
    }

    fn invalidate(&self) -> Result<(), ShipscanError> {
        let mut cache = self.cache.lock().map_err(|_| Self::lock_poisoned())?;
        if !cache.is_empty() {
            tracing::debug!("clearing list cache after successful write");
        }
        cache.clear();
        counter!(CACHE_INVALIDATIONS_TOTAL).increment(1);
        Ok(())
    }
}

impl ShipmentStore for CachedStore {
    async fn insert(&self, new: NewShipment) -> Result<Shipment, ShipscanError> {
        let inserted = self.inner.insert(new).await?;
        self.invalidate()?;
        Ok(inserted)
    }

    async fn insert_batch(&self, rows: Vec<NewShipment>) -> Result<usize, ShipscanError> {
        let count = self.inner.insert_batch(rows).await?;
        self.invalidate()?;
        Ok(count)
    }

    async fn find_by_track_code(&self, track_code: &str) -> Result<Option<Shipment>, ShipscanError> {
        self.inner.find_by_track_code(track_code).await
    }

    async fn list(&self, date_filter: Option<NaiveDate>) -> Result<Vec<Shipment>, ShipscanError> {
        if date_filter.is_some() {
            // 필터 쿼리는 캐시 대상이 아님
            return self.inner.list(date_filter).await;
        }

        {
            let mut cache = self.cache.lock().map_err(|_| Self::lock_poisoned())?;
            if let Some(cached) = cache.get(&ListKey::All) {
                counter!(CACHE_HITS_TOTAL).increment(1);
                return Ok(cached);
            }
        }
        counter!(CACHE_MISSES_TOTAL).increment(1);

        let fresh = self.inner.list(None).await?;
        let mut cache = self.cache.lock().map_err(|_| Self::lock_poisoned())?;
        cache.insert(ListKey::All, fresh.clone());
        Ok(fresh)
    }

    async fn update_status(
        &self,
        track_code: &str,
        arrived: bool,
        issued: bool,
    ) -> Result<u64, ShipscanError> {
        let affected = self.inner.update_status(track_code, arrived, issued).await?;
        // affected가 0이어도 성공한 쓰기 호출이므로 무효화
        self.invalidate()?;
        Ok(affected)
    }

    async fn delete_by_track_code(&self, track_code: &str) -> Result<u64, ShipscanError> {
        let affected = self.inner.delete_by_track_code(track_code).await?;
        self.invalidate()?;
        Ok(affected)
    }
}
