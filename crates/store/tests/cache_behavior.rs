//! 캐시 래퍼 동작 테스트
//!
//! 읽기-통과 동작과 쓰기 시 전체 무효화 계약을 검증합니다.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{Local, NaiveDate};

use shipscan_core::error::ShipscanError;
use shipscan_core::store::ShipmentStore;
use shipscan_core::types::{NewShipment, Shipment};
use shipscan_store::{CachedStore, MemoryStore};

/// 내부 스토어 호출 횟수를 세는 래퍼
struct CountingStore {
    inner: MemoryStore,
    list_calls: Arc<AtomicUsize>,
}

impl ShipmentStore for CountingStore {
    async fn insert(&self, new: NewShipment) -> Result<Shipment, ShipscanError> {
        self.inner.insert(new).await
    }

    async fn insert_batch(&self, rows: Vec<NewShipment>) -> Result<usize, ShipscanError> {
        self.inner.insert_batch(rows).await
    }

    async fn find_by_track_code(&self, track_code: &str) -> Result<Option<Shipment>, ShipscanError> {
        self.inner.find_by_track_code(track_code).await
    }

    async fn list(&self, date_filter: Option<NaiveDate>) -> Result<Vec<Shipment>, ShipscanError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list(date_filter).await
    }

    async fn update_status(
        &self,
        track_code: &str,
        arrived: bool,
        issued: bool,
    ) -> Result<u64, ShipscanError> {
        self.inner.update_status(track_code, arrived, issued).await
    }

    async fn delete_by_track_code(&self, track_code: &str) -> Result<u64, ShipscanError> {
        self.inner.delete_by_track_code(track_code).await
    }
}

fn counting_cached() -> (CachedStore, Arc<AtomicUsize>) {
    let list_calls = Arc::new(AtomicUsize::new(0));
    let store = CountingStore {
        inner: MemoryStore::new(),
        list_calls: Arc::clone(&list_calls),
    };
    (
        CachedStore::new(Box::new(store), Duration::from_secs(300), 100),
        list_calls,
    )
}

#[tokio::test]
async fn unfiltered_list_is_served_from_cache() {
    let (store, list_calls) = counting_cached();
    store.insert(NewShipment::new("T1", "C1", "")).await.unwrap();

    let first = store.list(None).await.unwrap();
    let second = store.list(None).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn filtered_list_bypasses_cache() {
    let (store, list_calls) = counting_cached();
    let today = Local::now().date_naive();

    store.list(Some(today)).await.unwrap();
    store.list(Some(today)).await.unwrap();
    assert_eq!(list_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn insert_invalidates_cached_list() {
    let (store, list_calls) = counting_cached();
    store.insert(NewShipment::new("T1", "C1", "")).await.unwrap();

    assert_eq!(store.list(None).await.unwrap().len(), 1);
    store.insert(NewShipment::new("T2", "C2", "")).await.unwrap();

    // 갱신 전 데이터가 캐시에서 나오면 안 됨
    let listed = store.list(None).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(list_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn update_status_invalidates_cached_list() {
    let (store, _) = counting_cached();
    store.insert(NewShipment::new("T1", "C1", "")).await.unwrap();

    let before = store.list(None).await.unwrap();
    assert!(!before[0].arrived);

    store.update_status("T1", true, false).await.unwrap();
    let after = store.list(None).await.unwrap();
    assert!(after[0].arrived);
}

#[tokio::test]
async fn zero_affected_update_still_invalidates() {
    let (store, list_calls) = counting_cached();
    store.list(None).await.unwrap();

    assert_eq!(store.update_status("missing", true, true).await.unwrap(), 0);
    store.list(None).await.unwrap();
    assert_eq!(list_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn delete_invalidates_cached_list() {
    let (store, _) = counting_cached();
    store.insert(NewShipment::new("T1", "C1", "")).await.unwrap();

    assert_eq!(store.list(None).await.unwrap().len(), 1);
    store.delete_by_track_code("T1").await.unwrap();
    assert!(store.list(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn insert_batch_invalidates_cached_list() {
    let (store, _) = counting_cached();
    assert!(store.list(None).await.unwrap().is_empty());

    store
        .insert_batch(vec![
            NewShipment::new("T1", "C1", ""),
            NewShipment::new("T2", "C2", ""),
        ])
        .await
        .unwrap();
    assert_eq!(store.list(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn failed_write_keeps_cache_intact() {
    let (store, list_calls) = counting_cached();
    store.insert(NewShipment::new("T1", "C1", "")).await.unwrap();
    store.list(None).await.unwrap();

    // 중복 삽입 실패는 캐시를 건드리지 않음
    store
        .insert(NewShipment::new("T1", "C9", ""))
        .await
        .unwrap_err();
    store.list(None).await.unwrap();
    assert_eq!(list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn find_is_never_cached() {
    let (store, _) = counting_cached();
    store.insert(NewShipment::new("T1", "C1", "")).await.unwrap();

    store.update_status("T1", true, true).await.unwrap();
    let found = store.find_by_track_code("T1").await.unwrap().unwrap();
    assert!(found.arrived && found.issued);
}
