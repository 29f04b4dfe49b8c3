//! 스토어 계약 테스트
//!
//! 모든 백엔드(인메모리, SQLite, 캐시 래퍼)가 같은 계약을 지키는지
//! 동일한 시나리오로 검증합니다.

use std::time::Duration;

use chrono::{Days, Local};

use shipscan_core::error::{ShipscanError, StoreError, ValidationError};
use shipscan_core::store::ShipmentStore;
use shipscan_core::types::NewShipment;
use shipscan_store::{CachedStore, MemoryStore, SqliteStore};

fn cached_memory() -> CachedStore {
    CachedStore::new(
        Box::new(MemoryStore::new()),
        Duration::from_secs(300),
        100,
    )
}

/// 계약 전체를 한 백엔드에 대해 실행합니다.
async fn run_contract<S: ShipmentStore>(store: S) {
    // 삽입 직후 조회: 기본값 확인
    let inserted = store
        .insert(NewShipment::new("T1", "C1", ""))
        .await
        .unwrap();
    assert_eq!(inserted.track_code, "T1");
    assert!(!inserted.arrived);
    assert!(!inserted.issued);

    let found = store
        .find_by_track_code("T1")
        .await
        .unwrap()
        .expect("T1 should exist");
    assert_eq!(found.client_code, "C1");
    assert_eq!(found.description, "");
    assert!(!found.arrived);
    assert!(!found.issued);

    // 키 정규화: 공백 섞인 입력도 같은 레코드로 귀결
    let spaced = store.find_by_track_code(" T 1 ").await.unwrap();
    assert_eq!(spaced, Some(found.clone()));

    // 유일성: 중복 삽입은 아무것도 쓰지 않고 실패
    let err = store
        .insert(NewShipment::new("T 1", "C9", "dup"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ShipscanError::Store(StoreError::Duplicate { ref track_code }) if track_code == "T1"
    ));
    assert_eq!(store.list(None).await.unwrap().len(), 1);

    // 필수 필드 검증 (정규화 후 기준)
    let err = store
        .insert(NewShipment::new("  ", "C1", ""))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ShipscanError::Validation(ValidationError::EmptyField { .. })
    ));
    let err = store
        .insert(NewShipment::new("T2", "   ", ""))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ShipscanError::Validation(ValidationError::EmptyField { .. })
    ));

    // 상태 갱신 멱등성: 두 번 적용해도 상태 동일, 카운트는 둘 다 1
    assert_eq!(store.update_status("T1", true, false).await.unwrap(), 1);
    let after_first = store.find_by_track_code("T1").await.unwrap().unwrap();
    assert!(after_first.arrived);
    assert!(!after_first.issued);

    assert_eq!(store.update_status("T1", true, false).await.unwrap(), 1);
    let after_second = store.find_by_track_code("T1").await.unwrap().unwrap();
    assert_eq!(after_first, after_second);

    // created_at은 상태 갱신으로 변하지 않음
    assert_eq!(after_second.created_at, inserted.created_at);

    // issued=true, arrived=false 조합도 거부되지 않음
    assert_eq!(store.update_status("T1", false, true).await.unwrap(), 1);
    let flipped = store.find_by_track_code("T1").await.unwrap().unwrap();
    assert!(!flipped.arrived);
    assert!(flipped.issued);

    // 매칭 없는 갱신/삭제는 0
    assert_eq!(
        store.update_status("missing", true, true).await.unwrap(),
        0
    );
    assert_eq!(
        store.delete_by_track_code("nonexistent").await.unwrap(),
        0
    );
    assert_eq!(store.list(None).await.unwrap().len(), 1);

    // 날짜 필터: 오늘 생성된 레코드는 오늘 필터에 포함, 내일 필터에는 제외
    let today = Local::now().date_naive();
    let listed_today = store.list(Some(today)).await.unwrap();
    assert_eq!(listed_today.len(), 1);
    let tomorrow = today.checked_add_days(Days::new(1)).unwrap();
    assert!(store.list(Some(tomorrow)).await.unwrap().is_empty());

    // 벌크 삽입: 성공 경로
    let rows = vec![
        NewShipment::new("B1", "C1", "first"),
        NewShipment::new("B 2", "C2", ""),
    ];
    assert_eq!(store.insert_batch(rows).await.unwrap(), 2);
    assert!(store.find_by_track_code("B2").await.unwrap().is_some());

    // 벌크 삽입: 한 행의 중복으로 전체 롤백
    let before = store.list(None).await.unwrap().len();
    let err = store
        .insert_batch(vec![
            NewShipment::new("B3", "C1", ""),
            NewShipment::new("B1", "C1", "dup"),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, ShipscanError::Store(StoreError::Duplicate { .. })));
    assert_eq!(store.list(None).await.unwrap().len(), before);
    assert!(store.find_by_track_code("B3").await.unwrap().is_none());

    // 벌크 삽입: 한 행의 검증 실패로 아무것도 쓰지 않음
    let err = store
        .insert_batch(vec![
            NewShipment::new("B4", "C1", ""),
            NewShipment::new("B5", "  ", ""),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, ShipscanError::Validation(_)));
    assert!(store.find_by_track_code("B4").await.unwrap().is_none());

    // 하드 삭제 후 조회 미스
    assert_eq!(store.delete_by_track_code("T1").await.unwrap(), 1);
    assert!(store.find_by_track_code("T1").await.unwrap().is_none());
}

#[tokio::test]
async fn memory_store_contract() {
    run_contract(MemoryStore::new()).await;
}

#[tokio::test]
async fn sqlite_store_contract() {
    run_contract(SqliteStore::open_in_memory().unwrap()).await;
}

#[tokio::test]
async fn sqlite_file_store_contract() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("contract.db")).unwrap();
    run_contract(store).await;
}

#[tokio::test]
async fn cached_store_contract() {
    run_contract(cached_memory()).await;
}
