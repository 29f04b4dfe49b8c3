//! 스토어 trait — 백엔드 독립적인 화물 저장 계약
//!
//! [`ShipmentStore`]는 영속 엔진(인메모리, SQLite 등)이 구현하는
//! 확장 포인트입니다. 리컨실 플로우와 CLI는 이 trait만 알고,
//! 구체 엔진은 설정의 `[store] backend` 값으로 기동 시 선택됩니다.
//!
//! [`ShipmentStore`]는 RPITIT를 사용하므로 `dyn ShipmentStore`가 불가합니다.
//! [`DynShipmentStore`]는 [`BoxFuture`]를 반환하여
//! `Box<dyn DynShipmentStore>`로 백엔드를 동적으로 다룰 수 있게 합니다.
//!
//! # 계약 요약
//! - 모든 키 인자는 구현체가 [`normalize`](crate::code::normalize)를 적용한 뒤 사용합니다.
//! - `insert`는 `created_at`을 서버 측에서 부여하고 `track_code` 유일성을 강제합니다.
//! - 조회 미스는 에러가 아니라 `Ok(None)` / 0 카운트입니다.
//! - 어떤 연산도 자동 재시도하지 않습니다.

use std::future::Future;
use std::pin::Pin;

use chrono::NaiveDate;

use crate::error::ShipscanError;
use crate::types::{NewShipment, Shipment};

/// dyn-compatible 메서드가 반환하는 박싱된 Future
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// 화물 스토어 trait
///
/// 새로운 스토리지 엔진을 추가하려면 이 trait을 구현합니다.
pub trait ShipmentStore: Send + Sync {
    /// 레코드 하나를 삽입합니다.
    ///
    /// 두 코드를 정규화한 뒤 비어있으면
    /// [`ValidationError::EmptyField`](crate::error::ValidationError::EmptyField)로 실패하고,
    /// 기존 `track_code`와 겹치면
    /// [`StoreError::Duplicate`](crate::error::StoreError::Duplicate)로 실패합니다.
    /// 성공 시 `created_at`이 채워진 저장 레코드를 반환합니다.
    fn insert(
        &self,
        new: NewShipment,
    ) -> impl Future<Output = Result<Shipment, ShipscanError>> + Send;

    /// 여러 레코드를 전부-또는-전무로 삽입합니다 (벌크 임포트용).
    ///
    /// 한 행이라도 검증/유일성에 실패하면 아무것도 쓰지 않고 실패합니다.
    /// 성공 시 삽입된 행 수를 반환합니다.
    fn insert_batch(
        &self,
        rows: Vec<NewShipment>,
    ) -> impl Future<Output = Result<usize, ShipscanError>> + Send;

    /// 정규화된 트랙 코드로 정확히 일치하는 레코드를 찾습니다.
    ///
    /// 미스는 `Ok(None)`입니다.
    fn find_by_track_code(
        &self,
        track_code: &str,
    ) -> impl Future<Output = Result<Option<Shipment>, ShipscanError>> + Send;

    /// 레코드 목록을 반환합니다.
    ///
    /// `date_filter`가 주어지면 로컬 타임존 기준 해당 달력일에 생성된
    /// 레코드로 제한합니다 (양 끝 포함 구간).
    /// 결과는 `created_at`, `track_code` 순으로 정렬됩니다.
    fn list(
        &self,
        date_filter: Option<NaiveDate>,
    ) -> impl Future<Output = Result<Vec<Shipment>, ShipscanError>> + Send;

    /// 상태 플래그 두 개만 갱신합니다.
    ///
    /// 멱등합니다: 같은 값을 반복 적용해도 상태가 같고,
    /// 반환되는 카운트는 매칭 레코드 존재 여부(0 또는 1)를 반영합니다.
    /// `created_at`은 절대 변경되지 않습니다.
    fn update_status(
        &self,
        track_code: &str,
        arrived: bool,
        issued: bool,
    ) -> impl Future<Output = Result<u64, ShipscanError>> + Send;

    /// 트랙 코드로 레코드를 하드 삭제합니다.
    ///
    /// 매칭이 없으면 0을 반환합니다.
    fn delete_by_track_code(
        &self,
        track_code: &str,
    ) -> impl Future<Output = Result<u64, ShipscanError>> + Send;
}

/// dyn-compatible 스토어 trait
///
/// 설정 기반 백엔드 선택은 `Box<dyn DynShipmentStore>`를 통해 이루어집니다.
pub trait DynShipmentStore: Send + Sync {
    /// 레코드 하나를 삽입합니다.
    fn insert(&self, new: NewShipment) -> BoxFuture<'_, Result<Shipment, ShipscanError>>;

    /// 여러 레코드를 전부-또는-전무로 삽입합니다.
    fn insert_batch(&self, rows: Vec<NewShipment>) -> BoxFuture<'_, Result<usize, ShipscanError>>;

    /// 트랙 코드로 레코드를 찾습니다.
    fn find_by_track_code<'a>(
        &'a self,
        track_code: &'a str,
    ) -> BoxFuture<'a, Result<Option<Shipment>, ShipscanError>>;

    /// 레코드 목록을 반환합니다.
    fn list(
        &self,
        date_filter: Option<NaiveDate>,
    ) -> BoxFuture<'_, Result<Vec<Shipment>, ShipscanError>>;

    /// 상태 플래그를 갱신합니다.
    fn update_status<'a>(
        &'a self,
        track_code: &'a str,
        arrived: bool,
        issued: bool,
    ) -> BoxFuture<'a, Result<u64, ShipscanError>>;

    /// 트랙 코드로 레코드를 삭제합니다.
    fn delete_by_track_code<'a>(
        &'a self,
        track_code: &'a str,
    ) -> BoxFuture<'a, Result<u64, ShipscanError>>;
}

/// ShipmentStore를 구현한 타입은 자동으로 DynShipmentStore도 구현됩니다.
impl<T: ShipmentStore> DynShipmentStore for T {
    fn insert(&self, new: NewShipment) -> BoxFuture<'_, Result<Shipment, ShipscanError>> {
        Box::pin(ShipmentStore::insert(self, new))
    }

    fn insert_batch(&self, rows: Vec<NewShipment>) -> BoxFuture<'_, Result<usize, ShipscanError>> {
        Box::pin(ShipmentStore::insert_batch(self, rows))
    }

    fn find_by_track_code<'a>(
        &'a self,
        track_code: &'a str,
    ) -> BoxFuture<'a, Result<Option<Shipment>, ShipscanError>> {
        Box::pin(ShipmentStore::find_by_track_code(self, track_code))
    }

    fn list(
        &self,
        date_filter: Option<NaiveDate>,
    ) -> BoxFuture<'_, Result<Vec<Shipment>, ShipscanError>> {
        Box::pin(ShipmentStore::list(self, date_filter))
    }

    fn update_status<'a>(
        &'a self,
        track_code: &'a str,
        arrived: bool,
        issued: bool,
    ) -> BoxFuture<'a, Result<u64, ShipscanError>> {
        Box::pin(ShipmentStore::update_status(
            self, track_code, arrived, issued,
        ))
    }

    fn delete_by_track_code<'a>(
        &'a self,
        track_code: &'a str,
    ) -> BoxFuture<'a, Result<u64, ShipscanError>> {
        Box::pin(ShipmentStore::delete_by_track_code(self, track_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// dyn 디스패치 배선 확인용 스텁
    struct NullStore;

    impl ShipmentStore for NullStore {
        async fn insert(&self, new: NewShipment) -> Result<Shipment, ShipscanError> {
            Ok(Shipment {
                track_code: new.track_code,
                client_code: new.client_code,
                description: new.description,
                created_at: chrono::Utc::now(),
                arrived: false,
                issued: false,
            })
        }

        async fn insert_batch(&self, rows: Vec<NewShipment>) -> Result<usize, ShipscanError> {
            Ok(rows.len())
        }

        async fn find_by_track_code(
            &self,
            _track_code: &str,
        ) -> Result<Option<Shipment>, ShipscanError> {
            Ok(None)
        }

        async fn list(
            &self,
            _date_filter: Option<NaiveDate>,
        ) -> Result<Vec<Shipment>, ShipscanError> {
            Ok(Vec::new())
        }

        async fn update_status(
            &self,
            _track_code: &str,
            _arrived: bool,
            _issued: bool,
        ) -> Result<u64, ShipscanError> {
            Ok(0)
        }

        async fn delete_by_track_code(&self, _track_code: &str) -> Result<u64, ShipscanError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn blanket_impl_provides_dyn_dispatch() {
        let store: Box<dyn DynShipmentStore> = Box::new(NullStore);

        let inserted = store
            .insert(NewShipment::new("T1", "C1", ""))
            .await
            .unwrap();
        assert_eq!(inserted.track_code, "T1");

        assert!(store.find_by_track_code("T1").await.unwrap().is_none());
        assert!(store.list(None).await.unwrap().is_empty());
        assert_eq!(store.update_status("T1", true, false).await.unwrap(), 0);
        assert_eq!(store.delete_by_track_code("T1").await.unwrap(), 0);
        assert_eq!(
            store
                .insert_batch(vec![NewShipment::new("a", "b", "")])
                .await
                .unwrap(),
            1
        );
    }
}
