//! 리컨실 플로우 -- 디코딩/정규화/조회/확인 갱신의 전체 흐름을 관리합니다.
//!
//! 이미지 한 장이 플로우 한 번의 실행 단위입니다.
//!
//! ```text
//! bytes -> CodeDecoder -> normalize -> Store lookup -> CodeReconciliation
//!                                                        |
//!                                        (사용자 확인) commit -> update_status
//! ```
//!
//! 의도된 2단계 설계: [`ReconcileFlow::scan`]은 상태를 절대 변경하지 않고,
//! 검출된 코드마다 독립적인 [`PendingUpdate`] 단위를 만들어 돌려줍니다.
//! 갱신은 호출자가 [`ReconcileFlow::commit`]을 명시적으로 호출할 때만
//! 일어납니다. 어떤 단계에도 자동 재시도는 없습니다.

use std::sync::Arc;

use metrics::counter;

use shipscan_core::code::normalize;
use shipscan_core::error::ShipscanError;
use shipscan_core::metrics::{
    FLOW_COMMITS_TOTAL, FLOW_MATCHES_TOTAL, FLOW_NOT_FOUND_TOTAL, FLOW_SCANS_TOTAL,
};
use shipscan_core::pipeline::CodeDecoder;
use shipscan_core::store::DynShipmentStore;
use shipscan_core::types::{RawCode, Shipment};

/// 스캔 한 번의 결과
#[derive(Debug)]
pub enum ScanOutcome {
    /// 이미지에서 코드를 하나도 찾지 못함 (정상 종결, 에러 아님)
    NoCode,
    /// 검출된 코드별 리컨실 결과
    ///
    /// 같은 페이로드가 여러 번 검출되어도 중복 제거하지 않습니다 --
    /// 각 검출이 독립적인 조회/확인 사이클을 만듭니다.
    Codes(Vec<CodeReconciliation>),
}

/// 검출된 코드 하나의 리컨실 결과
#[derive(Debug)]
pub struct CodeReconciliation {
    /// 검출된 원시 코드
    pub raw: RawCode,
    /// 정규화된 조회 키
    pub track_code: String,
    /// 조회 결과
    pub lookup: LookupResult,
}

/// 조회 결과
#[derive(Debug)]
pub enum LookupResult {
    /// 매칭 레코드 발견
    Found {
        /// 저장된 레코드 전체 (제시용)
        shipment: Shipment,
        /// 현재 상태값으로 채워진 갱신 단위
        pending: PendingUpdate,
    },
    /// 매칭 없음 -- 이 코드에 대해서만 종결, 배치의 다른 코드는 계속 진행
    NotFound,
}

/// 확인 대기 중인 상태 갱신 단위
///
/// 정규화된 트랙 코드로 식별되는 독립적인 작업 단위입니다.
/// `arrived`/`issued`는 현재 저장값으로 초기화되며, 호출자가 값을
/// 편집한 뒤 [`ReconcileFlow::commit`]으로 적용합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpdate {
    /// 정규화된 트랙 코드
    pub track_code: String,
    /// 도착 여부
    pub arrived: bool,
    /// 출고 여부
    pub issued: bool,
}

/// 리컨실 플로우
///
/// 스토어 핸들과 디코더를 주입받아 생성합니다. 스토어는 기동 시 한 번
/// 열리고 플로우가 끝나도 소유권을 유지하지 않습니다 (`Arc` 공유).
pub struct ReconcileFlow {
    store: Arc<dyn DynShipmentStore>,
    decoder: Arc<dyn CodeDecoder>,
}

impl ReconcileFlow {
    /// 새 플로우를 생성합니다.
    pub fn new(store: Arc<dyn DynShipmentStore>, decoder: Arc<dyn CodeDecoder>) -> Self {
        Self { store, decoder }
    }

    /// 이미지 한 장을 디코딩하고 코드별 조회 결과를 만듭니다.
    ///
    /// 이 단계는 스토어를 읽기만 하며 어떤 레코드도 변경하지 않습니다.
    /// 디코딩/스토어 에러는 그대로 전파되어 호출자 경계에서 한 번
    /// 보고됩니다.
    pub async fn scan(
        &self,
        bytes: &[u8],
        name_hint: Option<&str>,
    ) -> Result<ScanOutcome, ShipscanError> {
        counter!(FLOW_SCANS_TOTAL).increment(1);

        let raw_codes = self.decoder.decode(bytes, name_hint)?;
        if raw_codes.is_empty() {
            tracing::info!("no code detected in image");
            return Ok(ScanOutcome::NoCode);
        }

        let mut results = Vec::with_capacity(raw_codes.len());
        for raw in raw_codes {
            let track_code = normalize(&raw.text);
            let lookup = match self.store.find_by_track_code(&track_code).await? {
                Some(shipment) => {
                    counter!(FLOW_MATCHES_TOTAL).increment(1);
                    tracing::info!(track_code = %track_code, "shipment matched");
                    let pending = PendingUpdate {
                        track_code: track_code.clone(),
                        arrived: shipment.arrived,
                        issued: shipment.issued,
                    };
                    LookupResult::Found { shipment, pending }
                }
                None => {
                    counter!(FLOW_NOT_FOUND_TOTAL).increment(1);
                    tracing::info!(track_code = %track_code, "no shipment for code");
                    LookupResult::NotFound
                }
            };
            results.push(CodeReconciliation {
                raw,
                track_code,
                lookup,
            });
        }
        Ok(ScanOutcome::Codes(results))
    }

    /// 확인된 갱신 단위를 스토어에 적용합니다.
    ///
    /// 같은 값을 반복 커밋해도 결과가 같습니다 (스토어 계약의 멱등성).
    /// 반환값은 매칭된 레코드 수(0 또는 1)입니다.
    pub async fn commit(&self, pending: &PendingUpdate) -> Result<u64, ShipscanError> {
        let affected = self
            .store
            .update_status(&pending.track_code, pending.arrived, pending.issued)
            .await?;
        counter!(FLOW_COMMITS_TOTAL).increment(1);
        tracing::info!(
            track_code = %pending.track_code,
            arrived = pending.arrived,
            issued = pending.issued,
            affected,
            "status update committed"
        );
        Ok(affected)
    }
}
