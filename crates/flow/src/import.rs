//! 벌크 임포트 -- 표 형식 입력을 스토어에 일괄 삽입
//!
//! 필수 컬럼은 `track_code`, `client_code`이고 `description`은
//! 선택입니다. 헤더 매칭은 공백을 무시하고 대소문자를 구분하지
//! 않습니다. 필수 컬럼이 없으면 어떤 행도 쓰기 전에 전체 임포트가
//! 한 번의 에러로 실패하며, 행 삽입은 스토어의 전부-또는-전무
//! 배치([`insert_batch`](shipscan_core::store::DynShipmentStore::insert_batch))로
//! 수행됩니다.

use std::io::Read;

use metrics::counter;

use shipscan_core::error::ShipscanError;
use shipscan_core::metrics::FLOW_IMPORT_ROWS_TOTAL;
use shipscan_core::store::DynShipmentStore;
use shipscan_core::types::NewShipment;

use crate::error::FlowError;

/// 필수 컬럼: 트랙 코드
pub const COLUMN_TRACK_CODE: &str = "track_code";
/// 필수 컬럼: 클라이언트 코드
pub const COLUMN_CLIENT_CODE: &str = "client_code";
/// 선택 컬럼: 설명
pub const COLUMN_DESCRIPTION: &str = "description";

/// CSV 입력을 삽입 행으로 파싱합니다.
///
/// 컬럼 누락은 여기서 잡히므로, 이 함수가 성공했다면 테이블 형태는
/// 유효합니다. 행 값의 정규화/필수 필드 검증은 스토어 insert 경로가
/// 수행합니다.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<NewShipment>, FlowError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let track_idx = find_column(&headers, COLUMN_TRACK_CODE)?;
    let client_idx = find_column(&headers, COLUMN_CLIENT_CODE)?;
    let description_idx = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(COLUMN_DESCRIPTION));

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let track_code = record.get(track_idx).unwrap_or_default();
        let client_code = record.get(client_idx).unwrap_or_default();
        let description = description_idx
            .and_then(|idx| record.get(idx))
            .unwrap_or_default();
        rows.push(NewShipment::new(track_code, client_code, description));
    }
    Ok(rows)
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Result<usize, FlowError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| FlowError::MissingColumn {
            column: name.to_owned(),
        })
}

/// CSV 입력 전체를 원자적으로 임포트합니다.
///
/// 성공 시 삽입된 행 수를 반환합니다. 파싱/검증/유일성 어느 단계에서
/// 실패하든 스토어에는 아무 행도 남지 않습니다.
pub async fn import_shipments<R: Read>(
    store: &dyn DynShipmentStore,
    reader: R,
) -> Result<usize, ShipscanError> {
    let rows = read_rows(reader).map_err(ShipscanError::from)?;
    let count = store.insert_batch(rows).await?;
    counter!(FLOW_IMPORT_ROWS_TOTAL).increment(count as u64);
    tracing::info!(rows = count, "bulk import committed");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_with_canonical_headers() {
        let csv = "track_code,client_code,description\nT1,C1,box\nT2,C2,\n";
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], NewShipment::new("T1", "C1", "box"));
        assert_eq!(rows[1], NewShipment::new("T2", "C2", ""));
    }

    #[test]
    fn header_match_ignores_case_and_padding() {
        let csv = " Track_Code , CLIENT_CODE \nT1,C1\n";
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].track_code, "T1");
        assert_eq!(rows[0].client_code, "C1");
    }

    #[test]
    fn description_column_is_optional() {
        let csv = "track_code,client_code\nT1,C1\n";
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].description, "");
    }

    #[test]
    fn missing_client_code_column_fails() {
        let csv = "track_code,description\nT1,box\n";
        let err = read_rows(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            FlowError::MissingColumn { ref column } if column == "client_code"
        ));
    }

    #[test]
    fn missing_track_code_column_fails() {
        let csv = "client_code\nC1\n";
        let err = read_rows(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            FlowError::MissingColumn { ref column } if column == "track_code"
        ));
    }

    #[test]
    fn extra_columns_are_ignored() {
        let csv = "warehouse,track_code,client_code\nW1,T1,C1\n";
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0], NewShipment::new("T1", "C1", ""));
    }
}
