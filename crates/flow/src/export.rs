//! 익스포트 -- 현재 필터된 레코드 집합의 CSV 출력
//!
//! 레코드당 한 행이며 컬럼 순서는 레코드 필드 순서
//! (`track_code, client_code, description, created_at, arrived, issued`)를
//! 따릅니다. 타임스탬프는 RFC 3339, 플래그는 yes/no로 표기합니다.

use std::io::Write;

use chrono::NaiveDate;
use metrics::counter;

use shipscan_core::error::ShipscanError;
use shipscan_core::metrics::FLOW_EXPORT_ROWS_TOTAL;
use shipscan_core::store::DynShipmentStore;
use shipscan_core::types::{Shipment, flag_label};

use crate::error::FlowError;

/// 익스포트 헤더 (레코드 필드 순서와 일치)
pub const EXPORT_HEADERS: [&str; 6] = [
    "track_code",
    "client_code",
    "description",
    "created_at",
    "arrived",
    "issued",
];

/// 레코드 목록을 CSV로 씁니다.
pub fn write_csv<W: Write>(writer: W, shipments: &[Shipment]) -> Result<usize, FlowError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPORT_HEADERS)?;
    for shipment in shipments {
        let created_at = shipment.created_at.to_rfc3339();
        csv_writer.write_record([
            shipment.track_code.as_str(),
            shipment.client_code.as_str(),
            shipment.description.as_str(),
            created_at.as_str(),
            flag_label(shipment.arrived),
            flag_label(shipment.issued),
        ])?;
    }
    csv_writer.flush()?;
    Ok(shipments.len())
}

/// 스토어에서 (선택적으로 날짜 필터된) 목록을 읽어 CSV로 씁니다.
///
/// 성공 시 쓴 행 수를 반환합니다.
pub async fn export_shipments<W: Write>(
    store: &dyn DynShipmentStore,
    date_filter: Option<NaiveDate>,
    writer: W,
) -> Result<usize, ShipscanError> {
    let shipments = store.list(date_filter).await?;
    let count = write_csv(writer, &shipments).map_err(ShipscanError::from)?;
    counter!(FLOW_EXPORT_ROWS_TOTAL).increment(count as u64);
    tracing::info!(rows = count, "export written");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(track: &str, arrived: bool, issued: bool) -> Shipment {
        Shipment {
            track_code: track.to_owned(),
            client_code: "C1".to_owned(),
            description: "box, fragile".to_owned(),
            created_at: Utc::now(),
            arrived,
            issued,
        }
    }

    #[test]
    fn header_row_matches_record_field_order() {
        let mut out = Vec::new();
        write_csv(&mut out, &[]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.lines().next(),
            Some("track_code,client_code,description,created_at,arrived,issued")
        );
    }

    #[test]
    fn writes_one_row_per_shipment_with_yes_no_flags() {
        let mut out = Vec::new();
        let count = write_csv(&mut out, &[sample("T1", true, false), sample("T2", false, true)])
            .unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("T1,C1,"));
        assert!(lines[1].ends_with(",yes,no"));
        assert!(lines[2].ends_with(",no,yes"));
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let mut out = Vec::new();
        write_csv(&mut out, &[sample("T1", false, false)]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"box, fragile\""));
    }
}
