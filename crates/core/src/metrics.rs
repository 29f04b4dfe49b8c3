//! 메트릭 상수 정의
//!
//! 모든 메트릭의 이름을 중앙에서 정의합니다. 각 모듈은 이 상수를
//! 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `shipscan_`
//! - 모듈명: `store_`, `cache_`, `decode_`, `flow_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(shipscan_core::metrics::STORE_INSERTS_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 스토어 백엔드 레이블 키 (memory, sqlite)
pub const LABEL_BACKEND: &str = "backend";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

/// 심볼로지 레이블 키 (QR_CODE, CODE_128 등)
pub const LABEL_SYMBOLOGY: &str = "symbology";

// ─── Store 메트릭 ──────────────────────────────────────────────────

/// Store: 삽입된 레코드 수 (counter)
pub const STORE_INSERTS_TOTAL: &str = "shipscan_store_inserts_total";

/// Store: 포인트 조회 수 (counter)
pub const STORE_LOOKUPS_TOTAL: &str = "shipscan_store_lookups_total";

/// Store: 상태 갱신 수 (counter)
pub const STORE_STATUS_UPDATES_TOTAL: &str = "shipscan_store_status_updates_total";

/// Store: 삭제 수 (counter)
pub const STORE_DELETES_TOTAL: &str = "shipscan_store_deletes_total";

// ─── Cache 메트릭 ──────────────────────────────────────────────────

/// Cache: 캐시 히트 수 (counter)
pub const CACHE_HITS_TOTAL: &str = "shipscan_cache_hits_total";

/// Cache: 캐시 미스 수 (counter)
pub const CACHE_MISSES_TOTAL: &str = "shipscan_cache_misses_total";

/// Cache: 쓰기에 의한 전체 무효화 수 (counter)
pub const CACHE_INVALIDATIONS_TOTAL: &str = "shipscan_cache_invalidations_total";

// ─── Decode 메트릭 ─────────────────────────────────────────────────

/// Decode: 처리된 이미지 수 (counter)
pub const DECODE_IMAGES_TOTAL: &str = "shipscan_decode_images_total";

/// Decode: 검출된 코드 수 (counter, label: symbology)
pub const DECODE_CODES_DETECTED_TOTAL: &str = "shipscan_decode_codes_detected_total";

/// Decode: 이미지 파싱 실패 수 (counter)
pub const DECODE_FAILURES_TOTAL: &str = "shipscan_decode_failures_total";

// ─── Flow 메트릭 ───────────────────────────────────────────────────

/// Flow: 실행된 스캔 수 (counter)
pub const FLOW_SCANS_TOTAL: &str = "shipscan_flow_scans_total";

/// Flow: 스토어 매칭 수 (counter)
pub const FLOW_MATCHES_TOTAL: &str = "shipscan_flow_matches_total";

/// Flow: 미매칭 코드 수 (counter)
pub const FLOW_NOT_FOUND_TOTAL: &str = "shipscan_flow_not_found_total";

/// Flow: 커밋된 상태 갱신 수 (counter)
pub const FLOW_COMMITS_TOTAL: &str = "shipscan_flow_commits_total";

/// Flow: 임포트된 행 수 (counter)
pub const FLOW_IMPORT_ROWS_TOTAL: &str = "shipscan_flow_import_rows_total";

/// Flow: 익스포트된 행 수 (counter)
pub const FLOW_EXPORT_ROWS_TOTAL: &str = "shipscan_flow_export_rows_total";
