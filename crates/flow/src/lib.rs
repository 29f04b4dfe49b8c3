#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`reconcile`]: 스캔 → 제시 → 확인 갱신의 2단계 플로우
//! - [`import`]: CSV 벌크 임포트 (원자적)
//! - [`export`]: CSV 익스포트
//! - [`error`]: 도메인 에러 타입

pub mod error;
pub mod export;
pub mod import;
pub mod reconcile;

// --- 주요 타입 re-export ---

// 플로우
pub use reconcile::{CodeReconciliation, LookupResult, PendingUpdate, ReconcileFlow, ScanOutcome};

// 임포트/익스포트
pub use export::{EXPORT_HEADERS, export_shipments, write_csv};
pub use import::{import_shipments, read_rows};

// 에러
pub use error::FlowError;
