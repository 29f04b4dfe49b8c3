//! 플로우 도메인 에러
//!
//! [`FlowError`]는 임포트/익스포트 경로의 에러를 표현합니다.
//! `From<FlowError> for ShipscanError` 변환이 구현되어 있어 상위
//! 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use shipscan_core::error::{ShipscanError, ValidationError};

/// 플로우 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// 임포트 테이블에 필수 컬럼이 없음
    #[error("import table is missing required column '{column}'")]
    MissingColumn {
        /// 누락된 컬럼명
        column: String,
    },

    /// CSV 파싱/직렬화 에러
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 하위 컴포넌트 에러
    #[error(transparent)]
    Core(#[from] ShipscanError),
}

impl From<FlowError> for ShipscanError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::MissingColumn { column } => {
                ValidationError::MissingColumn { column }.into()
            }
            FlowError::Csv(e) => ValidationError::MalformedTable {
                reason: e.to_string(),
            }
            .into(),
            FlowError::Io(e) => ShipscanError::Io(e),
            FlowError::Core(e) => e,
        }
    }
}
