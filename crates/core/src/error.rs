//! 에러 타입 — 도메인별 에러 정의

/// Shipscan 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum ShipscanError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 입력 검증 에러
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// 코드 페이로드 디코딩 에러
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// 이미지 파싱/변환 에러
    #[error("image error: {0}")]
    Image(#[from] ImageDecodeError),

    /// 스토리지 에러
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 쓰기 입력 검증 에러
///
/// 정규화 이후에도 필수 필드가 비어있거나, 임포트 테이블의 형태가
/// 계약과 맞지 않을 때 발생합니다.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// 필수 필드가 비어있음 (정규화 후 기준)
    #[error("required field '{field}' is empty after normalization")]
    EmptyField { field: String },

    /// 임포트 테이블에 필수 컬럼이 없음
    #[error("import table is missing required column '{column}'")]
    MissingColumn { column: String },

    /// 임포트 테이블 형식이 손상됨
    #[error("malformed import table: {reason}")]
    MalformedTable { reason: String },
}

/// 코드 페이로드 디코딩 에러
///
/// 검출기가 돌려준 바이트가 UTF-8 문자열이 아닐 때 발생합니다.
/// "코드를 찾지 못함"은 에러가 아니라 빈 결과로 표현됩니다.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// 페이로드가 UTF-8이 아님
    #[error("decoded payload is not valid utf-8 (symbology: {symbology})")]
    NonUtf8 { symbology: String },
}

/// 이미지 파싱/변환 에러
#[derive(Debug, thiserror::Error)]
pub enum ImageDecodeError {
    /// 바이트를 이미지로 파싱할 수 없음
    #[error("unreadable image: {reason}")]
    Unreadable { reason: String },

    /// HEIC 입력이지만 heic 기능이 컴파일되지 않음
    #[error("heic input requires the 'heic' feature")]
    HeicUnavailable,

    /// HEIC 픽셀 버퍼 변환 실패
    #[error("heic transcode failed: {reason}")]
    Transcode { reason: String },
}

/// 스토리지 에러
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 연결/오픈 실패
    #[error("connection failed: {0}")]
    Connection(String),

    /// 쿼리 실패
    #[error("query failed: {0}")]
    Query(String),

    /// track_code 유일성 위반
    #[error("duplicate track_code: {track_code}")]
    Duplicate { track_code: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display() {
        let err = ValidationError::EmptyField {
            field: "track_code".to_owned(),
        };
        assert!(err.to_string().contains("track_code"));

        let err = ValidationError::MissingColumn {
            column: "client_code".to_owned(),
        };
        assert!(err.to_string().contains("client_code"));
    }

    #[test]
    fn store_error_display() {
        let err = StoreError::Duplicate {
            track_code: "AB123".to_owned(),
        };
        assert!(err.to_string().contains("AB123"));

        let err = StoreError::Query("no such table".to_owned());
        assert!(err.to_string().contains("no such table"));
    }

    #[test]
    fn image_error_display() {
        let err = ImageDecodeError::Unreadable {
            reason: "truncated png".to_owned(),
        };
        assert!(err.to_string().contains("truncated png"));
        assert!(
            ImageDecodeError::HeicUnavailable
                .to_string()
                .contains("heic")
        );
    }

    #[test]
    fn sub_errors_convert_to_top_level() {
        let err: ShipscanError = StoreError::Connection("refused".to_owned()).into();
        assert!(matches!(err, ShipscanError::Store(_)));

        let err: ShipscanError = ValidationError::EmptyField {
            field: "client_code".to_owned(),
        }
        .into();
        assert!(matches!(err, ShipscanError::Validation(_)));

        let err: ShipscanError = DecodeError::NonUtf8 {
            symbology: "QR_CODE".to_owned(),
        }
        .into();
        assert!(matches!(err, ShipscanError::Decode(_)));
    }

    #[test]
    fn top_level_display_includes_cause() {
        let err: ShipscanError = ConfigError::InvalidValue {
            field: "store.backend".to_owned(),
            reason: "must be one of: memory, sqlite".to_owned(),
        }
        .into();
        let msg = err.to_string();
        assert!(msg.contains("config error"));
        assert!(msg.contains("store.backend"));
    }
}
