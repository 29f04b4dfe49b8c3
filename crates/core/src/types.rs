//! 도메인 타입 — 시스템 전역에서 사용되는 공통 타입
//!
//! 모든 모듈이 공유하는 데이터 구조를 정의합니다.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// 화물 레코드
///
/// 유일한 영속 엔티티입니다. `track_code`가 조회/갱신/삭제의
/// 유일한 식별자이며, `created_at`은 삽입 시 스토어가 부여한 뒤
/// 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    /// 트랙 코드 (정규화됨, 유일)
    pub track_code: String,
    /// 클라이언트 코드 (정규화됨)
    pub client_code: String,
    /// 화물 설명 (선택, 기본 빈 문자열)
    #[serde(default)]
    pub description: String,
    /// 등록 시각 (스토어가 부여, 불변)
    pub created_at: DateTime<Utc>,
    /// 도착 여부
    #[serde(default)]
    pub arrived: bool,
    /// 출고 여부
    #[serde(default)]
    pub issued: bool,
}

impl fmt::Display for Shipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} client={} arrived={} issued={}",
            self.track_code,
            self.client_code,
            flag_label(self.arrived),
            flag_label(self.issued),
        )
    }
}

/// 삽입 입력
///
/// `created_at`과 상태 플래그는 호출자가 지정할 수 없습니다.
/// 정규화와 필수 필드 검증은 스토어의 insert 경로에서 수행됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewShipment {
    /// 트랙 코드 (원시 입력; 스토어가 정규화)
    pub track_code: String,
    /// 클라이언트 코드 (원시 입력; 스토어가 정규화)
    pub client_code: String,
    /// 화물 설명
    #[serde(default)]
    pub description: String,
}

impl NewShipment {
    /// 새 삽입 입력을 생성합니다.
    pub fn new(
        track_code: impl Into<String>,
        client_code: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            track_code: track_code.into(),
            client_code: client_code.into(),
            description: description.into(),
        }
    }
}

/// 이미지에서 검출된 원시 코드
///
/// 검출기가 돌려준 텍스트 페이로드와 심볼로지 이름을 담습니다.
/// 정규화 전 상태이므로 조회 키로 쓰려면 [`normalize`](crate::code::normalize)를
/// 거쳐야 합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCode {
    /// 디코딩된 텍스트 페이로드
    pub text: String,
    /// 심볼로지 이름 (예: `"QR_CODE"`, `"CODE_128"`)
    pub symbology: String,
}

impl RawCode {
    /// 원시 바이트에서 코드를 생성합니다.
    ///
    /// 페이로드가 UTF-8이 아니면 [`DecodeError::NonUtf8`]로 실패합니다.
    pub fn from_bytes(bytes: Vec<u8>, symbology: impl Into<String>) -> Result<Self, DecodeError> {
        let symbology = symbology.into();
        let text = String::from_utf8(bytes).map_err(|_| DecodeError::NonUtf8 {
            symbology: symbology.clone(),
        })?;
        Ok(Self { text, symbology })
    }
}

impl fmt::Display for RawCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.text, self.symbology)
    }
}

/// 불리언 플래그를 사용자 표시용 yes/no 레이블로 바꿉니다.
pub fn flag_label(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
