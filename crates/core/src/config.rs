//! 설정 관리 — shipscan.toml 파싱 및 런타임 설정
//!
//! [`ShipscanConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`SHIPSCAN_STORE_BACKEND=memory` 형식)
//! 3. 설정 파일 (`shipscan.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), shipscan_core::error::ShipscanError> {
//! use shipscan_core::config::ShipscanConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = ShipscanConfig::load("shipscan.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = ShipscanConfig::parse("[store]\nbackend = \"memory\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, ShipscanError};

/// Shipscan 통합 설정
///
/// `shipscan.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipscanConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 스토어 설정
    #[serde(default)]
    pub store: StoreConfig,
    /// 디코더 설정
    #[serde(default)]
    pub decoder: DecoderConfig,
}

impl ShipscanConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ShipscanError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 파일이 없으면 기본 설정을 사용합니다.
    ///
    /// CLI는 설정 파일 없이도 동작해야 하므로, 기본 경로의 파일 부재는
    /// 에러가 아닙니다. 환경변수 오버라이드는 동일하게 적용됩니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ShipscanError> {
        let path = path.as_ref();
        let mut config = match Self::from_file(path).await {
            Ok(config) => config,
            Err(ShipscanError::Config(ConfigError::FileNotFound { .. })) => {
                debug!(path = %path.display(), "config file not found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ShipscanError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ShipscanError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                ShipscanError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, ShipscanError> {
        toml::from_str(toml_str).map_err(|e| {
            ShipscanError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `SHIPSCAN_{SECTION}_{FIELD}`
    /// 예: `SHIPSCAN_STORE_BACKEND=memory`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "SHIPSCAN_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "SHIPSCAN_GENERAL_LOG_FORMAT");

        // Store
        override_string(&mut self.store.backend, "SHIPSCAN_STORE_BACKEND");
        override_string(&mut self.store.sqlite_path, "SHIPSCAN_STORE_SQLITE_PATH");
        override_parse(&mut self.store.cache.enabled, "SHIPSCAN_STORE_CACHE_ENABLED");
        override_parse(
            &mut self.store.cache.ttl_secs,
            "SHIPSCAN_STORE_CACHE_TTL_SECS",
        );
        override_parse(
            &mut self.store.cache.max_entries,
            "SHIPSCAN_STORE_CACHE_MAX_ENTRIES",
        );

        // Decoder
        override_parse(
            &mut self.decoder.crop_margin_fraction,
            "SHIPSCAN_DECODER_CROP_MARGIN_FRACTION",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ShipscanError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // backend 검증
        let valid_backends = ["memory", "sqlite"];
        if !valid_backends.contains(&self.store.backend.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "store.backend".to_owned(),
                reason: format!("must be one of: {}", valid_backends.join(", ")),
            }
            .into());
        }

        if self.store.backend == "sqlite" && self.store.sqlite_path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store.sqlite_path".to_owned(),
                reason: "must not be empty when backend is sqlite".to_owned(),
            }
            .into());
        }

        // 캐시 검증
        if self.store.cache.enabled {
            if self.store.cache.ttl_secs == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "store.cache.ttl_secs".to_owned(),
                    reason: "must be at least 1".to_owned(),
                }
                .into());
            }
            if self.store.cache.max_entries == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "store.cache.max_entries".to_owned(),
                    reason: "must be at least 1".to_owned(),
                }
                .into());
            }
        }

        // crop_margin_fraction 검증
        let crop = self.decoder.crop_margin_fraction;
        if !(0.0..=0.4).contains(&crop) {
            return Err(ConfigError::InvalidValue {
                field: "decoder.crop_margin_fraction".to_owned(),
                reason: "must be within [0.0, 0.4]".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 스토어 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// 백엔드 선택 (memory, sqlite)
    pub backend: String,
    /// SQLite 데이터베이스 파일 경로
    pub sqlite_path: String,
    /// 목록 조회 캐시 설정
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_owned(),
            sqlite_path: "shipscan.db".to_owned(),
            cache: CacheConfig::default(),
        }
    }
}

/// 캐시 설정
///
/// 무필터 `list` 쿼리를 감싸는 읽기-통과(read-through) 캐시입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// 캐시 활성화 여부
    pub enabled: bool,
    /// 엔트리 TTL (초)
    pub ttl_secs: u64,
    /// 최대 엔트리 수
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 300,
            max_entries: 100,
        }
    }
}

/// 디코더 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// 검출 전 각 변에서 잘라낼 중앙 크롭 마진 비율 (0.0 = 비활성, 최대 0.4)
    pub crop_margin_fraction: f64,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            crop_margin_fraction: 0.0,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_parse<T: FromStr>(target: &mut T, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<T>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse env var override, ignoring"
            ),
        }
    }
}
