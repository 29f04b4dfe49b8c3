#![doc = include_str!("../README.md")]

pub mod code;
pub mod config;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod store;
pub mod types;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{
    ConfigError, DecodeError, ImageDecodeError, ShipscanError, StoreError, ValidationError,
};

// 설정
pub use config::ShipscanConfig;

// 정규화
pub use code::normalize;

// 스토어 trait
pub use store::{BoxFuture, DynShipmentStore, ShipmentStore};

// 디코더 trait
pub use pipeline::CodeDecoder;

// 도메인 타입
pub use types::{NewShipment, RawCode, Shipment, flag_label};
