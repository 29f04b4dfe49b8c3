#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`input`]: 입력 분류 (래스터/HEIC), 픽셀 버퍼 로딩, HEIC 트랜스코딩
//! - [`detector`]: 중앙 크롭 전처리, 검출기 trait 및 `rxing` 구현

pub mod detector;
pub mod input;

// --- 주요 타입 re-export ---

pub use detector::{CodeDetector, DecodeOptions, ImageDecoder, RxingDetector, center_crop};
pub use input::{InputKind, classify, load_image};
