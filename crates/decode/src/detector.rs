//! 코드 검출 -- 전처리와 1D/2D 바코드·QR 검출기
//!
//! 검출기는 [`CodeDetector`] trait 뒤에 있어 플로우 테스트에서 스텁으로
//! 교체할 수 있습니다. 기본 구현은 `rxing`으로 이미지 내 모든 코드를
//! 찾습니다.

use image::{DynamicImage, GrayImage};
use metrics::counter;

use shipscan_core::error::ShipscanError;
use shipscan_core::metrics::{
    DECODE_CODES_DETECTED_TOTAL, DECODE_FAILURES_TOTAL, DECODE_IMAGES_TOTAL, LABEL_SYMBOLOGY,
};
use shipscan_core::pipeline::CodeDecoder;
use shipscan_core::types::RawCode;

use crate::input::load_image;

/// 디코딩 옵션
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// 검출 전 각 변에서 잘라낼 중앙 크롭 마진 비율.
    /// 카메라 촬영본의 넓은 테두리로 인한 미검출을 줄이기 위한
    /// 결정적 전처리로, `0.0`이면 비활성입니다. 유효 범위 [0.0, 0.4].
    pub crop_margin_fraction: f64,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            crop_margin_fraction: 0.0,
        }
    }
}

/// 그레이스케일 버퍼에서 코드를 찾는 trait
pub trait CodeDetector: Send + Sync {
    /// 이미지에서 검출된 모든 코드를 반환합니다. 미검출은 빈 Vec입니다.
    fn detect(&self, luma: &GrayImage) -> Result<Vec<RawCode>, ShipscanError>;
}

/// `rxing` 기반 기본 검출기 (QR + 1D 바코드)
#[derive(Debug, Default)]
pub struct RxingDetector;

impl CodeDetector for RxingDetector {
    fn detect(&self, luma: &GrayImage) -> Result<Vec<RawCode>, ShipscanError> {
        let (width, height) = luma.dimensions();
        match rxing::helpers::detect_multiple_in_luma(luma.as_raw().clone(), width, height) {
            Ok(results) => {
                let mut codes = Vec::with_capacity(results.len());
                for result in results {
                    let symbology = result.getBarcodeFormat().to_string();
                    let code =
                        RawCode::from_bytes(result.getText().as_bytes().to_vec(), symbology)?;
                    codes.push(code);
                }
                Ok(codes)
            }
            // 검출 단계의 실패(코드 없음 포함)는 에러가 아니라 빈 결과
            Err(e) => {
                tracing::debug!(error = %e, "detector found no codes");
                Ok(Vec::new())
            }
        }
    }
}

/// 검출 전 중앙 크롭 전처리
///
/// 각 변에서 `fraction` 비율만큼 잘라냅니다. 순수 이미지 공간 변환이며
/// 부수효과가 없습니다. `fraction`은 [0.0, 0.4]로 클램프되고 결과
/// 크기는 최소 1x1을 유지합니다.
pub fn center_crop(image: DynamicImage, fraction: f64) -> DynamicImage {
    let fraction = fraction.clamp(0.0, 0.4);
    if fraction <= 0.0 {
        return image;
    }
    let (width, height) = (image.width(), image.height());
    let dx = (f64::from(width) * fraction) as u32;
    let dy = (f64::from(height) * fraction) as u32;
    let new_width = width.saturating_sub(2 * dx).max(1);
    let new_height = height.saturating_sub(2 * dy).max(1);
    image.crop_imm(dx, dy, new_width, new_height)
}

/// 이미지 디코더 -- 로딩, 전처리, 검출을 하나로 묶은 어댑터
///
/// core의 [`CodeDecoder`] trait을 구현하여 리컨실 플로우에 주입됩니다.
pub struct ImageDecoder {
    options: DecodeOptions,
    detector: Box<dyn CodeDetector>,
}

impl ImageDecoder {
    /// 기본 검출기([`RxingDetector`])로 디코더를 생성합니다.
    pub fn new(options: DecodeOptions) -> Self {
        Self {
            options,
            detector: Box::new(RxingDetector),
        }
    }

    /// 커스텀 검출기로 디코더를 생성합니다 (테스트용).
    pub fn with_detector(options: DecodeOptions, detector: Box<dyn CodeDetector>) -> Self {
        Self { options, detector }
    }
}

impl CodeDecoder for ImageDecoder {
    fn decode(&self, bytes: &[u8], name_hint: Option<&str>) -> Result<Vec<RawCode>, ShipscanError> {
        counter!(DECODE_IMAGES_TOTAL).increment(1);

        let image = load_image(bytes, name_hint).inspect_err(|_| {
            counter!(DECODE_FAILURES_TOTAL).increment(1);
        })?;
        let image = center_crop(image, self.options.crop_margin_fraction);
        let luma = image.to_luma8();

        let codes = self.detector.detect(&luma)?;
        for code in &codes {
            counter!(DECODE_CODES_DETECTED_TOTAL, LABEL_SYMBOLOGY => code.symbology.clone())
                .increment(1);
        }
        tracing::debug!(
            detected = codes.len(),
            width = luma.width(),
            height = luma.height(),
            "decoded image"
        );
        Ok(codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn blank_png(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            width,
            height,
            image::Rgb([255, 255, 255]),
        ));
        let mut bytes = Cursor::new(Vec::new());
        image
            .write_to(&mut bytes, image::ImageOutputFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn center_crop_trims_margin_on_each_side() {
        let image = DynamicImage::new_rgb8(100, 200);
        let cropped = center_crop(image, 0.1);
        assert_eq!(cropped.width(), 80);
        assert_eq!(cropped.height(), 160);
    }

    #[test]
    fn center_crop_zero_fraction_is_identity() {
        let image = DynamicImage::new_rgb8(100, 200);
        let cropped = center_crop(image, 0.0);
        assert_eq!((cropped.width(), cropped.height()), (100, 200));
    }

    #[test]
    fn center_crop_clamps_excessive_fraction() {
        let image = DynamicImage::new_rgb8(100, 100);
        // 0.9는 0.4로 클램프되어 각 변 40씩 제거
        let cropped = center_crop(image, 0.9);
        assert_eq!((cropped.width(), cropped.height()), (20, 20));
    }

    #[test]
    fn center_crop_keeps_at_least_one_pixel() {
        let image = DynamicImage::new_rgb8(2, 2);
        let cropped = center_crop(image, 0.4);
        assert!(cropped.width() >= 1);
        assert!(cropped.height() >= 1);
    }

    #[test]
    fn blank_image_yields_empty_result_not_error() {
        let decoder = ImageDecoder::new(DecodeOptions::default());
        let codes = decoder.decode(&blank_png(256, 256), Some("blank.png")).unwrap();
        assert!(codes.is_empty());
    }

    #[test]
    fn corrupt_bytes_fail_with_image_error() {
        let decoder = ImageDecoder::new(DecodeOptions::default());
        let err = decoder.decode(b"not an image", None).unwrap_err();
        assert!(matches!(err, ShipscanError::Image(_)));
    }

    /// 전처리 파이프라인이 주입된 검출기까지 도달하는지 확인하는 스텁
    struct FixedDetector(Vec<RawCode>);

    impl CodeDetector for FixedDetector {
        fn detect(&self, _luma: &GrayImage) -> Result<Vec<RawCode>, ShipscanError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn decoder_returns_all_detected_codes() {
        let codes = vec![
            RawCode {
                text: "XY 999".to_owned(),
                symbology: "QR_CODE".to_owned(),
            },
            RawCode {
                text: "XY 999".to_owned(),
                symbology: "CODE_128".to_owned(),
            },
        ];
        let decoder = ImageDecoder::with_detector(
            DecodeOptions {
                crop_margin_fraction: 0.1,
            },
            Box::new(FixedDetector(codes.clone())),
        );
        // 같은 페이로드가 여러 번 검출되어도 중복 제거하지 않음
        let detected = decoder.decode(&blank_png(64, 64), None).unwrap();
        assert_eq!(detected, codes);
    }
}
