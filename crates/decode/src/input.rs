//! 입력 분류 및 픽셀 버퍼 로딩
//!
//! 업로드 위젯이 넘겨주는 것은 원시 바이트와 파일명 힌트뿐입니다.
//! HEIC 여부는 확장자 힌트와 ISO-BMFF `ftyp` 브랜드 스니핑 양쪽으로
//! 판정하며, HEIC은 검출 전 반드시 래스터 픽셀 버퍼로 변환합니다.

use image::DynamicImage;

use shipscan_core::error::{ImageDecodeError, ShipscanError};

/// `ftyp` 박스에서 HEIC 계열로 취급하는 브랜드 목록
const HEIC_BRANDS: [&[u8; 4]; 8] = [
    b"heic", b"heix", b"hevc", b"hevx", b"heim", b"heis", b"mif1", b"msf1",
];

/// 입력 이미지 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// `image` 크레이트가 직접 파싱하는 래스터 형식 (PNG, JPEG 등)
    Raster,
    /// HEIC/HEIF 컨테이너 -- 검출 전 트랜스코딩 필요
    Heic,
}

/// 바이트와 파일명 힌트로 입력 종류를 판정합니다.
///
/// 힌트 확장자가 `heic`/`heif`이거나 `ftyp` 브랜드가 HEIC 계열이면
/// [`InputKind::Heic`]입니다. 둘 다 아니면 래스터로 취급하고 실제
/// 파싱 가능 여부는 로딩 단계에 맡깁니다.
pub fn classify(bytes: &[u8], name_hint: Option<&str>) -> InputKind {
    if hint_is_heic(name_hint) || sniff_heic(bytes) {
        InputKind::Heic
    } else {
        InputKind::Raster
    }
}

fn hint_is_heic(name_hint: Option<&str>) -> bool {
    let Some(name) = name_hint else {
        return false;
    };
    match name.rsplit('.').next() {
        Some(ext) => {
            let ext = ext.to_ascii_lowercase();
            ext == "heic" || ext == "heif"
        }
        None => false,
    }
}

fn sniff_heic(bytes: &[u8]) -> bool {
    if bytes.len() < 12 || &bytes[4..8] != b"ftyp" {
        return false;
    }
    let brand: &[u8] = &bytes[8..12];
    HEIC_BRANDS.iter().any(|b| brand == *b)
}

/// 입력 바이트를 픽셀 버퍼로 로딩합니다.
///
/// 래스터 입력은 `image` 크레이트로 파싱하고, HEIC 입력은 `heic`
/// 기능이 켜져 있으면 트랜스코딩, 꺼져 있으면
/// [`ImageDecodeError::HeicUnavailable`]로 실패합니다.
pub fn load_image(bytes: &[u8], name_hint: Option<&str>) -> Result<DynamicImage, ShipscanError> {
    match classify(bytes, name_hint) {
        InputKind::Heic => transcode_heic(bytes),
        InputKind::Raster => image::load_from_memory(bytes).map_err(|e| {
            ImageDecodeError::Unreadable {
                reason: e.to_string(),
            }
            .into()
        }),
    }
}

#[cfg(feature = "heic")]
fn transcode_heic(bytes: &[u8]) -> Result<DynamicImage, ShipscanError> {
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    let lib_heif = LibHeif::new();
    let ctx = HeifContext::read_from_bytes(bytes).map_err(|e| ImageDecodeError::Unreadable {
        reason: e.to_string(),
    })?;
    let handle = ctx
        .primary_image_handle()
        .map_err(|e| ImageDecodeError::Transcode {
            reason: e.to_string(),
        })?;
    let decoded = lib_heif
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
        .map_err(|e| ImageDecodeError::Transcode {
            reason: e.to_string(),
        })?;

    let planes = decoded.planes();
    let interleaved = planes
        .interleaved
        .ok_or_else(|| ImageDecodeError::Transcode {
            reason: "missing interleaved rgb plane".to_owned(),
        })?;

    let width = interleaved.width;
    let height = interleaved.height;
    let stride = interleaved.stride;
    let row_bytes = width as usize * 3;

    // stride가 행 길이보다 클 수 있으므로 행 단위로 복사
    let mut buf = Vec::with_capacity(row_bytes * height as usize);
    for y in 0..height as usize {
        let start = y * stride;
        let row = interleaved
            .data
            .get(start..start + row_bytes)
            .ok_or_else(|| ImageDecodeError::Transcode {
                reason: "truncated rgb plane".to_owned(),
            })?;
        buf.extend_from_slice(row);
    }

    let rgb = image::RgbImage::from_raw(width, height, buf).ok_or_else(|| {
        ImageDecodeError::Transcode {
            reason: "rgb buffer size mismatch".to_owned(),
        }
    })?;
    tracing::debug!(width, height, "transcoded heic input");
    Ok(DynamicImage::ImageRgb8(rgb))
}

#[cfg(not(feature = "heic"))]
fn transcode_heic(_bytes: &[u8]) -> Result<DynamicImage, ShipscanError> {
    Err(ImageDecodeError::HeicUnavailable.into())
}
