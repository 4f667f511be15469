//! 관대한 base64 디코딩
//!
//! 위반 문서의 값은 base64일 수도, 이미 평문일 수도 있습니다.
//! 디코딩은 결과가 유효한 UTF-8일 때만 성공으로 봅니다.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use tracing::warn;

use napwatch_core::metrics as m;

/// 표준 알파벳, 정규 패딩, 남는 비트 허용
const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

/// base64 디코딩 에러
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// base64 문법 오류
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// 디코딩 결과가 UTF-8이 아님
    #[error("decoded bytes are not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// base64 텍스트를 UTF-8 문자열로 디코딩합니다. 빈 입력은 빈 문자열입니다.
pub fn decode_base64(encoded: &str) -> Result<String, DecodeError> {
    if encoded.is_empty() {
        return Ok(String::new());
    }
    let bytes = ENGINE.decode(encoded)?;
    Ok(String::from_utf8(bytes)?)
}

/// base64 텍스트를 디코딩하고, 실패하면 경고 후 원문을 반환합니다.
///
/// `source`는 로그와 `napwatch_decode_fallbacks_total` 레이블에 쓰입니다.
pub fn decode_or_original(encoded: &str, source: &'static str) -> String {
    match decode_base64(encoded) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!(source, value = encoded, error = %e, "failed to decode base64 value, keeping original");
            metrics::counter!(m::DECODE_FALLBACKS_TOTAL, m::LABEL_SOURCE => source).increment(1);
            encoded.to_owned()
        }
    }
}

/// 시그니처 버퍼를 디코딩합니다.
///
/// 디코딩 결과가 UTF-8이고 NUL 바이트가 없을 때만 디코딩된 텍스트를 쓰고,
/// 그 외에는 base64 원문을 유지합니다. 경고는 남기지 않습니다.
pub fn decode_printable(encoded: &str) -> String {
    match decode_base64(encoded) {
        Ok(decoded) if !decoded.contains('\0') => decoded,
        _ => encoded.to_owned(),
    }
}
