//! 시그니처 매치 추출

use napwatch_core::event::SignatureData;

use super::decode::decode_printable;
use super::document::ViolationEntry;
use crate::csv::parse_u32;

/// 위반의 `sig_data` 목록을 문서 순서대로 [`SignatureData`]로 변환합니다.
pub fn extract_signatures(entry: &ViolationEntry) -> Vec<SignatureData> {
    entry
        .signatures
        .iter()
        .map(|sig| SignatureData {
            id: parse_u32(&sig.sig_id),
            blocking_mask: sig.blocking_mask.clone(),
            buffer: decode_printable(&sig.kw_data.buffer),
            offset: parse_u32(&sig.kw_data.offset),
            length: parse_u32(&sig.kw_data.length),
        })
        .collect()
}
