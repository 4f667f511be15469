//! 위반 상세 XML 디코더
//!
//! `violation_details` 필드를 [`ViolationData`] 목록으로 변환합니다.
//!
//! 1. XML 파싱 ([`document`])
//! 2. 컨텍스트 정규화 ([`context::normalize_contexts`])
//! 3. 위반별 컨텍스트 추출과 조립 ([`context`])
//! 4. 시그니처 추출 ([`signature`])
//!
//! 파싱에 실패하면 경고를 남기고 빈 목록을 반환합니다.

pub mod context;
pub mod decode;
pub mod document;
pub mod signature;

use tracing::warn;

use napwatch_core::event::ViolationData;

use crate::csv::FieldTable;

pub use document::{DocumentError, ViolationDocument, ViolationEntry};

/// 위반 상세 XML에서 위반 목록을 추출합니다.
///
/// `fields`는 URI 컨텍스트 대체값(`uri`)을 조회하는 데 사용합니다.
pub fn parse_violations(details: &str, fields: &FieldTable) -> Vec<ViolationData> {
    if details.is_empty() {
        return Vec::new();
    }

    let mut document = match ViolationDocument::parse(details) {
        Ok(document) => document,
        Err(e) => {
            warn!(error = %e, "failed to parse violation details, skipping violations");
            return Vec::new();
        }
    };

    context::normalize_contexts(&mut document.violations);

    document
        .violations
        .iter()
        .map(|entry| {
            let extraction = context::extract_context(entry);
            ViolationData {
                name: entry.name.clone(),
                context: entry.context.to_lowercase(),
                context_data: Some(context::build_context_data(extraction, entry, fields)),
                signatures: signature::extract_signatures(entry),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use napwatch_core::event::ContextData;

    const DETAILS: &str = "<?xml version='1.0' encoding='UTF-8'?><BAD_MSG><violation_masks><block>0</block><alarm>0</alarm><learn>0</learn><staging>0</staging></violation_masks><request-violations><violation><viol_index>42</viol_index><viol_name>VIOL_ATTACK_SIGNATURE</viol_name><context>url</context><sig_data><sig_id>200000099</sig_id><blocking_mask>3</blocking_mask><kw_data><buffer>Lzw+PHNjcmlwdD4=</buffer><offset>3</offset><length>7</length></kw_data></sig_data></violation><violation><viol_index>26</viol_index><viol_name>VIOL_URL_METACHAR</viol_name><uri>Lzw+PHNjcmlwdD4=</uri></violation><violation><viol_index>122</viol_index><viol_name>VIOL_BOT_CLIENT</viol_name></violation></request-violations></BAD_MSG>";

    #[test]
    fn extracts_violations_in_order() {
        let fields: FieldTable = [("uri", "/<><script>")].into_iter().collect();
        let violations = parse_violations(DETAILS, &fields);

        assert_eq!(violations.len(), 3);

        let first = &violations[0];
        assert_eq!(first.name, "VIOL_ATTACK_SIGNATURE");
        assert_eq!(first.context, "uri");
        // 추출 결과가 없으므로 CSV uri 사용
        assert_eq!(
            first.context_data,
            Some(ContextData::new("uri", "/<><script>"))
        );
        assert_eq!(first.signatures.len(), 1);
        assert_eq!(first.signatures[0].buffer, "/<><script>");

        let second = &violations[1];
        assert_eq!(second.context, "uri");
        assert_eq!(
            second.context_data,
            Some(ContextData::new("uri", "Lzw+PHNjcmlwdD4="))
        );

        let third = &violations[2];
        assert_eq!(third.context, "");
        assert_eq!(third.context_data, Some(ContextData::default()));
    }

    #[test]
    fn empty_details_yield_nothing() {
        assert!(parse_violations("", &FieldTable::new()).is_empty());
    }

    #[test]
    fn malformed_details_yield_nothing() {
        assert!(parse_violations("N/A", &FieldTable::new()).is_empty());
        assert!(parse_violations("<other/>", &FieldTable::new()).is_empty());
    }
}
