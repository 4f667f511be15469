//! 위반 상세 XML 문서 모델
//!
//! `violation_details` 필드에 들어 있는 `BAD_MSG` 문서를 파싱합니다.
//! 방화벽 버전에 따라 같은 정보가 서로 다른 자식 요소 형태로 기록되므로
//! 알려진 형태를 모두 선택적 필드로 담아 두고, 어떤 것을 쓸지는
//! [`context`](super::context) 모듈이 결정합니다.
//!
//! ```text
//! BAD_MSG
//!  ├─ violation_masks { block, alarm, learn, staging }
//!  └─ request-violations
//!      └─ violation*
//!          ├─ viol_name, context, ...
//!          └─ sig_data* { sig_id, blocking_mask, kw_data { buffer, offset, length } }
//! ```
//!
//! 요소 텍스트는 직접 자식 텍스트 노드만 이어 붙입니다. 같은 요소가 반복되면
//! 마지막 값을 사용합니다 (`metachar_index`, `sig_data`, `violation` 제외).

use roxmltree::{Document, Node};

/// 문서 루트 요소 이름
const ROOT_ELEMENT: &str = "BAD_MSG";

/// 위반 XML 파싱 에러
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// XML 문법 오류
    #[error("malformed violation XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// 루트 요소가 `BAD_MSG`가 아님
    #[error("unexpected root element '{0}', expected '{ROOT_ELEMENT}'")]
    UnexpectedRoot(String),
}

/// 위반 마스크 그룹
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViolationMasks {
    pub block: String,
    pub alarm: String,
    pub learn: String,
    pub staging: String,
}

/// 파라미터 데이터 (`parameter_data`, `param_data`, `context_data/param_data`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamData {
    pub text: String,
    pub name: String,
    pub value: String,
    pub is_base64_decoded: bool,
}

/// 헤더 데이터 (`header`, `header_data`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderData {
    pub text: String,
    pub name: String,
    pub value: String,
    pub actual_value: String,
    pub matched_value: String,
    pub is_base64_decoded: bool,
}

impl HeaderData {
    /// 이름, 실제 값, 매치 값 중 하나라도 있으면 참입니다.
    pub fn has_values(&self) -> bool {
        !self.name.is_empty() || !self.actual_value.is_empty() || !self.matched_value.is_empty()
    }
}

/// 쿠키 데이터 (`cookie`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieData {
    pub text: String,
    pub name: String,
    pub value: String,
    pub is_base64_decoded: bool,
}

/// URI 객체 데이터 (`object_data`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UriObjectData {
    pub text: String,
    pub object: String,
}

/// 키워드 매치 위치 (`kw_data`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KwData {
    /// base64로 인코딩된 매치 버퍼
    pub buffer: String,
    pub offset: String,
    pub length: String,
}

/// 시그니처 매치 (`sig_data`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureEntry {
    pub sig_id: String,
    pub blocking_mask: String,
    pub kw_data: KwData,
}

/// 단일 위반 (`violation`)
///
/// 컨텍스트별 하위 데이터는 서로 배타적이지만 문서가 이를 보장하지 않으므로
/// 모두 선택적으로 보관합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViolationEntry {
    pub index: String,
    /// 위반 심볼 이름 (`VIOL_ATTACK_SIGNATURE` 등)
    pub name: String,
    /// 컨텍스트 라벨 (비어 있거나 레거시 `url`일 수 있음)
    pub context: String,

    // parameter
    /// `context_data/param_data`
    pub context_param_data: Option<ParamData>,
    pub parameter_data: Option<ParamData>,
    pub param_data: Option<ParamData>,
    pub param_name: String,
    pub is_base64_decoded: bool,

    // header
    pub header: Option<HeaderData>,
    pub header_data: Option<HeaderData>,
    pub header_name: String,
    pub header_len: String,
    pub header_len_limit: String,

    // cookie
    pub cookie: Option<CookieData>,
    pub cookie_name: String,
    pub cookie_len: String,
    pub cookie_len_limit: String,
    pub buffer: String,
    pub specific_desc: String,

    // uri
    pub uri: String,
    pub object_data: Option<UriObjectData>,
    pub uri_len: String,
    pub uri_len_limit: String,

    // request
    pub defined_length: String,
    pub detected_length: String,
    pub total_len: String,
    pub total_len_limit: String,

    // 보조 정보 (추출에는 쓰이지 않음)
    pub staging: String,
    pub http_sanity_checks_status: String,
    pub http_sub_violation_status: String,
    pub http_sub_violation: String,
    pub wildcard_entity: String,
    pub language_type: String,
    pub metachar_index: Vec<String>,

    pub signatures: Vec<SignatureEntry>,
}

/// 위반 상세 문서 (`BAD_MSG`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViolationDocument {
    pub masks: ViolationMasks,
    /// 문서 순서대로의 위반 목록
    pub violations: Vec<ViolationEntry>,
}

impl ViolationDocument {
    /// XML 텍스트를 파싱합니다.
    pub fn parse(xml: &str) -> Result<Self, DocumentError> {
        let doc = Document::parse(xml)?;
        let root = doc.root_element();
        if root.tag_name().name() != ROOT_ELEMENT {
            return Err(DocumentError::UnexpectedRoot(
                root.tag_name().name().to_owned(),
            ));
        }

        let mut document = Self::default();
        for child in elements(root) {
            match child.tag_name().name() {
                "violation_masks" => document.masks = parse_masks(child),
                "request-violations" => {
                    document.violations.extend(
                        elements(child)
                            .filter(|n| n.tag_name().name() == "violation")
                            .map(parse_violation),
                    );
                }
                _ => {}
            }
        }

        Ok(document)
    }
}

fn elements<'a, 'input: 'a>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

/// 직접 자식 텍스트 노드를 이어 붙입니다.
fn text(node: Node) -> String {
    node.children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

fn parse_flag(node: Node) -> bool {
    matches!(
        text(node).trim(),
        "1" | "t" | "T" | "true" | "TRUE" | "True"
    )
}

fn parse_masks(node: Node) -> ViolationMasks {
    let mut masks = ViolationMasks::default();
    for child in elements(node) {
        match child.tag_name().name() {
            "block" => masks.block = text(child),
            "alarm" => masks.alarm = text(child),
            "learn" => masks.learn = text(child),
            "staging" => masks.staging = text(child),
            _ => {}
        }
    }
    masks
}

fn parse_param_data(node: Node) -> ParamData {
    let mut data = ParamData {
        text: text(node),
        ..Default::default()
    };
    for child in elements(node) {
        match child.tag_name().name() {
            "name" => data.name = text(child),
            "value" => data.value = text(child),
            "is_base64_decoded" => data.is_base64_decoded = parse_flag(child),
            _ => {}
        }
    }
    data
}

fn parse_context_data(node: Node) -> Option<ParamData> {
    elements(node)
        .filter(|n| n.tag_name().name() == "param_data")
        .last()
        .map(parse_param_data)
}

fn parse_header(node: Node) -> HeaderData {
    let mut data = HeaderData {
        text: text(node),
        ..Default::default()
    };
    for child in elements(node) {
        match child.tag_name().name() {
            "header_name" => data.name = text(child),
            "header_value" => data.value = text(child),
            "header_actual_value" => data.actual_value = text(child),
            "header_matched_value" => data.matched_value = text(child),
            "is_base64_decoded" => data.is_base64_decoded = parse_flag(child),
            _ => {}
        }
    }
    data
}

fn parse_cookie(node: Node) -> CookieData {
    let mut data = CookieData {
        text: text(node),
        ..Default::default()
    };
    for child in elements(node) {
        match child.tag_name().name() {
            "cookie_name" => data.name = text(child),
            "cookie_value" => data.value = text(child),
            "is_base64_decoded" => data.is_base64_decoded = parse_flag(child),
            _ => {}
        }
    }
    data
}

fn parse_object_data(node: Node) -> UriObjectData {
    let mut data = UriObjectData {
        text: text(node),
        ..Default::default()
    };
    for child in elements(node) {
        if child.tag_name().name() == "object" {
            data.object = text(child);
        }
    }
    data
}

fn parse_signature(node: Node) -> SignatureEntry {
    let mut sig = SignatureEntry::default();
    for child in elements(node) {
        match child.tag_name().name() {
            "sig_id" => sig.sig_id = text(child),
            "blocking_mask" => sig.blocking_mask = text(child),
            "kw_data" => {
                for kw in elements(child) {
                    match kw.tag_name().name() {
                        "buffer" => sig.kw_data.buffer = text(kw),
                        "offset" => sig.kw_data.offset = text(kw),
                        "length" => sig.kw_data.length = text(kw),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
    sig
}

fn parse_violation(node: Node) -> ViolationEntry {
    let mut entry = ViolationEntry::default();
    for child in elements(node) {
        match child.tag_name().name() {
            "viol_index" => entry.index = text(child),
            "viol_name" => entry.name = text(child),
            "context" => entry.context = text(child),
            "context_data" => entry.context_param_data = parse_context_data(child),
            "parameter_data" => entry.parameter_data = Some(parse_param_data(child)),
            "param_data" => entry.param_data = Some(parse_param_data(child)),
            "param_name" => entry.param_name = text(child),
            "is_base64_decoded" => entry.is_base64_decoded = parse_flag(child),
            "header" => entry.header = Some(parse_header(child)),
            "header_data" => entry.header_data = Some(parse_header(child)),
            "header_name" => entry.header_name = text(child),
            "header_len" => entry.header_len = text(child),
            "header_len_limit" => entry.header_len_limit = text(child),
            "cookie" => entry.cookie = Some(parse_cookie(child)),
            "cookie_name" => entry.cookie_name = text(child),
            "cookie_len" => entry.cookie_len = text(child),
            "cookie_len_limit" => entry.cookie_len_limit = text(child),
            "buffer" => entry.buffer = text(child),
            "specific_desc" => entry.specific_desc = text(child),
            "uri" => entry.uri = text(child),
            "object_data" => entry.object_data = Some(parse_object_data(child)),
            "uri_len" => entry.uri_len = text(child),
            "uri_len_limit" => entry.uri_len_limit = text(child),
            "defined_length" => entry.defined_length = text(child),
            "detected_length" => entry.detected_length = text(child),
            "total_len" => entry.total_len = text(child),
            "total_len_limit" => entry.total_len_limit = text(child),
            "staging" => entry.staging = text(child),
            "http_sanity_checks_status" => entry.http_sanity_checks_status = text(child),
            "http_sub_violation_status" => entry.http_sub_violation_status = text(child),
            "http_sub_violation" => entry.http_sub_violation = text(child),
            "wildcard_entity" => entry.wildcard_entity = text(child),
            "language_type" => entry.language_type = text(child),
            "metachar_index" => entry.metachar_index.push(text(child)),
            "sig_data" => entry.signatures.push(parse_signature(child)),
            _ => {}
        }
    }
    entry
}
