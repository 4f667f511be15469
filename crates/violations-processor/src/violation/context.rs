//! 위반별 컨텍스트 (이름, 값) 추출
//!
//! 컨텍스트 종류마다 우선순위가 있는 probe 목록을 두고, 처음으로 매치되는
//! probe의 결과를 사용합니다. probe 결과는 [`Extraction`]이며, 이미 평문인지
//! 여부(`already_decoded`)에 따라 마지막 조립 단계에서 base64 디코딩을 시도합니다.
//!
//! | 컨텍스트 | probe 순서 |
//! |---|---|
//! | parameter | `context_data/param_data` -> `parameter_data` -> `param_data` -> `param_name` |
//! | header | `header` -> `header_data` -> 헤더 길이 초과 |
//! | cookie | `cookie` -> `cookie_name` -> `buffer` -> 쿠키 길이 초과 |
//! | uri | `uri` -> `object_data` -> `uri_len` -> `header_data` |
//! | request | `defined_length` -> `total_len` |
//! | 그 외 | `header_data` |

use tracing::warn;

use napwatch_core::event::ContextData;

use super::decode::{decode_base64, decode_or_original};
use super::document::{HeaderData, ViolationEntry};
use crate::csv::FieldTable;

pub const CONTEXT_PARAMETER: &str = "parameter";
pub const CONTEXT_HEADER: &str = "header";
pub const CONTEXT_COOKIE: &str = "cookie";
pub const CONTEXT_URI: &str = "uri";
pub const CONTEXT_URL: &str = "url";
pub const CONTEXT_REQUEST: &str = "request";

/// probe 한 번의 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub name: String,
    pub value: String,
    /// 이미 평문이면 참 (추가 디코딩 없음)
    pub already_decoded: bool,
}

impl Extraction {
    fn new(name: impl Into<String>, value: impl Into<String>, already_decoded: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            already_decoded,
        }
    }

    fn decoded(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value, true)
    }
}

/// 매치되지 않으면 `None`을 반환하는 추출 함수
type Probe = fn(&ViolationEntry) -> Option<Extraction>;

const PARAMETER_PROBES: &[Probe] = &[
    wrapped_param_data,
    parameter_data,
    param_data,
    bare_param_name,
];
const HEADER_PROBES: &[Probe] = &[header_struct, header_data, header_length_exceeded];
const COOKIE_PROBES: &[Probe] = &[
    cookie_struct,
    bare_cookie_name,
    cookie_buffer,
    cookie_length_exceeded,
];
const URI_PROBES: &[Probe] = &[uri_literal, uri_object, uri_length, header_data_with_values];
const REQUEST_PROBES: &[Probe] = &[defined_length, total_length];
const DEFAULT_PROBES: &[Probe] = &[header_data_with_values];

// ─── 컨텍스트 정규화 ────────────────────────────────────────────────

/// 모든 위반의 컨텍스트를 정규화합니다.
///
/// - `url`(대소문자 무시)은 `uri`로 바꿉니다.
/// - 빈 컨텍스트는 위반 이름에서 추론합니다.
///
/// 여러 번 적용해도 결과가 같습니다.
pub fn normalize_contexts(entries: &mut [ViolationEntry]) {
    for entry in entries {
        if entry.context.eq_ignore_ascii_case(CONTEXT_URL) {
            entry.context = CONTEXT_URI.to_owned();
        }
        if entry.context.is_empty() && !entry.name.is_empty() {
            entry.context = context_from_violation_name(&entry.name).to_owned();
        }
    }
}

/// 위반 이름에 포함된 단어로 컨텍스트를 추론합니다. 처음 매치가 우선합니다.
pub fn context_from_violation_name(violation_name: &str) -> &'static str {
    let lower = violation_name.to_lowercase();
    [
        CONTEXT_PARAMETER,
        CONTEXT_HEADER,
        CONTEXT_COOKIE,
        CONTEXT_REQUEST,
    ]
    .into_iter()
    .find(|ctx| lower.contains(ctx))
    .or_else(|| {
        (lower.contains(CONTEXT_URI) || lower.contains(CONTEXT_URL)).then_some(CONTEXT_URI)
    })
    .unwrap_or("")
}

// ─── 추출 ──────────────────────────────────────────────────────────

/// 컨텍스트 종류에 맞는 probe 목록을 차례로 시도합니다.
pub fn extract_context(entry: &ViolationEntry) -> Extraction {
    let probes = match entry.context.to_lowercase().as_str() {
        CONTEXT_PARAMETER => PARAMETER_PROBES,
        CONTEXT_HEADER => HEADER_PROBES,
        CONTEXT_COOKIE => COOKIE_PROBES,
        CONTEXT_URI => URI_PROBES,
        CONTEXT_REQUEST => REQUEST_PROBES,
        _ => DEFAULT_PROBES,
    };

    probes
        .iter()
        .find_map(|probe| probe(entry))
        .unwrap_or_default()
}

/// 추출 결과를 최종 [`ContextData`]로 조립합니다.
///
/// 평문이 아닌 결과는 이름과 값을 각각 디코딩하며, 실패하면 원문을 유지합니다.
/// URI 컨텍스트에서 이름과 값이 모두 비면 CSV의 `uri` 필드를 사용합니다.
pub fn build_context_data(
    extraction: Extraction,
    entry: &ViolationEntry,
    fields: &FieldTable,
) -> ContextData {
    let (name, value) = if extraction.already_decoded {
        populate_name_value(&entry.name, extraction.name, extraction.value)
    } else if !extraction.name.is_empty() || !extraction.value.is_empty() {
        let name = decode_or_original(&extraction.name, "context_name");
        let value = decode_or_original(&extraction.value, "context_value");
        populate_name_value(&entry.name, name, value)
    } else {
        (String::new(), String::new())
    };

    let context = entry.context.to_lowercase();
    let is_uri = context == CONTEXT_URI || context == CONTEXT_URL;
    if name.is_empty() && value.is_empty() && is_uri {
        let uri = fields.value("uri");
        if !uri.is_empty() {
            return ContextData::new(CONTEXT_URI, uri);
        }
    }

    ContextData::new(name, value)
}

/// 이름 또는 값이 비었을 때 위반 이름으로 보완합니다.
///
/// - 둘 다 있음: 그대로
/// - 값만 있음: (파생 이름, 값)
/// - 이름만 있음: (파생 이름, 추출된 이름)
/// - 둘 다 없음: 둘 다 빈 값
pub fn populate_name_value(
    violation_name: &str,
    name: String,
    value: String,
) -> (String, String) {
    match (name.is_empty(), value.is_empty()) {
        (false, false) => (name, value),
        (true, false) => (violation_name_to_data_name(violation_name), value),
        (false, true) => (violation_name_to_data_name(violation_name), name),
        (true, true) => (String::new(), String::new()),
    }
}

/// 위반 심볼 이름을 읽기 쉬운 이름으로 바꿉니다.
///
/// `VIOL_ATTACK_SIGNATURE` -> `Attack Signature`
pub fn violation_name_to_data_name(violation_name: &str) -> String {
    let lower = violation_name.to_lowercase();
    let mut parts: Vec<&str> = lower.split('_').collect();
    if parts.first() == Some(&"viol") {
        parts.remove(0);
    }

    parts
        .into_iter()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ─── parameter ─────────────────────────────────────────────────────

fn wrapped_param_data(entry: &ViolationEntry) -> Option<Extraction> {
    let data = entry.context_param_data.as_ref()?;
    (!data.name.is_empty())
        .then(|| Extraction::new(&data.name, &data.value, data.is_base64_decoded))
}

fn parameter_data(entry: &ViolationEntry) -> Option<Extraction> {
    let data = entry.parameter_data.as_ref()?;
    Some(Extraction::new(&data.name, &data.value, data.is_base64_decoded))
}

fn param_data(entry: &ViolationEntry) -> Option<Extraction> {
    let data = entry.param_data.as_ref()?;
    Some(Extraction::new(&data.name, &data.value, data.is_base64_decoded))
}

fn bare_param_name(entry: &ViolationEntry) -> Option<Extraction> {
    (!entry.param_name.is_empty())
        .then(|| Extraction::new(&entry.param_name, "", entry.is_base64_decoded))
}

// ─── header ────────────────────────────────────────────────────────

fn header_struct(entry: &ViolationEntry) -> Option<Extraction> {
    let header = entry.header.as_ref()?;
    if !header.name.is_empty() || !header.value.is_empty() {
        Some(Extraction::new(
            &header.name,
            &header.value,
            header.is_base64_decoded,
        ))
    } else {
        Some(Extraction::new("", &header.text, header.is_base64_decoded))
    }
}

fn header_data(entry: &ViolationEntry) -> Option<Extraction> {
    let data = entry.header_data.as_ref()?;
    Some(Extraction::new(&data.name, &data.value, data.is_base64_decoded))
}

fn header_length_exceeded(entry: &ViolationEntry) -> Option<Extraction> {
    if entry.header_len.is_empty() {
        return None;
    }
    let name = decode_or_original(&entry.header_name, "header_name");
    let value = format!(
        "Header length: {}, exceeds Header length limit: {}",
        entry.header_len, entry.header_len_limit
    );
    Some(Extraction::decoded(name, value))
}

/// `header_data`의 이름, 실제 값, 매치 값을 디코딩해 하나의 값으로 합칩니다.
fn header_data_with_values(entry: &ViolationEntry) -> Option<Extraction> {
    let data: &HeaderData = entry.header_data.as_ref().filter(|d| d.has_values())?;

    let name = decode_or_original(&data.name, "header_data");
    let actual = decode_or_original(&data.actual_value, "header_data");
    let matched = decode_or_original(&data.matched_value, "header_data");

    Some(Extraction::decoded(
        name,
        format!("actual header value: {actual}. matched header value: {matched}"),
    ))
}

// ─── cookie ────────────────────────────────────────────────────────

fn cookie_struct(entry: &ViolationEntry) -> Option<Extraction> {
    if !entry.cookie_len.is_empty() {
        return None;
    }
    let cookie = entry.cookie.as_ref()?;
    Some(Extraction::new(
        &cookie.name,
        &cookie.value,
        cookie.is_base64_decoded,
    ))
}

fn bare_cookie_name(entry: &ViolationEntry) -> Option<Extraction> {
    (!entry.cookie_name.is_empty())
        .then(|| Extraction::new(&entry.cookie_name, "", entry.is_base64_decoded))
}

fn cookie_buffer(entry: &ViolationEntry) -> Option<Extraction> {
    if entry.buffer.is_empty() {
        return None;
    }
    match decode_base64(&entry.buffer) {
        Ok(decoded) => Some(Extraction::decoded(&entry.specific_desc, decoded)),
        Err(e) => {
            warn!(
                violation = entry.name.as_str(),
                error = %e,
                "failed to decode cookie buffer, trying next source"
            );
            None
        }
    }
}

fn cookie_length_exceeded(entry: &ViolationEntry) -> Option<Extraction> {
    if entry.cookie_len.is_empty() {
        return None;
    }
    let cookie = entry.cookie.as_ref()?;
    match decode_base64(&cookie.text) {
        Ok(decoded) => Some(Extraction::decoded(
            format!(
                "Cookie length: {}, exceeds Cookie length limit: {}",
                entry.cookie_len, entry.cookie_len_limit
            ),
            decoded,
        )),
        Err(e) => {
            warn!(
                violation = entry.name.as_str(),
                error = %e,
                "failed to decode oversized cookie"
            );
            None
        }
    }
}

// ─── uri ───────────────────────────────────────────────────────────

fn uri_literal(entry: &ViolationEntry) -> Option<Extraction> {
    (!entry.uri.is_empty()).then(|| Extraction::decoded(CONTEXT_URI, &entry.uri))
}

fn uri_object(entry: &ViolationEntry) -> Option<Extraction> {
    let data = entry.object_data.as_ref()?;
    Some(Extraction::decoded(CONTEXT_URI, &data.object))
}

fn uri_length(entry: &ViolationEntry) -> Option<Extraction> {
    (!entry.uri_len.is_empty()).then(|| {
        Extraction::decoded(
            format!("URI length: {}", entry.uri_len),
            format!("URI length limit: {}", entry.uri_len_limit),
        )
    })
}

// ─── request ───────────────────────────────────────────────────────

fn defined_length(entry: &ViolationEntry) -> Option<Extraction> {
    (!entry.defined_length.is_empty()).then(|| {
        Extraction::decoded(
            format!("Defined length: {}", entry.defined_length),
            format!("Detected length: {}", entry.detected_length),
        )
    })
}

fn total_length(entry: &ViolationEntry) -> Option<Extraction> {
    (!entry.total_len.is_empty()).then(|| {
        Extraction::decoded(
            format!("Total length: {}", entry.total_len),
            format!("Total length limit: {}", entry.total_len_limit),
        )
    })
}
