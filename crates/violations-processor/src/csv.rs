//! ASM CSV 페이로드 디코더
//!
//! NGINX App Protect의 CSV 로그 프로필은 33개 필드를 고정된 순서로 기록합니다.
//! 필드 이름은 위치로만 결정되며 CSV 자체에는 헤더가 없습니다.
//!
//! 디코딩은 실패하지 않습니다. CSV로 읽을 수 없으면 빈 [`FieldTable`]을 반환하고,
//! 필드가 33개보다 적으면 없는 위치는 테이블에서 빠지며, 많으면 나머지를 버립니다.

use std::collections::BTreeMap;

use tracing::debug;

/// CSV 필드 위치별 이름 (33개, 순서 고정)
pub const FIELD_ORDER: [&str; 33] = [
    "blocking_exception_reason",
    "dest_port",
    "ip_client",
    "is_truncated_bool",
    "method",
    "policy_name",
    "protocol",
    "request_status",
    "response_code",
    "severity",
    "sig_cves",
    "sig_set_names",
    "src_port",
    "sub_violations",
    "support_id",
    "threat_campaign_names",
    "violation_rating",
    "vs_name",
    "x_forwarded_for_header_value",
    "outcome",
    "outcome_reason",
    "violations",
    "violation_details",
    "bot_signature_name",
    "bot_category",
    "bot_anomalies",
    "enforced_bot_anomalies",
    "client_class",
    "client_application",
    "client_application_version",
    "transport_protocol",
    "uri",
    "request",
];

/// 로그 프로필 접두어
const ASM_PREFIX: &str = "ASM:";

/// 복합 값 구분자
const COMBINED_SEPARATOR: &str = "::";

/// 필드 이름 -> 값 테이블
///
/// 값은 앞뒤 공백이 제거된 문자열입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTable {
    fields: BTreeMap<String, String>,
}

impl FieldTable {
    /// 빈 테이블을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 필드 값을 조회합니다.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// 필드 값을 조회합니다. 없으면 빈 문자열입니다.
    pub fn value(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    /// 필드를 기록합니다. 같은 이름이 있으면 덮어씁니다.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// 필드 존재 여부
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// 필드 수
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// (이름, 값)을 이름 순으로 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, value) in iter {
            table.insert(name, value);
        }
        table
    }
}

/// CSV 로그 메시지를 필드 테이블로 디코딩합니다.
///
/// 1. 선행 `ASM:` 접두어 제거
/// 2. 따옴표를 관대하게 처리하는 CSV 한 줄 파싱
/// 3. 위치별 이름 매핑 (33개 초과분 버림)
/// 4. `sig_cves`를 첫 `::`에서 나눠 `sig_ids` / `sig_names` 기록
/// 5. `sig_set_names`를 첫 `::`에서 나눠 앞부분으로 덮어쓰고,
///    뒷부분이 있으면 `sig_cves`를 덮어씀
pub fn parse_csv_log(message: &str) -> FieldTable {
    let mut table = FieldTable::new();

    let message = message.strip_prefix(ASM_PREFIX).unwrap_or(message);

    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(message.as_bytes());

    let mut record = ::csv::StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => {}
        Ok(false) => return table,
        Err(e) => {
            debug!(error = %e, "failed to read CSV record, returning empty field table");
            return table;
        }
    }

    for (name, value) in FIELD_ORDER.iter().zip(record.iter()) {
        table.insert(*name, value.trim());
    }

    // 순서 유지: sig_set_names의 두 번째 부분이 sig_cves를 덮어씀
    if let Some(combined) = table.get("sig_cves").map(str::to_owned) {
        match combined.split_once(COMBINED_SEPARATOR) {
            Some((ids, names)) => {
                table.insert("sig_ids", ids);
                table.insert("sig_names", names);
            }
            None => table.insert("sig_ids", combined),
        }
    }

    if let Some(combined) = table.get("sig_set_names").map(str::to_owned) {
        if let Some((set_names, cves)) = combined.split_once(COMBINED_SEPARATOR) {
            table.insert("sig_set_names", set_names);
            table.insert("sig_cves", cves);
        }
    }

    table
}

/// 부호 없는 32비트 정수를 파싱합니다. 실패하면 0입니다.
pub fn parse_u32(value: &str) -> u32 {
    value.trim().parse().unwrap_or(0)
}

/// `is_truncated_bool` 값을 해석합니다. `true`(대소문자 무시)만 참입니다.
pub fn parse_is_truncated(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
