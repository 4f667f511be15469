//! 보안 위반 이벤트 스키마
//!
//! NGINX App Protect 로그 한 줄에서 추출한 구조화 이벤트입니다.
//! 기본 인코딩은 protobuf([`prost`])이며, 레거시 JSON 모드에서는 같은 구조를
//! [`serde_json`]으로 직렬화합니다. JSON에서 열거형 필드는 정수 대신
//! 심볼 이름(`REQUEST_STATUS_BLOCKED` 등)으로 기록됩니다.
//!
//! 이벤트는 레코드마다 새로 만들어 한 번에 채운 뒤 바로 직렬화합니다.

use serde::{Deserialize, Serialize};

// --- 열거형 ---

/// 열거형의 심볼 이름 변환과 JSON 직렬화 모듈을 생성합니다.
///
/// prost 필드는 `i32`로 저장되므로 JSON 직렬화는 `#[serde(with = ...)]`로
/// 이름 변환을 끼워 넣습니다.
macro_rules! symbolic_enum {
    ($ty:ident, $serde_mod:ident, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// protobuf 심볼 이름을 반환합니다.
            pub fn as_str_name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }

            /// protobuf 심볼 이름에서 값을 찾습니다.
            pub fn from_str_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str_name())
            }
        }

        #[doc = concat!("`", stringify!($ty), "` 필드를 심볼 이름으로 직렬화하는 serde 모듈")]
        pub mod $serde_mod {
            use serde::{Deserialize, Deserializer, Serializer};

            pub fn serialize<S: Serializer>(value: &i32, serializer: S) -> Result<S::Ok, S::Error> {
                let name = super::$ty::try_from(*value)
                    .unwrap_or_default()
                    .as_str_name();
                serializer.serialize_str(name)
            }

            pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
                let name = String::deserialize(deserializer)?;
                Ok(super::$ty::from_str_name(&name).unwrap_or_default() as i32)
            }
        }
    };
}

/// 요청 처리 결과
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum RequestOutcome {
    Unknown = 0,
    Passed = 1,
    Rejected = 2,
}

impl RequestOutcome {
    /// 로그 텍스트에서 처리 결과를 파싱합니다.
    ///
    /// 대소문자를 구분하지 않으며 알 수 없는 값은 `Unknown`입니다.
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "passed" => Self::Passed,
            "rejected" => Self::Rejected,
            _ => Self::Unknown,
        }
    }
}

symbolic_enum!(RequestOutcome, request_outcome_name, {
    Unknown => "REQUEST_OUTCOME_UNKNOWN",
    Passed => "REQUEST_OUTCOME_PASSED",
    Rejected => "REQUEST_OUTCOME_REJECTED",
});

/// 처리 결과 사유
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum RequestOutcomeReason {
    SecurityWafUnknown = 0,
    SecurityWafOk = 1,
    SecurityWafViolation = 2,
    SecurityWafFlagged = 3,
    SecurityWafViolationTransparent = 4,
}

impl RequestOutcomeReason {
    /// 로그 텍스트에서 처리 결과 사유를 파싱합니다.
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "SECURITY_WAF_OK" => Self::SecurityWafOk,
            "SECURITY_WAF_VIOLATION" => Self::SecurityWafViolation,
            "SECURITY_WAF_FLAGGED" => Self::SecurityWafFlagged,
            "SECURITY_WAF_VIOLATION_TRANSPARENT" => Self::SecurityWafViolationTransparent,
            _ => Self::SecurityWafUnknown,
        }
    }
}

symbolic_enum!(RequestOutcomeReason, request_outcome_reason_name, {
    SecurityWafUnknown => "SECURITY_WAF_UNKNOWN",
    SecurityWafOk => "SECURITY_WAF_OK",
    SecurityWafViolation => "SECURITY_WAF_VIOLATION",
    SecurityWafFlagged => "SECURITY_WAF_FLAGGED",
    SecurityWafViolationTransparent => "SECURITY_WAF_VIOLATION_TRANSPARENT",
});

/// 요청 상태
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum RequestStatus {
    Unknown = 0,
    Blocked = 1,
    Alerted = 2,
    Passed = 3,
}

impl RequestStatus {
    /// 로그 텍스트에서 요청 상태를 파싱합니다.
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "blocked" => Self::Blocked,
            "alerted" => Self::Alerted,
            "passed" => Self::Passed,
            _ => Self::Unknown,
        }
    }
}

symbolic_enum!(RequestStatus, request_status_name, {
    Unknown => "REQUEST_STATUS_UNKNOWN",
    Blocked => "REQUEST_STATUS_BLOCKED",
    Alerted => "REQUEST_STATUS_ALERTED",
    Passed => "REQUEST_STATUS_PASSED",
});

/// 위반 심각도
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Severity {
    Unknown = 0,
    Emergency = 1,
    Alert = 2,
    Critical = 3,
    Error = 4,
    Warning = 5,
    Notice = 6,
    Informational = 7,
}

impl Severity {
    /// 로그 텍스트에서 심각도를 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "emergency" => Self::Emergency,
            "alert" => Self::Alert,
            "critical" => Self::Critical,
            "error" => Self::Error,
            "warning" => Self::Warning,
            "notice" => Self::Notice,
            "informational" => Self::Informational,
            _ => Self::Unknown,
        }
    }
}

symbolic_enum!(Severity, severity_name, {
    Unknown => "SEVERITY_UNKNOWN",
    Emergency => "SEVERITY_EMERGENCY",
    Alert => "SEVERITY_ALERT",
    Critical => "SEVERITY_CRITICAL",
    Error => "SEVERITY_ERROR",
    Warning => "SEVERITY_WARNING",
    Notice => "SEVERITY_NOTICE",
    Informational => "SEVERITY_INFORMATIONAL",
});

// --- 메시지 ---

/// 위반이 가리키는 요청 위치의 (이름, 값) 쌍
#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextData {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

impl ContextData {
    /// 이름과 값으로 생성합니다.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// 공격 시그니처 매치 정보
#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureData {
    /// 시그니처 ID
    #[prost(uint32, tag = "1")]
    pub id: u32,
    /// 차단 마스크 (원문 그대로)
    #[prost(string, tag = "2")]
    pub blocking_mask: String,
    /// 매치된 버퍼 (가능하면 디코딩된 텍스트)
    #[prost(string, tag = "3")]
    pub buffer: String,
    /// 버퍼 내 매치 시작 위치
    #[prost(uint32, tag = "4")]
    pub offset: u32,
    /// 매치 길이
    #[prost(uint32, tag = "5")]
    pub length: u32,
}

/// 단일 위반 정보
#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct ViolationData {
    /// 위반 심볼 이름 (예: `VIOL_ATTACK_SIGNATURE`)
    #[prost(string, tag = "1")]
    pub name: String,
    /// 소문자 컨텍스트 (`parameter`, `header`, `cookie`, `uri`, `request` 또는 빈 값)
    #[prost(string, tag = "2")]
    pub context: String,
    #[prost(message, optional, tag = "3")]
    pub context_data: Option<ContextData>,
    #[prost(message, repeated, tag = "4")]
    pub signatures: Vec<SignatureData>,
}

/// NGINX App Protect 보안 위반 이벤트
#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityViolationEvent {
    #[prost(string, tag = "1")]
    pub policy_name: String,
    #[prost(string, tag = "2")]
    pub support_id: String,
    #[prost(enumeration = "RequestOutcome", tag = "3")]
    #[serde(with = "request_outcome_name")]
    pub outcome: i32,
    #[prost(enumeration = "RequestOutcomeReason", tag = "4")]
    #[serde(with = "request_outcome_reason_name")]
    pub outcome_reason: i32,
    #[prost(string, tag = "5")]
    pub blocking_exception_reason: String,
    #[prost(string, tag = "6")]
    pub method: String,
    #[prost(string, tag = "7")]
    pub protocol: String,
    #[prost(string, tag = "8")]
    pub x_forwarded_for_header_value: String,
    #[prost(string, tag = "9")]
    pub uri: String,
    #[prost(string, tag = "10")]
    pub request: String,
    #[prost(bool, tag = "11")]
    pub is_truncated: bool,
    #[prost(enumeration = "RequestStatus", tag = "12")]
    #[serde(with = "request_status_name")]
    pub request_status: i32,
    #[prost(uint32, tag = "13")]
    pub response_code: u32,
    #[prost(string, tag = "14")]
    pub server_addr: String,
    #[prost(string, tag = "15")]
    pub vs_name: String,
    #[prost(string, tag = "16")]
    pub remote_addr: String,
    #[prost(uint32, tag = "17")]
    pub destination_port: u32,
    #[prost(uint32, tag = "18")]
    pub server_port: u32,
    #[prost(string, tag = "19")]
    pub violations: String,
    #[prost(string, tag = "20")]
    pub sub_violations: String,
    #[prost(uint32, tag = "21")]
    pub violation_rating: u32,
    #[prost(string, tag = "22")]
    pub sig_set_names: String,
    #[prost(string, tag = "23")]
    pub sig_cves: String,
    #[prost(string, tag = "24")]
    pub client_class: String,
    #[prost(string, tag = "25")]
    pub client_application: String,
    #[prost(string, tag = "26")]
    pub client_application_version: String,
    #[prost(enumeration = "Severity", tag = "27")]
    #[serde(with = "severity_name")]
    pub severity: i32,
    #[prost(string, tag = "28")]
    pub threat_campaign_names: String,
    #[prost(string, tag = "29")]
    pub bot_anomalies: String,
    #[prost(string, tag = "30")]
    pub bot_category: String,
    #[prost(string, tag = "31")]
    pub enforced_bot_anomalies: String,
    #[prost(string, tag = "32")]
    pub bot_signature_name: String,
    #[prost(string, tag = "33")]
    pub system_id: String,
    #[prost(string, tag = "34")]
    pub parent_hostname: String,
    #[prost(string, tag = "35")]
    pub display_name: String,
    #[prost(message, repeated, tag = "36")]
    pub violations_data: Vec<ViolationData>,
}

impl SecurityViolationEvent {
    /// protobuf 바이너리로 인코딩합니다.
    pub fn to_protobuf(&self) -> Vec<u8> {
        ::prost::Message::encode_to_vec(self)
    }

    /// protobuf 바이너리에서 디코딩합니다.
    pub fn from_protobuf(buf: &[u8]) -> Result<Self, ::prost::DecodeError> {
        <Self as ::prost::Message>::decode(buf)
    }

    /// JSON 텍스트로 직렬화합니다. 열거형은 심볼 이름으로 기록됩니다.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// JSON 텍스트에서 역직렬화합니다.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> SecurityViolationEvent {
        let mut event = SecurityViolationEvent {
            policy_name: "nms_app_protect_default_policy".to_owned(),
            support_id: "5377540117854870581".to_owned(),
            method: "GET".to_owned(),
            uri: "/<><script>".to_owned(),
            remote_addr: "127.0.0.1".to_owned(),
            server_addr: "172.16.0.213".to_owned(),
            destination_port: 80,
            server_port: 56064,
            violation_rating: 5,
            ..Default::default()
        };
        event.set_outcome(RequestOutcome::Rejected);
        event.set_outcome_reason(RequestOutcomeReason::SecurityWafViolation);
        event.set_request_status(RequestStatus::Blocked);
        event.set_severity(Severity::Critical);
        event.violations_data.push(ViolationData {
            name: "VIOL_ATTACK_SIGNATURE".to_owned(),
            context: "uri".to_owned(),
            context_data: Some(ContextData::new("uri", "/<><script>")),
            signatures: vec![SignatureData {
                id: 200000099,
                blocking_mask: "3".to_owned(),
                buffer: "/<><script>".to_owned(),
                offset: 3,
                length: 7,
            }],
        });
        event
    }

    #[test]
    fn protobuf_round_trip() {
        let event = sample_event();
        let bytes = event.to_protobuf();
        let decoded = SecurityViolationEvent::from_protobuf(&bytes).unwrap();
        assert_eq!(event, decoded);
        assert_eq!(decoded.request_status(), RequestStatus::Blocked);
    }

    #[test]
    fn json_uses_symbolic_enum_names() {
        let json = sample_event().to_json().unwrap();
        assert!(json.contains("\"outcome\":\"REQUEST_OUTCOME_REJECTED\""));
        assert!(json.contains("\"request_status\":\"REQUEST_STATUS_BLOCKED\""));
        assert!(json.contains("\"severity\":\"SEVERITY_CRITICAL\""));
        assert!(json.contains("\"outcome_reason\":\"SECURITY_WAF_VIOLATION\""));

        let decoded = SecurityViolationEvent::from_json(&json).unwrap();
        assert_eq!(decoded, sample_event());
    }

    #[test]
    fn json_unknown_enum_name_defaults() {
        let decoded = SecurityViolationEvent::from_json(r#"{"outcome":"NOPE"}"#).unwrap();
        assert_eq!(decoded.outcome(), RequestOutcome::Unknown);
    }

    #[test]
    fn enum_parsing_is_loose() {
        assert_eq!(RequestOutcome::from_str_loose(" REJECTED "), RequestOutcome::Rejected);
        assert_eq!(RequestOutcome::from_str_loose("maybe"), RequestOutcome::Unknown);
        assert_eq!(
            RequestOutcomeReason::from_str_loose("security_waf_flagged"),
            RequestOutcomeReason::SecurityWafFlagged
        );
        assert_eq!(
            RequestOutcomeReason::from_str_loose("N/A"),
            RequestOutcomeReason::SecurityWafUnknown
        );
        assert_eq!(RequestStatus::from_str_loose("Alerted"), RequestStatus::Alerted);
        assert_eq!(RequestStatus::from_str_loose(""), RequestStatus::Unknown);
        assert_eq!(Severity::from_str_loose("Informational"), Severity::Informational);
        assert_eq!(Severity::from_str_loose("debug"), Severity::Unknown);
    }

    #[test]
    fn symbolic_names_round_trip() {
        for status in [
            RequestStatus::Unknown,
            RequestStatus::Blocked,
            RequestStatus::Alerted,
            RequestStatus::Passed,
        ] {
            assert_eq!(RequestStatus::from_str_name(status.as_str_name()), Some(status));
        }
        assert_eq!(Severity::Warning.to_string(), "SEVERITY_WARNING");
    }

    #[test]
    fn default_event_is_empty() {
        let event = SecurityViolationEvent::default();
        assert_eq!(event.outcome(), RequestOutcome::Unknown);
        assert_eq!(event.severity(), Severity::Unknown);
        assert!(event.violations_data.is_empty());
        assert!(event.to_protobuf().is_empty());
    }
}
