//! 보안 위반 이벤트 조립
//!
//! syslog 메시지 본문(ASM CSV)과 호스트명으로 [`SecurityViolationEvent`]를 만듭니다.
//!
//! 1. 호스트명으로 `system_id`, `parent_hostname` 설정, `server_addr` 해석
//! 2. CSV 필드 디코딩 후 이벤트 필드 매핑 (`server_addr`는 CSV 값으로 덮어씀)
//! 3. `server_addr`가 비어 있으면 호스트명에서 다시 해석
//! 4. 위반 상세 XML에서 위반 목록 추출

use napwatch_core::event::{
    RequestOutcome, RequestOutcomeReason, RequestStatus, SecurityViolationEvent, Severity,
};
use napwatch_core::metrics as m;

use crate::csv::{FieldTable, parse_csv_log, parse_is_truncated, parse_u32};
use crate::hostname::extract_ip_from_hostname;
use crate::violation::parse_violations;

/// 메시지와 호스트명으로 이벤트를 조립합니다.
pub fn assemble_event(message: &str, hostname: Option<&str>) -> SecurityViolationEvent {
    let mut event = SecurityViolationEvent::default();

    if let Some(hostname) = hostname {
        event.system_id = hostname.to_owned();
        event.parent_hostname = hostname.to_owned();
        if let Some(ip) = extract_ip_from_hostname(hostname) {
            event.server_addr = ip;
        }
    }

    let fields = parse_csv_log(message);
    map_fields(&mut event, &fields);

    if event.server_addr.is_empty() {
        if let Some(ip) = hostname.and_then(extract_ip_from_hostname) {
            event.server_addr = ip;
        }
    }

    event.violations_data = parse_violations(fields.value("violation_details"), &fields);
    metrics::counter!(m::VIOLATIONS_EXTRACTED_TOTAL)
        .increment(event.violations_data.len() as u64);

    event
}

/// CSV 필드 테이블을 이벤트 필드로 옮깁니다.
///
/// 없는 필드는 빈 문자열/0/기본 열거값이 됩니다. `ip_client`가 비면
/// `remote_addr`, `dest_port`가 0이면 `remote_port` 키를 대신 사용합니다.
pub fn map_fields(event: &mut SecurityViolationEvent, fields: &FieldTable) {
    let text = |name: &str| fields.value(name).to_owned();

    event.policy_name = text("policy_name");
    event.support_id = text("support_id");
    event.set_outcome(RequestOutcome::from_str_loose(fields.value("outcome")));
    event.set_outcome_reason(RequestOutcomeReason::from_str_loose(
        fields.value("outcome_reason"),
    ));
    event.blocking_exception_reason = text("blocking_exception_reason");
    event.method = text("method");
    event.protocol = text("protocol");
    event.x_forwarded_for_header_value = text("x_forwarded_for_header_value");
    event.uri = text("uri");
    event.request = text("request");
    event.is_truncated = parse_is_truncated(fields.value("is_truncated_bool"));
    event.set_request_status(RequestStatus::from_str_loose(fields.value("request_status")));
    event.response_code = parse_u32(fields.value("response_code"));
    event.server_addr = text("server_addr");
    event.vs_name = text("vs_name");
    event.remote_addr = text("ip_client");
    event.destination_port = parse_u32(fields.value("dest_port"));
    event.server_port = parse_u32(fields.value("src_port"));
    event.violations = text("violations");
    event.sub_violations = text("sub_violations");
    event.violation_rating = parse_u32(fields.value("violation_rating"));
    event.sig_set_names = text("sig_set_names");
    event.sig_cves = text("sig_cves");
    event.client_class = text("client_class");
    event.client_application = text("client_application");
    event.client_application_version = text("client_application_version");
    event.set_severity(Severity::from_str_loose(fields.value("severity")));
    event.threat_campaign_names = text("threat_campaign_names");
    event.bot_anomalies = text("bot_anomalies");
    event.bot_category = text("bot_category");
    event.enforced_bot_anomalies = text("enforced_bot_anomalies");
    event.bot_signature_name = text("bot_signature_name");
    event.display_name = text("display_name");

    if event.remote_addr.is_empty() {
        event.remote_addr = text("remote_addr");
    }
    if event.destination_port == 0 {
        event.destination_port = parse_u32(fields.value("remote_port"));
    }
}
