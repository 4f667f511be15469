//! 호스트명에서 서버 IP 추출

use std::net::IpAddr;
use std::sync::LazyLock;

use regex::Regex;

/// 클라우드 기본 호스트명 패턴 (`ip-172-16-0-213`)
static IP_HOSTNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ip-([0-9-]+)").expect("regex"));

/// 호스트명에서 IP 주소를 추출합니다.
///
/// - IPv4/IPv6 리터럴이면 정규화된 문자열을 반환합니다.
/// - `ip-A-B-C-D` 형식이면 대시를 점으로 바꾼 값이 IP로 파싱될 때만 반환합니다.
/// - 그 외에는 `None`입니다.
pub fn extract_ip_from_hostname(hostname: &str) -> Option<String> {
    if let Ok(ip) = hostname.parse::<IpAddr>() {
        return Some(ip.to_string());
    }

    let captures = IP_HOSTNAME_RE.captures(hostname)?;
    let candidate = captures.get(1)?.as_str().replace('-', ".");
    candidate.parse::<IpAddr>().ok().map(|_| candidate)
}
