//! Syslog RFC 3164 봉투 파서
//!
//! [RFC 3164](https://tools.ietf.org/html/rfc3164) (BSD syslog) 형식의 봉투를 벗겨
//! 헤더 필드와 메시지 본문을 분리합니다.
//!
//! # RFC 3164 메시지 형식
//! ```text
//! <PRI>Mmm dd hh:mm:ss HOSTNAME TAG[PID]: MESSAGE
//! ```
//!
//! PRI는 필수입니다. 최선 노력(best-effort) 모드에서는 타임스탬프나 호스트명이
//! 없거나 깨져 있어도 실패하지 않고 해당 필드를 비워 둡니다.
//!
//! # 사용 예시
//! ```ignore
//! use napwatch_violations_processor::syslog::SyslogParser;
//!
//! let parser = SyslogParser::new();
//! let msg = parser.parse(b"<34>Oct 11 22:14:15 mymachine su: 'su root' failed")?;
//! assert_eq!(msg.facility_level(), Some("auth"));
//! assert_eq!(msg.app_name.as_deref(), Some("su"));
//! ```

use std::net::IpAddr;

use chrono::{DateTime, Datelike, NaiveDateTime, SecondsFormat, Utc};

use crate::error::ProcessorError;

/// 유효한 최대 PRI 값
/// facility 최댓값 23 * 8 + severity 최댓값 7 = 191
const MAX_SYSLOG_PRI: u8 = 191;

/// BSD 타임스탬프 길이 (`Mmm dd hh:mm:ss`)
const BSD_TIMESTAMP_LEN: usize = 15;

/// TAG 최대 길이
const MAX_TAG_LEN: usize = 32;

const SEVERITY_NAMES: [&str; 8] = [
    "emergency",
    "alert",
    "critical",
    "error",
    "warning",
    "notice",
    "informational",
    "debug",
];

const FACILITY_NAMES: [&str; 24] = [
    "kern",
    "user",
    "mail",
    "daemon",
    "auth",
    "syslog",
    "lpr",
    "news",
    "uucp",
    "cron",
    "authpriv",
    "ftp",
    "ntp",
    "security",
    "console",
    "solaris-cron",
    "local0",
    "local1",
    "local2",
    "local3",
    "local4",
    "local5",
    "local6",
    "local7",
];

/// 파싱된 syslog 봉투
///
/// 최선 노력 파싱 결과이므로 모든 필드가 선택적입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyslogMessage {
    /// PRI 원값 (facility * 8 + severity)
    pub priority: Option<u8>,
    /// facility 코드 (0-23)
    pub facility: Option<u8>,
    /// severity 코드 (0-7)
    pub severity: Option<u8>,
    /// 타임스탬프 (UTC)
    pub timestamp: Option<DateTime<Utc>>,
    /// 호스트명
    pub hostname: Option<String>,
    /// TAG (프로그램 이름)
    pub app_name: Option<String>,
    /// TAG 뒤 대괄호 안의 프로세스 ID
    pub proc_id: Option<String>,
    /// 메시지 본문
    pub message: Option<String>,
}

impl SyslogMessage {
    /// priority, facility, severity가 모두 있으면 유효한 메시지입니다.
    pub fn is_valid(&self) -> bool {
        self.priority.is_some() && self.facility.is_some() && self.severity.is_some()
    }

    /// severity 이름 (`critical` 등)을 반환합니다.
    pub fn severity_level(&self) -> Option<&'static str> {
        self.severity
            .and_then(|s| SEVERITY_NAMES.get(usize::from(s)))
            .copied()
    }

    /// facility 이름 (`auth`, `local0` 등)을 반환합니다.
    pub fn facility_level(&self) -> Option<&'static str> {
        self.facility
            .and_then(|f| FACILITY_NAMES.get(usize::from(f)))
            .copied()
    }

    /// 타임스탬프를 RFC 3339 문자열로 반환합니다.
    pub fn timestamp_rfc3339(&self) -> Option<String> {
        self.timestamp
            .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

/// Syslog RFC 3164 파서
///
/// 상태가 없으므로 하나의 인스턴스를 여러 스레드에서 공유할 수 있습니다.
#[derive(Debug, Clone)]
pub struct SyslogParser {
    /// 최대 허용 입력 크기 (바이트)
    max_input_size: usize,
    /// 헤더 일부가 깨져도 계속 진행할지 여부
    best_effort: bool,
}

impl SyslogParser {
    /// 최선 노력 모드의 새 파서를 생성합니다.
    pub fn new() -> Self {
        Self {
            max_input_size: 64 * 1024, // 64KB
            best_effort: true,
        }
    }

    /// 최대 입력 크기를 설정합니다.
    pub fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }

    /// 최선 노력 모드를 켜거나 끕니다.
    pub fn with_best_effort(mut self, best_effort: bool) -> Self {
        self.best_effort = best_effort;
        self
    }

    /// PRI 값에서 facility와 severity를 분리합니다.
    ///
    /// PRI = facility * 8 + severity
    fn decode_pri(pri: u8) -> (u8, u8) {
        (pri / 8, pri % 8)
    }

    /// 원시 syslog 메시지를 파싱합니다.
    pub fn parse(&self, raw: &[u8]) -> Result<SyslogMessage, ProcessorError> {
        if raw.len() > self.max_input_size {
            return Err(ProcessorError::Syslog {
                offset: 0,
                reason: format!(
                    "input too large: {} bytes (max: {})",
                    raw.len(),
                    self.max_input_size
                ),
            });
        }

        let input = String::from_utf8_lossy(raw);
        let input = input.trim();

        if input.is_empty() {
            return Err(ProcessorError::Syslog {
                offset: 0,
                reason: "empty input".to_owned(),
            });
        }

        let (pri, pri_end) = Self::parse_pri(input)?;
        let (facility, severity) = Self::decode_pri(pri);

        let mut message = SyslogMessage {
            priority: Some(pri),
            facility: Some(facility),
            severity: Some(severity),
            ..Default::default()
        };

        let remainder = &input[pri_end + 1..];

        // TIMESTAMP
        let remainder = if let Some(span) = Self::bsd_timestamp_span(remainder) {
            message.timestamp = Self::parse_bsd_timestamp(&remainder[..span]);
            if message.timestamp.is_none() && !self.best_effort {
                return Err(ProcessorError::Syslog {
                    offset: pri_end + 1,
                    reason: format!("invalid RFC 3164 timestamp: '{}'", &remainder[..span]),
                });
            }
            // 날짜가 틀려도 타임스탬프 자리는 건너뛰고 호스트명을 읽음
            &remainder[span..]
        } else if let Some((timestamp, rest)) = Self::parse_rfc3339_timestamp(remainder) {
            message.timestamp = Some(timestamp);
            rest
        } else if self.best_effort {
            // 타임스탬프가 없으면 호스트명도 신뢰할 수 없으므로 나머지를 본문으로 취급
            Self::parse_tag_and_message(remainder, &mut message);
            return Ok(message);
        } else {
            return Err(ProcessorError::Syslog {
                offset: pri_end + 1,
                reason: "invalid or missing RFC 3164 timestamp".to_owned(),
            });
        };

        // HOSTNAME
        let remainder = remainder.trim_start_matches(' ');
        let (host_token, after_host) = match remainder.find(' ') {
            Some(pos) => (&remainder[..pos], &remainder[pos + 1..]),
            None => (remainder, ""),
        };

        if Self::is_hostname(host_token, after_host) {
            message.hostname = Some(host_token.to_owned());
            Self::parse_tag_and_message(after_host, &mut message);
        } else if self.best_effort {
            Self::parse_tag_and_message(remainder, &mut message);
        } else {
            return Err(ProcessorError::Syslog {
                offset: input.len() - remainder.len(),
                reason: "missing hostname".to_owned(),
            });
        }

        Ok(message)
    }

    /// `<NNN>` 형식의 PRI를 파싱합니다. (PRI 값, '>' 위치)를 반환합니다.
    fn parse_pri(input: &str) -> Result<(u8, usize), ProcessorError> {
        if !input.starts_with('<') {
            return Err(ProcessorError::Syslog {
                offset: 0,
                reason: "missing PRI field (expected '<')".to_owned(),
            });
        }

        let pri_end = input
            .char_indices()
            .take(5)
            .find(|&(_, c)| c == '>')
            .map(|(idx, _)| idx)
            .ok_or_else(|| ProcessorError::Syslog {
                offset: 0,
                reason: "unterminated PRI field".to_owned(),
            })?;

        let pri_str = &input[1..pri_end];
        if pri_str.is_empty() || !pri_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProcessorError::Syslog {
                offset: 1,
                reason: format!("invalid PRI value: '{pri_str}'"),
            });
        }

        let pri: u8 = pri_str.parse().map_err(|_| ProcessorError::Syslog {
            offset: 1,
            reason: format!("invalid PRI value: '{pri_str}'"),
        })?;

        if pri > MAX_SYSLOG_PRI {
            return Err(ProcessorError::Syslog {
                offset: 1,
                reason: format!(
                    "PRI value {} out of valid range (0-{})",
                    pri, MAX_SYSLOG_PRI
                ),
            });
        }

        Ok((pri, pri_end))
    }

    /// BSD 타임스탬프(`Mmm dd hh:mm:ss[.fff]`) 모양이면 그 길이를 반환합니다.
    ///
    /// 날짜 값의 유효성은 보지 않고 자리만 확인합니다.
    fn bsd_timestamp_span(input: &str) -> Option<usize> {
        let b = input.as_bytes();
        if b.len() < BSD_TIMESTAMP_LEN {
            return None;
        }
        let digit = |i: usize| b[i].is_ascii_digit();
        let shaped = b[..3].iter().all(u8::is_ascii_alphabetic)
            && b[3] == b' '
            && (b[4] == b' ' || digit(4))
            && digit(5)
            && b[6] == b' '
            && digit(7)
            && digit(8)
            && b[9] == b':'
            && digit(10)
            && digit(11)
            && b[12] == b':'
            && digit(13)
            && digit(14);
        if !shaped {
            return None;
        }

        let fraction = input[BSD_TIMESTAMP_LEN..]
            .strip_prefix('.')
            .map(|rest| 1 + rest.bytes().take_while(u8::is_ascii_digit).count())
            .unwrap_or(0);
        Some(BSD_TIMESTAMP_LEN + fraction)
    }

    /// BSD syslog 타임스탬프를 파싱합니다.
    ///
    /// 형식: `MMM DD HH:MM:SS[.fff]` (예: `Jan 15 12:00:00`, `Jan  5 12:00:00`).
    /// 연도가 없으므로 현재 연도와 UTC를 가정합니다.
    fn parse_bsd_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
        let current_year = Utc::now().year();
        let timestamp_with_year = format!("{} {}", current_year, timestamp);

        NaiveDateTime::parse_from_str(&timestamp_with_year, "%Y %b %e %H:%M:%S%.f")
            .ok()
            .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
    }

    /// 첫 토큰이 RFC 3339 타임스탬프이면 파싱하고 나머지 문자열을 반환합니다.
    fn parse_rfc3339_timestamp(input: &str) -> Option<(DateTime<Utc>, &str)> {
        let token_end = input.find(' ').unwrap_or(input.len());
        DateTime::parse_from_rfc3339(&input[..token_end])
            .ok()
            .map(|dt| (dt.with_timezone(&Utc), &input[token_end..]))
    }

    /// 타임스탬프 뒤 첫 토큰이 호스트명인지 판단합니다.
    ///
    /// IP 리터럴은 `:`를 포함해도 호스트명입니다. `TAG:`/`TAG[PID]:`로 시작하는
    /// 토큰은 뒤에 또 다른 TAG가 오지 않는 한 TAG로 보고 호스트명이 생략된
    /// 것으로 처리합니다.
    fn is_hostname(token: &str, after: &str) -> bool {
        if token.is_empty() || token.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return false;
        }
        if token.parse::<IpAddr>().is_ok() {
            return true;
        }
        match Self::tag_prefix_len(token) {
            None => true,
            Some(len) if len == token.len() => false,
            Some(_) => {
                let next = after.split(' ').next().unwrap_or("");
                Self::tag_prefix_len(next).is_some()
            }
        }
    }

    /// `TAG:` 또는 `TAG[PID]:`로 시작하면 그 접두어 길이를 반환합니다.
    fn tag_prefix_len(token: &str) -> Option<usize> {
        let tag_end = token.find([':', '[', ']'])?;
        if tag_end == 0 || tag_end > MAX_TAG_LEN {
            return None;
        }
        let after_tag = &token[tag_end..];
        if after_tag.starts_with(':') {
            return Some(tag_end + 1);
        }
        let rest = after_tag.strip_prefix('[')?;
        let close = rest.find(']')?;
        rest[close + 1..]
            .starts_with(':')
            .then_some(tag_end + 1 + close + 2)
    }

    /// `TAG[PID]: MESSAGE`를 분리합니다.
    ///
    /// TAG 형식이 아니면 전체를 메시지로 취급합니다.
    fn parse_tag_and_message(input: &str, message: &mut SyslogMessage) {
        let tag_end = input
            .find([':', '[', ' '])
            .unwrap_or(input.len());
        let tag = &input[..tag_end];
        let after_tag = &input[tag_end..];

        let tagged = if tag.is_empty() || tag.len() > MAX_TAG_LEN {
            None
        } else if let Some(rest) = after_tag.strip_prefix('[') {
            rest.find(']').and_then(|close| {
                let pid = &rest[..close];
                rest[close + 1..]
                    .strip_prefix(':')
                    .map(|body| (Some(pid), body))
            })
        } else {
            after_tag.strip_prefix(':').map(|body| (None, body))
        };

        let body = match tagged {
            Some((pid, body)) => {
                message.app_name = Some(tag.to_owned());
                message.proc_id = pid.filter(|p| !p.is_empty()).map(str::to_owned);
                body.strip_prefix(' ').unwrap_or(body)
            }
            None => input,
        };

        if !body.is_empty() {
            message.message = Some(body.to_owned());
        }
    }
}

impl Default for SyslogParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_pri() {
        assert_eq!(SyslogParser::decode_pri(0), (0, 0));
        assert_eq!(SyslogParser::decode_pri(34), (4, 2));
        assert_eq!(SyslogParser::decode_pri(130), (16, 2));
        assert_eq!(SyslogParser::decode_pri(191), (23, 7));
    }

    #[test]
    fn parse_simple_bsd_message() {
        let parser = SyslogParser::new();
        let msg = parser
            .parse(b"<34>Oct 11 22:14:15 mymachine su: 'su root' failed for lonvick on /dev/pts/8")
            .unwrap();

        assert!(msg.is_valid());
        assert_eq!(msg.facility_level(), Some("auth"));
        assert_eq!(msg.severity_level(), Some("critical"));
        assert_eq!(msg.hostname.as_deref(), Some("mymachine"));
        assert_eq!(msg.app_name.as_deref(), Some("su"));
        assert_eq!(msg.proc_id, None);
        assert_eq!(
            msg.message.as_deref(),
            Some("'su root' failed for lonvick on /dev/pts/8")
        );

        let ts = msg.timestamp.unwrap();
        assert_eq!(ts.year(), Utc::now().year());
        let rendered = msg.timestamp_rfc3339().unwrap();
        assert!(rendered.ends_with("-10-11T22:14:15Z"), "got {rendered}");
    }

    #[test]
    fn parse_app_protect_line() {
        let parser = SyslogParser::new();
        let msg = parser
            .parse(b"<130>Aug 22 03:28:35 ip-172-16-0-213 ASM:N/A,80,127.0.0.1,false")
            .unwrap();

        assert_eq!(msg.facility_level(), Some("local0"));
        assert_eq!(msg.severity_level(), Some("critical"));
        assert_eq!(msg.hostname.as_deref(), Some("ip-172-16-0-213"));
        assert_eq!(msg.app_name.as_deref(), Some("ASM"));
        assert_eq!(msg.message.as_deref(), Some("N/A,80,127.0.0.1,false"));
    }

    #[test]
    fn parse_tag_with_pid() {
        let parser = SyslogParser::new();
        let msg = parser
            .parse(b"<13>Jan  5 01:02:03 web-01 nginx[4242]: worker started")
            .unwrap();

        assert_eq!(msg.app_name.as_deref(), Some("nginx"));
        assert_eq!(msg.proc_id.as_deref(), Some("4242"));
        assert_eq!(msg.message.as_deref(), Some("worker started"));
        assert!(msg.timestamp_rfc3339().unwrap().ends_with("-01-05T01:02:03Z"));
    }

    #[test]
    fn parse_message_without_tag() {
        let parser = SyslogParser::new();
        let msg = parser
            .parse(b"<13>Jan 15 12:00:00 host just some text here")
            .unwrap();

        assert_eq!(msg.hostname.as_deref(), Some("host"));
        assert_eq!(msg.app_name, None);
        assert_eq!(msg.message.as_deref(), Some("just some text here"));
    }

    #[test]
    fn parse_rfc3339_timestamp() {
        let parser = SyslogParser::new();
        let msg = parser
            .parse(b"<14>2024-01-15T12:00:00Z host app: hello")
            .unwrap();
        assert_eq!(msg.timestamp_rfc3339().as_deref(), Some("2024-01-15T12:00:00Z"));
        assert_eq!(msg.hostname.as_deref(), Some("host"));
        assert_eq!(msg.message.as_deref(), Some("hello"));
    }

    #[test]
    fn best_effort_without_timestamp() {
        let parser = SyslogParser::new();
        let msg = parser.parse(b"<34>su: no header here").unwrap();

        assert!(msg.is_valid());
        assert_eq!(msg.timestamp, None);
        assert_eq!(msg.hostname, None);
        assert_eq!(msg.app_name.as_deref(), Some("su"));
        assert_eq!(msg.message.as_deref(), Some("no header here"));
    }

    #[test]
    fn best_effort_without_hostname() {
        let parser = SyslogParser::new();
        let msg = parser.parse(b"<34>Oct 11 22:14:15 su: missing host").unwrap();

        assert!(msg.timestamp.is_some());
        assert_eq!(msg.hostname, None);
        assert_eq!(msg.app_name.as_deref(), Some("su"));
        assert_eq!(msg.message.as_deref(), Some("missing host"));
    }

    #[test]
    fn ipv6_hostname_is_kept() {
        let parser = SyslogParser::new();
        let msg = parser
            .parse(b"<130>Aug 22 03:28:35 2001:db8::1 ASM:N/A,80,127.0.0.1,false,GET,pol")
            .unwrap();

        assert_eq!(msg.hostname.as_deref(), Some("2001:db8::1"));
        assert_eq!(msg.app_name.as_deref(), Some("ASM"));
        assert_eq!(
            msg.message.as_deref(),
            Some("N/A,80,127.0.0.1,false,GET,pol")
        );
    }

    #[test]
    fn colon_hostname_followed_by_tag_is_kept() {
        let parser = SyslogParser::new();
        let msg = parser
            .parse(b"<130>Aug 22 03:28:35 fe80::1%eth0 nginx[12]: started")
            .unwrap();

        assert_eq!(msg.hostname.as_deref(), Some("fe80::1%eth0"));
        assert_eq!(msg.app_name.as_deref(), Some("nginx"));
        assert_eq!(msg.proc_id.as_deref(), Some("12"));
        assert_eq!(msg.message.as_deref(), Some("started"));
    }

    #[test]
    fn tag_with_payload_is_not_a_hostname() {
        let parser = SyslogParser::new();
        let msg = parser
            .parse(b"<130>Aug 22 03:28:35 ASM:N/A,80,127.0.0.1")
            .unwrap();

        assert_eq!(msg.hostname, None);
        assert_eq!(msg.app_name.as_deref(), Some("ASM"));
        assert_eq!(msg.message.as_deref(), Some("N/A,80,127.0.0.1"));
    }

    #[test]
    fn fractional_seconds_are_parsed() {
        let parser = SyslogParser::new();
        let msg = parser
            .parse(b"<130>Aug 22 03:28:35.250 ip-10-0-0-1 ASM:N/A")
            .unwrap();

        let ts = msg.timestamp.unwrap();
        assert_eq!(ts.timestamp_subsec_millis(), 250);
        assert_eq!(msg.hostname.as_deref(), Some("ip-10-0-0-1"));
        assert_eq!(msg.message.as_deref(), Some("N/A"));
    }

    #[test]
    fn invalid_date_still_reads_hostname() {
        let parser = SyslogParser::new();
        let msg = parser
            .parse(b"<130>Feb 30 03:28:35 ip-172-16-0-213 ASM:N/A,80")
            .unwrap();

        assert_eq!(msg.timestamp, None);
        assert_eq!(msg.hostname.as_deref(), Some("ip-172-16-0-213"));
        assert_eq!(msg.app_name.as_deref(), Some("ASM"));
        assert_eq!(msg.message.as_deref(), Some("N/A,80"));
    }

    #[test]
    fn strict_mode_rejects_invalid_date() {
        let parser = SyslogParser::new().with_best_effort(false);
        let err = parser
            .parse(b"<130>Feb 30 03:28:35 host ASM:N/A")
            .unwrap_err();
        assert!(err.to_string().contains("Feb 30 03:28:35"));
    }

    #[test]
    fn strict_mode_rejects_missing_hostname() {
        let parser = SyslogParser::new().with_best_effort(false);
        let err = parser
            .parse(b"<34>Oct 11 22:14:15 su: missing host")
            .unwrap_err();
        assert!(err.to_string().contains("missing hostname"));
    }

    #[test]
    fn bsd_timestamp_span_checks_shape_only() {
        assert_eq!(SyslogParser::bsd_timestamp_span("Jan  5 01:02:03 h"), Some(15));
        assert_eq!(SyslogParser::bsd_timestamp_span("Feb 30 01:02:03"), Some(15));
        assert_eq!(SyslogParser::bsd_timestamp_span("Jan 15 01:02:03.5 h"), Some(17));
        assert_eq!(SyslogParser::bsd_timestamp_span("2024-01-15T12:00:00Z"), None);
        assert_eq!(SyslogParser::bsd_timestamp_span("Jan 15 01:02"), None);
    }

    #[test]
    fn tag_prefix_forms() {
        assert_eq!(SyslogParser::tag_prefix_len("su:"), Some(3));
        assert_eq!(SyslogParser::tag_prefix_len("ASM:N/A,80"), Some(4));
        assert_eq!(SyslogParser::tag_prefix_len("nginx[42]:"), Some(10));
        assert_eq!(SyslogParser::tag_prefix_len("nginx[42]"), None);
        assert_eq!(SyslogParser::tag_prefix_len("mymachine"), None);
        assert_eq!(SyslogParser::tag_prefix_len(":x"), None);
    }

    #[test]
    fn strict_mode_rejects_missing_timestamp() {
        let parser = SyslogParser::new().with_best_effort(false);
        let err = parser.parse(b"<34>su: no header here").unwrap_err();
        assert!(err.to_string().contains("timestamp"));
    }

    #[test]
    fn header_only_has_no_message() {
        let parser = SyslogParser::new();
        let msg = parser.parse(b"<34>Oct 11 22:14:15 mymachine").unwrap();
        assert_eq!(msg.hostname.as_deref(), Some("mymachine"));
        assert_eq!(msg.message, None);
    }

    #[test]
    fn rejects_non_syslog_input() {
        let parser = SyslogParser::new();
        assert!(parser.parse(b"not a syslog line").is_err());
        assert!(parser.parse(b"").is_err());
        assert!(parser.parse(b"<34").is_err());
        assert!(parser.parse(b"<>Oct 11 22:14:15 h t: m").is_err());
        assert!(parser.parse(b"<abc>Oct 11 22:14:15 h t: m").is_err());
        assert!(parser.parse(b"<192>Oct 11 22:14:15 h t: m").is_err());
    }

    #[test]
    fn rejects_oversized_input() {
        let parser = SyslogParser::new().with_max_input_size(16);
        let err = parser
            .parse(b"<34>Oct 11 22:14:15 mymachine su: hello")
            .unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn empty_message_has_no_levels() {
        let msg = SyslogMessage::default();
        assert!(!msg.is_valid());
        assert_eq!(msg.severity_level(), None);
        assert_eq!(msg.facility_level(), None);
        assert_eq!(msg.timestamp_rfc3339(), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn parse_arbitrary_bytes_does_not_panic(bytes in prop::collection::vec(any::<u8>(), 0..1000)) {
                let parser = SyslogParser::new();
                let _ = parser.parse(&bytes);
            }

            #[test]
            fn parse_valid_priority_range(pri in 0u8..=191) {
                let parser = SyslogParser::new();
                let raw = format!("<{}>Jan 15 12:00:00 host app: msg", pri);
                let msg = parser.parse(raw.as_bytes()).unwrap();
                prop_assert!(msg.is_valid());
                prop_assert!(msg.severity_level().is_some());
                prop_assert!(msg.facility_level().is_some());
            }

            #[test]
            fn message_text_is_preserved(text in "[a-zA-Z0-9,;=/ ]{1,200}") {
                let parser = SyslogParser::new();
                let raw = format!("<134>Jan 15 12:00:00 host ASM:{}", text);
                let msg = parser.parse(raw.as_bytes()).unwrap();
                let expected = text.trim_end().strip_prefix(' ').unwrap_or(text.trim_end()).to_owned();
                if expected.is_empty() {
                    prop_assert_eq!(msg.message, None);
                } else {
                    prop_assert_eq!(msg.message, Some(expected));
                }
            }
        }
    }
}
