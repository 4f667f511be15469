//! 레코드 배치 모델 — 파이프라인 단계 사이에서 오가는 로그 배치
//!
//! 배치는 리소스 -> 스코프 -> 레코드의 3단계 그룹으로 구성됩니다.
//!
//! ```text
//! Logs
//!  └─ ResourceLogs (resource attributes)
//!      └─ ScopeLogs (scope name)
//!          └─ LogRecord (body + attributes)
//! ```
//!
//! 각 단계는 배치를 소유권째 넘겨받아 수정한 뒤 다음 단계로 넘깁니다.

use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;

/// 로그 레코드 본문
///
/// 레코드 본문은 타입이 있는 값입니다. 문자열 이외의 본문은
/// 처리 단계에 따라 건너뛰거나 그대로 통과시킵니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    /// 값 없음
    #[default]
    Empty,
    /// 문자열 본문
    Str(String),
    /// 바이너리 본문 (직렬화된 이벤트 등)
    Bytes(Bytes),
    /// 정수 본문
    Int(i64),
    /// 실수 본문
    Double(f64),
    /// 불리언 본문
    Bool(bool),
}

impl Body {
    /// 본문 타입 이름을 반환합니다.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Str(_) => "Str",
            Self::Bytes(_) => "Bytes",
            Self::Int(_) => "Int",
            Self::Double(_) => "Double",
            Self::Bool(_) => "Bool",
        }
    }

    /// 문자열 본문이면 참조를 반환합니다.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// 바이너리 본문이면 참조를 반환합니다.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Str(s) => write!(f, "{s}"),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Self::Int(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// 단일 로그 레코드
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogRecord {
    /// 본문
    pub body: Body,
    /// 속성 (문자열 키-값)
    pub attributes: BTreeMap<String, String>,
}

impl LogRecord {
    /// 문자열 본문으로 레코드를 생성합니다.
    pub fn from_str_body(body: impl Into<String>) -> Self {
        Self {
            body: Body::Str(body.into()),
            attributes: BTreeMap::new(),
        }
    }

    /// 임의 본문으로 레코드를 생성합니다.
    pub fn with_body(body: Body) -> Self {
        Self {
            body,
            attributes: BTreeMap::new(),
        }
    }

    /// 문자열 속성을 기록합니다. 같은 키가 있으면 덮어씁니다.
    pub fn put_str(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// 속성 값을 조회합니다.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// 같은 계측 스코프에서 나온 레코드 묶음
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeLogs {
    /// 스코프 이름
    pub scope_name: String,
    /// 레코드 목록 (순서 유지)
    pub log_records: Vec<LogRecord>,
}

/// 같은 리소스에서 나온 스코프 묶음
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceLogs {
    /// 리소스 속성 (host.name 등)
    pub resource: BTreeMap<String, String>,
    /// 스코프 목록
    pub scope_logs: Vec<ScopeLogs>,
}

/// 로그 배치
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Logs {
    /// 리소스 그룹 목록
    pub resource_logs: Vec<ResourceLogs>,
}

impl Logs {
    /// 빈 배치를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 레코드 목록을 단일 리소스/스코프 그룹으로 묶은 배치를 생성합니다.
    pub fn from_records(records: impl IntoIterator<Item = LogRecord>) -> Self {
        Self {
            resource_logs: vec![ResourceLogs {
                resource: BTreeMap::new(),
                scope_logs: vec![ScopeLogs {
                    scope_name: String::new(),
                    log_records: records.into_iter().collect(),
                }],
            }],
        }
    }

    /// 배치 내 전체 레코드 수를 반환합니다.
    pub fn log_record_count(&self) -> usize {
        self.resource_logs
            .iter()
            .flat_map(|rl| rl.scope_logs.iter())
            .map(|sl| sl.log_records.len())
            .sum()
    }

    /// 모든 레코드를 그룹 순서대로 순회합니다.
    pub fn records(&self) -> impl Iterator<Item = &LogRecord> {
        self.resource_logs
            .iter()
            .flat_map(|rl| rl.scope_logs.iter())
            .flat_map(|sl| sl.log_records.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_records_groups_into_single_scope() {
        let logs = Logs::from_records([
            LogRecord::from_str_body("a"),
            LogRecord::from_str_body("b"),
        ]);
        assert_eq!(logs.resource_logs.len(), 1);
        assert_eq!(logs.resource_logs[0].scope_logs.len(), 1);
        assert_eq!(logs.log_record_count(), 2);
    }

    #[test]
    fn record_count_spans_groups() {
        let mut logs = Logs::from_records([LogRecord::from_str_body("a")]);
        logs.resource_logs.push(ResourceLogs {
            resource: BTreeMap::new(),
            scope_logs: vec![
                ScopeLogs::default(),
                ScopeLogs {
                    scope_name: "nap".to_owned(),
                    log_records: vec![LogRecord::with_body(Body::Int(1))],
                },
            ],
        });
        assert_eq!(logs.log_record_count(), 2);
        assert_eq!(logs.records().count(), 2);
    }

    #[test]
    fn put_str_overwrites() {
        let mut record = LogRecord::default();
        record.put_str("k", "v1");
        record.put_str("k", "v2");
        assert_eq!(record.attribute("k"), Some("v2"));
        assert_eq!(record.attribute("missing"), None);
    }

    #[test]
    fn body_type_names() {
        assert_eq!(Body::Empty.type_name(), "Empty");
        assert_eq!(Body::Str(String::new()).type_name(), "Str");
        assert_eq!(Body::Bytes(Bytes::new()).type_name(), "Bytes");
        assert_eq!(Body::Int(0).type_name(), "Int");
        assert!(Body::Str("x".to_owned()).as_str().is_some());
        assert!(Body::Int(5).as_str().is_none());
    }
}
