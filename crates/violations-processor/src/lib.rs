#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`syslog`]: RFC 3164 syslog 봉투 파서 (최선 노력 모드)
//! - [`csv`]: ASM CSV 페이로드 필드 디코더
//! - [`hostname`]: 호스트명에서 IP 추출
//! - [`violation`]: 위반 XML 디코더, 컨텍스트 추출, 시그니처 추출
//! - [`assembler`]: 필드 테이블과 위반 목록으로 이벤트 조립
//! - [`processor`]: 배치 단위 처리와 다음 단계 전달
//! - [`config`]: 프로세서 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! Logs -> filter(Str body) -> SyslogParser -> csv -> hostname
//!                                          -> violation(XML -> context, signatures)
//!                                          -> assembler -> encode -> downstream
//! ```

pub mod assembler;
pub mod config;
pub mod csv;
pub mod error;
pub mod hostname;
pub mod processor;
pub mod syslog;
pub mod violation;

// --- 주요 타입 re-export ---

// 프로세서
pub use processor::SecurityViolationsProcessor;

// 설정
pub use config::{OutputFormat, ProcessorConfig, ProcessorConfigBuilder};

// 에러
pub use error::ProcessorError;

// 파서와 조립
pub use assembler::assemble_event;
pub use crate::csv::{FIELD_ORDER, FieldTable, parse_csv_log};
pub use hostname::extract_ip_from_hostname;
pub use syslog::{SyslogMessage, SyslogParser};

// 위반 추출
pub use violation::{ViolationDocument, ViolationEntry, parse_violations};
