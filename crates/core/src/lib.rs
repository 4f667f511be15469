#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod event;
pub mod logs;
pub mod metrics;
pub mod pipeline;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{ConfigError, NapwatchError, ParseError, PipelineError};

// 설정
pub use config::NapwatchConfig;

// 보안 이벤트 스키마
pub use event::{
    ContextData, RequestOutcome, RequestOutcomeReason, RequestStatus, SecurityViolationEvent,
    Severity, SignatureData, ViolationData,
};

// 레코드 배치 모델
pub use logs::{Body, LogRecord, Logs, ResourceLogs, ScopeLogs};

// 파이프라인 trait
pub use pipeline::{Capabilities, LogsConsumer, LogsSink};
