//! 보안 위반 프로세서 설정
//!
//! [`ProcessorConfig`]는 core의
//! [`ProcessorConfig`](napwatch_core::config::ProcessorConfig) 문자열 설정을
//! 타입이 있는 값으로 바꾼 것입니다.
//!
//! # 사용 예시
//! ```ignore
//! use napwatch_core::config::NapwatchConfig;
//! use napwatch_violations_processor::config::ProcessorConfig;
//!
//! let core_config = NapwatchConfig::default();
//! let config = ProcessorConfig::from_core(&core_config.processor)?;
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProcessorError;

/// 입력 한 줄의 최대 크기 상한
const MAX_INPUT_SIZE_LIMIT: usize = napwatch_core::config::MAX_INPUT_SIZE_LIMIT;

/// 이벤트 출력 인코딩
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// protobuf 바이너리 본문 (기본값)
    #[default]
    Protobuf,
    /// JSON 문자열 본문 (레거시)
    Json,
}

impl OutputFormat {
    /// 설정 파일에서 쓰는 이름을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Protobuf => "protobuf",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ProcessorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "protobuf" | "proto" => Ok(Self::Protobuf),
            "json" => Ok(Self::Json),
            other => Err(ProcessorError::Config {
                field: "output_format".to_owned(),
                reason: format!("unknown output format '{other}', expected protobuf or json"),
            }),
        }
    }
}

/// 보안 위반 프로세서 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// 이벤트 출력 인코딩
    pub output_format: OutputFormat,
    /// syslog 한 줄의 최대 바이트 수
    pub max_input_size: usize,
    /// 타임스탬프/호스트명이 깨진 syslog 줄을 레코드 에러로 처리
    pub strict_syslog: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Protobuf,
            max_input_size: 64 * 1024,
            strict_syslog: false,
        }
    }
}

impl ProcessorConfig {
    /// core의 프로세서 설정에서 생성합니다.
    pub fn from_core(core: &napwatch_core::config::ProcessorConfig) -> Result<Self, ProcessorError> {
        let config = Self {
            output_format: core.output_format.parse()?,
            max_input_size: core.max_input_size,
            strict_syslog: core.strict_syslog,
        };
        config.validate()?;
        Ok(config)
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ProcessorError> {
        if self.max_input_size == 0 || self.max_input_size > MAX_INPUT_SIZE_LIMIT {
            return Err(ProcessorError::Config {
                field: "max_input_size".to_owned(),
                reason: format!("must be 1-{}", MAX_INPUT_SIZE_LIMIT),
            });
        }
        Ok(())
    }

    /// 빌더를 생성합니다.
    pub fn builder() -> ProcessorConfigBuilder {
        ProcessorConfigBuilder::new()
    }
}

/// 프로세서 설정 빌더
#[derive(Default)]
pub struct ProcessorConfigBuilder {
    config: ProcessorConfig,
}

impl ProcessorConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 출력 인코딩을 설정합니다.
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// 최대 입력 크기를 설정합니다.
    pub fn max_input_size(mut self, size: usize) -> Self {
        self.config.max_input_size = size;
        self
    }

    /// 엄격한 syslog 파싱을 켜거나 끕니다.
    pub fn strict_syslog(mut self, strict: bool) -> Self {
        self.config.strict_syslog = strict;
        self
    }

    /// 설정을 검증하고 `ProcessorConfig`를 생성합니다.
    pub fn build(self) -> Result<ProcessorConfig, ProcessorError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
