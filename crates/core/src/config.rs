//! 설정 관리 — napwatch.toml 파싱 및 런타임 설정
//!
//! [`NapwatchConfig`]는 모든 구성 요소의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`NAPWATCH_PROCESSOR_OUTPUT_FORMAT=json` 형식)
//! 3. 설정 파일 (`napwatch.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), napwatch_core::error::NapwatchError> {
//! use napwatch_core::config::NapwatchConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = NapwatchConfig::load("napwatch.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = NapwatchConfig::parse("[processor]\noutput_format = \"json\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, NapwatchError};

/// 입력 한 줄의 최대 크기 상한 (16 MiB)
pub const MAX_INPUT_SIZE_LIMIT: usize = 16 * 1024 * 1024;

/// 배치 크기 상한
pub const MAX_BATCH_SIZE: usize = 100_000;

/// napwatch 통합 설정
///
/// `napwatch.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NapwatchConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 보안 위반 프로세서 설정
    #[serde(default)]
    pub processor: ProcessorConfig,
}

impl NapwatchConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, NapwatchError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, NapwatchError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                NapwatchError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                NapwatchError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, NapwatchError> {
        toml::from_str(toml_str).map_err(|e| {
            NapwatchError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `NAPWATCH_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        override_string(&mut self.general.log_level, "NAPWATCH_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "NAPWATCH_GENERAL_LOG_FORMAT");

        override_string(
            &mut self.processor.output_format,
            "NAPWATCH_PROCESSOR_OUTPUT_FORMAT",
        );
        override_usize(
            &mut self.processor.max_input_size,
            "NAPWATCH_PROCESSOR_MAX_INPUT_SIZE",
        );
        override_usize(
            &mut self.processor.batch_size,
            "NAPWATCH_PROCESSOR_BATCH_SIZE",
        );
        override_bool(
            &mut self.processor.strict_syslog,
            "NAPWATCH_PROCESSOR_STRICT_SYSLOG",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), NapwatchError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        let valid_outputs = ["protobuf", "json"];
        if !valid_outputs.contains(&self.processor.output_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "processor.output_format".to_owned(),
                reason: format!("must be one of: {}", valid_outputs.join(", ")),
            }
            .into());
        }

        if self.processor.max_input_size == 0
            || self.processor.max_input_size > MAX_INPUT_SIZE_LIMIT
        {
            return Err(ConfigError::InvalidValue {
                field: "processor.max_input_size".to_owned(),
                reason: format!("must be between 1 and {MAX_INPUT_SIZE_LIMIT}"),
            }
            .into());
        }

        if self.processor.batch_size == 0 || self.processor.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::InvalidValue {
                field: "processor.batch_size".to_owned(),
                reason: format!("must be between 1 and {MAX_BATCH_SIZE}"),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 보안 위반 프로세서 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// 이벤트 출력 인코딩 (protobuf, json)
    pub output_format: String,
    /// syslog 한 줄의 최대 바이트 수
    pub max_input_size: usize,
    /// CLI가 한 번에 묶어 처리하는 레코드 수
    pub batch_size: usize,
    /// syslog 헤더가 깨진 줄을 에러로 처리할지 여부 (기본: 최선 노력 파싱)
    pub strict_syslog: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            output_format: "protobuf".to_owned(),
            max_input_size: 64 * 1024,
            batch_size: 100,
            strict_syslog: false,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}
