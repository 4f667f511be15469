//! 보안 위반 프로세서 에러 타입
//!
//! [`ProcessorError`]는 프로세서 내부에서 발생하는 에러를 표현합니다.
//! 레코드 단위 에러(syslog, 인코딩)는 배치 처리 후 [`ProcessorError::Records`]로
//! 합쳐서 반환됩니다. `From<ProcessorError> for NapwatchError` 변환이 구현되어 있어
//! consumer 체인에서 `?` 연산자로 전파할 수 있습니다.

use napwatch_core::error::{ConfigError, NapwatchError, PipelineError};

/// 보안 위반 프로세서 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    /// syslog 봉투 파싱 실패
    #[error("syslog parse error at offset {offset}: {reason}")]
    Syslog {
        /// 실패 위치 (바이트 오프셋)
        offset: usize,
        /// 실패 사유
        reason: String,
    },

    /// priority/facility/severity가 없는 syslog 메시지
    #[error("invalid syslog message")]
    InvalidSyslog,

    /// 이벤트 직렬화 실패
    #[error("event encode error: {0}")]
    Encode(String),

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 다음 단계가 배치를 거부함
    #[error("downstream consumer failed: {0}")]
    Downstream(String),

    /// 배치 내 레코드 에러 묶음
    #[error("failed processing log records: {}", join_errors(.errors))]
    Records {
        /// 레코드별 에러 (배치 내 순서)
        errors: Vec<ProcessorError>,
    },
}

impl ProcessorError {
    /// 레코드 에러 목록을 하나로 합칩니다.
    ///
    /// 비어 있으면 `None`, 하나뿐이어도 `Records`로 감쌉니다.
    pub fn aggregate(errors: Vec<ProcessorError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self::Records { errors })
        }
    }

    /// 묶인 레코드 에러 수를 반환합니다. 묶음이 아니면 1입니다.
    pub fn error_count(&self) -> usize {
        match self {
            Self::Records { errors } => errors.len(),
            _ => 1,
        }
    }
}

fn join_errors(errors: &[ProcessorError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ProcessorError> for NapwatchError {
    fn from(err: ProcessorError) -> Self {
        match err {
            ProcessorError::Config { field, reason } => {
                NapwatchError::Config(ConfigError::InvalidValue { field, reason })
            }
            ProcessorError::Downstream(reason) => {
                NapwatchError::Pipeline(PipelineError::Consumer(reason))
            }
            other => NapwatchError::Pipeline(PipelineError::Processing(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syslog_error_display() {
        let err = ProcessorError::Syslog {
            offset: 0,
            reason: "missing PRI field (expected '<')".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("offset 0"));
        assert!(msg.contains("missing PRI"));
    }

    #[test]
    fn records_error_joins_messages() {
        let err = ProcessorError::aggregate(vec![
            ProcessorError::InvalidSyslog,
            ProcessorError::Encode("boom".to_owned()),
        ])
        .unwrap();
        assert_eq!(
            err.to_string(),
            "failed processing log records: invalid syslog message; event encode error: boom"
        );
        assert_eq!(err.error_count(), 2);
    }

    #[test]
    fn aggregate_of_nothing_is_none() {
        assert!(ProcessorError::aggregate(Vec::new()).is_none());
    }

    #[test]
    fn converts_to_napwatch_error() {
        let err: NapwatchError = ProcessorError::Downstream("closed".to_owned()).into();
        assert!(matches!(
            err,
            NapwatchError::Pipeline(PipelineError::Consumer(_))
        ));

        let err: NapwatchError = ProcessorError::InvalidSyslog.into();
        assert!(matches!(
            err,
            NapwatchError::Pipeline(PipelineError::Processing(_))
        ));

        let err: NapwatchError = ProcessorError::Config {
            field: "output_format".to_owned(),
            reason: "unknown".to_owned(),
        }
        .into();
        assert!(matches!(err, NapwatchError::Config(_)));
    }
}
