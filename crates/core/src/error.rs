//! 에러 타입 — 도메인별 에러 정의

/// napwatch 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum NapwatchError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파이프라인 처리 에러
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// 파싱 에러
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 파이프라인 처리 에러
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// 다음 단계(consumer)가 배치를 거부함
    #[error("downstream consumer failed: {0}")]
    Consumer(String),

    /// 배치 내 레코드 처리 실패 (일부 레코드만 실패해도 발생)
    #[error("record processing failed: {0}")]
    Processing(String),
}

/// 파싱 에러
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// 지원하지 않는 형식
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// 파싱 실패
    #[error("parse failed at offset {offset}: {reason}")]
    Failed { offset: usize, reason: String },

    /// 입력 데이터 초과
    #[error("input too large: {size} bytes (max: {max})")]
    TooLarge { size: usize, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_to_top_level() {
        let err: NapwatchError = ConfigError::InvalidValue {
            field: "general.log_level".to_owned(),
            reason: "must be one of: info".to_owned(),
        }
        .into();
        assert!(matches!(err, NapwatchError::Config(_)));
        assert!(err.to_string().contains("general.log_level"));
    }

    #[test]
    fn pipeline_error_display() {
        let err = PipelineError::Consumer("sink closed".to_owned());
        assert_eq!(err.to_string(), "downstream consumer failed: sink closed");
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::TooLarge { size: 70_000, max: 65_536 };
        let msg = err.to_string();
        assert!(msg.contains("70000"));
        assert!(msg.contains("65536"));
    }
}
