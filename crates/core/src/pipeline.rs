//! 파이프라인 trait — 단계 간 배치 전달 지점 정의

use std::sync::Mutex;

use crate::error::{NapwatchError, PipelineError};
use crate::logs::Logs;

/// 단계가 배치를 다루는 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// 전달받은 배치를 수정하는지 여부
    pub mutates_data: bool,
}

/// 로그 배치를 받아들이는 단계
///
/// 프로세서와 싱크 모두 이 trait을 구현하므로 단계를 연결할 수 있습니다.
/// 구현체는 여러 스레드에서 동시에 호출될 수 있어야 합니다.
pub trait LogsConsumer: Send + Sync {
    /// 단계의 처리 특성
    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    /// 배치를 소비합니다.
    fn consume_logs(&self, logs: Logs) -> Result<(), NapwatchError>;
}

/// 받은 배치를 메모리에 쌓아두는 consumer
///
/// 테스트와 CLI 드라이런에서 마지막 단계로 사용합니다.
#[derive(Debug, Default)]
pub struct LogsSink {
    batches: Mutex<Vec<Logs>>,
}

impl LogsSink {
    /// 빈 싱크를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 지금까지 받은 배치 사본을 반환합니다.
    pub fn all_logs(&self) -> Vec<Logs> {
        self.batches
            .lock()
            .map(|batches| batches.clone())
            .unwrap_or_default()
    }

    /// 지금까지 받은 전체 레코드 수를 반환합니다.
    pub fn log_record_count(&self) -> usize {
        self.batches
            .lock()
            .map(|batches| batches.iter().map(Logs::log_record_count).sum())
            .unwrap_or(0)
    }

    /// 저장된 배치를 비웁니다.
    pub fn reset(&self) {
        if let Ok(mut batches) = self.batches.lock() {
            batches.clear();
        }
    }
}

impl LogsConsumer for LogsSink {
    fn consume_logs(&self, logs: Logs) -> Result<(), NapwatchError> {
        let mut batches = self
            .batches
            .lock()
            .map_err(|e| PipelineError::Consumer(format!("sink lock poisoned: {e}")))?;
        batches.push(logs);
        Ok(())
    }
}
