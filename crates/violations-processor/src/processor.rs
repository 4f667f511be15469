//! 보안 위반 프로세서 — 배치 단위 처리와 다음 단계 전달
//!
//! [`SecurityViolationsProcessor`]는 로그 배치를 받아 레코드마다 syslog 봉투를
//! 벗기고, ASM 메시지를 [`SecurityViolationEvent`](napwatch_core::event::SecurityViolationEvent)로
//! 바꿔 본문을 교체한 뒤 배치를 다음 단계로 넘깁니다.
//!
//! # 배치 처리 흐름
//!
//! ```text
//! Received -> Filtered (Str 본문만) -> PerRecordProcessing -> Forwarded
//! ```
//!
//! 레코드 단위 에러는 모아서 하나의 [`ProcessorError::Records`]로 반환하며,
//! 에러가 있어도 배치는 항상 다음 단계로 전달됩니다.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use tracing::debug;

use napwatch_core::error::NapwatchError;
use napwatch_core::logs::{Body, LogRecord, Logs};
use napwatch_core::metrics as m;
use napwatch_core::pipeline::{Capabilities, LogsConsumer};

use crate::assembler::assemble_event;
use crate::config::{OutputFormat, ProcessorConfig};
use crate::error::ProcessorError;
use crate::syslog::{SyslogMessage, SyslogParser};

/// 레코드 속성 키
pub mod attributes {
    pub const SYSLOG_TIMESTAMP: &str = "syslog.timestamp";
    pub const SYSLOG_PROCID: &str = "syslog.procid";
    pub const SYSLOG_SEVERITY: &str = "syslog.severity";
    pub const SYSLOG_FACILITY: &str = "syslog.facility";
    pub const POLICY_NAME: &str = "app_protect.policy_name";
    pub const SUPPORT_ID: &str = "app_protect.support_id";
    pub const OUTCOME: &str = "app_protect.outcome";
    pub const REMOTE_ADDR: &str = "app_protect.remote_addr";
}

/// NGINX App Protect 보안 위반 프로세서
///
/// 상태가 없으므로 `Arc`로 감싸 여러 스레드에서 서로 다른 배치를 처리할 수 있습니다.
pub struct SecurityViolationsProcessor {
    config: ProcessorConfig,
    parser: SyslogParser,
    next: Arc<dyn LogsConsumer>,
}

impl SecurityViolationsProcessor {
    /// 설정과 다음 단계로 프로세서를 생성합니다.
    pub fn new(config: ProcessorConfig, next: Arc<dyn LogsConsumer>) -> Self {
        let parser = SyslogParser::new()
            .with_max_input_size(config.max_input_size)
            .with_best_effort(!config.strict_syslog);
        Self {
            config,
            parser,
            next,
        }
    }

    /// 현재 설정을 반환합니다.
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// 배치를 처리하고 다음 단계로 전달합니다.
    ///
    /// 레코드 에러와 다음 단계 에러를 모두 모아 반환합니다. 레코드 에러가 없고
    /// 다음 단계만 실패하면 [`ProcessorError::Downstream`]을 그대로 반환합니다.
    pub fn process_logs(&self, mut logs: Logs) -> Result<(), ProcessorError> {
        let start = Instant::now();
        let mut errors = Vec::new();

        for resource_logs in &mut logs.resource_logs {
            for scope_logs in &mut resource_logs.scope_logs {
                self.process_log_records(&mut scope_logs.log_records, &mut errors);
            }
        }

        metrics::histogram!(m::BATCH_PROCESSING_DURATION_SECONDS)
            .record(start.elapsed().as_secs_f64());

        if let Err(e) = self.next.consume_logs(logs) {
            let downstream = ProcessorError::Downstream(e.to_string());
            if errors.is_empty() {
                return Err(downstream);
            }
            errors.push(downstream);
        }

        match ProcessorError::aggregate(errors) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// 한 스코프의 레코드를 처리합니다.
    ///
    /// 문자열이 아닌 본문의 레코드는 제거합니다.
    fn process_log_records(&self, records: &mut Vec<LogRecord>, errors: &mut Vec<ProcessorError>) {
        let mut skipped = 0usize;
        let mut skipped_type = "";
        records.retain(|record| {
            if record.body.as_str().is_some() {
                true
            } else {
                skipped += 1;
                skipped_type = record.body.type_name();
                false
            }
        });
        if skipped > 0 {
            debug!(
                skipped,
                body_type = skipped_type,
                "skipping log records with unsupported body type"
            );
            metrics::counter!(m::RECORDS_DROPPED_TOTAL).increment(skipped as u64);
        }

        let mut failed = 0usize;
        for record in records.iter_mut() {
            if let Err(e) = self.process_log_record(record) {
                metrics::counter!(m::RECORDS_FAILED_TOTAL, m::LABEL_STAGE => failure_stage(&e))
                    .increment(1);
                errors.push(e);
                failed += 1;
            }
        }
        if failed > 0 {
            debug!(count = failed, "some log records failed to process");
        }
    }

    /// 레코드 하나를 처리합니다.
    ///
    /// syslog 파싱에 실패하면 레코드는 손대지 않습니다. 인코딩에 실패하면
    /// syslog 속성만 남고 본문은 그대로입니다.
    fn process_log_record(&self, record: &mut LogRecord) -> Result<(), ProcessorError> {
        let Body::Str(body) = &record.body else {
            return Ok(());
        };

        let message = self.parser.parse(body.as_bytes())?;
        if !message.is_valid() {
            return Err(ProcessorError::InvalidSyslog);
        }

        set_syslog_attributes(record, &message);

        if let Some(text) = message.message.as_deref() {
            self.process_app_protect_message(record, text, message.hostname.as_deref())?;
        }

        Ok(())
    }

    fn process_app_protect_message(
        &self,
        record: &mut LogRecord,
        message: &str,
        hostname: Option<&str>,
    ) -> Result<(), ProcessorError> {
        let event = assemble_event(message, hostname);

        record.body = match self.config.output_format {
            OutputFormat::Protobuf => Body::Bytes(Bytes::from(event.to_protobuf())),
            OutputFormat::Json => Body::Str(
                event
                    .to_json()
                    .map_err(|e| ProcessorError::Encode(e.to_string()))?,
            ),
        };

        record.put_str(attributes::POLICY_NAME, event.policy_name.as_str());
        record.put_str(attributes::SUPPORT_ID, event.support_id.as_str());
        record.put_str(attributes::OUTCOME, event.outcome().as_str_name());
        record.put_str(attributes::REMOTE_ADDR, event.remote_addr.as_str());

        metrics::counter!(
            m::RECORDS_PROCESSED_TOTAL,
            m::LABEL_OUTPUT_FORMAT => self.config.output_format.as_str()
        )
        .increment(1);

        Ok(())
    }
}

impl std::fmt::Debug for SecurityViolationsProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityViolationsProcessor")
            .field("config", &self.config)
            .field("parser", &self.parser)
            .finish_non_exhaustive()
    }
}

impl LogsConsumer for SecurityViolationsProcessor {
    fn capabilities(&self) -> Capabilities {
        Capabilities { mutates_data: true }
    }

    fn consume_logs(&self, logs: Logs) -> Result<(), NapwatchError> {
        self.process_logs(logs).map_err(NapwatchError::from)
    }
}

/// 존재하는 syslog 필드만 속성으로 기록합니다.
fn set_syslog_attributes(record: &mut LogRecord, message: &SyslogMessage) {
    if let Some(ts) = message.timestamp_rfc3339() {
        record.put_str(attributes::SYSLOG_TIMESTAMP, ts);
    }
    if let Some(proc_id) = &message.proc_id {
        record.put_str(attributes::SYSLOG_PROCID, proc_id.as_str());
    }
    if let Some(severity) = message.severity_level() {
        record.put_str(attributes::SYSLOG_SEVERITY, severity);
    }
    if let Some(facility) = message.facility_level() {
        record.put_str(attributes::SYSLOG_FACILITY, facility);
    }
}

fn failure_stage(err: &ProcessorError) -> &'static str {
    match err {
        ProcessorError::Encode(_) => "encode",
        _ => "syslog",
    }
}
