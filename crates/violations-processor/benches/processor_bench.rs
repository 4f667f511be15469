//! 보안 위반 프로세서 벤치마크
//!
//! 단계별 파싱 비용과 배치 처리량을 측정합니다.

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use napwatch_core::error::NapwatchError;
use napwatch_core::logs::{LogRecord, Logs};
use napwatch_core::pipeline::LogsConsumer;
use napwatch_violations_processor::{
    FieldTable, OutputFormat, ProcessorConfig, SecurityViolationsProcessor, SyslogParser,
    parse_csv_log, parse_violations,
};

const SAMPLE_LINE: &str = r#"<130>Aug 22 03:28:35 ip-172-16-0-213 ASM:N/A,80,127.0.0.1,false,GET,nms_app_protect_default_policy,HTTP,blocked,0,N/A,N/A::N/A,{High Accuracy Signatures;Cross Site Scripting Signatures}::{High Accuracy Signatures; Cross Site Scripting Signatures},56064,N/A,5377540117854870581,N/A,5,1-localhost:1-/,N/A,REJECTED,SECURITY_WAF_VIOLATION,Illegal meta character in URL::Attack signature detected::Violation Rating Threat detected::Bot Client Detected,<?xml version='1.0' encoding='UTF-8'?><BAD_MSG><violation_masks><block>414000000200c00-3a03030c30000072-8000000000000000-0</block><alarm>475f0ffcbbd0fea-befbf35cb000007e-f400000000000000-0</alarm><learn>0-0-0-0</learn><staging>0-0-0-0</staging></violation_masks><request-violations><violation><viol_index>42</viol_index><viol_name>VIOL_ATTACK_SIGNATURE</viol_name><context>url</context><sig_data><sig_id>200000099</sig_id><blocking_mask>3</blocking_mask><kw_data><buffer>Lzw+PHNjcmlwdD4=</buffer><offset>3</offset><length>7</length></kw_data></sig_data></violation><violation><viol_index>26</viol_index><viol_name>VIOL_URL_METACHAR</viol_name><uri>Lzw+PHNjcmlwdD4=</uri><metachar_index>60</metachar_index><wildcard_entity>*</wildcard_entity><staging>0</staging></violation><violation><viol_index>122</viol_index><viol_name>VIOL_BOT_CLIENT</viol_name></violation></request-violations></BAD_MSG>,curl,HTTP Library,N/A,N/A,Untrusted Bot,N/A,N/A,HTTP/1.1,/<><script>,GET /<><script> HTTP/1.1\\r\\nHost: localhost\\r\\n\\r\\n"#;

/// 배치를 버리는 consumer
struct DiscardSink;

impl LogsConsumer for DiscardSink {
    fn consume_logs(&self, logs: Logs) -> Result<(), NapwatchError> {
        black_box(logs);
        Ok(())
    }
}

fn asm_message() -> &'static str {
    SAMPLE_LINE
        .split_once(" ASM:")
        .map(|(_, rest)| rest)
        .unwrap_or(SAMPLE_LINE)
}

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    group.throughput(Throughput::Elements(1));

    let parser = SyslogParser::new();
    group.bench_function("syslog_envelope", |b| {
        b.iter(|| parser.parse(black_box(SAMPLE_LINE.as_bytes())).unwrap())
    });

    let message = asm_message();
    group.bench_function("csv_fields", |b| {
        b.iter(|| parse_csv_log(black_box(message)))
    });

    let fields = parse_csv_log(message);
    let details = fields.value("violation_details").to_owned();
    let empty = FieldTable::new();
    group.bench_function("violation_details", |b| {
        b.iter(|| parse_violations(black_box(&details), &empty))
    });

    group.finish();
}

fn bench_batches(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_logs");

    for format in [OutputFormat::Protobuf, OutputFormat::Json] {
        let config = ProcessorConfig::builder()
            .output_format(format)
            .build()
            .unwrap();
        let processor = SecurityViolationsProcessor::new(config, Arc::new(DiscardSink));

        for size in [1usize, 100, 1000] {
            let batch =
                Logs::from_records((0..size).map(|_| LogRecord::from_str_body(SAMPLE_LINE)));

            group.throughput(Throughput::Elements(size as u64));
            group.bench_with_input(
                BenchmarkId::new(format.as_str(), size),
                &batch,
                |b, batch| b.iter(|| processor.process_logs(batch.clone()).unwrap()),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_stages, bench_batches);
criterion_main!(benches);
