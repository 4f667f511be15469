//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 라이브러리는 `metrics::counter!()`, `metrics::histogram!()` 매크로만 호출하며
//! 익스포터는 설치하지 않습니다. 레코더가 없으면 기록은 무시됩니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `napwatch_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(napwatch_core::metrics::RECORDS_PROCESSED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 출력 형식 레이블 키 (protobuf, json)
pub const LABEL_OUTPUT_FORMAT: &str = "output_format";

/// 실패 단계 레이블 키 (syslog, encode)
pub const LABEL_STAGE: &str = "stage";

/// 디코딩 원본 레이블 키 (context_name, context_value, header_data, signature)
pub const LABEL_SOURCE: &str = "source";

// ─── Violations Processor 메트릭 ───────────────────────────────────

/// 이벤트로 변환된 레코드 수 (counter, label: output_format)
pub const RECORDS_PROCESSED_TOTAL: &str = "napwatch_records_processed_total";

/// 처리에 실패한 레코드 수 (counter, label: stage)
pub const RECORDS_FAILED_TOTAL: &str = "napwatch_records_failed_total";

/// 문자열이 아닌 본문이라 제거된 레코드 수 (counter)
pub const RECORDS_DROPPED_TOTAL: &str = "napwatch_records_dropped_total";

/// 추출된 위반 수 (counter)
pub const VIOLATIONS_EXTRACTED_TOTAL: &str = "napwatch_violations_extracted_total";

/// base64 디코딩 실패로 원문을 유지한 횟수 (counter, label: source)
pub const DECODE_FALLBACKS_TOTAL: &str = "napwatch_decode_fallbacks_total";

/// 배치 처리 소요 시간 (histogram, 초)
pub const BATCH_PROCESSING_DURATION_SECONDS: &str = "napwatch_batch_processing_duration_seconds";

// ─── 히스토그램 버킷 정의 ────────────────────────────────────────────

/// 배치 처리 지연 시간 히스토그램 버킷 (초)
///
/// 100us ~ 10s 범위
pub const PROCESSING_DURATION_BUCKETS: [f64; 10] = [
    0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 10.0,
];

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더를 설치한 쪽에서 한 번만 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        RECORDS_PROCESSED_TOTAL,
        "Total number of log records converted into security violation events"
    );
    describe_counter!(
        RECORDS_FAILED_TOTAL,
        "Total number of log records that failed syslog parsing or event encoding"
    );
    describe_counter!(
        RECORDS_DROPPED_TOTAL,
        "Total number of log records removed because their body is not a string"
    );
    describe_counter!(
        VIOLATIONS_EXTRACTED_TOTAL,
        "Total number of violations extracted from violation details"
    );
    describe_counter!(
        DECODE_FALLBACKS_TOTAL,
        "Total number of base64 decode failures that kept the original text"
    );
    describe_histogram!(
        BATCH_PROCESSING_DURATION_SECONDS,
        "Batch processing latency in seconds"
    );
}
