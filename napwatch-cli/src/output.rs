//! Output formatting for reports and processed records
//!
//! Reports (config commands, processing summary) flow through [`OutputWriter`],
//! which switches between text and JSON. Processed records are always written
//! as JSON lines by [`RecordLine`].

use std::collections::BTreeMap;
use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde_json::Value;

use napwatch_core::logs::{Body, LogRecord};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Abstraction for writing CLI reports in different formats.
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    /// Create a new output writer with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render a payload to stdout.
    pub fn render<T: Render + Serialize>(&self, payload: &T) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        self.render_to(payload, &mut handle)
    }

    /// Render a payload to stderr (used when stdout carries records).
    pub fn render_stderr<T: Render + Serialize>(&self, payload: &T) -> Result<(), CliError> {
        let stderr = std::io::stderr();
        let mut handle = stderr.lock();
        self.render_to(payload, &mut handle)
    }

    /// Render a payload to an arbitrary writer.
    ///
    /// For `Text` format, delegates to `Render::render_text()`.
    /// For `Json` format, serialises via `serde_json`.
    pub fn render_to<T: Render + Serialize>(
        &self,
        payload: &T,
        w: &mut dyn Write,
    ) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Text => payload.render_text(w)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *w, payload)?;
                writeln!(w)?;
            }
        }
        Ok(())
    }
}

/// Trait for human-readable text rendering.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}

/// One processed record as a JSON line.
///
/// Binary bodies (protobuf events) are base64-encoded.
#[derive(Debug, Serialize)]
pub struct RecordLine<'a> {
    pub attributes: &'a BTreeMap<String, String>,
    pub body_type: &'static str,
    pub body: Value,
}

impl<'a> RecordLine<'a> {
    pub fn new(record: &'a LogRecord) -> Self {
        let body = match &record.body {
            Body::Empty => Value::Null,
            Body::Str(s) => Value::String(s.clone()),
            Body::Bytes(b) => Value::String(STANDARD.encode(b)),
            Body::Int(v) => Value::from(*v),
            Body::Double(v) => Value::from(*v),
            Body::Bool(v) => Value::Bool(*v),
        };
        Self {
            attributes: &record.attributes,
            body_type: record.body.type_name(),
            body,
        }
    }

    /// Write the record as a single JSON line.
    pub fn write_line(&self, w: &mut dyn Write) -> Result<(), CliError> {
        serde_json::to_writer(&mut *w, self)?;
        writeln!(w)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[derive(Serialize)]
    struct TestPayload {
        field1: String,
        field2: u32,
    }

    impl Render for TestPayload {
        fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
            writeln!(w, "Field1: {}", self.field1)?;
            writeln!(w, "Field2: {}", self.field2)?;
            Ok(())
        }
    }

    fn payload() -> TestPayload {
        TestPayload {
            field1: "test value".to_owned(),
            field2: 42,
        }
    }

    #[test]
    fn test_output_writer_text_format() {
        let writer = OutputWriter::new(OutputFormat::Text);
        let mut buffer = Vec::new();
        writer
            .render_to(&payload(), &mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("Field1: test value"));
        assert!(output.contains("Field2: 42"));
    }

    #[test]
    fn test_output_writer_json_format() {
        let writer = OutputWriter::new(OutputFormat::Json);
        let mut buffer = Vec::new();
        writer
            .render_to(&payload(), &mut buffer)
            .expect("json rendering should succeed");

        let parsed: Value = serde_json::from_slice(&buffer).expect("valid JSON");
        assert_eq!(parsed["field1"].as_str(), Some("test value"));
        assert_eq!(parsed["field2"].as_u64(), Some(42));
    }

    #[test]
    fn test_record_line_encodes_bytes_as_base64() {
        let mut record = LogRecord::with_body(Body::Bytes(Bytes::from_static(b"\x08\x01")));
        record.put_str("app_protect.support_id", "123");

        let mut buffer = Vec::new();
        RecordLine::new(&record)
            .write_line(&mut buffer)
            .expect("write should succeed");

        let line = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(line.ends_with('\n'));
        let parsed: Value = serde_json::from_str(line.trim_end()).expect("valid JSON");
        assert_eq!(parsed["body_type"], "Bytes");
        assert_eq!(parsed["body"], "CAE=");
        assert_eq!(parsed["attributes"]["app_protect.support_id"], "123");
    }

    #[test]
    fn test_record_line_keeps_string_body() {
        let record = LogRecord::from_str_body("not a syslog line");
        let line = RecordLine::new(&record);
        assert_eq!(line.body_type, "Str");
        assert_eq!(line.body, Value::String("not a syslog line".to_owned()));
    }
}
