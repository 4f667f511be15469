//! `napwatch process` command handler
//!
//! Reads syslog lines, groups them into batches of `batch_size`, runs each
//! batch through the security violations processor and prints the forwarded
//! records to stdout as JSON lines.

use std::io::Write;
use std::sync::Arc;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use napwatch_core::config::NapwatchConfig;
use napwatch_core::error::{NapwatchError, PipelineError};
use napwatch_core::logs::{LogRecord, Logs};
use napwatch_core::pipeline::LogsConsumer;
use napwatch_violations_processor::{ProcessorConfig, ProcessorError, SecurityViolationsProcessor};

use crate::cli::ProcessArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, RecordLine, Render};

/// Execute the `process` command.
pub async fn execute(
    args: ProcessArgs,
    config: &NapwatchConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = effective_config(config, &args)?;
    let processor_config = ProcessorConfig::from_core(&config.processor)?;
    let processor = SecurityViolationsProcessor::new(processor_config, Arc::new(StdoutSink));

    let input = args
        .input
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdin".to_owned());
    info!(
        input = %input,
        output_format = config.processor.output_format.as_str(),
        batch_size = config.processor.batch_size,
        "processing syslog lines"
    );

    let summary = match &args.input {
        Some(path) => {
            let file = tokio::fs::File::open(path).await?;
            run(BufReader::new(file), &processor, config.processor.batch_size).await?
        }
        None => {
            run(
                BufReader::new(tokio::io::stdin()),
                &processor,
                config.processor.batch_size,
            )
            .await?
        }
    };

    writer.render_stderr(&summary)?;

    if summary.failed > 0 {
        return Err(CliError::RecordsFailed {
            failed: summary.failed,
            total: summary.records,
        });
    }
    Ok(())
}

/// Apply command-line overrides on top of the loaded configuration and validate.
pub fn effective_config(
    config: &NapwatchConfig,
    args: &ProcessArgs,
) -> Result<NapwatchConfig, CliError> {
    let mut config = config.clone();
    if let Some(encoding) = args.output_format {
        config.processor.output_format = encoding.as_config_value().to_owned();
    }
    if let Some(batch_size) = args.batch_size {
        config.processor.batch_size = batch_size;
    }
    config.validate()?;
    Ok(config)
}

/// Read lines from `reader` and process them in batches.
///
/// Empty lines are skipped. Record failures are counted, a downstream
/// failure aborts the run.
pub async fn run<R>(
    reader: R,
    processor: &SecurityViolationsProcessor,
    batch_size: usize,
) -> Result<ProcessSummary, CliError>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = ProcessSummary {
        output_format: processor.config().output_format.to_string(),
        ..Default::default()
    };
    let mut lines = reader.lines();
    let mut batch = Vec::with_capacity(batch_size);

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        batch.push(LogRecord::from_str_body(line));
        if batch.len() >= batch_size {
            process_batch(processor, std::mem::take(&mut batch), &mut summary)?;
        }
    }
    if !batch.is_empty() {
        process_batch(processor, batch, &mut summary)?;
    }

    info!(
        records = summary.records,
        failed = summary.failed,
        batches = summary.batches,
        "processing finished"
    );
    Ok(summary)
}

fn process_batch(
    processor: &SecurityViolationsProcessor,
    records: Vec<LogRecord>,
    summary: &mut ProcessSummary,
) -> Result<(), CliError> {
    summary.batches += 1;
    summary.records += records.len();

    let Err(err) = processor.process_logs(Logs::from_records(records)) else {
        return Ok(());
    };

    let errors = match err {
        ProcessorError::Records { errors } => errors,
        other => vec![other],
    };
    for error in errors {
        if let ProcessorError::Downstream(reason) = error {
            return Err(CliError::Command(format!("failed to write records: {reason}")));
        }
        warn!(batch = summary.batches, error = %error, "record failed to process");
        summary.failed += 1;
    }
    Ok(())
}

/// Writes every forwarded record to stdout as a JSON line.
struct StdoutSink;

impl LogsConsumer for StdoutSink {
    fn consume_logs(&self, logs: Logs) -> Result<(), NapwatchError> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        for record in logs.records() {
            RecordLine::new(record)
                .write_line(&mut handle)
                .map_err(|e| PipelineError::Consumer(e.to_string()))?;
        }
        handle
            .flush()
            .map_err(|e| PipelineError::Consumer(e.to_string()))?;
        Ok(())
    }
}

/// Processing summary.
#[derive(Debug, Default, Serialize)]
pub struct ProcessSummary {
    /// Records read from the input
    pub records: usize,
    /// Records that could not be turned into events
    pub failed: usize,
    /// Batches handed to the processor
    pub batches: usize,
    /// Event encoding used for record bodies
    pub output_format: String,
}

impl Render for ProcessSummary {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Processed {} records in {} batches ({})",
            self.records, self.batches, self.output_format
        )?;
        if self.failed == 0 {
            writeln!(w, "  Failed: {}", "0".green())?;
        } else {
            writeln!(w, "  Failed: {}", self.failed.to_string().red().bold())?;
        }
        Ok(())
    }
}
