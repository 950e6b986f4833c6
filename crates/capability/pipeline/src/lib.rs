//! 转换流水线：JSONL 读取 → 标准化 → MCAP 写入。

mod progress;

pub use progress::{LogProgress, NoProgress, ProgressReporter};

use domain::EventWrapper;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, info_span};
use v2m_ingest::{IngestError, RawRecord, count_records, dedup_sorted, read_jsonl_file};
use v2m_normalize::normalize;
use v2m_storage::{ContainerLog, ContainerMessage, McapLog, McapOptions, StorageError};
use v2m_telemetry::{Diagnostic, DiagnosticContext, DiagnosticSink, new_run_id};

/// 流水线错误（仅整次运行级别）。
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("no input files found")]
    NoInputs,
    #[error("cannot open destination: {0}")]
    Destination(#[source] StorageError),
    #[error("cannot finalize destination: {0}")]
    Finalize(#[source] StorageError),
}

/// 转换统计：observed == errored + written。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub resources: u64,
    pub resources_failed: u64,
    pub observed: u64,
    pub errored: u64,
    pub written: u64,
    pub malformed_lines: u64,
    pub rejected: u64,
    pub write_failures: u64,
}

impl ConversionStats {
    pub fn is_reconciled(&self) -> bool {
        self.observed == self.errored + self.written
            && self.errored == self.malformed_lines + self.rejected + self.write_failures
    }
}

/// 转换参数。
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub container: McapOptions,
    /// 设置后按该间隔输出进度日志。
    pub progress_interval: Option<u64>,
}

/// 流水线入口。
pub struct Pipeline {
    diagnostics: Arc<dyn DiagnosticSink>,
    progress: Box<dyn ProgressReporter>,
}

impl Pipeline {
    pub fn new(diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self::with_progress(diagnostics, Box::new(NoProgress))
    }

    pub fn with_progress(
        diagnostics: Arc<dyn DiagnosticSink>,
        progress: Box<dyn ProgressReporter>,
    ) -> Self {
        Self {
            diagnostics,
            progress,
        }
    }

    /// 按给定顺序处理全部输入；单行、单条、单个输入的失败只计数不中断。
    pub fn run(
        &mut self,
        resources: &[PathBuf],
        log: &mut dyn ContainerLog,
    ) -> ConversionStats {
        let mut stats = ConversionStats {
            resources: resources.len() as u64,
            ..ConversionStats::default()
        };
        for path in resources {
            self.run_resource(path, log, &mut stats);
        }
        self.progress.finish();
        stats
    }

    fn run_resource(
        &mut self,
        path: &Path,
        log: &mut dyn ContainerLog,
        stats: &mut ConversionStats,
    ) {
        let records = match read_jsonl_file(path) {
            Ok(records) => records,
            Err(err) => {
                stats.resources_failed += 1;
                self.report_ingest(&err);
                return;
            }
        };
        for item in records {
            match item {
                Ok(record) => {
                    stats.observed += 1;
                    self.handle_record(record, log, stats);
                }
                Err(err) if err.is_fatal() => {
                    stats.resources_failed += 1;
                    self.report_ingest(&err);
                    break;
                }
                Err(err) => {
                    stats.observed += 1;
                    stats.errored += 1;
                    stats.malformed_lines += 1;
                    self.report_ingest(&err);
                }
            }
            self.progress.advance(1);
        }
    }

    fn handle_record(
        &mut self,
        record: RawRecord,
        log: &mut dyn ContainerLog,
        stats: &mut ConversionStats,
    ) {
        let context = DiagnosticContext::line(record.resource, record.line);
        let event = match normalize(&record.value) {
            Ok(event) => event,
            Err(err) => {
                stats.errored += 1;
                stats.rejected += 1;
                self.diagnostics.report(Diagnostic::warning(
                    context,
                    format!("record skipped: {}", err),
                ));
                return;
            }
        };
        let EventWrapper::Metric(metric) = &event;
        match ContainerMessage::from_event(&event).and_then(|message| log.append(&message)) {
            Ok(()) => {
                stats.written += 1;
                debug!(
                    target: "v2m.pipeline",
                    context = %context,
                    metric = %metric.name,
                    metric_type = metric.value.type_name(),
                    kind = metric.kind.as_str(),
                    "record_written"
                );
            }
            Err(err) => {
                stats.errored += 1;
                stats.write_failures += 1;
                self.diagnostics.report(Diagnostic::error(
                    context,
                    format!(
                        "error writing {} {:?}: {}",
                        metric.value.type_name(),
                        metric.name,
                        err
                    ),
                ));
            }
        }
    }

    fn report_ingest(&self, err: &IngestError) {
        let diagnostic = match err.line() {
            Some(line) => Diagnostic::warning(
                DiagnosticContext::line(err.resource(), line),
                err.to_string(),
            ),
            None => Diagnostic::error(
                DiagnosticContext::resource(err.resource()),
                err.to_string(),
            ),
        };
        self.diagnostics.report(diagnostic);
    }
}

/// 统计全部输入的非空行数；不可读的输入记 0（运行时再报告）。
pub fn total_records(resources: &[PathBuf]) -> u64 {
    resources
        .iter()
        .map(|path| match count_records(path) {
            Ok(count) => count,
            Err(err) => {
                debug!(target: "v2m.pipeline", error = %err, "count_skipped");
                0
            }
        })
        .sum()
}

/// 将一组 JSONL 文件转换为一个 MCAP 文件。
///
/// 输入先去重排序；容器只打开一次、收尾一次。
pub fn convert_files(
    resources: Vec<PathBuf>,
    destination: &Path,
    options: &ConvertOptions,
    diagnostics: Arc<dyn DiagnosticSink>,
) -> Result<ConversionStats, PipelineError> {
    let resources = dedup_sorted(resources);
    if resources.is_empty() {
        return Err(PipelineError::NoInputs);
    }

    let run_id = new_run_id();
    let span = info_span!(
        "conversion",
        run_id = %run_id,
        destination = %destination.display()
    );
    let _guard = span.enter();

    let progress: Box<dyn ProgressReporter> = match options.progress_interval {
        Some(interval) => Box::new(LogProgress::new(total_records(&resources), interval)),
        None => Box::new(NoProgress),
    };

    let mut log =
        McapLog::create(destination, &options.container).map_err(PipelineError::Destination)?;
    let mut pipeline = Pipeline::with_progress(diagnostics, progress);
    let stats = pipeline.run(&resources, &mut log);
    log.finish().map_err(PipelineError::Finalize)?;

    info!(
        target: "v2m.pipeline",
        resources = stats.resources,
        resources_failed = stats.resources_failed,
        observed = stats.observed,
        written = stats.written,
        errored = stats.errored,
        "conversion_finished"
    );
    Ok(stats)
}
