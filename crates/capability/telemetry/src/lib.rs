//! 日志初始化、运行 ID 与诊断通道。

mod diagnostics;

pub use diagnostics::{
    Diagnostic, DiagnosticContext, DiagnosticSink, MemoryDiagnostics, Severity,
    TracingDiagnostics,
};

use tracing_subscriber::{EnvFilter, fmt};

/// 初始化 tracing（默认 info，verbose 时 debug；RUST_LOG 优先）。
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 生成新的 run_id。
pub fn new_run_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
