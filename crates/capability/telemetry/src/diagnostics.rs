//! 结构化诊断通道
//!
//! 核心链路只产出 `Diagnostic`（级别 + 上下文 + 消息），
//! 如何展示由调用方选择的 `DiagnosticSink` 决定。

use std::fmt;
use std::sync::Mutex;
use tracing::{error, warn};

/// 诊断级别。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// 单行/单条记录被丢弃，处理继续。
    Warning,
    /// 整个输入或单条写入失败，处理继续。
    Error,
}

/// 诊断上下文：输入资源与行号（1 起始）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticContext {
    pub resource: Option<String>,
    pub line: Option<usize>,
}

impl DiagnosticContext {
    pub fn resource(resource: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
            line: None,
        }
    }

    pub fn line(resource: impl Into<String>, line: usize) -> Self {
        Self {
            resource: Some(resource.into()),
            line: Some(line),
        }
    }
}

impl fmt::Display for DiagnosticContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.resource, self.line) {
            (Some(resource), Some(line)) => write!(f, "{}:{}", resource, line),
            (Some(resource), None) => write!(f, "{}", resource),
            (None, Some(line)) => write!(f, "line {}", line),
            (None, None) => Ok(()),
        }
    }
}

/// 单条诊断。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub context: DiagnosticContext,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(context: DiagnosticContext, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            context,
            message: message.into(),
        }
    }

    pub fn error(context: DiagnosticContext, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            context,
            message: message.into(),
        }
    }
}

/// 诊断接收者抽象。
pub trait DiagnosticSink {
    fn report(&self, diagnostic: Diagnostic);
}

/// 通过 tracing 输出诊断。
#[derive(Debug, Default)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        let resource = diagnostic.context.resource.as_deref().unwrap_or("");
        match diagnostic.severity {
            Severity::Warning => warn!(
                target: "v2m.diagnostics",
                resource = %resource,
                line = ?diagnostic.context.line,
                "{}",
                diagnostic.message
            ),
            Severity::Error => error!(
                target: "v2m.diagnostics",
                resource = %resource,
                line = ?diagnostic.context.line,
                "{}",
                diagnostic.message
            ),
        }
    }
}

/// 内存收集诊断（用于测试或由调用方自行渲染）。
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries()
            .iter()
            .filter(|diagnostic| diagnostic.severity == severity)
            .count()
    }
}

impl DiagnosticSink for MemoryDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        match self.entries.lock() {
            Ok(mut entries) => entries.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}
