//! JSONL 输入读取：逐行流式解析与输入路径展开。

mod jsonl;
mod resolve;

pub use jsonl::{JsonlRecords, count_records, read_jsonl_file};
pub use resolve::{ResolvedInputs, dedup_sorted, expand_patterns};

use serde_json::Value;

/// 读取错误。
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("error reading {resource}: {source}")]
    Io {
        resource: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid json on line {line} in {resource}: {message}")]
    MalformedLine {
        resource: String,
        line: usize,
        message: String,
    },
}

impl IngestError {
    /// 是否终止当前输入（其余输入不受影响）。
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::MalformedLine { .. })
    }

    pub fn resource(&self) -> &str {
        match self {
            Self::NotFound(resource) => resource,
            Self::Io { resource, .. } | Self::MalformedLine { resource, .. } => resource,
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedLine { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// 单行解析出的原始 JSON 记录。
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub resource: String,
    /// 1 起始行号。
    pub line: usize,
    pub value: Value,
}
