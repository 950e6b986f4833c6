use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// 指标类型：绝对值或增量。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricKind {
    /// 某一时刻的观测值。
    #[default]
    Absolute,
    /// 相对上一次上报的增量。
    Incremental,
}

impl MetricKind {
    /// 大小写不敏感解析；无法识别时回退为 Absolute。
    pub fn from_str_lenient(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("incremental") {
            Self::Incremental
        } else {
            Self::Absolute
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Incremental => "incremental",
        }
    }
}

/// 指标值（恰好一种）。
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Counter { value: f64 },
    Gauge { value: f64 },
    Set { values: Vec<String> },
}

impl MetricValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Counter { .. } => "counter",
            Self::Gauge { .. } => "gauge",
            Self::Set { .. } => "set",
        }
    }
}

/// 规范化后的指标事件。
#[derive(Debug, Clone, PartialEq)]
pub struct MetricEvent {
    pub name: String,
    pub namespace: Option<String>,
    pub tags: BTreeMap<String, String>,
    pub kind: MetricKind,
    pub timestamp: DateTime<Utc>,
    pub value: MetricValue,
}

impl MetricEvent {
    /// 事件时间（纳秒）；超出 i64 纳秒范围时返回 None。
    pub fn timestamp_nanos(&self) -> Option<i64> {
        self.timestamp.timestamp_nanos_opt()
    }
}
