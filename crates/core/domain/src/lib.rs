//! 转换链路共享的领域模型。

pub mod data;

pub use data::{MetricEvent, MetricKind, MetricValue};

use chrono::{DateTime, Utc};

/// 事件信封：按类别区分的顶层事件。
///
/// 目前只有 Metric；Log/Trace 作为新变体追加，线上格式对已有读取方兼容。
#[derive(Debug, Clone, PartialEq)]
pub enum EventWrapper {
    Metric(MetricEvent),
}

impl EventWrapper {
    /// 事件自身的时间戳。
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Metric(metric) => metric.timestamp,
        }
    }

    pub fn as_metric(&self) -> Option<&MetricEvent> {
        match self {
            Self::Metric(metric) => Some(metric),
        }
    }
}

impl From<MetricEvent> for EventWrapper {
    fn from(metric: MetricEvent) -> Self {
        Self::Metric(metric)
    }
}
