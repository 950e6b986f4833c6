//! 原始 JSON → MetricEvent 的校验与映射
//!
//! 按固定顺序校验：`metric` 字段、name、timestamp、可选字段、kind、值类型。
//! 成功时返回完整的 `EventWrapper::Metric`，失败时返回结构化的拒绝原因，
//! 不存在部分填充的中间结果。

mod timestamp;

pub use timestamp::parse_timestamp;

use domain::{EventWrapper, MetricEvent, MetricKind, MetricValue};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// 规范化错误（记录拒绝原因）。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    #[error("not a metric: record has no 'metric' object")]
    NotAMetric,
    #[error("metric missing '{0}' field")]
    MissingField(&'static str),
    #[error("invalid '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
    #[error("unknown metric type, expected one of counter/gauge/set (keys: {0})")]
    UnknownValueType(String),
    #[error("ambiguous metric type: {0}")]
    AmbiguousValueType(String),
}

const VALUE_TYPES: [&str; 3] = ["counter", "gauge", "set"];

/// 将一条原始记录映射为事件信封。
pub fn normalize(record: &Value) -> Result<EventWrapper, NormalizeError> {
    let metric = record
        .as_object()
        .and_then(|object| object.get("metric"))
        .and_then(Value::as_object)
        .ok_or(NormalizeError::NotAMetric)?;
    normalize_metric(metric).map(EventWrapper::Metric)
}

/// 将 `metric` 对象映射为 MetricEvent。
pub fn normalize_metric(metric: &Map<String, Value>) -> Result<MetricEvent, NormalizeError> {
    let name = match metric.get("name") {
        None | Some(Value::Null) => return Err(NormalizeError::MissingField("name")),
        Some(Value::String(name)) if !name.is_empty() => name.clone(),
        Some(Value::String(_)) => return Err(invalid("name", "must not be empty")),
        Some(other) => return Err(invalid("name", expected("a string", other))),
    };

    let timestamp = match metric.get("timestamp") {
        None | Some(Value::Null) => return Err(NormalizeError::MissingField("timestamp")),
        Some(Value::String(raw)) => parse_timestamp(raw)?,
        Some(other) => return Err(invalid("timestamp", expected("a string", other))),
    };

    let namespace = match metric.get("namespace") {
        None | Some(Value::Null) => None,
        Some(Value::String(namespace)) if namespace.is_empty() => None,
        Some(Value::String(namespace)) => Some(namespace.clone()),
        Some(other) => return Err(invalid("namespace", expected("a string", other))),
    };

    let tags = match metric.get("tags") {
        None | Some(Value::Null) => BTreeMap::new(),
        Some(Value::Object(tags)) => convert_tags(tags)?,
        Some(other) => return Err(invalid("tags", expected("an object", other))),
    };

    // 未知或缺失的 kind 一律视为 Absolute。
    let kind = metric
        .get("kind")
        .and_then(Value::as_str)
        .map(MetricKind::from_str_lenient)
        .unwrap_or_default();

    let value = convert_value(metric)?;

    Ok(MetricEvent {
        name,
        namespace,
        tags,
        kind,
        timestamp,
        value,
    })
}

// 裸标签（值为 null）映射为空字符串。
fn convert_tags(tags: &Map<String, Value>) -> Result<BTreeMap<String, String>, NormalizeError> {
    tags.iter()
        .map(|(key, value)| {
            scalar_to_string(value)
                .map(|value| (key.clone(), value))
                .ok_or_else(|| {
                    invalid(
                        "tags",
                        format!("tag {:?} {}", key, expected("a scalar", value)),
                    )
                })
        })
        .collect()
}

fn convert_value(metric: &Map<String, Value>) -> Result<MetricValue, NormalizeError> {
    let present: Vec<&str> = VALUE_TYPES
        .into_iter()
        .filter(|key| metric.get(*key).is_some_and(|value| !value.is_null()))
        .collect();

    match present.as_slice() {
        ["counter"] => Ok(MetricValue::Counter {
            value: numeric_value("counter", &metric["counter"])?,
        }),
        ["gauge"] => Ok(MetricValue::Gauge {
            value: numeric_value("gauge", &metric["gauge"])?,
        }),
        ["set"] => Ok(MetricValue::Set {
            values: set_values(&metric["set"])?,
        }),
        [] => {
            let keys: Vec<&str> = metric.keys().map(String::as_str).collect();
            Err(NormalizeError::UnknownValueType(keys.join(", ")))
        }
        many => Err(NormalizeError::AmbiguousValueType(many.join(", "))),
    }
}

fn numeric_value(field: &'static str, container: &Value) -> Result<f64, NormalizeError> {
    let object = container
        .as_object()
        .ok_or_else(|| invalid(field, expected("an object", container)))?;
    match object.get("value") {
        None | Some(Value::Null) => Err(invalid(field, "missing 'value'")),
        Some(Value::Number(number)) => number
            .as_f64()
            .ok_or_else(|| invalid(field, format!("value {} is not representable as f64", number))),
        Some(Value::String(raw)) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(field, format!("value {:?} is not numeric", raw))),
        Some(other) => Err(invalid(field, format!("value {}", expected("a number", other)))),
    }
}

fn set_values(container: &Value) -> Result<Vec<String>, NormalizeError> {
    let object = container
        .as_object()
        .ok_or_else(|| invalid("set", expected("an object", container)))?;
    match object.get("values") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(values)) => values
            .iter()
            .map(|value| {
                scalar_to_string(value).ok_or_else(|| {
                    invalid("set", format!("member {}", expected("a scalar", value)))
                })
            })
            .collect(),
        Some(other) => Err(invalid("set", format!("values {}", expected("an array", other)))),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(value) => Some(value.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> NormalizeError {
    NormalizeError::InvalidField {
        field,
        reason: reason.into(),
    }
}

fn expected(what: &str, got: &Value) -> String {
    let kind = match got {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    format!("expected {}, got {}", what, kind)
}
