//! 事件的 protobuf 线上格式
//!
//! 字段编号与 Vector 的 `event.proto` 一致，只声明本项目写入的字段；
//! 读取方按编号解码，未知字段被跳过。

use std::collections::BTreeMap;

/// 顶层事件信封。
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EventWrapper {
    #[prost(oneof = "event_wrapper::Event", tags = "2")]
    pub event: ::core::option::Option<event_wrapper::Event>,
}

pub mod event_wrapper {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Event {
        #[prost(message, tag = "2")]
        Metric(super::Metric),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Metric {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "2")]
    pub timestamp: ::core::option::Option<::prost_types::Timestamp>,
    /// 按 key 有序，保证相同输入得到相同字节。
    #[prost(btree_map = "string, string", tag = "3")]
    pub tags_v1: BTreeMap<::prost::alloc::string::String, ::prost::alloc::string::String>,
    #[prost(enumeration = "metric::Kind", tag = "4")]
    pub kind: i32,
    #[prost(string, tag = "11")]
    pub namespace: ::prost::alloc::string::String,
    #[prost(oneof = "metric::Value", tags = "5, 6, 7")]
    pub value: ::core::option::Option<metric::Value>,
}

pub mod metric {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Kind {
        Incremental = 0,
        Absolute = 1,
    }

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Value {
        #[prost(message, tag = "5")]
        Counter(super::Counter),
        #[prost(message, tag = "6")]
        Gauge(super::Gauge),
        #[prost(message, tag = "7")]
        Set(super::Set),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Counter {
    #[prost(double, tag = "1")]
    pub value: f64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Gauge {
    #[prost(double, tag = "1")]
    pub value: f64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Set {
    #[prost(string, repeated, tag = "1")]
    pub values: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}

impl From<&domain::EventWrapper> for EventWrapper {
    fn from(event: &domain::EventWrapper) -> Self {
        let event = match event {
            domain::EventWrapper::Metric(metric) => event_wrapper::Event::Metric(metric.into()),
        };
        Self { event: Some(event) }
    }
}

impl From<&domain::MetricEvent> for Metric {
    fn from(metric: &domain::MetricEvent) -> Self {
        let kind = match metric.kind {
            domain::MetricKind::Absolute => metric::Kind::Absolute,
            domain::MetricKind::Incremental => metric::Kind::Incremental,
        };
        let value = match &metric.value {
            domain::MetricValue::Counter { value } => {
                metric::Value::Counter(Counter { value: *value })
            }
            domain::MetricValue::Gauge { value } => metric::Value::Gauge(Gauge { value: *value }),
            domain::MetricValue::Set { values } => metric::Value::Set(Set {
                values: values.clone(),
            }),
        };
        Self {
            name: metric.name.clone(),
            timestamp: Some(::prost_types::Timestamp {
                seconds: metric.timestamp.timestamp(),
                nanos: metric.timestamp.timestamp_subsec_nanos() as i32,
            }),
            tags_v1: metric.tags.clone(),
            kind: kind as i32,
            namespace: metric.namespace.clone().unwrap_or_default(),
            value: Some(value),
        }
    }
}
