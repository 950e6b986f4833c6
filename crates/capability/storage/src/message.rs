//! 容器消息：序列化后的 EventWrapper + 时间戳。

use crate::error::StorageError;
use crate::proto;
use domain::EventWrapper;
use prost::Message;

/// 固定主题。
pub const TOPIC: &str = "vector_event";
/// schema 名称（protobuf 全限定名）。
pub const SCHEMA_NAME: &str = "event.EventWrapper";
/// schema 与消息的编码方式。
pub const SCHEMA_ENCODING: &str = "protobuf";
pub const MESSAGE_ENCODING: &str = "protobuf";

/// 待写入容器的一条消息。
///
/// log_time 与 publish_time 都取事件自身时间（纳秒），而非处理时间。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerMessage {
    pub topic: &'static str,
    pub payload: Vec<u8>,
    pub log_time: u64,
    pub publish_time: u64,
}

impl ContainerMessage {
    pub fn from_event(event: &EventWrapper) -> Result<Self, StorageError> {
        let timestamp = event.timestamp();
        let nanos = timestamp
            .timestamp_nanos_opt()
            .and_then(|nanos| u64::try_from(nanos).ok())
            .ok_or_else(|| StorageError::TimestampOutOfRange(timestamp.to_rfc3339()))?;
        let payload = proto::EventWrapper::from(event).encode_to_vec();
        Ok(Self {
            topic: TOPIC,
            payload,
            log_time: nanos,
            publish_time: nanos,
        })
    }
}
