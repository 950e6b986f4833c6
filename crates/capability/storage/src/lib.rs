//! # 存储模块
//!
//! 将规范化事件写入 MCAP 容器。
//!
//! ## 模块说明
//!
//! - [`proto`]：EventWrapper/Metric 的 protobuf 消息（字段编号兼容 Vector）
//! - [`descriptor`]：schema 自描述数据（FileDescriptorSet）
//! - [`message`]：`ContainerMessage`，负责序列化与时间戳
//! - [`traits`]：`ContainerLog` 写入接口
//! - `McapLog`：MCAP 文件实现；`InMemoryLog`：内存实现（测试用）
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use v2m_storage::{ContainerLog, ContainerMessage, McapLog, McapOptions};
//!
//! let mut log = McapLog::create(Path::new("out/metrics.mcap"), &McapOptions::default())?;
//! log.append(&ContainerMessage::from_event(&event)?)?;
//! log.finish()?;
//! ```

pub mod descriptor;
pub mod error;
mod in_memory;
mod mcap_log;
pub mod message;
pub mod proto;
pub mod traits;

pub use error::StorageError;
pub use in_memory::InMemoryLog;
pub use mcap_log::{ContainerCompression, McapLog, McapOptions};
pub use message::{ContainerMessage, MESSAGE_ENCODING, SCHEMA_ENCODING, SCHEMA_NAME, TOPIC};
pub use traits::ContainerLog;
