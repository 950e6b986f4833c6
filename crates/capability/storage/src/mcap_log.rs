//! MCAP 文件容器实现
//!
//! 创建时注册一个 schema（`event.EventWrapper`）和一个通道（`vector_event`），
//! 之后按序追加消息。分块、CRC、索引与 footer 均由 `mcap` crate 负责。

use crate::descriptor;
use crate::error::StorageError;
use crate::message::{ContainerMessage, MESSAGE_ENCODING, SCHEMA_ENCODING, SCHEMA_NAME, TOPIC};
use crate::traits::ContainerLog;
use mcap::records::MessageHeader;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, warn};

/// 分块压缩方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerCompression {
    None,
    #[default]
    Zstd,
    Lz4,
}

/// MCAP 写入参数。
#[derive(Debug, Clone, Default)]
pub struct McapOptions {
    pub compression: ContainerCompression,
    /// 分块大小（字节），None 使用 mcap 默认值。
    pub chunk_size: Option<u64>,
}

/// 单个 MCAP 文件的唯一写入者。
pub struct McapLog {
    writer: mcap::Writer<BufWriter<File>>,
    channel_id: u16,
    sequence: u32,
    path: String,
    finished: bool,
}

impl McapLog {
    /// 创建目标文件（必要时创建父目录）并注册 schema 与通道。
    pub fn create(path: &Path, options: &McapOptions) -> Result<Self, StorageError> {
        let display_path = path.display().to_string();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StorageError::Destination {
                path: parent.display().to_string(),
                source,
            })?;
        }
        let file = File::create(path).map_err(|source| StorageError::Destination {
            path: display_path.clone(),
            source,
        })?;

        let compression = match options.compression {
            ContainerCompression::None => None,
            ContainerCompression::Zstd => Some(mcap::Compression::Zstd),
            ContainerCompression::Lz4 => Some(mcap::Compression::Lz4),
        };
        let mut writer = mcap::WriteOptions::new()
            .compression(compression)
            .chunk_size(options.chunk_size)
            .create(BufWriter::new(file))?;

        let schema_id =
            writer.add_schema(SCHEMA_NAME, SCHEMA_ENCODING, &descriptor::schema_data())?;
        let channel_id =
            writer.add_channel(schema_id, TOPIC, MESSAGE_ENCODING, &BTreeMap::new())?;
        debug!(
            target: "v2m.storage",
            path = %display_path,
            schema_id,
            channel_id,
            "container_opened"
        );

        Ok(Self {
            writer,
            channel_id,
            sequence: 0,
            path: display_path,
            finished: false,
        })
    }

    /// 已写入的消息数。
    pub fn message_count(&self) -> u32 {
        self.sequence
    }
}

impl ContainerLog for McapLog {
    fn append(&mut self, message: &ContainerMessage) -> Result<(), StorageError> {
        if self.finished {
            return Err(StorageError::Finished);
        }
        if message.topic != TOPIC {
            return Err(StorageError::Container(format!(
                "unknown topic {:?}",
                message.topic
            )));
        }
        let header = MessageHeader {
            channel_id: self.channel_id,
            sequence: self.sequence,
            log_time: message.log_time,
            publish_time: message.publish_time,
        };
        self.writer.write_to_known_channel(&header, &message.payload)?;
        self.sequence = self.sequence.wrapping_add(1);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), StorageError> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.writer.finish()?;
        debug!(
            target: "v2m.storage",
            path = %self.path,
            messages = self.sequence,
            "container_finished"
        );
        Ok(())
    }
}

impl Drop for McapLog {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(err) = self.finish() {
                warn!(
                    target: "v2m.storage",
                    path = %self.path,
                    error = %err,
                    "container_finish_failed"
                );
            }
        }
    }
}
