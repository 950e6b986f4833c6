//! 存储层错误类型
//!
//! 区分单条消息的编码错误与容器级的 I/O 错误：
//! 前者由调用方计数后继续，后者在创建/收尾时向上传播。

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// 事件时间无法表示为无符号纳秒
    #[error("timestamp out of range for container: {0}")]
    TimestampOutOfRange(String),

    /// 目标目录或文件不可用
    #[error("destination {path}: {source}")]
    Destination {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// MCAP 写入错误
    #[error("container error: {0}")]
    Container(String),

    /// 容器已收尾，不再接受写入
    #[error("container already finished")]
    Finished,
}

impl From<mcap::McapError> for StorageError {
    fn from(err: mcap::McapError) -> Self {
        Self::Container(err.to_string())
    }
}
