//! 容器写入接口
//!
//! 转换链路只依赖这一窄接口：按序追加消息，结束时收尾一次。

use crate::error::StorageError;
use crate::message::ContainerMessage;

/// 追加式容器日志。
pub trait ContainerLog {
    /// 追加一条消息；失败只影响这一条。
    fn append(&mut self, message: &ContainerMessage) -> Result<(), StorageError>;

    /// 写入索引与 footer；重复调用无副作用。
    fn finish(&mut self) -> Result<(), StorageError>;
}
