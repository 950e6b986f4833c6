//! 内存容器实现（用于测试和演示）。

use crate::error::StorageError;
use crate::message::ContainerMessage;
use crate::traits::ContainerLog;

#[derive(Debug, Default)]
pub struct InMemoryLog {
    messages: Vec<ContainerMessage>,
    finished: bool,
}

impl InMemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ContainerMessage] {
        &self.messages
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl ContainerLog for InMemoryLog {
    fn append(&mut self, message: &ContainerMessage) -> Result<(), StorageError> {
        if self.finished {
            return Err(StorageError::Finished);
        }
        self.messages.push(message.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), StorageError> {
        self.finished = true;
        Ok(())
    }
}
