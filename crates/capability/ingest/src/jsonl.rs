//! JSONL 逐行读取
//!
//! 每次只持有一行内容：空行跳过且不计数，
//! 非法行作为软错误返回后继续，I/O 错误只返回一次并结束该输入。

use crate::{IngestError, RawRecord};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use tracing::debug;

/// 单个输入上的惰性记录序列。
pub struct JsonlRecords<R> {
    reader: R,
    resource: String,
    line_number: usize,
    buf: Vec<u8>,
    finished: bool,
}

impl<R: BufRead> JsonlRecords<R> {
    pub fn new(resource: impl Into<String>, reader: R) -> Self {
        Self {
            reader,
            resource: resource.into(),
            line_number: 0,
            buf: Vec::new(),
            finished: false,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    fn malformed(&self, message: String) -> IngestError {
        IngestError::MalformedLine {
            resource: self.resource.clone(),
            line: self.line_number,
            message,
        }
    }
}

impl<R: BufRead> Iterator for JsonlRecords<R> {
    type Item = Result<RawRecord, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.finished = true;
                    return None;
                }
                Ok(_) => {}
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.finished = true;
                    return Some(Err(IngestError::Io {
                        resource: self.resource.clone(),
                        source: err,
                    }));
                }
            }
            self.line_number += 1;

            let text = match std::str::from_utf8(&self.buf) {
                Ok(text) => text,
                Err(err) => return Some(Err(self.malformed(format!("invalid utf-8: {}", err)))),
            };
            if is_blank(text) {
                continue;
            }
            return Some(match serde_json::from_str::<Value>(text.trim()) {
                Ok(value) => Ok(RawRecord {
                    resource: self.resource.clone(),
                    line: self.line_number,
                    value,
                }),
                Err(err) => Err(self.malformed(err.to_string())),
            });
        }
    }
}

/// 空行判定：读取与计数共用。
fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// 打开 JSONL 文件；文件不存在时立即返回错误。
pub fn read_jsonl_file(path: &Path) -> Result<JsonlRecords<BufReader<File>>, IngestError> {
    let resource = path.display().to_string();
    let file = File::open(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => IngestError::NotFound(resource.clone()),
        _ => IngestError::Io {
            resource: resource.clone(),
            source: err,
        },
    })?;
    debug!(target: "v2m.ingest", resource = %resource, "resource_opened");
    Ok(JsonlRecords::new(resource, BufReader::new(file)))
}

/// 统计非空行数（用于进度总量），不解析 JSON。
pub fn count_records(path: &Path) -> Result<u64, IngestError> {
    let resource = path.display().to_string();
    let file = File::open(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => IngestError::NotFound(resource.clone()),
        _ => IngestError::Io {
            resource: resource.clone(),
            source: err,
        },
    })?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut total = 0u64;
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|err| IngestError::Io {
                resource: resource.clone(),
                source: err,
            })?;
        if read == 0 {
            return Ok(total);
        }
        // 非法 UTF-8 的行在读取时记为错误行，同样计入总量。
        let blank = std::str::from_utf8(&buf).is_ok_and(is_blank);
        if !blank {
            total += 1;
        }
    }
}
