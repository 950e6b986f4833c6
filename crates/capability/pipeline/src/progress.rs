//! 进度上报（可选旁路，不影响转换结果）。

use tracing::info;

/// 进度上报抽象。
pub trait ProgressReporter {
    fn advance(&mut self, delta: u64);

    fn finish(&mut self) {}
}

/// 不上报进度。
#[derive(Debug, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn advance(&mut self, _delta: u64) {}
}

/// 每处理 `interval` 条记录输出一次进度日志。
#[derive(Debug)]
pub struct LogProgress {
    total: u64,
    interval: u64,
    processed: u64,
}

impl LogProgress {
    pub fn new(total: u64, interval: u64) -> Self {
        Self {
            total,
            interval: interval.max(1),
            processed: 0,
        }
    }
}

impl ProgressReporter for LogProgress {
    fn advance(&mut self, delta: u64) {
        let before = self.processed / self.interval;
        self.processed = self.processed.saturating_add(delta);
        if self.processed / self.interval > before {
            info!(
                target: "v2m.pipeline",
                processed = self.processed,
                total = self.total,
                "conversion_progress"
            );
        }
    }

    fn finish(&mut self) {
        info!(
            target: "v2m.pipeline",
            processed = self.processed,
            total = self.total,
            "conversion_progress_done"
        );
    }
}
