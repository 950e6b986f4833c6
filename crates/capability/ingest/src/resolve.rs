//! 输入路径展开：通配符匹配、去重与排序。

use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::debug;

/// 展开结果。
#[derive(Debug, Clone, Default)]
pub struct ResolvedInputs {
    /// 去重并排序后的输入路径。
    pub paths: Vec<PathBuf>,
    /// 没有匹配到任何文件的模式（含非法模式）。
    pub unmatched: Vec<String>,
}

/// 展开路径/通配符模式。
pub fn expand_patterns<S: AsRef<str>>(patterns: &[S]) -> ResolvedInputs {
    let mut matched = Vec::new();
    let mut unmatched = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let entries = match glob::glob(pattern) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(target: "v2m.ingest", pattern = %pattern, error = %err, "pattern_invalid");
                unmatched.push(pattern.to_string());
                continue;
            }
        };
        let before = matched.len();
        matched.extend(entries.filter_map(Result::ok));
        if matched.len() == before {
            unmatched.push(pattern.to_string());
        }
    }
    ResolvedInputs {
        paths: dedup_sorted(matched),
        unmatched,
    }
}

/// 去重并按路径排序，保证处理顺序确定。
pub fn dedup_sorted(paths: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
    paths
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
