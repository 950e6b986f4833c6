//! ISO-8601 时间戳解析。

use crate::NormalizeError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

// 无时区的时间按 UTC 处理。
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
];

// `YYYY-MM-DD`
const DATE_LEN: usize = 10;

/// 解析 ISO-8601 时间戳；结尾 `Z` 表示 UTC。
///
/// 偏移量接受 `+08:00`、`+0800` 与 `+08` 三种写法。
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, NormalizeError> {
    let trimmed = raw.trim();
    let parsed = match extended_offset(trimmed) {
        Some(extended) => parse_with_offset(&extended),
        None => parse_with_offset(trimmed).or_else(|| parse_naive(trimmed)),
    };
    parsed.ok_or_else(|| NormalizeError::InvalidTimestamp(raw.to_string()))
}

fn parse_with_offset(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(value, format).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
}

fn parse_naive(value: &str) -> Option<DateTime<Utc>> {
    if let Some(parsed) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Some(parsed.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

// `+HHMM` / `+HH` 改写为 `+HH:MM`；日期部分的 `-` 不视为偏移。
fn extended_offset(value: &str) -> Option<String> {
    let (sign_at, sign) = value.char_indices().rev().find(|(_, c)| matches!(c, '+' | '-'))?;
    if sign_at <= DATE_LEN {
        return None;
    }
    let digits = &value[sign_at + 1..];
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits, "00"),
        4 => digits.split_at(2),
        _ => return None,
    };
    Some(format!("{}{}{}:{}", &value[..sign_at], sign, hours, minutes))
}
