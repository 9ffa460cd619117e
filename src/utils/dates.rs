//! 日期工具
//!
//! 线上格式固定为 `YYYY-MM-DD`。服务端返回的日期可能带时间部分，
//! 读取时只取日期。

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

use crate::errors::{ConsoleError, Result};

pub const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

/// 格式化为线上日期格式
pub fn format_wire_date(date: NaiveDate) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}

/// 解析服务端返回的日期
///
/// 支持 `2024-09-01`、`2024-09-01T00:00:00.000Z`、`2024-09-01 08:00:00`。
pub fn parse_wire_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, WIRE_DATE_FORMAT) {
        return Some(date);
    }
    // 只取前 10 个字符的日期部分，避免时区换算造成日期偏移
    value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, WIRE_DATE_FORMAT).ok())
}

/// 解析用户输入的日期
pub fn parse_input_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    for format in [WIRE_DATE_FORMAT, "%Y/%m/%d", "%Y.%m.%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.date_naive());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(datetime.date());
    }
    Err(ConsoleError::date_parse(format!(
        "'{value}' is not a valid date (expected YYYY-MM-DD)"
    )))
}

/// 必填日期字段的序列化
pub mod wire {
    use super::*;

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_wire_date(*date))
    }
}

/// 可选日期字段的序列化与宽松反序列化
pub mod wire_opt {
    use super::*;

    pub fn serialize<S>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&format_wire_date(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_wire_date))
    }
}
