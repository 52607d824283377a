use chrono::{DateTime, TimeZone};
use std::fmt;
use std::str::FromStr;

use crate::config::KEY_TIME_FORMAT_VAR;
use crate::error::WriterError;

/// 对象键的固定后缀
pub const KEY_EXTENSION: &str = ".txt";

/// 对象内容的前缀
pub const GREETING_PREFIX: &str = "Hello from ";

/// 对象键中时间戳的格式。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyFormat {
    /// `2024-03-05-14-07-09`
    #[default]
    Dashed,
    /// `2024-03-05-02:07:09-PM`
    Clock12h,
}

impl KeyFormat {
    /// 该格式对应的 strftime 模式
    pub fn pattern(self) -> &'static str {
        match self {
            Self::Dashed => "%Y-%m-%d-%H-%M-%S",
            Self::Clock12h => "%Y-%m-%d-%I:%M:%S-%p",
        }
    }

    /// 按该格式格式化时间。
    pub fn format<Tz>(self, time: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        time.format(self.pattern()).to_string()
    }
}

impl FromStr for KeyFormat {
    type Err = WriterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dashed" => Ok(Self::Dashed),
            "12h" => Ok(Self::Clock12h),
            _ => Err(WriterError::InvalidConfig {
                var: KEY_TIME_FORMAT_VAR,
                value: s.to_string(),
            }),
        }
    }
}

/// 由时间戳生成对象键。
pub fn object_key(timestamp: &str) -> String {
    format!("{timestamp}{KEY_EXTENSION}")
}

/// 生成写入对象的内容。
///
/// # 参数
///
/// * `bucket` - 选中的存储桶名称。
/// * `timestamp` - 与对象键相同的时间戳。
pub fn greeting_body(bucket: &str, timestamp: &str) -> String {
    format!("{GREETING_PREFIX}{bucket} - current time is {timestamp}")
}
