//! 触发事件的负载模型。
//!
//! 事件只用于日志，任何字段都可能缺失，读取时不会失败。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 触发日志分支的 `Message` 取值
pub const CLOUDWATCH_LAUNCH: &str = "CloudWatch Launch!";

/// 调用方传入的事件负载
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LaunchEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
}

impl LaunchEvent {
    /// 从任意 JSON 值中提取已知字段。
    ///
    /// 非对象的值，或类型不是字符串的字段，都按缺失处理。
    ///
    /// # 参数
    ///
    /// * `value` - 原始事件负载。
    ///
    /// # 返回值
    ///
    /// `null` 返回 `None`，其余情况返回 `Some(LaunchEvent)`。
    pub fn from_value(value: &Value) -> Option<Self> {
        if value.is_null() {
            return None;
        }

        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Some(Self {
            message: field("Message"),
            name: field("Name"),
            bucket_name: field("BucketName"),
        })
    }

    /// 是否为 CloudWatch 启动事件。
    pub fn is_cloudwatch_launch(&self) -> bool {
        self.message.as_deref() == Some(CLOUDWATCH_LAUNCH)
    }
}
