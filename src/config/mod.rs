//! 函数的配置模块。
//!
//! 该模块负责从环境变量加载和管理配置。所有读取都经过 [`EnvSource`]，
//! 调用方可以注入自己的环境来源而不必修改进程环境。

use std::collections::HashMap;
use std::env;

use crate::error::WriterError;
use crate::writer::KeyFormat;

/// 存储桶名称环境变量（只检查是否存在）
pub const BUCKET_NAME_VAR: &str = "S3_BUCKET_NAME";

/// 本地调试开关环境变量
pub const DEBUG_MODE_VAR: &str = "DEBUG_MODE";

/// 对象键时间格式环境变量
pub const KEY_TIME_FORMAT_VAR: &str = "KEY_TIME_FORMAT";

/// S3 兼容服务的端点覆盖
pub const S3_ENDPOINT_VAR: &str = "S3_ENDPOINT";

/// S3 区域覆盖
pub const S3_REGION_VAR: &str = "S3_REGION";

/// 本地调用服务器的监听地址
pub const LOCAL_INVOKE_ADDR_VAR: &str = "LOCAL_INVOKE_ADDR";

/// 环境变量来源。
pub trait EnvSource: Send + Sync {
    /// 读取一个变量，不存在时返回 `None`。
    fn var(&self, key: &str) -> Option<String>;
}

/// 真实的进程环境。
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// 每次调用时从环境读取的配置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// 配置的存储桶名称。只用于前置检查，不参与目标存储桶的选择。
    pub bucket_name: String,
    /// 对象键使用的时间格式
    pub key_format: KeyFormat,
}

impl Config {
    /// 从给定的环境来源加载配置。
    ///
    /// # 参数
    ///
    /// * `source` - 环境变量来源。
    ///
    /// # 返回值
    ///
    /// 加载好的 `Config`。
    ///
    /// # Errors
    ///
    /// `S3_BUCKET_NAME` 未设置时返回 `WriterError::MissingConfig`；
    /// `KEY_TIME_FORMAT` 无法识别时返回 `WriterError::InvalidConfig`。
    pub fn from_source(source: &dyn EnvSource) -> Result<Self, WriterError> {
        let bucket_name = source
            .var(BUCKET_NAME_VAR)
            .ok_or(WriterError::MissingConfig(BUCKET_NAME_VAR))?;

        let key_format = match source.var(KEY_TIME_FORMAT_VAR) {
            Some(raw) => raw.parse::<KeyFormat>()?,
            None => KeyFormat::default(),
        };

        Ok(Self {
            bucket_name,
            key_format,
        })
    }
}

/// `DEBUG_MODE` 是否等于字面量 `"true"`。
pub fn debug_mode(source: &dyn EnvSource) -> bool {
    source.var(DEBUG_MODE_VAR).as_deref() == Some("true")
}

/// 构建 S3 客户端所需的可选覆盖项。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct S3Settings {
    pub endpoint: Option<String>,
    pub region: Option<String>,
}

impl S3Settings {
    pub fn from_source(source: &dyn EnvSource) -> Self {
        Self {
            endpoint: source.var(S3_ENDPOINT_VAR).filter(|v| !v.is_empty()),
            region: source.var(S3_REGION_VAR).filter(|v| !v.is_empty()),
        }
    }
}
