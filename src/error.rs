//! 写入流程的错误类型

use thiserror::Error;

use crate::s3::StorageError;

/// 缺少必需配置时的进程退出码
pub const MISSING_CONFIG_EXIT_CODE: i32 = 1;

/// 其余未处理错误的进程退出码
pub const UNHANDLED_EXIT_CODE: i32 = 2;

/// 写入流程中可能出现的错误
#[derive(Error, Debug)]
pub enum WriterError {
    /// 必需的环境变量未设置。唯一被显式处理的错误。
    #[error("{0} is not set")]
    MissingConfig(&'static str),

    /// 环境变量的值无法识别
    #[error("invalid value for {var}: {value}")]
    InvalidConfig { var: &'static str, value: String },

    /// 账户下没有任何存储桶，无法选择第一个
    #[error("bucket listing is empty")]
    NoBuckets,

    /// 存储服务调用失败
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl WriterError {
    /// 是否属于缺少配置的情况。
    pub fn is_missing_config(&self) -> bool {
        matches!(self, Self::MissingConfig(_))
    }

    /// 该错误对应的进程退出码。
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingConfig(_) => MISSING_CONFIG_EXIT_CODE,
            // 其余错误不做处理，按未处理错误的方式退出
            _ => UNHANDLED_EXIT_CODE,
        }
    }
}
