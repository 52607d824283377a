//! 存储操作的错误类型

use aws_sdk_s3::{
    error::SdkError,
    operation::{list_buckets::ListBucketsError, put_object::PutObjectError},
};
use thiserror::Error;

/// 存储操作的结果类型
pub type StorageResult<T> = Result<T, StorageError>;

/// 存储操作中可能出现的错误
#[derive(Error, Debug)]
pub enum StorageError {
    /// 列出存储桶失败
    #[error("failed to list buckets: {0}")]
    List(String),

    /// 写入对象失败
    #[error("failed to put object {bucket}/{key}: {message}")]
    Put {
        bucket: String,
        key: String,
        message: String,
    },

    /// 请求发出前的 SDK 错误（构建、凭证、网络等）
    #[error("AWS SDK error: {0}")]
    Sdk(String),
}

impl From<SdkError<ListBucketsError>> for StorageError {
    fn from(error: SdkError<ListBucketsError>) -> Self {
        match error {
            SdkError::ServiceError(err) => StorageError::List(err.err().to_string()),
            _ => StorageError::Sdk(error.to_string()),
        }
    }
}

impl StorageError {
    /// 把 `PutObject` 的 SDK 错误附上目标位置。
    pub fn put(bucket: &str, key: &str, error: SdkError<PutObjectError>) -> Self {
        let message = match error {
            SdkError::ServiceError(err) => err.err().to_string(),
            other => other.to_string(),
        };
        StorageError::Put {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message,
        }
    }
}
