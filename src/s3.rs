//! S3模块
//!
//! 该模块负责处理与S3存储桶的交互，包括客户端配置、存储桶列表和对象写入。

// 声明子模块
pub mod config;
pub mod error;
pub mod store;

// 重新导出常用的类型
pub use config::create_s3_client;
pub use error::{StorageError, StorageResult};
pub use store::{BucketSummary, ObjectStore, S3Store};

#[cfg(test)]
pub use store::MockObjectStore;
