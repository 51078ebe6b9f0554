// crates/td_io/src/error.rs

//! 交换层错误类型
//!
//! 交换层内部使用专用错误枚举，所有错误可转换为 TdError
//! 以实现跨层传递。

use td_foundation::TdError;
use thiserror::Error;

/// 交换层结果类型别名
pub type IoResult<T> = Result<T, IoError>;

/// 交换层错误枚举
#[derive(Error, Debug)]
pub enum IoError {
    /// 文件读写失败
    #[error("文件读写失败: {path}: {source}")]
    File {
        /// 出错的文件路径
        path: String,
        /// 底层 IO 错误
        #[source]
        source: std::io::Error,
    },

    /// 解析错误
    #[error("文件解析错误: {file}:{line} - {message}")]
    ParseError {
        /// 文件名
        file: String,
        /// 行号（从 1 开始）
        line: usize,
        /// 错误说明
        message: String,
    },

    /// JSON 序列化/反序列化失败
    #[error("JSON 处理失败: {0}")]
    Json(#[from] serde_json::Error),

    /// 基础层错误转换
    #[error("基础层错误: {0}")]
    Foundation(#[from] TdError),
}

impl IoError {
    /// 绑定路径的文件错误
    pub fn file(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }

    /// 绑定位置的解析错误
    pub fn parse(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            file: file.into(),
            line,
            message: message.into(),
        }
    }
}

impl From<IoError> for TdError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::File { path, source } => {
                TdError::io_with_source(format!("文件读写失败: {path}"), source)
            }
            IoError::ParseError { file, line, message } => {
                TdError::parse(file, line, message)
            }
            IoError::Json(e) => TdError::serialization(e.to_string()),
            IoError::Foundation(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_to_foundation_error() {
        let err = IoError::parse("a.tsv", 3, "坐标个数不对");
        let td: TdError = err.into();
        assert!(matches!(td, TdError::ParseError { line: 3, .. }));
    }
}
