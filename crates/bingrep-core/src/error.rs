//! 错误类型（扫描 / 切割）
use std::path::{Path, PathBuf};

use thiserror::Error;

/// 扫描阶段的错误
/// - 启动期错误（模式为空、十六进制非法、配置非法）由调用方视为致命
/// - 文件级错误（打开/读取失败）只影响对应文件，由结果管线收集
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("pattern must not be empty")]
    EmptyPattern,

    #[error("invalid hex pattern: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("permission denied: {}", .path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file not found: {}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl ScanError {
    /// 附带路径的 I/O 错误，常见的两类单独归类
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path, source },
            std::io::ErrorKind::NotFound => Self::NotFound { path, source },
            _ => Self::Io { path, source },
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig { message: message.into() }
    }
}

/// 切割阶段的错误（只影响单个命中）
#[derive(Debug, Error)]
pub enum CarveError {
    /// 命中之后可用的字节不足 carve_len（通常是文件结尾）
    #[error("only {available} of {wanted} bytes available after match")]
    Truncated { available: usize, wanted: usize },

    #[error("cannot write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
