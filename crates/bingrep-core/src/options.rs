//! 扫描选项与统计信息（模块）
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{CarveError, ScanError};

/// 读取策略
/// - Auto：小文件整读，大文件分块（阈值见 `SMALL_FILE_MAX`）
/// - Streaming：固定大小分块读取，块间回退 `len(pattern) - 1` 字节
/// - WholeFile：整文件读入内存（内存占用与文件大小成正比）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadStrategy {
    #[default]
    Auto,
    Streaming,
    #[serde(alias = "whole")]
    WholeFile,
}

/// 命中输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `<文件名>:<偏移>` 每行一条
    #[default]
    Text,
    /// 每行一个 JSON 对象 `{"file":..,"offset":..}`
    Json,
}

/// 扫描选项（运行期间只读）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// 同时处于读取/搜索阶段的文件数上限
    pub concurrency: usize,
    /// 工作线程数：None 表示自动（等于 CPU 核数）
    pub threads: Option<usize>,
    /// 每个命中切割的字节数；0 表示不切割
    pub carve_len: usize,
    /// 切割文件扩展名
    pub carve_ext: String,
    /// 切割文件输出目录
    pub out_dir: PathBuf,
    pub strategy: ReadStrategy,
    /// 分块读取的块大小（字节）
    pub chunk_size: usize,
    pub format: OutputFormat,
}

/// 分块读取默认块大小
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024; // 1 MiB
pub const DEFAULT_CONCURRENCY: usize = 4;

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            threads: None,
            carve_len: 0,
            carve_ext: "dat".to_string(),
            out_dir: PathBuf::from("."),
            strategy: ReadStrategy::Auto,
            chunk_size: DEFAULT_CHUNK_SIZE,
            format: OutputFormat::Text,
        }
    }
}

impl ScanOptions {
    pub fn carving(&self) -> bool {
        self.carve_len > 0
    }

    /// 启动前校验；非法配置属于致命错误
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.concurrency == 0 {
            return Err(ScanError::config("concurrency must be at least 1"));
        }
        if self.threads == Some(0) {
            return Err(ScanError::config("threads must be at least 1"));
        }
        if self.chunk_size == 0 {
            return Err(ScanError::config("chunk_size must be at least 1"));
        }
        if self.carving() && (self.carve_ext.is_empty() || self.carve_ext.contains(['/', '\\'])) {
            return Err(ScanError::config(format!("invalid carve extension {:?}", self.carve_ext)));
        }
        Ok(())
    }

    pub(crate) fn worker_threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get)
    }
}

/// 单个文件扫描失败（不影响其他文件）
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: ScanError,
}

/// 单个命中切割失败（不影响命中本身的输出）
#[derive(Debug)]
pub struct CarveFailure {
    pub file_name: String,
    pub offset: u64,
    pub error: CarveError,
}

/// 扫描统计信息（便于 CLI 打印）
#[derive(Debug, Default)]
pub struct ScanStats {
    pub files_total: usize,
    pub files_scanned: usize,
    pub files_failed: usize,
    pub matches: usize,
    pub carved: usize,
    /// 观测到的同时扫描文件数峰值
    pub peak_concurrency: usize,
    pub failures: Vec<FileFailure>,
    pub carve_failures: Vec<CarveFailure>,
}
