//! 二进制模式扫描库
//!
//! 设计要点：
//! - 每次运行只搜索一个字面字节序列（`Pattern`），按非重叠前向扫描报告每个命中的偏移。
//! - 单文件扫描支持整读与分块两种方式，两者结果逐一相同；分块时块间回退以覆盖跨块命中。
//! - 多文件并行：Rayon 线程池 + 容量为 K 的准入闸门限制同时扫描的文件数。
//! - 所有命中汇入唯一的写出端，串行输出 `<文件名>:<偏移>` 并按需切割。
//! - 单文件 / 单次切割的错误只影响自身，收集在 `ScanStats` 中。

mod carve;
mod config;
mod engine_chunked;
mod engine_whole;
mod error;
mod gate;
mod matches;
mod options;
mod pattern;
mod scan;

pub use carve::carve;
pub use config::load_options;
pub use engine_chunked::scan_file_streaming;
pub use engine_whole::scan_file_whole;
pub use error::{CarveError, ScanError};
pub use gate::{AdmissionGate, Permit};
pub use matches::Match;
pub use options::{
    CarveFailure, FileFailure, OutputFormat, ReadStrategy, ScanOptions, ScanStats, DEFAULT_CHUNK_SIZE,
    DEFAULT_CONCURRENCY,
};
pub use pattern::Pattern;
pub use scan::{scan_and_report, scan_file};
