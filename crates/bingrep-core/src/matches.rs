//! 命中项（内部产生，结果管线消费）
use serde::Serialize;
use std::sync::Arc;

/// 单次命中
/// - `window` 是包含命中位置的字节窗口（分块、整文件缓冲或补读窗口）
/// - 扫描器保证启用切割时窗口在命中之后至少保留 carve_len 字节（文件结尾除外）
#[derive(Debug, Clone)]
pub struct Match {
    pub(crate) file_name: Arc<str>,
    pub(crate) offset: u64,
    pub(crate) window: Arc<[u8]>,
    /// 窗口首字节在文件中的偏移
    pub(crate) window_start: u64,
}

impl Match {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// 从命中位置到窗口末尾的字节
    pub fn trailing(&self) -> &[u8] {
        let rel = (self.offset - self.window_start) as usize;
        &self.window[rel..]
    }

    pub(crate) fn record(&self) -> MatchRecord<'_> {
        MatchRecord { file: &self.file_name, offset: self.offset }
    }
}

/// JSON 输出项
#[derive(Debug, Serialize)]
pub(crate) struct MatchRecord<'a> {
    pub(crate) file: &'a str,
    pub(crate) offset: u64,
}
