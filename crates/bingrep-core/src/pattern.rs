//! 搜索模式：一次运行只有一个字面字节序列
use memchr::memmem::Finder;

use crate::error::ScanError;

/// 不可变、非空的字节模式，内部预编译 memmem 查找器供所有扫描任务共享
#[derive(Debug, Clone)]
pub struct Pattern {
    finder: Finder<'static>,
}

impl Pattern {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, ScanError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(ScanError::EmptyPattern);
        }
        Ok(Self { finder: Finder::new(&bytes).into_owned() })
    }

    /// 从十六进制字符串解析（容忍首尾空白与 0x 前缀）
    pub fn from_hex(s: &str) -> Result<Self, ScanError> {
        let s = s.trim();
        let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        if s.is_empty() {
            return Err(ScanError::EmptyPattern);
        }
        Self::new(hex::decode(s)?)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.finder.needle()
    }

    pub fn len(&self) -> usize {
        self.finder.needle().len()
    }

    /// 总是 false；为配合 `len` 保留
    pub fn is_empty(&self) -> bool {
        false
    }

    /// 从 `at` 开始查找下一个命中，返回相对 `haystack` 起点的下标
    pub(crate) fn find_at(&self, haystack: &[u8], at: usize) -> Option<usize> {
        if at >= haystack.len() {
            return None;
        }
        self.finder.find(&haystack[at..]).map(|i| i + at)
    }
}
