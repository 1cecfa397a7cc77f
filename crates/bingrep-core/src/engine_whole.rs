//! 整文件扫描引擎：一次读入内存后直接搜索
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use crate::error::ScanError;
use crate::matches::Match;
use crate::pattern::Pattern;

/// 整读单个文件并逐个回调命中
/// - 非重叠前向扫描：命中 `o` 之后从 `o + len(pattern)` 继续
/// - 所有命中共享同一个缓冲区，天然满足切割所需的尾随字节
pub fn scan_file_whole(path: &Path, file_name: &str, pattern: &Pattern, emit: &mut dyn FnMut(Match)) -> Result<(), ScanError> {
    let file = File::open(path).map_err(|e| ScanError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).map_err(|e| ScanError::io(path, e))?;

    let window: Arc<[u8]> = Arc::from(buf);
    let name: Arc<str> = Arc::from(file_name);

    let mut at = 0usize;
    while let Some(idx) = pattern.find_at(&window, at) {
        emit(Match { file_name: Arc::clone(&name), offset: idx as u64, window: Arc::clone(&window), window_start: 0 });
        at = idx + pattern.len();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn offsets(data: &[u8], pat: &[u8]) -> Vec<u64> {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(data).unwrap();
        let pattern = Pattern::new(pat.to_vec()).unwrap();
        let mut out = Vec::new();
        scan_file_whole(f.path(), "t", &pattern, &mut |m| out.push(m.offset())).unwrap();
        out
    }

    #[test]
    fn finds_every_occurrence() {
        assert_eq!(offsets(&[0x00, 0x11, 0x22, 0x33, 0x11, 0x22, 0x44], &[0x11, 0x22]), vec![1, 4]);
    }

    #[test]
    fn advances_by_pattern_length() {
        assert_eq!(offsets(b"aaaaa", b"aa"), vec![0, 2]);
        assert_eq!(offsets(b"ababa", b"aba"), vec![0]);
        assert_eq!(offsets(b"abaaba", b"aba"), vec![0, 3]);
    }

    #[test]
    fn absent_or_too_long_pattern_yields_nothing() {
        assert!(offsets(b"hello world", b"xyz").is_empty());
        assert!(offsets(b"ab", b"abc").is_empty());
        assert!(offsets(b"", b"a").is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let pattern = Pattern::new(b"a".to_vec()).unwrap();
        let res = scan_file_whole(Path::new("/definitely/not/here.bin"), "here.bin", &pattern, &mut |_| {});
        assert!(matches!(res, Err(ScanError::NotFound { .. })));
    }
}
