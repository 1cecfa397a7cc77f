//! 分块扫描引擎（流式读取，块间回退以覆盖跨块命中）
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use tracing::trace;

use crate::error::ScanError;
use crate::matches::Match;
use crate::pattern::Pattern;

/// 分块扫描单个文件
/// - 每块读取 `chunk_size` 字节（不小于模式长度），处理完后回退 `len(pattern) - 1` 字节，
///   使上一块末尾与下一块开头可以联合匹配
/// - 记录上一次命中的结束位置，回退区域内不会重新报告与之重叠的命中，
///   因此结果与整文件扫描逐一相同
/// - `carve_len > 0` 时，若当前块内命中之后的字节不足，单独补读 `[offset, offset + carve_len)`
pub fn scan_file_streaming(
    path: &Path,
    file_name: &str,
    pattern: &Pattern,
    chunk_size: usize,
    carve_len: usize,
    emit: &mut dyn FnMut(Match),
) -> Result<(), ScanError> {
    let mut file = File::open(path).map_err(|e| ScanError::io(path, e))?;
    let file_size = file.metadata().map_err(|e| ScanError::io(path, e))?.len();

    let plen = pattern.len();
    let chunk_size = chunk_size.max(plen);
    let name: Arc<str> = Arc::from(file_name);

    let mut chunk_start: u64 = 0; // 当前块在文件中的起始偏移
    let mut resume_at: u64 = 0; // 上一个命中的结束偏移（下一次搜索不早于此处）

    // 剩余未读字节少于模式长度时不可能再命中
    while file_size.saturating_sub(chunk_start) >= plen as u64 {
        let chunk = read_at(&mut file, file_size, chunk_start, chunk_size).map_err(|e| ScanError::io(path, e))?;
        let n = chunk.len();
        if n < plen {
            break;
        }
        trace!(file = file_name, chunk_start, n, "chunk");
        let window: Arc<[u8]> = Arc::from(chunk);

        let mut at = resume_at.saturating_sub(chunk_start) as usize;
        while let Some(idx) = pattern.find_at(&window, at) {
            let offset = chunk_start + idx as u64;
            let m = if carve_len > 0 && n - idx < carve_len {
                // 块内尾随字节不足，补读独立窗口
                let stitched = read_at(&mut file, file_size, offset, carve_len).map_err(|e| ScanError::io(path, e))?;
                Match { file_name: Arc::clone(&name), offset, window: Arc::from(stitched), window_start: offset }
            } else {
                Match { file_name: Arc::clone(&name), offset, window: Arc::clone(&window), window_start: chunk_start }
            };
            emit(m);
            at = idx + plen;
            resume_at = offset + plen as u64;
        }

        // 已读到文件末尾
        if n < chunk_size || chunk_start + n as u64 >= file_size {
            break;
        }
        chunk_start += (n - (plen - 1)) as u64;
    }
    Ok(())
}

/// 从 `offset` 开始最多读取 `len` 字节（遇到 EOF 提前结束）
/// 预分配按文件剩余字节截断，`len` 可能来自用户输入（任意大）
fn read_at(file: &mut File, file_size: u64, offset: u64, len: usize) -> std::io::Result<Vec<u8>> {
    file.seek(SeekFrom::Start(offset))?;
    let want = (len as u64).min(file_size.saturating_sub(offset));
    let mut buf = Vec::with_capacity(want as usize);
    file.by_ref().take(want).read_to_end(&mut buf)?;
    Ok(buf)
}
