//! 切割：把命中位置起的固定长度字节写入独立文件
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::CarveError;
use crate::matches::Match;

/// 写出 `<out_dir>/<文件名>-<偏移>.<ext>`，内容为命中位置起的 `carve_len` 字节
/// - 窗口内字节不足时返回 `CarveError::Truncated`，不写任何文件
/// - 同名文件直接覆盖
pub fn carve(m: &Match, carve_len: usize, ext: &str, out_dir: &Path) -> Result<PathBuf, CarveError> {
    let trailing = m.trailing();
    if trailing.len() < carve_len {
        return Err(CarveError::Truncated { available: trailing.len(), wanted: carve_len });
    }
    let payload = &trailing[..carve_len];

    let path = out_dir.join(carve_file_name(m.file_name(), m.offset(), ext));
    let io_err = |source| CarveError::Io { path: path.clone(), source };

    let file = File::create(&path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(payload).map_err(io_err)?;
    writer.flush().map_err(io_err)?;
    Ok(path)
}

pub(crate) fn carve_file_name(file_name: &str, offset: u64, ext: &str) -> String {
    format!("{}-{}.{}", file_name, offset, ext)
}
