//! 输入文件解析：`~` 展开 + glob 匹配
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// 将开头的 `~` 替换为用户主目录（优先 `dirs::home_dir`，退回 `$HOME`）
pub(crate) fn expand_home(pattern: &str, home: Option<&Path>) -> String {
    match (pattern.strip_prefix('~'), home) {
        (Some(rest), Some(home)) => format!("{}{}", home.display(), rest),
        _ => pattern.to_string(),
    }
}

pub(crate) fn home_dir() -> Option<PathBuf> {
    dirs::home_dir().or_else(|| std::env::var_os("HOME").map(PathBuf::from))
}

/// 解析文件 glob；无匹配不是错误，非普通文件（目录等）跳过
pub(crate) fn resolve_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let expanded = expand_home(pattern, home_dir().as_deref());
    let mut files = Vec::new();
    for entry in glob::glob(&expanded).with_context(|| format!("invalid file glob {:?}", expanded))? {
        let path = match entry { Ok(p) => p, Err(e) => { debug!(error = %e, "skipping unreadable glob entry"); continue; } };
        if path.is_file() { files.push(path); }
    }
    debug!(pattern = %expanded, files = files.len(), "resolved input files");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_leading_tilde_only() {
        let home = Path::new("/home/user");
        assert_eq!(expand_home("~/dumps/*.bin", Some(home)), "/home/user/dumps/*.bin");
        assert_eq!(expand_home("/data/~x/*.bin", Some(home)), "/data/~x/*.bin");
        assert_eq!(expand_home("~/a", None), "~/a");
    }

    #[test]
    fn resolves_files_and_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.bin"), b"x").unwrap();
        std::fs::write(dir.path().join("b.bin"), b"y").unwrap();
        std::fs::create_dir(dir.path().join("c.bin")).unwrap();
        std::fs::write(dir.path().join("note.txt"), b"z").unwrap();

        let mut files = resolve_files(&format!("{}/*.bin", dir.path().display())).unwrap();
        files.sort();
        assert_eq!(files, vec![dir.path().join("a.bin"), dir.path().join("b.bin")]);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let files = resolve_files(&format!("{}/*.nothing", dir.path().display())).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn malformed_glob_is_an_error() {
        assert!(resolve_files("[unclosed").is_err());
    }
}
