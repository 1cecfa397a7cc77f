//! 配置文件加载（TOML）
use anyhow::{Context, Result};
use std::path::Path;

use crate::options::ScanOptions;

/// 从 TOML 文件加载扫描选项；未出现的字段取默认值
/// ```toml
/// concurrency = 8
/// carve_len = 512
/// carve_ext = "bin"
/// strategy = "streaming"
/// ```
pub fn load_options(path: &Path) -> Result<ScanOptions> {
    let txt = std::fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let opts: ScanOptions = toml::from_str(&txt).with_context(|| format!("parse config {}", path.display()))?;
    Ok(opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{OutputFormat, ReadStrategy};
    use std::io::Write;

    #[test]
    fn loads_partial_config() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "concurrency = 8\ncarve_len = 16\nstrategy = \"whole\"\nformat = \"json\"").unwrap();
        let o = load_options(f.path()).unwrap();
        assert_eq!(o.concurrency, 8);
        assert_eq!(o.carve_len, 16);
        assert_eq!(o.strategy, ReadStrategy::WholeFile);
        assert_eq!(o.format, OutputFormat::Json);
        assert_eq!(o.carve_ext, "dat");
    }

    #[test]
    fn unknown_strategy_is_an_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "strategy = \"mmap\"").unwrap();
        assert!(load_options(f.path()).is_err());
    }
}
