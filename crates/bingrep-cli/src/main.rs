use anyhow::{Context, Result};
use bingrep_core::{load_options, scan_and_report, OutputFormat, Pattern, ReadStrategy, ScanOptions};
use clap::{CommandFactory, Parser, ValueEnum};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{info, warn};

mod inputs;

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(
    name = "binary-grep",
    version,
    about = "在文件中搜索二进制字节序列，可按命中位置切割数据",
    override_usage = "binary-grep [OPTIONS] <HEX_PATTERN> <FILE_GLOB>"
)]
struct Cli {
    /// 十六进制字节模式，例如 1122 或 0xCAFEBABE
    hex_pattern: String,

    /// 文件 glob，开头的 ~ 展开为用户主目录
    file_glob: String,

    /// 每个命中切割的字节数（0 表示不切割）
    #[arg(long)]
    carve_len: Option<usize>,

    /// 切割文件扩展名
    #[arg(long)]
    carve_ext: Option<String>,

    /// 同时扫描的文件数上限
    #[arg(long)]
    concurrency: Option<usize>,

    /// 线程数（"auto"=CPU 核心数）
    #[arg(long)]
    threads: Option<String>,

    /// 读取策略
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// 分块读取的块大小（字节）
    #[arg(long)]
    chunk_size: Option<usize>,

    /// 切割文件输出目录
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// 命中输出格式
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// 配置文件（TOML），命令行参数优先
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Auto,
    Streaming,
    Whole,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

fn main() -> Result<()> {
    // 初始化日志（支持通过 RUST_LOG 控制等级，例如 info、debug）；写到 stderr，stdout 只留命中
    init_tracing();
    let cli = parse_cli();

    let opts = build_options(&cli)?;
    let pattern = Pattern::from_hex(&cli.hex_pattern).context("decode hex pattern")?;
    let files = inputs::resolve_files(&cli.file_glob)?;
    info!(files = files.len(), pattern_len = pattern.len(), "starting scan");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut diag = io::stderr();
    let stats = scan_and_report(&files, &pattern, &opts, &mut out, &mut diag).context("scan failed")?;
    out.flush().ok();

    if stats.files_failed > 0 || !stats.carve_failures.is_empty() {
        warn!(files_failed = stats.files_failed, carve_failures = stats.carve_failures.len(), "some work did not complete");
    }
    info!(
        files_scanned = stats.files_scanned,
        matches = stats.matches,
        carved = stats.carved,
        peak_concurrency = stats.peak_concurrency,
        "scan finished"
    );
    Ok(())
}

/// 缺少位置参数时把帮助打印到 stdout 并以 1 退出；其余解析错误交给 clap
fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == clap::error::ErrorKind::MissingRequiredArgument => {
            let _ = Cli::command().print_help();
            println!();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder().with_env_filter(env_filter).with_writer(io::stderr).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 配置文件提供默认值，命令行显式给出的参数覆盖之
fn build_options(cli: &Cli) -> Result<ScanOptions> {
    let mut opts = match &cli.config {
        Some(path) => load_options(path)?,
        None => ScanOptions::default(),
    };
    if let Some(n) = cli.carve_len { opts.carve_len = n; }
    if let Some(ext) = &cli.carve_ext { opts.carve_ext = ext.clone(); }
    if let Some(k) = cli.concurrency { opts.concurrency = k; }
    if let Some(t) = &cli.threads { opts.threads = parse_threads(t)?; }
    if let Some(s) = cli.strategy {
        opts.strategy = match s {
            StrategyArg::Auto => ReadStrategy::Auto,
            StrategyArg::Streaming => ReadStrategy::Streaming,
            StrategyArg::Whole => ReadStrategy::WholeFile,
        };
    }
    if let Some(n) = cli.chunk_size { opts.chunk_size = n; }
    if let Some(dir) = &cli.out_dir { opts.out_dir = dir.clone(); }
    if let Some(f) = cli.format {
        opts.format = match f {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        };
    }
    opts.validate()?;
    Ok(opts)
}

/// 解析线程参数："auto" 表示自动（None）
fn parse_threads(s: &str) -> Result<Option<usize>> {
    if s.eq_ignore_ascii_case("auto") { return Ok(None); }
    let n: usize = s.parse().with_context(|| format!("invalid --threads value {:?}", s))?;
    Ok(Some(n))
}
