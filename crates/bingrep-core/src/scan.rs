//! 扫描主流程与并行调度
use anyhow::{anyhow, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::carve::carve;
use crate::engine_chunked::scan_file_streaming;
use crate::engine_whole::scan_file_whole;
use crate::error::ScanError;
use crate::gate::AdmissionGate;
use crate::matches::Match;
use crate::options::{CarveFailure, FileFailure, OutputFormat, ReadStrategy, ScanOptions, ScanStats};
use crate::pattern::Pattern;

/// 小文件阈值（字节）。Auto 策略下小文件整读，超出则分块扫描。
pub(crate) const SMALL_FILE_MAX: u64 = 1024 * 1024; // 1 MiB

/// 结果管线的通道容量；写出端拥塞时扫描端阻塞
const PIPELINE_CAPACITY: usize = 256;

/// 扫描任务 → 结果管线 的消息（"searching" 提示另走无界通道，不受拥塞影响）
enum Event {
    Found(Match),
    Failed(FileFailure),
    Finished(PathBuf),
}

/// 报告中使用的短文件名（basename）
pub(crate) fn short_name(path: &Path) -> String {
    match path.file_name() {
        Some(s) => s.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}

/// 按选项中的读取策略扫描单个文件，命中按偏移升序回调
pub fn scan_file(path: &Path, pattern: &Pattern, opts: &ScanOptions, emit: &mut dyn FnMut(Match)) -> Result<(), ScanError> {
    let file_name = short_name(path);
    let whole = match opts.strategy {
        ReadStrategy::WholeFile => true,
        ReadStrategy::Streaming => false,
        ReadStrategy::Auto => std::fs::metadata(path).map_err(|e| ScanError::io(path, e))?.len() <= SMALL_FILE_MAX,
    };
    if whole {
        scan_file_whole(path, &file_name, pattern, emit)
    } else {
        scan_file_streaming(path, &file_name, pattern, opts.chunk_size, opts.carve_len, emit)
    }
}

/// 并行扫描所有文件，并由当前线程作为唯一写出端输出命中
/// - `out`：命中报告（每条一行）
/// - `diag`：诊断信息（"searching ..."、单文件错误、切割错误），写失败时忽略
///
/// 单个文件或单次切割失败不会中断整个运行，而是记录在返回的统计信息中。
pub fn scan_and_report(
    files: &[PathBuf],
    pattern: &Pattern,
    opts: &ScanOptions,
    out: &mut dyn Write,
    diag: &mut dyn Write,
) -> Result<ScanStats> {
    use crossbeam_channel as channel;
    use rayon::prelude::*;

    opts.validate()?;

    let mut stats = ScanStats { files_total: files.len(), ..Default::default() };
    if files.is_empty() {
        return Ok(stats);
    }

    let (tx, rx) = channel::bounded::<Event>(PIPELINE_CAPACITY);
    let (notice_tx, notice_rx) = channel::unbounded::<PathBuf>();

    let gate = Arc::new(AdmissionGate::new(opts.concurrency));
    let pattern = Arc::new(pattern.clone());
    let scan_opts = Arc::new(opts.clone());
    let files_vec: Vec<PathBuf> = files.to_vec();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.worker_threads())
        .thread_name(|i| format!("bingrep-worker-{}", i))
        .build()?;

    debug!(files = files.len(), concurrency = opts.concurrency, threads = pool.current_num_threads(), "starting scan");

    // 扫描在后台线程的 Rayon 线程池中执行；Writer 保持在当前线程
    let scan_gate = Arc::clone(&gate);
    let scan_thread = std::thread::spawn(move || {
        pool.install(|| {
            files_vec.par_iter().for_each_with((tx, notice_tx), |(tx, notice_tx), path| {
                // 闸门限制的是扫描主体，不是任务创建
                let _permit = scan_gate.acquire();
                let _ = notice_tx.send(path.clone());
                let res = scan_file(path, &pattern, &scan_opts, &mut |m| {
                    let _ = tx.send(Event::Found(m));
                });
                let _ = match res {
                    Ok(()) => tx.send(Event::Finished(path.clone())),
                    Err(error) => tx.send(Event::Failed(FileFailure { path: path.clone(), error })),
                };
            });
        });
        // 结束后 Sender 全部被丢弃，Receiver 将收到关闭信号
    });

    let drained = drain(&rx, notice_rx, opts, out, diag, &mut stats);
    drop(rx);

    if scan_thread.join().is_err() {
        return Err(anyhow!("scan worker panicked"));
    }
    drained?;

    out.flush()?;
    stats.peak_concurrency = gate.peak();
    debug!(
        scanned = stats.files_scanned,
        failed = stats.files_failed,
        matches = stats.matches,
        carved = stats.carved,
        "scan finished"
    );
    Ok(stats)
}

/// 唯一消费者：依次写出命中，启用时同步切割；结果通道关闭且排空后返回
/// 同一任务先发提示再发结果，所以每处理一条结果前先冲刷已到达的提示，
/// 保证该文件的 "searching" 行出现在其结果之前
fn drain(
    rx: &crossbeam_channel::Receiver<Event>,
    notices: crossbeam_channel::Receiver<PathBuf>,
    opts: &ScanOptions,
    out: &mut dyn Write,
    diag: &mut dyn Write,
    stats: &mut ScanStats,
) -> Result<()> {
    while let Ok(event) = rx.recv() {
        for path in notices.try_iter() {
            write_notice(diag, &path);
        }
        handle_event(event, opts, out, diag, stats)?;
    }
    for path in notices.try_iter() {
        write_notice(diag, &path);
    }
    Ok(())
}

fn write_notice(diag: &mut dyn Write, path: &Path) {
    let _ = writeln!(diag, "searching {}...", path.display());
}

fn handle_event(event: Event, opts: &ScanOptions, out: &mut dyn Write, diag: &mut dyn Write, stats: &mut ScanStats) -> Result<()> {
    match event {
        Event::Found(m) => {
            stats.matches += 1;
            write_match(out, &m, opts.format)?;
            if opts.carving() {
                match carve(&m, opts.carve_len, &opts.carve_ext, &opts.out_dir) {
                    Ok(path) => {
                        stats.carved += 1;
                        debug!(path = %path.display(), "carved");
                    }
                    Err(error) => {
                        warn!(file = m.file_name(), offset = m.offset(), %error, "carve failed");
                        let _ = writeln!(diag, "carve failed: {}:{}: {}", m.file_name(), m.offset(), error);
                        stats.carve_failures.push(CarveFailure { file_name: m.file_name().to_string(), offset: m.offset(), error });
                    }
                }
            }
        }
        Event::Failed(failure) => {
            warn!(path = %failure.path.display(), error = %failure.error, "scan failed");
            // 错误本身已带路径
            let _ = writeln!(diag, "error: {}", failure.error);
            stats.files_failed += 1;
            stats.failures.push(failure);
        }
        Event::Finished(path) => {
            debug!(path = %path.display(), "file done");
            stats.files_scanned += 1;
        }
    }
    Ok(())
}

fn write_match(out: &mut dyn Write, m: &Match, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => writeln!(out, "{}:{}", m.file_name(), m.offset())?,
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, &m.record())?;
            writeln!(out)?;
        }
    }
    Ok(())
}
