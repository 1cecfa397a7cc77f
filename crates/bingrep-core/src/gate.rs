//! 准入闸门：限制同时处于读取/搜索阶段的文件数
use crossbeam_channel as channel;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 容量为 K 的计数闸门（基于预先填满 K 个令牌的有界通道）
/// - `acquire` 取走一个令牌，令牌耗尽时阻塞
/// - `Permit` 在 drop 时归还令牌，出错或 panic 展开时同样归还
pub struct AdmissionGate {
    tokens_tx: channel::Sender<()>,
    tokens_rx: channel::Receiver<()>,
    capacity: usize,
    active: AtomicUsize,
    peak: AtomicUsize,
}

/// 持有期间占用一个准入名额
pub struct Permit<'a> {
    gate: &'a AdmissionGate,
}

impl AdmissionGate {
    /// 容量至少为 1（为 0 时永远无法进入）
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tokens_tx, tokens_rx) = channel::bounded(capacity);
        for _ in 0..capacity {
            let _ = tokens_tx.try_send(());
        }
        Self { tokens_tx, tokens_rx, capacity, active: AtomicUsize::new(0), peak: AtomicUsize::new(0) }
    }

    pub fn acquire(&self) -> Permit<'_> {
        // 两端都由闸门自身持有，recv 不会因通道断开而失败
        let _ = self.tokens_rx.recv();
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        Permit { gate: self }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// 运行期间观测到的最大并发数
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.gate.active.fetch_sub(1, Ordering::SeqCst);
        let _ = self.gate.tokens_tx.send(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn bounds_concurrent_holders() {
        let gate = AdmissionGate::new(3);
        thread::scope(|s| {
            for _ in 0..12 {
                s.spawn(|| {
                    let _p = gate.acquire();
                    assert!(gate.active() <= 3);
                    thread::sleep(Duration::from_millis(5));
                });
            }
        });
        assert_eq!(gate.active(), 0);
        assert!(gate.peak() >= 1 && gate.peak() <= 3);
    }

    #[test]
    fn permit_released_on_panic() {
        let gate = AdmissionGate::new(1);
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _p = gate.acquire();
            panic!("scan blew up");
        }));
        assert!(res.is_err());
        assert_eq!(gate.active(), 0);
        // 名额已归还，可以再次进入
        let _p = gate.acquire();
        assert_eq!(gate.active(), 1);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let gate = AdmissionGate::new(0);
        assert_eq!(gate.capacity(), 1);
        drop(gate.acquire());
    }
}
