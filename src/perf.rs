use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;
use std::time::Instant;

static PERF_ENABLED: AtomicBool = AtomicBool::new(true);
static PERF_INIT: Once = Once::new();

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 读取性能日志开关（只读取一次）
///
/// 开关：
/// - 默认开启
/// - `RBTCS_PERF=0` 关闭
fn perf_enabled() -> bool {
    PERF_INIT.call_once(|| {
        if let Ok(v) = std::env::var("RBTCS_PERF") {
            PERF_ENABLED.store(is_true(&v), Ordering::Relaxed);
        }
    });
    PERF_ENABLED.load(Ordering::Relaxed)
}

/// 性能统计 Guard：离开作用域时记录 elapsed_ms
///
/// 使用方式：
/// ```ignore
/// let _perf = rbtcs::perf::PerfGuard::new("selection_run");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            start: Instant::now(),
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        if !perf_enabled() {
            return;
        }
        let elapsed_ms = self.start.elapsed().as_millis() as u64;

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            "done"
        );
    }
}
