// ==========================================
// 风险测试选择系统 - 最优选择器（动态规划）
// ==========================================
// 职责: 对未被人工设定的用例求解 0/1 背包，使风险之和最大
// 输入: 用例列表（种子解析后）+ 剩余预算
// 输出: 风险覆盖率；候选用例标记为算法选中/未选中
// ==========================================
// 说明: 人工设定用例（选中/排除）与候选用例拆成两个按 id 有序的序列，
//       求解后按 id 归并，不依赖位置插回
// 红线: 表格规模超过上限或内存分配失败时返回 ResourceExhaustion，
//       不得静默截断
// ==========================================

use crate::domain::item::TestItem;
use crate::domain::types::SelectionState;
use crate::engine::coverage::risk_coverage_ratio;
use crate::engine::error::{EngineError, EngineResult};
use tracing::{debug, info, instrument};

// ==========================================
// OptimalSelector - 动态规划选择器
// ==========================================
pub struct OptimalSelector {
    max_cells: u64, // DP 表格单元数上限 (items + 1) × (budget + 1)
}

impl OptimalSelector {
    /// 构造函数
    ///
    /// # 参数
    /// - `max_cells`: DP 表格单元数上限，超过即视为资源耗尽
    pub fn new(max_cells: u64) -> Self {
        Self { max_cells }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行最优选择
    ///
    /// 规则:
    /// 1) 人工设定用例暂时移出候选集（其成本已在预算中扣除）
    /// 2) 对剩余候选求解 0/1 背包，容量 = budget
    /// 3) 仅当 best[i-1][j-cost] + risk 严格大于 best[i-1][j] 时选入（平局不选）
    /// 4) 候选与人工设定用例按 id 归并回原列表
    ///
    /// # 错误
    /// - `EngineError::ResourceExhaustion`: 表格规模超限/分配失败（列表保持原状态）
    /// - `EngineError::UndefinedRatio`: 风险之和为 0
    #[instrument(skip(self, items), fields(item_count = items.len()))]
    pub fn select(&self, items: &mut Vec<TestItem>, budget: u64) -> EngineResult<f64> {
        let all = std::mem::take(items);
        let (seeded, mut candidates): (Vec<TestItem>, Vec<TestItem>) =
            all.into_iter().partition(|item| item.state.is_seeded());

        // 无论求解成败，都必须归并回原列表
        let solved = self.solve(&mut candidates, budget);
        *items = merge_by_id(seeded, candidates);
        let selected = solved?;

        let ratio = risk_coverage_ratio(items)?;
        info!(selected, ratio, "最优选择完成");
        Ok(ratio)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 0/1 背包求解，返回选中的候选数
    fn solve(&self, candidates: &mut [TestItem], budget: u64) -> EngineResult<usize> {
        let n = candidates.len();
        let required_cells = (n as u128 + 1) * (budget as u128 + 1);
        if required_cells > self.max_cells as u128 {
            return Err(EngineError::ResourceExhaustion {
                reason: format!(
                    "DP 表格需要 {} 个单元，超过上限 {}（用例数 {}，预算 {}）",
                    required_cells, self.max_cells, n, budget
                ),
            });
        }

        let capacity = usize::try_from(budget).map_err(|_| EngineError::ResourceExhaustion {
            reason: format!("预算 {} 超出可寻址范围", budget),
        })?;
        let width = capacity + 1;

        // 选入标记表（用于回溯见证子集）+ 两行滚动的最优值
        let mut keep = alloc_filled(n * width, false)?;
        let mut previous = alloc_filled(width, 0.0f64)?;
        let mut current = alloc_filled(width, 0.0f64)?;

        for (i, item) in candidates.iter().enumerate() {
            let cost = usize::try_from(item.cost).unwrap_or(usize::MAX);
            for j in 0..width {
                let exclude = previous[j];
                if cost <= j {
                    let include = previous[j - cost] + item.risk;
                    if include > exclude {
                        current[j] = include;
                        keep[i * width + j] = true;
                        continue;
                    }
                }
                current[j] = exclude;
            }
            std::mem::swap(&mut previous, &mut current);
        }

        debug!(best_risk = previous[capacity], "DP 表格计算完成");

        // 回溯
        let mut remaining = capacity;
        let mut selected = 0;
        for i in (0..n).rev() {
            let item = &mut candidates[i];
            if keep[i * width + remaining] {
                item.state = SelectionState::SelectedByAlgorithm;
                remaining -= item.cost as usize;
                selected += 1;
            } else {
                item.state = SelectionState::NotSelected;
            }
        }

        Ok(selected)
    }
}

/// 可失败的表格分配（分配失败视为资源耗尽）
fn alloc_filled<T: Clone>(len: usize, value: T) -> EngineResult<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|e| EngineError::ResourceExhaustion {
            reason: format!("DP 表格内存分配失败（{} 个单元）: {}", len, e),
        })?;
    buffer.resize(len, value);
    Ok(buffer)
}

/// 两个按 id 升序的序列归并为一个
fn merge_by_id(left: Vec<TestItem>, right: Vec<TestItem>) -> Vec<TestItem> {
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => l.id <= r.id,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        if let Some(item) = next {
            merged.push(item);
        }
    }

    merged
}
