// ==========================================
// 风险测试选择系统 - 贪心选择器（无前置条件）
// ==========================================
// 职责: 按风险密度（风险/成本）降序贪心填充预算，作为 DP 的近似降级方案
// 输入: 用例列表 + 剩余预算
// 输出: 风险覆盖率；候选用例标记为算法选中/未选中
// ==========================================
// 说明: 多项式时间近似，无最优性保证；人工设定用例保持原状态
// ==========================================

use crate::domain::item::TestItem;
use crate::domain::types::SelectionState;
use crate::engine::coverage::risk_coverage_ratio;
use crate::engine::error::EngineResult;
use tracing::{info, instrument};

// ==========================================
// GreedySelector - 密度贪心选择器
// ==========================================
pub struct GreedySelector {
    // 无状态引擎
}

impl GreedySelector {
    pub fn new() -> Self {
        Self {}
    }

    /// 执行密度贪心选择
    ///
    /// 规则:
    /// 1) 密度 = 风险 / 成本
    /// 2) 非人工设定用例按密度降序排序（稳定排序，同密度保持原顺序）
    /// 3) 依次遍历：成本不超过剩余预算则选入，否则不选
    #[instrument(skip(self, items), fields(item_count = items.len()))]
    pub fn select(&self, items: &mut [TestItem], budget: u64) -> EngineResult<f64> {
        let mut order: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.state.is_seeded())
            .map(|(idx, _)| idx)
            .collect();
        order.sort_by(|&a, &b| density(&items[b]).total_cmp(&density(&items[a])));

        let mut remaining = budget;
        let mut selected = 0usize;
        for idx in order {
            let item = &mut items[idx];
            if item.cost <= remaining {
                item.state = SelectionState::SelectedByAlgorithm;
                remaining -= item.cost;
                selected += 1;
            } else {
                item.state = SelectionState::NotSelected;
            }
        }

        let ratio = risk_coverage_ratio(items)?;
        info!(selected, remaining_budget = remaining, ratio, "贪心选择完成");
        Ok(ratio)
    }
}

impl Default for GreedySelector {
    fn default() -> Self {
        Self::new()
    }
}

/// 风险密度
///
/// 零成本: 有风险 → +∞（优先选入）；无风险 → 0
fn density(item: &TestItem) -> f64 {
    if item.cost == 0 {
        if item.risk > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    } else {
        item.risk / item.cost as f64
    }
}
