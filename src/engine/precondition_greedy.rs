// ==========================================
// 风险测试选择系统 - 贪心选择器（有前置条件）
// ==========================================
// 职责: 在闭包依赖矩阵上迭代选择"累计比率"最高的用例及其全部依赖
// 输入: 用例列表（种子解析后）+ 剩余预算
// 输出: 风险覆盖率；被选用例及其依赖标记为算法选中
// ==========================================
// 说明:
// - 矩阵由本选择器独占并就地修改：用例提交后整列清零，
//   之后不再被计入其他用例的累计成本/风险
// - 环形依赖组闭包行相同，整组原子选择（全选或全不选）
// - 显式循环 + 不动点终止，最多 n 轮
// ==========================================

use crate::domain::item::TestItem;
use crate::domain::matrix::DependencyMatrix;
use crate::domain::types::SelectionState;
use crate::engine::coverage::risk_coverage_ratio;
use crate::engine::error::EngineResult;
use crate::engine::precondition_matrix::PreconditionMatrixBuilder;
use tracing::{debug, info, instrument};

/// 累计比率/预算比较容差
pub const RATIO_EPSILON: f64 = 1e-6;

/// 单轮候选
#[derive(Debug, Clone, Copy)]
struct Candidate {
    index: usize,
    cumulative_cost: u64,
    cumulative_ratio: f64,
}

// ==========================================
// PreconditionGreedySelector - 累计比率贪心选择器
// ==========================================
pub struct PreconditionGreedySelector {
    matrix_builder: PreconditionMatrixBuilder,
}

impl PreconditionGreedySelector {
    pub fn new() -> Self {
        Self {
            matrix_builder: PreconditionMatrixBuilder::new(),
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行累计比率贪心选择
    ///
    /// 每轮:
    /// 1) 对每个未选中用例 i: 累计成本 = Σ cost(k)，累计风险 = Σ risk(k)，k ∈ 行 i；
    ///    累计比率 = 累计风险 / 累计成本（累计成本为 0 时为 0）
    /// 2) 按累计比率降序排序
    /// 3) 取第一个 累计成本 ≤ 剩余预算 + ε 且 累计比率 > ε 的用例
    /// 4) 选中该用例及其行内全部用例，扣减成本，清零对应列，进入下一轮
    /// 5) 一轮中无可选用例时停止
    ///
    /// 矩阵按当前（已裁剪的）前置条件重新构建；已处于选中状态的用例视为已提交，
    /// 因此重复执行不会改变结果
    #[instrument(skip(self, items), fields(item_count = items.len()))]
    pub fn select(&self, items: &mut [TestItem], budget: u64) -> EngineResult<f64> {
        let mut matrix = self.matrix_builder.build(items);
        let mut remaining = budget;

        // 已提交用例：清零列；上一轮算法选中的成本从预算中扣除
        for idx in 0..items.len() {
            match items[idx].state {
                SelectionState::SelectedByUser => matrix.clear_column(idx),
                SelectionState::SelectedByAlgorithm => {
                    matrix.clear_column(idx);
                    remaining = remaining.saturating_sub(items[idx].cost);
                }
                _ => {}
            }
        }

        let mut rounds = 0usize;
        loop {
            let Some(chosen) = self.pick_candidate(items, &matrix, remaining) else {
                break;
            };

            let members: Vec<usize> = matrix.dependencies_of(chosen.index).collect();
            for &k in &members {
                if items[k].state == SelectionState::NotSelected {
                    items[k].state = SelectionState::SelectedByAlgorithm;
                    remaining = remaining.saturating_sub(items[k].cost);
                }
                matrix.clear_column(k);
            }

            rounds += 1;
            debug!(
                round = rounds,
                chosen = chosen.index + 1,
                members = members.len(),
                cumulative_cost = chosen.cumulative_cost,
                cumulative_ratio = chosen.cumulative_ratio,
                remaining_budget = remaining,
                "选中用例及其依赖"
            );
        }

        let ratio = risk_coverage_ratio(items)?;
        info!(rounds, remaining_budget = remaining, ratio, "前置条件贪心选择完成");
        Ok(ratio)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 计算本轮候选并返回第一个可选用例
    fn pick_candidate(
        &self,
        items: &[TestItem],
        matrix: &DependencyMatrix,
        remaining: u64,
    ) -> Option<Candidate> {
        let mut candidates: Vec<Candidate> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.state == SelectionState::NotSelected)
            .filter_map(|(idx, _)| cumulative(items, matrix, idx))
            .collect();

        candidates.sort_by(|a, b| b.cumulative_ratio.total_cmp(&a.cumulative_ratio));

        candidates.into_iter().find(|c| {
            c.cumulative_cost as f64 <= remaining as f64 + RATIO_EPSILON
                && c.cumulative_ratio > RATIO_EPSILON
        })
    }
}

impl Default for PreconditionGreedySelector {
    fn default() -> Self {
        Self::new()
    }
}

/// 累计成本/比率；行内含人工排除用例时不可选（返回 None）
fn cumulative(items: &[TestItem], matrix: &DependencyMatrix, index: usize) -> Option<Candidate> {
    let mut cost = 0u64;
    let mut risk = 0.0f64;
    for k in matrix.dependencies_of(index) {
        if items[k].state == SelectionState::ExcludedByUser {
            return None;
        }
        cost = cost.saturating_add(items[k].cost);
        risk += items[k].risk;
    }

    let ratio = if cost == 0 { 0.0 } else { risk / cost as f64 };
    Some(Candidate {
        index,
        cumulative_cost: cost,
        cumulative_ratio: ratio,
    })
}
