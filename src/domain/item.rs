// ==========================================
// 风险测试选择系统 - 测试用例领域模型
// ==========================================
// 职责: 单个可选工作项（风险/成本/选择状态/前置条件）
// 约定: id 为 0 起始序号；前置条件使用 1 起始序号（id + 1）
// ==========================================

use crate::domain::types::SelectionState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// TestItem - 测试用例
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestItem {
    // ===== 标识 =====
    pub id: usize,        // 0 起始序号，全程作为数组下标
    pub row_index: usize, // 源表格行号（回写使用）

    // ===== 选择参数 =====
    pub risk: f64, // 风险因子（非负实数）
    pub cost: u64, // 执行时间（非负整数，选中后消耗预算）

    // ===== 状态 =====
    pub state: SelectionState,

    // ===== 依赖 =====
    pub preconditions: BTreeSet<usize>, // 1 起始序号集合；未配置前置条件时为空
}

impl TestItem {
    /// 创建未选中、无前置条件的用例（row_index 默认等于 id）
    pub fn new(id: usize, risk: f64, cost: u64) -> Self {
        Self {
            id,
            row_index: id,
            risk,
            cost,
            state: SelectionState::NotSelected,
            preconditions: BTreeSet::new(),
        }
    }

    pub fn with_state(mut self, state: SelectionState) -> Self {
        self.state = state;
        self
    }

    /// 设置前置条件（1 起始序号）
    pub fn with_preconditions<I>(mut self, ordinals: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        self.preconditions = ordinals.into_iter().collect();
        self
    }

    /// 被其他用例引用时使用的 1 起始序号
    pub fn ordinal(&self) -> usize {
        self.id + 1
    }

    pub fn is_selected(&self) -> bool {
        self.state.is_selected()
    }

    /// 前置条件回写格式: 升序逗号分隔
    pub fn preconditions_text(&self) -> String {
        self.preconditions
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

// ==========================================
// 汇总辅助函数
// ==========================================

/// 全部用例风险之和
pub fn total_risk(items: &[TestItem]) -> f64 {
    items.iter().map(|i| i.risk).sum()
}

/// 选中用例（人工或算法）风险之和
pub fn selected_risk(items: &[TestItem]) -> f64 {
    items.iter().filter(|i| i.is_selected()).map(|i| i.risk).sum()
}

/// 选中用例（人工或算法）成本之和
pub fn selected_cost(items: &[TestItem]) -> u64 {
    items
        .iter()
        .filter(|i| i.is_selected())
        .map(|i| i.cost)
        .sum()
}
