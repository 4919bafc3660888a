// ==========================================
// 风险测试选择系统 - 领域类型定义
// ==========================================
// 选择状态 + 求解器类型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 选择状态 (Selection State)
// ==========================================
// NotSelected 既表示"待求解"也表示"已拒绝"，二者只由求解生命周期区分
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionState {
    #[default]
    NotSelected,         // 未选中（待定/拒绝）
    SelectedByAlgorithm, // 算法选中
    ExcludedByUser,      // 人工排除
    SelectedByUser,      // 人工选中
}

impl SelectionState {
    /// 由选择标记列解析状态
    ///
    /// 规则: 忽略大小写与首尾空白，"y" → 人工选中，"n" → 人工排除，其余 → 未选中
    pub fn from_marker(marker: &str) -> Self {
        match marker.trim().to_lowercase().as_str() {
            "y" => SelectionState::SelectedByUser,
            "n" => SelectionState::ExcludedByUser,
            _ => SelectionState::NotSelected,
        }
    }

    /// 回写到选择标记列的值
    pub fn as_marker(&self) -> &'static str {
        if self.is_selected() {
            "y"
        } else {
            "n"
        }
    }

    /// 是否处于选中状态（人工或算法）
    pub fn is_selected(&self) -> bool {
        matches!(
            self,
            SelectionState::SelectedByUser | SelectionState::SelectedByAlgorithm
        )
    }

    /// 是否为人工种子终态（求解器不得改动）
    pub fn is_seeded(&self) -> bool {
        matches!(
            self,
            SelectionState::SelectedByUser | SelectionState::ExcludedByUser
        )
    }
}

impl fmt::Display for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionState::NotSelected => write!(f, "NOT_SELECTED"),
            SelectionState::SelectedByAlgorithm => write!(f, "SELECTED_BY_ALGORITHM"),
            SelectionState::ExcludedByUser => write!(f, "EXCLUDED_BY_USER"),
            SelectionState::SelectedByUser => write!(f, "SELECTED_BY_USER"),
        }
    }
}

// ==========================================
// 求解器类型 (Solver Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolverKind {
    Optimal,            // 动态规划精确解
    Greedy,             // 密度贪心（无前置条件）
    PreconditionGreedy, // 累计比率贪心（有前置条件）
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverKind::Optimal => write!(f, "OPTIMAL"),
            SolverKind::Greedy => write!(f, "GREEDY"),
            SolverKind::PreconditionGreedy => write!(f, "PRECONDITION_GREEDY"),
        }
    }
}
