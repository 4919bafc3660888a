// ==========================================
// 风险测试选择系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: ResourceExhaustion 是唯一可恢复错误（由编排器降级到贪心求解）
// ==========================================

use std::fmt;
use thiserror::Error;

/// 种子设定矛盾的具体原因（序号均为 1 起始）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedingConflict {
    /// 人工选中的用例传递依赖于人工排除的用例
    ExcludedDependency { selected: usize, excluded: usize },

    /// 人工选中（含隐式选中）的成本之和超过预算
    PrebookedOverBudget { prebooked: u64, budget: u64 },
}

impl fmt::Display for SeedingConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedingConflict::ExcludedDependency { selected, excluded } => write!(
                f,
                "用例 {} 被人工选中，但其依赖的用例 {} 被人工排除",
                selected, excluded
            ),
            SeedingConflict::PrebookedOverBudget { prebooked, budget } => write!(
                f,
                "人工选中用例的执行时间之和 {} 超过预算 {}",
                prebooked, budget
            ),
        }
    }
}

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("预算无效: {0}（预算必须为正整数）")]
    InvalidBudget(i64),

    #[error("种子设定矛盾: {0}")]
    SeedingContradiction(SeedingConflict),

    #[error("资源耗尽: {reason}")]
    ResourceExhaustion { reason: String },

    #[error("风险覆盖率无定义: 全部用例风险因子之和为 0")]
    UndefinedRatio,
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
