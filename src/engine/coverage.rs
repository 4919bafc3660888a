// ==========================================
// 风险测试选择系统 - 风险覆盖率
// ==========================================

use crate::domain::item::{selected_risk, total_risk, TestItem};
use crate::engine::error::{EngineError, EngineResult};

/// 风险覆盖率 = 选中用例风险之和 / 全部用例风险之和
///
/// 选中 = 人工选中 或 算法选中
///
/// # 错误
/// - `EngineError::UndefinedRatio`: 全部风险之和为 0（不做静默除零）
pub fn risk_coverage_ratio(items: &[TestItem]) -> EngineResult<f64> {
    let total = total_risk(items);
    if total <= 0.0 {
        return Err(EngineError::UndefinedRatio);
    }
    Ok(selected_risk(items) / total)
}
