// ==========================================
// 风险测试选择系统 - 前置条件矩阵构建器
// ==========================================
// 职责: 由各用例的前置条件集合构建自反依赖矩阵并求闭包
// 输入: 用例列表
// 输出: 闭包后的依赖矩阵
// ==========================================
// 说明: 环形前置条件组在闭包后成为全连通块（组内互相依赖），
//       下游求解器统一按"整组原子选择"处理，不视为错误
// ==========================================

use crate::domain::item::TestItem;
use crate::domain::matrix::DependencyMatrix;
use tracing::{debug, warn};

// ==========================================
// PreconditionMatrixBuilder - 前置条件矩阵构建器
// ==========================================
pub struct PreconditionMatrixBuilder {
    // 无状态
}

impl PreconditionMatrixBuilder {
    pub fn new() -> Self {
        Self {}
    }

    /// 构建闭包后的依赖矩阵
    ///
    /// 规则:
    /// 1) m[i][i] = true
    /// 2) 对每个前置条件 p（1 起始）: m[i][p-1] = true
    /// 3) 自反传递闭包
    pub fn build(&self, items: &[TestItem]) -> DependencyMatrix {
        let n = items.len();
        let mut matrix = DependencyMatrix::new(n);

        for (row, item) in items.iter().enumerate() {
            matrix.set(row, row, true);
            for &ordinal in &item.preconditions {
                // 导入层已校验范围，这里只做越界保护
                if ordinal == 0 || ordinal > n {
                    warn!(
                        item = item.ordinal(),
                        precondition = ordinal,
                        item_count = n,
                        "前置条件序号越界，已忽略"
                    );
                    continue;
                }
                matrix.set(row, ordinal - 1, true);
            }
        }

        matrix.close();
        debug!(item_count = n, "依赖矩阵闭包完成");

        matrix
    }
}

impl Default for PreconditionMatrixBuilder {
    fn default() -> Self {
        Self::new()
    }
}
