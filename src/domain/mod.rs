// ==========================================
// 风险测试选择系统 - 领域模型层
// ==========================================
// 职责: 定义测试用例、选择状态、依赖矩阵、表格交换结构
// 红线: 不含文件读写,不含求解逻辑
// ==========================================

pub mod item;
pub mod matrix;
pub mod table;
pub mod types;

// 重导出核心类型
pub use item::{selected_cost, selected_risk, total_risk, TestItem};
pub use matrix::DependencyMatrix;
pub use table::{CellValue, Table};
pub use types::{SelectionState, SolverKind};
