// ==========================================
// 风险测试选择系统 - API 层
// ==========================================
// 职责: 对外运行入口，供命令行调用
// ==========================================

pub mod error;
pub mod selection_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult, ErrorKind};
pub use selection_api::{RunSummary, SelectionApi};
