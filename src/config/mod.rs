// ==========================================
// 风险测试选择系统 - 配置层
// ==========================================
// 职责: 运行配置加载、校验、派生引擎配置
// 存储: JSON 配置文件（可选）
// ==========================================

pub mod run_config;

// 重导出核心配置
pub use run_config::{defaults, RunConfig, SelectionConfig};
