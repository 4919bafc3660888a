// ==========================================
// 风险测试选择系统 - 核心库
// ==========================================
// 目标: 在执行时间预算内选择测试用例，使风险覆盖率最大
// 求解: 0/1 背包（DP）/ 密度贪心 / 前置条件累计比率贪心
// 系统定位: 决策支持（人工 y/n 标记始终优先）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 用例、依赖矩阵、表格
pub mod domain;

// 引擎层 - 种子解析与选择器
pub mod engine;

// 导入层 - 表格读取与回写
pub mod importer;

// 配置层 - 运行配置
pub mod config;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// API 层 - 运行入口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{SelectionState, SolverKind};

// 领域实体
pub use domain::{CellValue, DependencyMatrix, Table, TestItem};

// 引擎
pub use engine::{
    EngineError, GreedySelector, OptimalSelector, PreconditionGreedySelector,
    PreconditionMatrixBuilder, SeedingResolver, SelectionEvent, SelectionOrchestrator,
    SelectionOutcome,
};

// 配置
pub use config::{RunConfig, SelectionConfig};

// API
pub use api::{ApiError, ErrorKind, RunSummary, SelectionApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "风险测试选择系统";
