// ==========================================
// 风险测试选择系统 - 引擎层
// ==========================================
// 职责: 种子解析 + 三种选择器 + 编排
// 红线: 引擎不做文件读写，只修改用例状态与预算
// ==========================================

pub mod coverage;
pub mod error;
pub mod events;
pub mod greedy_selector;
pub mod optimal_selector;
pub mod orchestrator;
pub mod precondition_greedy;
pub mod precondition_matrix;
pub mod seeding;

// 重导出核心引擎
pub use coverage::risk_coverage_ratio;
pub use error::{EngineError, EngineResult, SeedingConflict};
pub use events::{EventRecorder, SelectionEvent, SelectionEventSink};
pub use greedy_selector::GreedySelector;
pub use optimal_selector::OptimalSelector;
pub use orchestrator::{SelectionOrchestrator, SelectionOutcome};
pub use precondition_greedy::{PreconditionGreedySelector, RATIO_EPSILON};
pub use precondition_matrix::PreconditionMatrixBuilder;
pub use seeding::{SeedingReport, SeedingResolver};
