// ==========================================
// 风险测试选择系统 - 运行配置
// ==========================================
// 职责: 单次运行的显式配置（替代进程级全局配置）
// 来源: JSON 配置文件（可选）+ 命令行覆写
// ==========================================

use crate::engine::error::EngineError;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ==========================================
// 默认值
// ==========================================
pub mod defaults {
    pub const FILENAME: &str = "testcases.xls";
    pub const RISK_FACTOR_COL: &str = "Risk Factor";
    pub const EXECUTION_TIME_COL: &str = "Execution Time";
    pub const SELECTION_COL: &str = "Selected";
    pub const TIME_BUDGET: i64 = 2500;
    pub const HEADER_SEARCH_ROWS: usize = 10;
    pub const BUDGET_ADVISORY_THRESHOLD: u64 = 100_000;
    pub const ITEM_COUNT_ADVISORY_THRESHOLD: usize = 1_000;
    pub const MAX_DP_CELLS: u64 = 50_000_000;
}

// ==========================================
// RunConfig - 运行配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    // ===== 输入 =====
    pub filename: PathBuf,
    pub risk_factor_col: String,
    pub execution_time_col: String,
    pub selection_col: String,
    pub precondition_col: Option<String>, // 为空表示本次运行不启用前置条件

    // ===== 预算 =====
    pub time_budget: i64,

    // ===== 输出 =====
    pub output: Option<PathBuf>, // 为空时回写到 <输入文件名>.selected.csv

    // ===== 表头定位 =====
    pub header_search_rows: usize,

    // ===== 建议阈值 / 资源上限 =====
    pub budget_advisory_threshold: u64,
    pub item_count_advisory_threshold: usize,
    pub max_dp_cells: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            filename: PathBuf::from(defaults::FILENAME),
            risk_factor_col: defaults::RISK_FACTOR_COL.to_string(),
            execution_time_col: defaults::EXECUTION_TIME_COL.to_string(),
            selection_col: defaults::SELECTION_COL.to_string(),
            precondition_col: None,
            time_budget: defaults::TIME_BUDGET,
            output: None,
            header_search_rows: defaults::HEADER_SEARCH_ROWS,
            budget_advisory_threshold: defaults::BUDGET_ADVISORY_THRESHOLD,
            item_count_advisory_threshold: defaults::ITEM_COUNT_ADVISORY_THRESHOLD,
            max_dp_cells: defaults::MAX_DP_CELLS,
        }
    }
}

impl RunConfig {
    /// 从 JSON 文件加载（缺省字段取默认值）
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件 {}", path.display()))?;
        let config: RunConfig = serde_json::from_str(&raw)
            .with_context(|| format!("配置文件格式错误 {}", path.display()))?;
        Ok(config)
    }

    /// 校验配置
    ///
    /// # 错误
    /// - `EngineError::InvalidBudget`: 预算不是正整数
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.time_budget <= 0 {
            return Err(EngineError::InvalidBudget(self.time_budget));
        }
        Ok(())
    }

    /// 已校验的预算
    pub fn budget(&self) -> Result<u64, EngineError> {
        self.validate()?;
        Ok(self.time_budget as u64)
    }

    pub fn preconditions_configured(&self) -> bool {
        self.precondition_col
            .as_deref()
            .map(|c| !c.trim().is_empty())
            .unwrap_or(false)
    }

    /// 回写路径（未配置时由输入文件名派生）
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => {
                let stem = self
                    .filename
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| "testcases".to_string());
                self.filename.with_file_name(format!("{}.selected.csv", stem))
            }
        }
    }

    /// 引擎侧配置
    pub fn selection_config(&self) -> SelectionConfig {
        SelectionConfig {
            preconditions_configured: self.preconditions_configured(),
            budget_advisory_threshold: self.budget_advisory_threshold,
            item_count_advisory_threshold: self.item_count_advisory_threshold,
            max_dp_cells: self.max_dp_cells,
        }
    }
}

// ==========================================
// SelectionConfig - 引擎侧配置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    pub preconditions_configured: bool,
    pub budget_advisory_threshold: u64,
    pub item_count_advisory_threshold: usize,
    pub max_dp_cells: u64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        RunConfig::default().selection_config()
    }
}

impl SelectionConfig {
    pub fn with_preconditions(mut self, enabled: bool) -> Self {
        self.preconditions_configured = enabled;
        self
    }
}
