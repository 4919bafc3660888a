// ==========================================
// 风险测试选择系统 - 选择 API
// ==========================================
// 职责: 串联 读取 → 表头定位 → 用例提取 → 选择 → 回写
// 说明: 输入校验在求解前全部完成；任何错误都不会产生部分输出文件
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::RunConfig;
use crate::domain::item::TestItem;
use crate::domain::table::Table;
use crate::domain::types::SolverKind;
use crate::engine::events::{SelectionEvent, SelectionEventSink};
use crate::engine::orchestrator::{SelectionOrchestrator, SelectionOutcome};
use crate::importer::{HeaderLocator, ItemExtractor, SelectionExporter, UniversalFileParser};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};
use uuid::Uuid;

// ==========================================
// RunSummary - 运行摘要
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    // 运行标识
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: i64,

    // 文件（表格直连调用时为空）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,

    // 结果
    pub solver: SolverKind,
    pub fallback_used: bool,
    pub risk_ratio: f64,
    pub budget: u64,
    pub prebooked: u64,
    pub selected_cost: u64,
    pub remaining_budget: u64,
    pub item_count: usize,
    pub selected_count: usize,

    // 诊断
    pub events: Vec<SelectionEvent>,
}

impl RunSummary {
    fn from_outcome(outcome: SelectionOutcome, started_at: DateTime<Utc>, timer: Instant) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at,
            finished_at: Utc::now(),
            elapsed_ms: timer.elapsed().as_millis() as i64,
            input_path: None,
            output_path: None,
            solver: outcome.solver,
            fallback_used: outcome.fallback_used,
            risk_ratio: outcome.risk_ratio,
            budget: outcome.budget,
            prebooked: outcome.prebooked,
            selected_cost: outcome.selected_cost,
            remaining_budget: outcome.remaining_budget,
            item_count: outcome.item_count,
            selected_count: outcome.selected_count,
            events: outcome.events,
        }
    }

    /// 建议类诊断（需要提示用户）
    pub fn advisories(&self) -> impl Iterator<Item = &SelectionEvent> {
        self.events.iter().filter(|e| e.is_advisory())
    }
}

// ==========================================
// SelectionApi - 选择 API
// ==========================================
#[derive(Default)]
pub struct SelectionApi {
    sink: Option<Arc<dyn SelectionEventSink>>,
}

impl SelectionApi {
    pub fn new() -> Self {
        Self { sink: None }
    }

    /// 注入诊断事件接收者
    pub fn with_event_sink(sink: Arc<dyn SelectionEventSink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// 对内存中的表格执行选择，并将结果写回表格
    ///
    /// # 返回
    /// (最终用例列表, 运行摘要)
    #[instrument(skip(self, table, config), fields(rows = table.rows.len()))]
    pub fn run_table(
        &self,
        table: &mut Table,
        config: &RunConfig,
    ) -> ApiResult<(Vec<TestItem>, RunSummary)> {
        let started_at = Utc::now();
        let timer = Instant::now();

        let budget = config.budget()?;

        let columns = HeaderLocator::new(config.header_search_rows).resolve_columns(table, config)?;
        let mut items = ItemExtractor.extract(table, &columns)?;

        let mut orchestrator = SelectionOrchestrator::new(config.selection_config());
        if let Some(sink) = &self.sink {
            orchestrator = orchestrator.with_event_sink(sink.clone());
        }
        let outcome = orchestrator.run(&mut items, budget)?;

        SelectionExporter.apply(table, &items, &columns);

        Ok((items, RunSummary::from_outcome(outcome, started_at, timer)))
    }

    /// 读取配置中的输入文件，执行选择并写出结果 CSV
    #[instrument(skip(self, config), fields(file = %config.filename.display()))]
    pub fn run_file(&self, config: &RunConfig) -> ApiResult<RunSummary> {
        config.validate()?;

        let output = config.output_path();
        if output == config.filename {
            return Err(ApiError::InvalidInput(format!(
                "输出路径不能与输入文件相同: {}",
                output.display()
            )));
        }

        let mut table = UniversalFileParser.parse(&config.filename)?;
        let (_, mut summary) = self.run_table(&mut table, config)?;

        SelectionExporter.write_csv(&table, &output)?;

        summary.input_path = Some(config.filename.display().to_string());
        summary.output_path = Some(output.display().to_string());

        info!(
            run_id = %summary.run_id,
            solver = %summary.solver,
            risk_ratio = summary.risk_ratio,
            selected = summary.selected_count,
            output = %output.display(),
            "选择运行完成"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ErrorKind;
    use crate::domain::table::CellValue;
    use crate::domain::types::SelectionState;

    fn table(rows: &[&[&str]]) -> Table {
        Table::new(
            0,
            rows.iter()
                .map(|r| r.iter().map(|v| CellValue::from(*v)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_run_table_optimal_path() {
        let mut table = table(&[
            &["Name", "Risk Factor", "Execution Time", "Selected"],
            &["a", "6", "5", ""],
            &["b", "5", "4", ""],
            &["c", "5", "4", ""],
        ]);
        let config = RunConfig {
            time_budget: 8,
            ..RunConfig::default()
        };

        let (items, summary) = SelectionApi::new().run_table(&mut table, &config).unwrap();

        assert_eq!(summary.solver, SolverKind::Optimal);
        assert_eq!(summary.selected_cost, 8);
        assert!((summary.risk_ratio - 10.0 / 16.0).abs() < 1e-9);
        assert_eq!(items[0].state, SelectionState::NotSelected);
        assert_eq!(table.cell(1, 3), &CellValue::text("n"));
        assert_eq!(table.cell(2, 3), &CellValue::text("y"));
        assert_eq!(table.cell(3, 3), &CellValue::text("y"));
    }

    #[test]
    fn test_run_table_rejects_non_positive_budget() {
        let mut table = table(&[&["Risk Factor", "Execution Time", "Selected"], &["1", "1", ""]]);
        let config = RunConfig {
            time_budget: 0,
            ..RunConfig::default()
        };

        let err = SelectionApi::new().run_table(&mut table, &config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputValidation);
    }

    #[test]
    fn test_run_table_missing_column() {
        let mut table = table(&[&["Risk Factor", "Selected"], &["1", ""]]);

        let err = SelectionApi::new()
            .run_table(&mut table, &RunConfig::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputValidation);
    }

    #[test]
    fn test_run_file_refuses_to_overwrite_input() {
        let config = RunConfig {
            filename: "cases.csv".into(),
            output: Some("cases.csv".into()),
            ..RunConfig::default()
        };

        let err = SelectionApi::new().run_file(&config).unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }
}
