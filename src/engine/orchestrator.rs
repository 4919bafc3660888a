// ==========================================
// 风险测试选择系统 - 选择编排器
// ==========================================
// 用途: 按配置选择求解路径，汇总覆盖率与诊断
// ==========================================
// 路径:
// - 未配置前置条件: 简化种子解析 → 最优选择器（DP）
//                    → 资源耗尽时降级为密度贪心
// - 已配置前置条件: 完整种子解析 → 累计比率贪心
// ==========================================

use crate::config::SelectionConfig;
use crate::domain::item::{selected_cost, TestItem};
use crate::domain::types::SolverKind;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::events::{EventRecorder, SelectionEvent, SelectionEventSink};
use crate::engine::{
    GreedySelector, OptimalSelector, PreconditionGreedySelector, SeedingResolver,
};
use crate::perf::PerfGuard;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

// ==========================================
// SelectionOutcome - 选择结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionOutcome {
    // 求解器
    pub solver: SolverKind,
    pub fallback_used: bool,

    // 覆盖率
    pub risk_ratio: f64,

    // 预算
    pub budget: u64,           // 原始预算
    pub prebooked: u64,        // 人工选中预占
    pub selected_cost: u64,    // 最终选中成本（含人工）
    pub remaining_budget: u64, // 未使用预算

    // 用例
    pub item_count: usize,
    pub selected_count: usize,

    // 诊断
    pub events: Vec<SelectionEvent>,
}

// ==========================================
// SelectionOrchestrator - 选择编排器
// ==========================================
pub struct SelectionOrchestrator {
    config: SelectionConfig,
    seeding: SeedingResolver,
    optimal: OptimalSelector,
    greedy: GreedySelector,
    precondition_greedy: PreconditionGreedySelector,
    sink: Option<Arc<dyn SelectionEventSink>>,
}

impl SelectionOrchestrator {
    /// 创建新的编排器实例
    pub fn new(config: SelectionConfig) -> Self {
        Self {
            seeding: SeedingResolver::new(),
            optimal: OptimalSelector::new(config.max_dp_cells),
            greedy: GreedySelector::new(),
            precondition_greedy: PreconditionGreedySelector::new(),
            sink: None,
            config,
        }
    }

    /// 注入诊断事件接收者
    pub fn with_event_sink(mut self, sink: Arc<dyn SelectionEventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// 执行完整选择流程
    ///
    /// # 参数
    /// - items: 用例列表（状态会被修改，顺序与标识保持不变）
    /// - budget: 总预算（必须为正）
    ///
    /// # 错误
    /// - `EngineError::InvalidBudget`: 预算为 0
    /// - `EngineError::SeedingContradiction`: 人工设定矛盾或预占超预算
    /// - `EngineError::UndefinedRatio`: 全部风险之和为 0
    ///
    /// `ResourceExhaustion` 不会返回给调用方：编排器自动降级到贪心求解
    pub fn run(&self, items: &mut Vec<TestItem>, budget: u64) -> EngineResult<SelectionOutcome> {
        let _perf = PerfGuard::new("selection_run");

        if budget == 0 {
            return Err(EngineError::InvalidBudget(0));
        }

        info!(
            item_count = items.len(),
            budget,
            preconditions = self.config.preconditions_configured,
            "开始执行用例选择"
        );

        let mut recorder = match &self.sink {
            Some(sink) => EventRecorder::with_sink(sink.clone()),
            None => EventRecorder::none(),
        };

        // ==========================================
        // 步骤1: 规模建议
        // ==========================================
        self.check_advisories(items.len(), budget, &mut recorder);

        // ==========================================
        // 步骤2: 种子解析 + 求解
        // ==========================================
        let mut remaining = budget;
        let (solver, fallback_used, prebooked, risk_ratio) =
            if self.config.preconditions_configured {
                debug!("已配置前置条件: 完整种子解析 + 累计比率贪心");

                let report = self.seeding.resolve(items, &mut remaining)?;
                recorder.extend(report.events);

                let ratio = self.precondition_greedy.select(items, remaining)?;
                (SolverKind::PreconditionGreedy, false, report.prebooked, ratio)
            } else {
                debug!("未配置前置条件: 简化种子解析 + 最优选择");

                let report = self
                    .seeding
                    .resolve_without_preconditions(items, &mut remaining)?;
                recorder.extend(report.events);

                match self.optimal.select(items, remaining) {
                    Ok(ratio) => (SolverKind::Optimal, false, report.prebooked, ratio),
                    Err(EngineError::ResourceExhaustion { reason }) => {
                        warn!(reason = %reason, "最优选择器资源耗尽，降级为贪心选择");
                        recorder.record(SelectionEvent::SolverFallback {
                            from: SolverKind::Optimal,
                            to: SolverKind::Greedy,
                            reason,
                        });
                        let ratio = self.greedy.select(items, remaining)?;
                        (SolverKind::Greedy, true, report.prebooked, ratio)
                    }
                    Err(e) => return Err(e),
                }
            };

        // ==========================================
        // 步骤3: 汇总
        // ==========================================
        let used = selected_cost(items);
        let outcome = SelectionOutcome {
            solver,
            fallback_used,
            risk_ratio,
            budget,
            prebooked,
            selected_cost: used,
            remaining_budget: budget.saturating_sub(used),
            item_count: items.len(),
            selected_count: items.iter().filter(|i| i.is_selected()).count(),
            events: recorder.into_events(),
        };

        info!(
            solver = %outcome.solver,
            fallback_used = outcome.fallback_used,
            risk_ratio = outcome.risk_ratio,
            selected_count = outcome.selected_count,
            selected_cost = outcome.selected_cost,
            "用例选择完成"
        );

        Ok(outcome)
    }

    /// 预算/用例数超过阈值时给出建议（不是错误）
    fn check_advisories(&self, item_count: usize, budget: u64, recorder: &mut EventRecorder) {
        if budget > self.config.budget_advisory_threshold {
            warn!(
                budget,
                threshold = self.config.budget_advisory_threshold,
                "预算过大，最优求解器可能无法在实际中完成"
            );
            recorder.record(SelectionEvent::BudgetAdvisory {
                budget,
                threshold: self.config.budget_advisory_threshold,
            });
        }

        if item_count > self.config.item_count_advisory_threshold {
            warn!(
                item_count,
                threshold = self.config.item_count_advisory_threshold,
                "用例数过多，最优求解器可能无法在实际中完成"
            );
            recorder.record(SelectionEvent::ItemCountAdvisory {
                item_count,
                threshold: self.config.item_count_advisory_threshold,
            });
        }
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::SelectionState;

    #[test]
    fn test_dispatch_without_preconditions_uses_optimal() {
        let orchestrator = SelectionOrchestrator::new(SelectionConfig::default());
        let mut items = vec![TestItem::new(0, 1.0, 1), TestItem::new(1, 2.0, 1)];

        let outcome = orchestrator.run(&mut items, 1).unwrap();

        assert_eq!(outcome.solver, SolverKind::Optimal);
        assert!(!outcome.fallback_used);
        assert_eq!(items[1].state, SelectionState::SelectedByAlgorithm);
    }

    #[test]
    fn test_fallback_on_resource_exhaustion() {
        let config = SelectionConfig {
            max_dp_cells: 4,
            ..SelectionConfig::default()
        };
        let orchestrator = SelectionOrchestrator::new(config);
        let mut items = vec![TestItem::new(0, 1.0, 1), TestItem::new(1, 2.0, 1)];

        let outcome = orchestrator.run(&mut items, 10).unwrap();

        assert_eq!(outcome.solver, SolverKind::Greedy);
        assert!(outcome.fallback_used);
        assert_eq!(outcome.risk_ratio, 1.0);
        assert!(outcome
            .events
            .iter()
            .any(|e| matches!(e, SelectionEvent::SolverFallback { .. })));
    }

    #[test]
    fn test_zero_budget_rejected() {
        let orchestrator = SelectionOrchestrator::new(SelectionConfig::default());
        let mut items = vec![TestItem::new(0, 1.0, 1)];

        assert_eq!(
            orchestrator.run(&mut items, 0),
            Err(EngineError::InvalidBudget(0))
        );
    }

    #[test]
    fn test_advisories_emitted() {
        let config = SelectionConfig {
            budget_advisory_threshold: 5,
            item_count_advisory_threshold: 1,
            ..SelectionConfig::default()
        };
        let orchestrator = SelectionOrchestrator::new(config);
        let mut items = vec![TestItem::new(0, 1.0, 1), TestItem::new(1, 1.0, 1)];

        let outcome = orchestrator.run(&mut items, 10).unwrap();

        let advisories: Vec<&str> = outcome
            .events
            .iter()
            .filter(|e| e.is_advisory())
            .map(|e| e.as_str())
            .collect();
        assert_eq!(advisories, vec!["BudgetAdvisory", "ItemCountAdvisory"]);
    }
}
