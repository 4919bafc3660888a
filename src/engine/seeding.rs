// ==========================================
// 风险测试选择系统 - 种子设定解析器
// ==========================================
// 职责: 将人工选中/排除沿依赖闭包传播，检测矛盾，扣减预占预算
// 输入: 用例列表（会被修改）+ 预算（会被修改）
// 输出: SeedingReport（预占预算 + 隐式选中/排除 + 诊断事件）
// ==========================================
// 红线: 人工选中的用例不得依赖人工排除的用例
// 红线: 预占预算不得超过总预算
// ==========================================

use crate::domain::item::TestItem;
use crate::domain::types::SelectionState;
use crate::engine::error::{EngineError, EngineResult, SeedingConflict};
use crate::engine::events::SelectionEvent;
use crate::engine::precondition_matrix::PreconditionMatrixBuilder;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

// ==========================================
// SeedingReport - 种子解析结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedingReport {
    pub prebooked: u64,                  // 人工选中（含隐式）成本之和
    pub remaining_budget: u64,           // 扣减后留给求解器的预算
    pub implicit_inclusions: Vec<usize>, // 被隐式选中的用例（1 起始）
    pub implicit_exclusions: Vec<usize>, // 被隐式排除的用例（1 起始）
    pub events: Vec<SelectionEvent>,
}

// ==========================================
// SeedingResolver - 种子设定解析器
// ==========================================
pub struct SeedingResolver {
    matrix_builder: PreconditionMatrixBuilder,
}

impl SeedingResolver {
    pub fn new() -> Self {
        Self {
            matrix_builder: PreconditionMatrixBuilder::new(),
        }
    }

    // ==========================================
    // 完整路径（已配置前置条件）
    // ==========================================

    /// 解析种子设定（依赖传播 + 矛盾检测 + 预算扣减）
    ///
    /// 步骤:
    /// 1) 构建闭包依赖矩阵
    /// 2) 矛盾检测: 人工选中 k 的任一传递依赖 i 为人工排除 → 失败
    /// 3) 负向传播: 依赖人工排除用例的全部用例 → 人工排除
    /// 4) 正向传播: 人工选中用例的全部依赖 → 人工选中
    /// 5) 预占预算 = 人工选中成本之和；超过预算 → 失败
    /// 6) 从预算中扣减预占预算
    /// 7) 从其他用例的前置条件中移除已确定选中的序号
    ///
    /// # 错误
    /// - `EngineError::SeedingContradiction`: 依赖矛盾或预占超预算
    #[instrument(skip(self, items, budget), fields(item_count = items.len()))]
    pub fn resolve(
        &self,
        items: &mut [TestItem],
        budget: &mut u64,
    ) -> EngineResult<SeedingReport> {
        // 1. 闭包依赖矩阵
        let matrix = self.matrix_builder.build(items);

        // 2. 矛盾检测（必须在传播前完成）
        for (k, item) in items.iter().enumerate() {
            if item.state != SelectionState::SelectedByUser {
                continue;
            }
            if let Some(i) = matrix
                .dependencies_of(k)
                .find(|&i| items[i].state == SelectionState::ExcludedByUser)
            {
                return Err(EngineError::SeedingContradiction(
                    SeedingConflict::ExcludedDependency {
                        selected: k + 1,
                        excluded: i + 1,
                    },
                ));
            }
        }

        let mut report = SeedingReport::default();

        // 3. 负向传播（排除依赖 → 排除其上的全部用例）
        let excluded_seeds: Vec<usize> = seeds_in_state(items, SelectionState::ExcludedByUser);
        for &i in &excluded_seeds {
            for j in matrix.dependents_of(i) {
                if items[j].state != SelectionState::ExcludedByUser {
                    items[j].state = SelectionState::ExcludedByUser;
                    report.implicit_exclusions.push(j + 1);
                    report.events.push(SelectionEvent::ImplicitExclusion {
                        ordinal: j + 1,
                        caused_by: i + 1,
                    });
                }
            }
        }

        // 4. 正向传播（选中用例 → 选中其全部前置条件）
        let selected_seeds: Vec<usize> = seeds_in_state(items, SelectionState::SelectedByUser);
        for &i in &selected_seeds {
            for j in matrix.dependencies_of(i) {
                if items[j].state != SelectionState::SelectedByUser {
                    items[j].state = SelectionState::SelectedByUser;
                    report.implicit_inclusions.push(j + 1);
                    report.events.push(SelectionEvent::ImplicitInclusion {
                        ordinal: j + 1,
                        required_by: i + 1,
                    });
                }
            }
        }

        debug!(
            implicit_exclusions = report.implicit_exclusions.len(),
            implicit_inclusions = report.implicit_inclusions.len(),
            "种子传播完成"
        );

        // 5-6. 预占预算
        self.book_selected(items, budget, &mut report)?;

        // 7. 从其他用例的前置条件中移除已确定选中的序号（避免重复计费）
        let guaranteed: BTreeSet<usize> = items
            .iter()
            .filter(|item| item.state == SelectionState::SelectedByUser)
            .map(|item| item.ordinal())
            .collect();
        for item in items.iter_mut() {
            let own = item.ordinal();
            item.preconditions
                .retain(|p| *p == own || !guaranteed.contains(p));
        }

        Ok(report)
    }

    // ==========================================
    // 简化路径（未配置前置条件）
    // ==========================================

    /// 仅对人工选中用例预占预算（无依赖图，不做传播）
    pub fn resolve_without_preconditions(
        &self,
        items: &[TestItem],
        budget: &mut u64,
    ) -> EngineResult<SeedingReport> {
        let mut report = SeedingReport::default();
        self.book_selected(items, budget, &mut report)?;
        Ok(report)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 计算并扣减预占预算
    fn book_selected(
        &self,
        items: &[TestItem],
        budget: &mut u64,
        report: &mut SeedingReport,
    ) -> EngineResult<()> {
        let prebooked = items
            .iter()
            .filter(|item| item.state == SelectionState::SelectedByUser)
            .fold(0u64, |acc, item| acc.saturating_add(item.cost));

        if prebooked > *budget {
            return Err(EngineError::SeedingContradiction(
                SeedingConflict::PrebookedOverBudget {
                    prebooked,
                    budget: *budget,
                },
            ));
        }

        *budget -= prebooked;
        report.prebooked = prebooked;
        report.remaining_budget = *budget;
        report.events.push(SelectionEvent::BudgetPrebooked {
            prebooked,
            remaining: *budget,
        });

        info!(prebooked, remaining_budget = *budget, "人工选中用例预占预算完成");
        Ok(())
    }
}

impl Default for SeedingResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// 处于指定状态的用例下标
fn seeds_in_state(items: &[TestItem], state: SelectionState) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.state == state)
        .map(|(idx, _)| idx)
        .collect()
}
