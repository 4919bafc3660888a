// ==========================================
// 风险测试选择系统 - 用例提取器
// ==========================================
// 职责: 表格数据行 → 测试用例（类型转换 + 输入校验）
// 规则:
// - 风险因子: 非负实数
// - 执行时间: 非负整数（允许整数值的浮点单元格，如 Excel 的 3.0）
// - 选择标记: 忽略大小写 "y"/"n"，其余视为未选中
// - 前置条件: 空 / 单个整数 / 逗号分隔整数，取值 [1, 用例数]
// - 全空行跳过，不占用序号
// ==========================================

use crate::domain::item::TestItem;
use crate::domain::table::{CellValue, Table};
use crate::domain::types::SelectionState;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::header_locator::ColumnIndices;
use std::collections::BTreeSet;
use tracing::{debug, info};

pub struct ItemExtractor;

impl ItemExtractor {
    /// 提取测试用例
    ///
    /// 所有校验在返回前完成，任一单元格非法即整体失败
    pub fn extract(&self, table: &Table, columns: &ColumnIndices) -> ImportResult<Vec<TestItem>> {
        let mut items: Vec<TestItem> = Vec::new();
        // (用例下标, 原始单元格文本)，范围校验需等待用例总数确定
        let mut pending_preconditions: Vec<(usize, String)> = Vec::new();

        for (row_index, row) in table.data_rows() {
            if row.iter().all(CellValue::is_blank) {
                continue;
            }
            let row_number = row_index + 1;

            let risk = parse_risk(table.cell(row_index, columns.risk), row_number)?;
            let cost = parse_cost(table.cell(row_index, columns.cost), row_number)?;
            let marker = table.cell(row_index, columns.selection).to_string();

            let mut item = TestItem::new(items.len(), risk, cost)
                .with_state(SelectionState::from_marker(&marker));
            item.row_index = row_index;

            if let Some(col) = columns.precondition {
                let cell = table.cell(row_index, col);
                item.preconditions = parse_preconditions(cell, row_number)?;
                if !item.preconditions.is_empty() {
                    pending_preconditions.push((item.id, cell.to_string()));
                }
            }

            items.push(item);
        }

        // 前置条件范围校验 [1, 用例数]
        let count = items.len();
        for (idx, raw) in pending_preconditions {
            let item = &items[idx];
            if let Some(bad) = item.preconditions.iter().find(|&&p| p == 0 || p > count) {
                return Err(ImportError::PreconditionTypeError {
                    row: item.row_index + 1,
                    value: raw,
                    message: format!("引用的用例序号 {} 超出范围 [1, {}]", bad, count),
                });
            }
        }

        let seeded = items.iter().filter(|i| i.state.is_seeded()).count();
        debug!(seeded, "人工设定用例统计");
        info!(item_count = count, header_row = table.header_row, "用例提取完成");

        Ok(items)
    }
}

// ==========================================
// 单元格转换
// ==========================================

/// 风险因子: 非负有限实数
pub fn parse_risk(cell: &CellValue, row: usize) -> ImportResult<f64> {
    let value = match cell {
        CellValue::Int(v) => Some(*v as f64),
        CellValue::Float(v) => Some(*v),
        CellValue::Text(s) => s.trim().parse::<f64>().ok(),
        CellValue::Empty | CellValue::Bool(_) => None,
    };

    match value {
        Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(ImportError::RiskFactorTypeError {
            row,
            value: cell.to_string(),
        }),
    }
}

/// 执行时间: 非负整数
pub fn parse_cost(cell: &CellValue, row: usize) -> ImportResult<u64> {
    let value = match cell {
        CellValue::Int(v) => u64::try_from(*v).ok(),
        CellValue::Float(v) => integral_float(*v),
        CellValue::Text(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral_float))
        }
        CellValue::Empty | CellValue::Bool(_) => None,
    };

    value.ok_or_else(|| ImportError::ExecutionTimeTypeError {
        row,
        value: cell.to_string(),
    })
}

/// 前置条件: 空 / 单个整数 / 逗号分隔整数（末尾多余逗号忽略）
///
/// 只做格式校验；范围校验在全部用例提取后进行
pub fn parse_preconditions(cell: &CellValue, row: usize) -> ImportResult<BTreeSet<usize>> {
    let type_error = |message: String| ImportError::PreconditionTypeError {
        row,
        value: cell.to_string(),
        message,
    };

    match cell {
        CellValue::Empty => Ok(BTreeSet::new()),
        CellValue::Int(v) => usize::try_from(*v)
            .map(|p| BTreeSet::from([p]))
            .map_err(|_| type_error("不是有效的用例序号".to_string())),
        CellValue::Float(v) => integral_float(*v)
            .map(|p| BTreeSet::from([p as usize]))
            .ok_or_else(|| type_error("不是整数".to_string())),
        CellValue::Bool(_) => Err(type_error("不是整数".to_string())),
        CellValue::Text(text) => {
            let mut ordinals = BTreeSet::new();
            for piece in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let ordinal = piece
                    .parse::<usize>()
                    .map_err(|_| type_error(format!("{:?} 不是整数", piece)))?;
                ordinals.insert(ordinal);
            }
            Ok(ordinals)
        }
    }
}

/// 整数值的非负浮点数
fn integral_float(v: f64) -> Option<u64> {
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 {
        Some(v as u64)
    } else {
        None
    }
}
