// ==========================================
// 风险测试选择系统 - 结果回写
// ==========================================
// 职责: 最终状态 → 表格（选择列 y/n，前置条件列升序逗号串）→ CSV
// 说明: 仅改写两列，其余单元格与行顺序保持原样
// ==========================================

use crate::domain::item::TestItem;
use crate::domain::table::{CellValue, Table};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::header_locator::ColumnIndices;
use csv::WriterBuilder;
use std::path::Path;
use tracing::info;

pub struct SelectionExporter;

impl SelectionExporter {
    /// 将用例最终状态写回表格
    pub fn apply(&self, table: &mut Table, items: &[TestItem], columns: &ColumnIndices) {
        for item in items {
            table.set_cell(
                item.row_index,
                columns.selection,
                CellValue::text(item.state.as_marker()),
            );

            if let Some(col) = columns.precondition {
                table.set_cell(
                    item.row_index,
                    col,
                    CellValue::from(item.preconditions_text().as_str()),
                );
            }
        }
    }

    /// 表格整体写出为 CSV（含表头前的说明行）
    pub fn write_csv<P: AsRef<Path>>(&self, table: &Table, path: P) -> ImportResult<()> {
        let path = path.as_ref();
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| ImportError::CsvWriteError(e.to_string()))?;

        for row in &table.rows {
            writer
                .write_record(row.iter().map(|cell| cell.to_string()))
                .map_err(|e| ImportError::CsvWriteError(e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| ImportError::CsvWriteError(e.to_string()))?;

        info!(path = %path.display(), rows = table.rows.len(), "结果已写出");
        Ok(())
    }
}
