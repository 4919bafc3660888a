// ==========================================
// 风险测试选择系统 - 表头定位
// ==========================================
// 职责: 在前 N 行中定位表头，并解析各列下标
// 规则: 第一个包含全部必需列名的行即为表头（忽略大小写与首尾空白）
// ==========================================

use crate::config::RunConfig;
use crate::domain::table::Table;
use crate::importer::error::{ImportError, ImportResult};
use tracing::debug;

// ==========================================
// ColumnIndices - 列下标
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndices {
    pub risk: usize,
    pub cost: usize,
    pub selection: usize,
    pub precondition: Option<usize>,
}

// ==========================================
// HeaderLocator - 表头定位器
// ==========================================
pub struct HeaderLocator {
    max_rows: usize, // 最多检查的前导行数
}

impl HeaderLocator {
    pub fn new(max_rows: usize) -> Self {
        Self { max_rows }
    }

    /// 定位表头并写入 table.header_row
    ///
    /// # 返回
    /// 表头所在行（0 起始）
    pub fn locate(&self, table: &mut Table, required: &[&str]) -> ImportResult<usize> {
        let found = table
            .rows
            .iter()
            .take(self.max_rows)
            .position(|row| {
                required
                    .iter()
                    .all(|name| row.iter().any(|cell| header_matches(&cell.to_string(), name)))
            });

        match found {
            Some(row) => {
                table.header_row = row;
                debug!(header_row = row, "表头定位完成");
                Ok(row)
            }
            None => Err(ImportError::HeaderNotFound {
                columns: required.iter().map(|s| s.to_string()).collect(),
                searched_rows: self.max_rows,
            }),
        }
    }

    /// 按运行配置定位表头并解析列下标
    pub fn resolve_columns(&self, table: &mut Table, config: &RunConfig) -> ImportResult<ColumnIndices> {
        let mut required = vec![
            config.risk_factor_col.as_str(),
            config.execution_time_col.as_str(),
            config.selection_col.as_str(),
        ];
        let precondition_col = config
            .precondition_col
            .as_deref()
            .filter(|c| !c.trim().is_empty());
        if let Some(col) = precondition_col {
            required.push(col);
        }

        self.locate(table, &required)?;

        Ok(ColumnIndices {
            risk: column_index(table, &config.risk_factor_col)?,
            cost: column_index(table, &config.execution_time_col)?,
            selection: column_index(table, &config.selection_col)?,
            precondition: match precondition_col {
                Some(col) => Some(column_index(table, col)?),
                None => None,
            },
        })
    }
}

/// 在表头中查找列下标
pub fn column_index(table: &Table, name: &str) -> ImportResult<usize> {
    table
        .header()
        .and_then(|header| {
            header
                .iter()
                .position(|cell| header_matches(&cell.to_string(), name))
        })
        .ok_or_else(|| ImportError::MissingColumn(name.to_string()))
}

fn header_matches(cell: &str, name: &str) -> bool {
    cell.trim().eq_ignore_ascii_case(name.trim())
}
