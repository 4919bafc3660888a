// ==========================================
// 风险测试选择系统 - 表格数据模型
// ==========================================
// 职责: 导入层与引擎之间的交换结构（表头行号 + 行数据）
// 说明: 输入与输出使用同一结构，回写时只改写选择列/前置条件列
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// CellValue - 单元格值
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl CellValue {
    pub fn text<S: Into<String>>(value: S) -> Self {
        CellValue::Text(value.into())
    }

    /// 空单元格或仅含空白的文本
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Int(v) => write!(f, "{}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Bool(v) => write!(f, "{}", v),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

// ==========================================
// Table - 表格
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub header_row: usize,         // 表头所在行（0 起始）
    pub rows: Vec<Vec<CellValue>>, // 全部行（含表头前的说明行）
}

impl Table {
    pub fn new(header_row: usize, rows: Vec<Vec<CellValue>>) -> Self {
        Self { header_row, rows }
    }

    /// 表头单元格
    pub fn header(&self) -> Option<&[CellValue]> {
        self.rows.get(self.header_row).map(|r| r.as_slice())
    }

    /// 表头之后的数据行（行号, 行数据）
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &Vec<CellValue>)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .skip(self.header_row.saturating_add(1))
    }

    /// 读取单元格；越界视为空
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(EMPTY)
    }

    /// 写入单元格；行长度不足时以空单元格补齐
    pub fn set_cell(&mut self, row: usize, col: usize, value: CellValue) {
        if row >= self.rows.len() {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if col >= cells.len() {
            cells.resize_with(col + 1, CellValue::default);
        }
        cells[col] = value;
    }
}
