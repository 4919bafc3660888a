// ==========================================
// 风险测试选择系统 - 文件解析器实现
// ==========================================
// 职责: 文件 → 表格（逐单元格读取，不做类型转换）
// 支持: Excel (.xlsx/.xls/.xlsm/.ods) / CSV (.csv)
// 说明: 表头行号暂置 0，由 HeaderLocator 定位
// ==========================================

use crate::domain::table::{CellValue, Table};
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::debug;

// ==========================================
// TableParser Trait
// ==========================================
pub trait TableParser {
    fn parse_to_table(&self, file_path: &Path) -> ImportResult<Table>;
}

/// 检查文件存在
fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

/// 小写扩展名
fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl TableParser for CsvParser {
    fn parse_to_table(&self, file_path: &Path) -> ImportResult<Table> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        // 表头位置未知，全部按数据行读取
        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(CellValue::from).collect());
        }

        debug!(rows = rows.len(), "CSV 读取完成");
        Ok(Table::new(0, rows))
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl TableParser for ExcelParser {
    fn parse_to_table(&self, file_path: &Path) -> ImportResult<Table> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if !matches!(ext.as_str(), "xlsx" | "xls" | "xlsm" | "ods") {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        // 打开工作簿（按扩展名自动识别格式）
        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        let rows: Vec<Vec<CellValue>> = range
            .rows()
            .map(|row| row.iter().map(cell_from_excel).collect())
            .collect();

        debug!(sheet = %sheet_name, rows = rows.len(), "Excel 读取完成");
        Ok(Table::new(0, rows))
    }
}

/// Excel 单元格 → CellValue
fn cell_from_excel(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::Int(v) => CellValue::Int(*v),
        Data::Float(v) => CellValue::Float(*v),
        Data::Bool(v) => CellValue::Bool(*v),
        Data::String(s) => CellValue::from(s.as_str()),
        other => CellValue::Text(other.to_string()),
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Table> {
        let path = file_path.as_ref();

        match extension_of(path).as_str() {
            "csv" => CsvParser.parse_to_table(path),
            "xlsx" | "xls" | "xlsm" | "ods" => ExcelParser.parse_to_table(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
