// ==========================================
// 风险测试选择系统 - 导入层
// ==========================================
// 职责: 外部表格读取、表头定位、用例提取、结果回写
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod error;
pub mod exporter;
pub mod file_parser;
pub mod header_locator;
pub mod item_extractor;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use exporter::SelectionExporter;
pub use file_parser::{CsvParser, ExcelParser, TableParser, UniversalFileParser};
pub use header_locator::{column_index, ColumnIndices, HeaderLocator};
pub use item_extractor::ItemExtractor;
