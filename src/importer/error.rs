// ==========================================
// 风险测试选择系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 所有输入校验错误在求解前一次性暴露，对本次运行是致命的
// ==========================================

use thiserror::Error;

/// 导入模块错误类型（行号均为表格中的 1 起始行号）
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.xlsm/.ods/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("CSV 写入失败: {0}")]
    CsvWriteError(String),

    // ===== 表头/列错误 =====
    #[error("前 {searched_rows} 行中未找到表头（需要列: {columns:?}）")]
    HeaderNotFound {
        columns: Vec<String>,
        searched_rows: usize,
    },

    #[error("缺少必需列: {0}")]
    MissingColumn(String),

    // ===== 单元格类型错误 =====
    #[error("风险因子格式错误 (行 {row}): 期望非负实数，实际 {value:?}")]
    RiskFactorTypeError { row: usize, value: String },

    #[error("执行时间格式错误 (行 {row}): 期望非负整数，实际 {value:?}")]
    ExecutionTimeTypeError { row: usize, value: String },

    #[error("前置条件格式错误 (行 {row}, 值 {value:?}): {message}")]
    PreconditionTypeError {
        row: usize,
        value: String,
        message: String,
    },
}

impl ImportError {
    /// 是否属于输入校验类错误（列缺失/单元格类型/前置条件引用）
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ImportError::HeaderNotFound { .. }
                | ImportError::MissingColumn(_)
                | ImportError::RiskFactorTypeError { .. }
                | ImportError::ExecutionTimeTypeError { .. }
                | ImportError::PreconditionTypeError { .. }
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
