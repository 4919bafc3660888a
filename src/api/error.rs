// ==========================================
// 风险测试选择系统 - API层错误类型
// ==========================================
// 职责: 汇总导入层与引擎层错误，映射到统一的错误分类
// ==========================================

use crate::engine::error::EngineError;
use crate::importer::error::ImportError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("选择失败: {0}")]
    Engine(#[from] EngineError),

    #[error("无效输入: {0}")]
    InvalidInput(String),
}

// ==========================================
// ErrorKind - 错误分类
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InputValidation,    // 列缺失 / 单元格类型 / 前置条件引用 / 预算非正
    SeedingContradiction,
    ResourceExhaustion, // 正常流程中由编排器吸收
    UndefinedRatio,
    Io,                 // 文件读写
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InputValidation => "INPUT_VALIDATION",
            ErrorKind::SeedingContradiction => "SEEDING_CONTRADICTION",
            ErrorKind::ResourceExhaustion => "RESOURCE_EXHAUSTION",
            ErrorKind::UndefinedRatio => "UNDEFINED_RATIO",
            ErrorKind::Io => "IO",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ApiError {
    /// 错误分类
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Import(err) if err.is_validation() => ErrorKind::InputValidation,
            ApiError::Import(_) => ErrorKind::Io,
            ApiError::Engine(EngineError::InvalidBudget(_)) => ErrorKind::InputValidation,
            ApiError::Engine(EngineError::SeedingContradiction(_)) => {
                ErrorKind::SeedingContradiction
            }
            ApiError::Engine(EngineError::ResourceExhaustion { .. }) => {
                ErrorKind::ResourceExhaustion
            }
            ApiError::Engine(EngineError::UndefinedRatio) => ErrorKind::UndefinedRatio,
            ApiError::InvalidInput(_) => ErrorKind::InputValidation,
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::SeedingConflict;

    #[test]
    fn test_kind_mapping() {
        let missing: ApiError = ImportError::MissingColumn("Risk Factor".to_string()).into();
        assert_eq!(missing.kind(), ErrorKind::InputValidation);

        let io: ApiError = ImportError::FileNotFound("a.csv".to_string()).into();
        assert_eq!(io.kind(), ErrorKind::Io);

        let budget: ApiError = EngineError::InvalidBudget(-1).into();
        assert_eq!(budget.kind(), ErrorKind::InputValidation);

        let conflict: ApiError = EngineError::SeedingContradiction(
            SeedingConflict::ExcludedDependency {
                selected: 3,
                excluded: 1,
            },
        )
        .into();
        assert_eq!(conflict.kind(), ErrorKind::SeedingContradiction);

        let ratio: ApiError = EngineError::UndefinedRatio.into();
        assert_eq!(ratio.kind(), ErrorKind::UndefinedRatio);
    }

    #[test]
    fn test_error_message_carries_cause() {
        let err: ApiError = EngineError::SeedingContradiction(SeedingConflict::ExcludedDependency {
            selected: 3,
            excluded: 1,
        })
        .into();

        let message = err.to_string();
        assert!(message.contains("用例 3"));
        assert!(message.contains("用例 1"));
    }
}
