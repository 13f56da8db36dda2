// ==========================================
// 库存缓冲决策引擎 - 引擎错误类型
// ==========================================
// 职责: 定义引擎对调用方暴露的类型化错误
// 红线: 真实错误不得静默替换为默认值
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 引擎错误类型
///
/// 每个操作返回结果或类型化错误，由调用方决定中止还是降级。
#[derive(Error, Debug)]
pub enum EngineError {
    /// 输入缺失或格式错误 (例如空 location_id)
    #[error("输入校验失败: {0}")]
    Validation(String),

    /// 唯一性冲突 (例如同一库位重复的有效解耦点)
    #[error("唯一性冲突: {0}")]
    Conflict(String),

    /// 数据不足，无法评分任何候选预测
    #[error("数据不足: {0}")]
    InsufficientData(String),

    /// 配置非法 (基准占比之和≠1、阈值非单调等)
    #[error("配置错误: {0}")]
    Configuration(String),

    /// 外部记录存储失败
    #[error("记录存储错误: {0}")]
    Store(String),
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        EngineError::Conflict(msg.into())
    }

    pub fn insufficient_data(msg: impl Into<String>) -> Self {
        EngineError::InsufficientData(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        EngineError::Configuration(msg.into())
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for EngineError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueConstraintViolation(msg) => EngineError::Conflict(msg),
            RepositoryError::ValidationError(msg) => EngineError::Validation(msg),
            RepositoryError::FieldValueError { field, message } => {
                EngineError::Validation(format!("字段{}错误: {}", field, message))
            }
            other => EngineError::Store(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_mapping() {
        let err: EngineError =
            RepositoryError::UniqueConstraintViolation("decoupling_point.location_id".into()).into();
        assert!(matches!(err, EngineError::Conflict(_)));

        let err: EngineError = RepositoryError::LockError("poisoned".into()).into();
        assert!(matches!(err, EngineError::Store(_)));

        let err: EngineError = RepositoryError::FieldValueError {
            field: "decoupling_type".into(),
            message: "unknown".into(),
        }
        .into();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn test_error_display_contains_reason() {
        let err = EngineError::validation("location_id 不能为空");
        assert!(err.to_string().contains("location_id"));
    }
}
