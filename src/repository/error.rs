// ==========================================
// 库存缓冲决策引擎 - 仓储层错误类型
// ==========================================
// 上抛: EngineError::Store / Conflict (见 crate::error)
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    // ===== 数据质量错误 =====
    #[error("数据验证失败: {0}")]
    ValidationError(String),

    #[error("字段值错误 (field={field}): {message}")]
    FieldValueError { field: String, message: String },

    #[error("序列化失败: {0}")]
    SerializationError(String),
}

// SQLite 错误分类: 唯一约束冲突按消息文本区分，其余一律为查询失败
// 查无结果由仓储用 optional() 表达为 None，不在此映射
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("UNIQUE") => {
                RepositoryError::UniqueConstraintViolation(msg)
            }
            rusqlite::Error::SqliteFailure(_, Some(msg)) => RepositoryError::DatabaseQueryError(msg),
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::SerializationError(err.to_string())
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

// ==========================================
// 枚举列解析
// ==========================================

/// 将 TEXT 列按 serde snake_case 名称解析为枚举
///
/// 失败时返回 FromSqlConversionFailure，由 `?` 转换为 DatabaseQueryError。
pub(crate) fn parse_enum_column<T: serde::de::DeserializeOwned>(
    idx: usize,
    raw: String,
) -> rusqlite::Result<T> {
    serde_json::from_value(serde_json::Value::String(raw)).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// 枚举 → 存储用字符串
pub(crate) fn enum_to_column<T: serde::Serialize>(value: &T) -> RepositoryResult<String> {
    match serde_json::to_value(value)? {
        serde_json::Value::String(s) => Ok(s),
        other => Err(RepositoryError::SerializationError(format!(
            "枚举未序列化为字符串: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{LeadTimeCategory, VariabilityLevel};

    #[test]
    fn test_unique_failure_mapped() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id TEXT PRIMARY KEY); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err: RepositoryError = conn
            .execute("INSERT INTO t VALUES ('a')", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    }

    #[test]
    fn test_other_sqlite_failures_are_query_errors() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id TEXT PRIMARY KEY NOT NULL);").unwrap();

        let err: RepositoryError = conn
            .execute("INSERT INTO t VALUES (NULL)", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, RepositoryError::DatabaseQueryError(_)));

        let err: RepositoryError = conn
            .query_row("SELECT id FROM t", [], |row| row.get::<_, String>(0))
            .unwrap_err()
            .into();
        assert!(matches!(err, RepositoryError::DatabaseQueryError(_)));
    }

    #[test]
    fn test_enum_column_helpers() {
        assert_eq!(enum_to_column(&LeadTimeCategory::Medium).unwrap(), "medium");
        let parsed: VariabilityLevel = parse_enum_column(0, "high".to_string()).unwrap();
        assert_eq!(parsed, VariabilityLevel::High);
        assert!(parse_enum_column::<VariabilityLevel>(0, "extreme".to_string()).is_err());
    }
}
