// ==========================================
// 库存缓冲决策引擎 - 分类历史数据仓储
// ==========================================
// 表: classification_history
// 红线: 只追加，不提供 UPDATE / DELETE
// ==========================================

use crate::domain::classification::{Classification, ClassificationRecord};
use crate::repository::error::{enum_to_column, parse_enum_column, RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_COLUMNS: &str = r#"
    SELECT record_id, sku, lead_time_category, variability_level, criticality, score, classified_at
    FROM classification_history
"#;

pub struct ClassificationHistoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ClassificationHistoryRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 追加一条分类记录
    ///
    /// # 返回
    /// - `Ok(record_id)`
    pub fn append(&self, record: &ClassificationRecord) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let c = &record.classification;
        conn.execute(
            r#"
            INSERT INTO classification_history (
                record_id, sku, lead_time_category, variability_level, criticality, score, classified_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                record.record_id,
                record.sku,
                enum_to_column(&c.lead_time_category)?,
                enum_to_column(&c.variability_level)?,
                enum_to_column(&c.criticality)?,
                c.score,
                record.classified_at,
            ],
        )?;
        Ok(record.record_id.clone())
    }

    /// 某 SKU 的全部历史 (按时间升序)
    pub fn list_for_sku(&self, sku: &str) -> RepositoryResult<Vec<ClassificationRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE sku = ?1 ORDER BY classified_at ASC, rowid ASC", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![sku], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 某 SKU 最新一条记录
    pub fn latest_for_sku(&self, sku: &str) -> RepositoryResult<Option<ClassificationRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE sku = ?1 ORDER BY classified_at DESC, rowid DESC LIMIT 1",
            SELECT_COLUMNS
        );
        let record = conn.query_row(&sql, params![sku], Self::map_row).optional()?;
        Ok(record)
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM classification_history", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn map_row(row: &Row) -> SqliteResult<ClassificationRecord> {
        Ok(ClassificationRecord {
            record_id: row.get(0)?,
            sku: row.get(1)?,
            classification: Classification {
                lead_time_category: parse_enum_column(2, row.get(2)?)?,
                variability_level: parse_enum_column(3, row.get(3)?)?,
                criticality: parse_enum_column(4, row.get(4)?)?,
                score: row.get(5)?,
            },
            classified_at: row.get(6)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use crate::domain::types::{Criticality, LeadTimeCategory, VariabilityLevel};
    use chrono::{NaiveDate, NaiveDateTime};

    fn setup() -> ClassificationHistoryRepository {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ClassificationHistoryRepository::new(Arc::new(Mutex::new(conn)))
    }

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, day)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn record(sku: &str, criticality: Criticality, day: u32) -> ClassificationRecord {
        ClassificationRecord::new(
            sku,
            Classification {
                lead_time_category: LeadTimeCategory::Medium,
                variability_level: VariabilityLevel::High,
                criticality,
                score: 50.0,
            },
            ts(day),
        )
    }

    #[test]
    fn test_append_keeps_full_history() {
        let repo = setup();
        repo.append(&record("SKU-1", Criticality::Low, 1)).unwrap();
        repo.append(&record("SKU-1", Criticality::High, 3)).unwrap();
        repo.append(&record("SKU-2", Criticality::Medium, 2)).unwrap();

        let history = repo.list_for_sku("SKU-1").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].classification.criticality, Criticality::Low);
        assert_eq!(history[1].classified_at, ts(3));
        assert_eq!(repo.count().unwrap(), 3);
    }

    #[test]
    fn test_latest_for_sku() {
        let repo = setup();
        repo.append(&record("SKU-1", Criticality::High, 5)).unwrap();
        repo.append(&record("SKU-1", Criticality::Low, 4)).unwrap();

        let latest = repo.latest_for_sku("SKU-1").unwrap().unwrap();
        assert_eq!(latest.classification.criticality, Criticality::High);
        assert!(repo.latest_for_sku("SKU-404").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_record_id_rejected() {
        let repo = setup();
        let r = record("SKU-1", Criticality::Low, 1);
        repo.append(&r).unwrap();
        let err = repo.append(&r).unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    }
}
