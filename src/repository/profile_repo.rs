// ==========================================
// 库存缓冲决策引擎 - 缓冲配置档数据仓储
// ==========================================
// 表: buffer_profile
// ==========================================

use crate::domain::item::BufferProfile;
use crate::repository::error::{enum_to_column, parse_enum_column, RepositoryError, RepositoryResult};
use crate::repository::store::ProfileStore;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct BufferProfileRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BufferProfileRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入或覆盖配置档
    pub fn upsert(&self, profile: &BufferProfile) -> RepositoryResult<()> {
        if profile.profile_id.trim().is_empty() {
            return Err(RepositoryError::FieldValueError {
                field: "profile_id".to_string(),
                message: "不能为空".to_string(),
            });
        }

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO buffer_profile (
                profile_id, variability_factor, lead_time_factor, moq, lot_size_factor
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                profile.profile_id,
                enum_to_column(&profile.variability_factor)?,
                enum_to_column(&profile.lead_time_factor)?,
                profile.moq,
                profile.lot_size_factor,
            ],
        )?;
        Ok(())
    }

    pub fn list(&self) -> RepositoryResult<Vec<BufferProfile>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT profile_id, variability_factor, lead_time_factor, moq, lot_size_factor
            FROM buffer_profile
            ORDER BY profile_id
            "#,
        )?;
        let profiles = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(profiles)
    }

    fn map_row(row: &Row) -> SqliteResult<BufferProfile> {
        Ok(BufferProfile {
            profile_id: row.get(0)?,
            variability_factor: parse_enum_column(1, row.get(1)?)?,
            lead_time_factor: parse_enum_column(2, row.get(2)?)?,
            moq: row.get(3)?,
            lot_size_factor: row.get(4)?,
        })
    }
}

impl ProfileStore for BufferProfileRepository {
    fn get_profile(&self, profile_id: &str) -> RepositoryResult<Option<BufferProfile>> {
        let conn = self.get_conn()?;
        let profile = conn
            .query_row(
                r#"
                SELECT profile_id, variability_factor, lead_time_factor, moq, lot_size_factor
                FROM buffer_profile
                WHERE profile_id = ?1
                "#,
                params![profile_id],
                Self::map_row,
            )
            .optional()?;
        Ok(profile)
    }
}
