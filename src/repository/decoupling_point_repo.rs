// ==========================================
// 库存缓冲决策引擎 - 解耦点数据仓储
// ==========================================
// 表: decoupling_point (location_id 主键)
// 红线: 每库位至多一个有效解耦点; 重复插入返回唯一约束错误，
//       覆盖必须走 replace
// ==========================================

use crate::domain::decoupling::DecouplingPoint;
use crate::domain::types::DecouplingType;
use crate::repository::error::{enum_to_column, parse_enum_column, RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};


pub struct DecouplingPointRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DecouplingPointRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 登记解耦点
    ///
    /// # 返回
    /// - `Err(UniqueConstraintViolation)`: 库位已有有效解耦点
    pub fn insert(&self, point: &DecouplingPoint) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO decoupling_point (location_id, decoupling_type, buffer_profile_id, description)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                point.location_id,
                enum_to_column(&point.decoupling_type)?,
                point.buffer_profile_id,
                point.description,
            ],
        )?;
        Ok(())
    }

    /// 显式覆盖库位的解耦点
    pub fn replace(&self, point: &DecouplingPoint) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO decoupling_point (location_id, decoupling_type, buffer_profile_id, description)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(location_id) DO UPDATE SET
                decoupling_type = excluded.decoupling_type,
                buffer_profile_id = excluded.buffer_profile_id,
                description = excluded.description
            "#,
            params![
                point.location_id,
                enum_to_column(&point.decoupling_type)?,
                point.buffer_profile_id,
                point.description,
            ],
        )?;
        Ok(())
    }

    /// 停用库位的解耦点
    ///
    /// # 返回
    /// - `Ok(true)`: 已停用
    /// - `Ok(false)`: 库位没有有效解耦点
    pub fn deactivate(&self, location_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "DELETE FROM decoupling_point WHERE location_id = ?1",
            params![location_id],
        )?;
        Ok(rows > 0)
    }

    // ==========================================
    // 查询操作
    // ==========================================

    pub fn find(&self, location_id: &str) -> RepositoryResult<Option<DecouplingPoint>> {
        let conn = self.get_conn()?;
        let point = conn
            .query_row(
                r#"
                SELECT location_id, decoupling_type, buffer_profile_id, description
                FROM decoupling_point WHERE location_id = ?1
                "#,
                params![location_id],
                Self::map_row,
            )
            .optional()?;
        Ok(point)
    }

    pub fn list(&self) -> RepositoryResult<Vec<DecouplingPoint>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT location_id, decoupling_type, buffer_profile_id, description
            FROM decoupling_point ORDER BY location_id
            "#,
        )?;
        let points = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(points)
    }

    /// 按类型计数 (供分布对比)
    pub fn count_by_type(&self) -> RepositoryResult<BTreeMap<DecouplingType, usize>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT decoupling_type, COUNT(*) FROM decoupling_point GROUP BY decoupling_type",
        )?;
        let rows = stmt
            .query_map([], |row| {
                let t: DecouplingType = parse_enum_column(0, row.get(0)?)?;
                let n: i64 = row.get(1)?;
                Ok((t, n as usize))
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows.into_iter().collect())
    }

    fn map_row(row: &Row) -> SqliteResult<DecouplingPoint> {
        Ok(DecouplingPoint {
            location_id: row.get(0)?,
            decoupling_type: parse_enum_column(1, row.get(1)?)?,
            buffer_profile_id: row.get(2)?,
            description: row.get(3)?,
        })
    }
}
