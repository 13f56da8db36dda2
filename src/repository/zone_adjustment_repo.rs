// ==========================================
// 库存缓冲决策引擎 - 缓冲区调整日志数据仓储
// ==========================================
// 表: zone_adjustment_log
// 红线: 只追加; 每次人工调整必须带原因
// ==========================================

use crate::domain::buffer::ZoneAdjustment;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct ZoneAdjustmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ZoneAdjustmentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入调整日志 (完整调整前后数据存 payload_json)
    pub fn insert(&self, adjustment: &ZoneAdjustment) -> RepositoryResult<String> {
        if adjustment.reason.trim().is_empty() {
            return Err(RepositoryError::ValidationError(format!(
                "调整 {} 缺少原因",
                adjustment.adjustment_id
            )));
        }

        let payload = serde_json::to_string(adjustment)?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO zone_adjustment_log (adjustment_id, sku, payload_json, reason, adjusted_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                adjustment.adjustment_id,
                adjustment.sku,
                payload,
                adjustment.reason,
                adjustment.adjusted_at,
            ],
        )?;
        Ok(adjustment.adjustment_id.clone())
    }

    /// 某 SKU 的调整日志 (按时间升序)
    pub fn list_for_sku(&self, sku: &str) -> RepositoryResult<Vec<ZoneAdjustment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT payload_json FROM zone_adjustment_log
            WHERE sku = ?1
            ORDER BY adjusted_at ASC, rowid ASC
            "#,
        )?;
        let payloads = stmt
            .query_map(params![sku], |row| row.get::<_, String>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;

        payloads
            .iter()
            .map(|p| serde_json::from_str::<ZoneAdjustment>(p).map_err(RepositoryError::from))
            .collect()
    }
}
