// ==========================================
// 库存缓冲决策引擎 - 物料快照数据仓储
// ==========================================
// 表: item_snapshot (sku + location_id 主键，无库位存空串)
// ==========================================

use crate::domain::item::ItemSnapshot;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::store::ItemStore;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_COLUMNS: &str = r#"
    SELECT sku, location_id, buffer_profile_id, on_hand, on_order,
           qualified_demand, adu, lead_time_days, variability_factor
    FROM item_snapshot
"#;

// ==========================================
// ItemSnapshotRepository - 物料快照仓储
// ==========================================
pub struct ItemSnapshotRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ItemSnapshotRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入或覆盖物料快照
    pub fn upsert(&self, item: &ItemSnapshot) -> RepositoryResult<()> {
        if item.sku.trim().is_empty() {
            return Err(RepositoryError::FieldValueError {
                field: "sku".to_string(),
                message: "不能为空".to_string(),
            });
        }

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO item_snapshot (
                sku, location_id, buffer_profile_id, on_hand, on_order,
                qualified_demand, adu, lead_time_days, variability_factor
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(sku, location_id) DO UPDATE SET
                buffer_profile_id = excluded.buffer_profile_id,
                on_hand = excluded.on_hand,
                on_order = excluded.on_order,
                qualified_demand = excluded.qualified_demand,
                adu = excluded.adu,
                lead_time_days = excluded.lead_time_days,
                variability_factor = excluded.variability_factor
            "#,
            params![
                item.sku,
                item.location_id.as_deref().unwrap_or(""),
                item.buffer_profile_id,
                item.on_hand,
                item.on_order,
                item.qualified_demand,
                item.adu,
                item.lead_time_days,
                item.variability_factor,
            ],
        )?;
        Ok(())
    }

    /// 批量写入 (单事务)
    pub fn batch_upsert(&self, items: &[ItemSnapshot]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        for item in items {
            tx.execute(
                r#"
                INSERT OR REPLACE INTO item_snapshot (
                    sku, location_id, buffer_profile_id, on_hand, on_order,
                    qualified_demand, adu, lead_time_days, variability_factor
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
                params![
                    item.sku,
                    item.location_id.as_deref().unwrap_or(""),
                    item.buffer_profile_id,
                    item.on_hand,
                    item.on_order,
                    item.qualified_demand,
                    item.adu,
                    item.lead_time_days,
                    item.variability_factor,
                ],
            )?;
        }
        tx.commit()?;
        Ok(items.len())
    }

    /// 行映射; 数值列为 NULL 时按 0 处理
    fn map_row(row: &Row) -> SqliteResult<ItemSnapshot> {
        let location_id: String = row.get(1)?;
        Ok(ItemSnapshot {
            sku: row.get(0)?,
            location_id: if location_id.is_empty() { None } else { Some(location_id) },
            buffer_profile_id: row.get(2)?,
            on_hand: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
            on_order: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
            qualified_demand: row.get::<_, Option<f64>>(5)?.unwrap_or(0.0),
            adu: row.get::<_, Option<f64>>(6)?.unwrap_or(0.0),
            lead_time_days: row.get::<_, Option<f64>>(7)?.unwrap_or(0.0),
            variability_factor: row.get::<_, Option<f64>>(8)?.unwrap_or(0.0),
        })
    }
}

impl ItemStore for ItemSnapshotRepository {
    fn get_item(&self, sku: &str, location_id: Option<&str>) -> RepositoryResult<Option<ItemSnapshot>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE sku = ?1 AND location_id = ?2", SELECT_COLUMNS);
        let item = conn
            .query_row(&sql, params![sku, location_id.unwrap_or("")], Self::map_row)
            .optional()?;
        Ok(item)
    }

    fn list_items(&self) -> RepositoryResult<Vec<ItemSnapshot>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY sku, location_id", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(items)
    }
}
