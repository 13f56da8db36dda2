// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库初始化、测试快照生成
// ==========================================

#![allow(dead_code)]

use inventory_decision_engine::db::{init_schema, open_sqlite_connection};
use inventory_decision_engine::domain::{BufferProfile, ItemSnapshot};
use rusqlite::Connection;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化参考 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开共享连接
pub fn shared_connection(db_path: &str) -> Arc<Mutex<Connection>> {
    let conn = open_sqlite_connection(db_path).expect("打开测试数据库失败");
    Arc::new(Mutex::new(conn))
}

/// 构造物料快照
pub fn create_test_item(sku: &str, adu: f64, lead_time_days: f64) -> ItemSnapshot {
    let mut item = ItemSnapshot::new(sku);
    item.adu = adu;
    item.lead_time_days = lead_time_days;
    item
}

/// 构造带库存的物料快照
pub fn create_stocked_item(
    sku: &str,
    adu: f64,
    lead_time_days: f64,
    on_hand: f64,
    on_order: f64,
    qualified_demand: f64,
) -> ItemSnapshot {
    let mut item = create_test_item(sku, adu, lead_time_days);
    item.on_hand = on_hand;
    item.on_order = on_order;
    item.qualified_demand = qualified_demand;
    item
}

/// 构造带 MOQ 的配置档
pub fn create_test_profile(
    profile_id: &str,
    variability: inventory_decision_engine::VariabilityLevel,
    lead_time: inventory_decision_engine::LeadTimeCategory,
    moq: Option<f64>,
) -> BufferProfile {
    let mut profile = BufferProfile::new(profile_id, variability, lead_time);
    profile.moq = moq;
    profile
}
