// ==========================================
// 库存缓冲决策引擎 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 提供记录存储适配器使用的参考 schema (幂等建表)
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 参考 schema 版本
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：foreign_keys 与 busy_timeout 都需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 默认数据库路径
///
/// 优先级: 环境变量 INVENTORY_DECISION_ENGINE_DB_PATH → 用户数据目录 → 当前目录
pub fn default_db_path() -> String {
    if let Ok(path) = std::env::var("INVENTORY_DECISION_ENGINE_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./inventory_decision_engine.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("inventory-decision-engine");
        // 目录创建失败时仍返回该路径，由打开连接时报错
        let _ = std::fs::create_dir_all(&dir);
        path = dir.join("inventory_decision_engine.db");
    }

    path.to_string_lossy().to_string()
}

/// 建立参考 schema (幂等)
///
/// 表:
/// - config_kv: 分层配置
/// - item_snapshot: 物料快照 (ItemStore)
/// - buffer_profile: 缓冲配置档 (ProfileStore)
/// - decoupling_point: 有效解耦点，location_id 唯一
/// - classification_history: 分类历史，只追加
/// - zone_adjustment_log: 缓冲区人工调整日志，只追加
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS buffer_profile (
            profile_id TEXT PRIMARY KEY,
            variability_factor TEXT NOT NULL,
            lead_time_factor TEXT NOT NULL,
            moq REAL,
            lot_size_factor REAL
        );

        CREATE TABLE IF NOT EXISTS item_snapshot (
            sku TEXT NOT NULL,
            location_id TEXT NOT NULL DEFAULT '',
            buffer_profile_id TEXT,
            on_hand REAL,
            on_order REAL,
            qualified_demand REAL,
            adu REAL,
            lead_time_days REAL,
            variability_factor REAL,
            PRIMARY KEY (sku, location_id)
        );

        CREATE TABLE IF NOT EXISTS decoupling_point (
            location_id TEXT PRIMARY KEY,
            decoupling_type TEXT NOT NULL,
            buffer_profile_id TEXT NOT NULL,
            description TEXT
        );

        CREATE TABLE IF NOT EXISTS classification_history (
            record_id TEXT PRIMARY KEY,
            sku TEXT NOT NULL,
            lead_time_category TEXT NOT NULL,
            variability_level TEXT NOT NULL,
            criticality TEXT NOT NULL,
            score REAL NOT NULL,
            classified_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_classification_history_sku
            ON classification_history (sku, classified_at);

        CREATE TABLE IF NOT EXISTS zone_adjustment_log (
            adjustment_id TEXT PRIMARY KEY,
            sku TEXT NOT NULL,
            payload_json TEXT NOT NULL,
            reason TEXT NOT NULL,
            adjusted_at TEXT NOT NULL
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
