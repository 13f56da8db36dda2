// ==========================================
// 库存缓冲决策引擎 - 批处理入口
// ==========================================
// 用法:
//   inventory-decision-engine [db_path] [scope_id]
//
// 打开记录存储 → 加载分层配置 → 评估全部物料缓冲状态
// stdout: 每个物料一行 JSON; 失败项记入日志
// ==========================================

use anyhow::Context;
use inventory_decision_engine::config::{ConfigManager, ConfigScope};
use inventory_decision_engine::db::{default_db_path, init_schema, open_sqlite_connection};
use inventory_decision_engine::engine::BufferStatusPipeline;
use inventory_decision_engine::logging;
use inventory_decision_engine::repository::{BufferProfileRepository, ItemSnapshotRepository};
use std::io::Write;
use std::sync::{Arc, Mutex};

fn main() -> anyhow::Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let db_path = args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default_db_path);
    let scope = args
        .next()
        .map(|s| ConfigScope::parse(&s))
        .unwrap_or(ConfigScope::Global);

    tracing::info!(
        version = inventory_decision_engine::VERSION,
        db_path = %db_path,
        scope_id = %scope.scope_id(),
        "{} 启动",
        inventory_decision_engine::APP_NAME
    );

    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("无法打开数据库 {}", db_path))?;
    init_schema(&conn).context("初始化参考 schema 失败")?;
    let conn = Arc::new(Mutex::new(conn));

    let config = ConfigManager::from_connection(conn.clone())
        .load_engine_config(&scope)
        .context("加载引擎配置失败")?;

    let items = ItemSnapshotRepository::new(conn.clone());
    let profiles = BufferProfileRepository::new(conn);

    let outcome = BufferStatusPipeline::new()
        .evaluate_store(&items, &profiles, &config)
        .context("缓冲状态批处理失败")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for status in &outcome.statuses {
        writeln!(out, "{}", serde_json::to_string(status)?)?;
    }
    out.flush()?;

    for failure in &outcome.failures {
        tracing::warn!(record_key = %failure.record_key, error = %failure.error, "物料未评估");
    }

    let summary = outcome.health_summary();
    tracing::info!(
        evaluated = summary.evaluated,
        not_computable = summary.not_computable,
        red = summary.red,
        yellow = summary.yellow,
        green = summary.green,
        blue = summary.blue,
        health_score = summary.health_score,
        average_penetration = summary.average_penetration,
        "缓冲健康汇总"
    );

    Ok(())
}
