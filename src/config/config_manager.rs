// ==========================================
// 库存缓冲决策引擎 - 配置管理器
// ==========================================
// 职责: 从 config_kv 表加载分层配置 (默认值 → global → 租户)
// 存储: config_kv 表 (scope_id + key → value)
// 红线: 无法解析的值返回 Configuration 错误，不静默回退默认值
// ==========================================

use crate::config::engine_config::{DecouplingBenchmarks, EngineConfig};
use crate::db::open_sqlite_connection;
use crate::error::{EngineError, EngineResult};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ConfigScope - 配置作用域
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigScope {
    Global,                       // 全局
    Tenant { tenant_id: String }, // 租户/部署
}

impl ConfigScope {
    pub fn tenant(tenant_id: impl Into<String>) -> Self {
        ConfigScope::Tenant {
            tenant_id: tenant_id.into(),
        }
    }

    /// 存储用 scope_id
    pub fn scope_id(&self) -> String {
        match self {
            ConfigScope::Global => "global".to_string(),
            ConfigScope::Tenant { tenant_id } => format!("tenant/{}", tenant_id),
        }
    }

    /// 从命令行/存储的 scope_id 还原
    pub fn parse(scope_id: &str) -> Self {
        let trimmed = scope_id.trim();
        match trimmed.strip_prefix("tenant/") {
            Some(id) if !id.is_empty() => ConfigScope::tenant(id),
            _ if trimmed.is_empty() || trimmed == "global" => ConfigScope::Global,
            _ => ConfigScope::tenant(trimmed),
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 缓冲区: 提前期分段
    pub const SHORT_LEAD_TIME_THRESHOLD: &str = "short_lead_time_threshold";
    pub const MEDIUM_LEAD_TIME_THRESHOLD: &str = "medium_lead_time_threshold";
    pub const SHORT_LEAD_TIME_FACTOR: &str = "short_lead_time_factor";
    pub const MEDIUM_LEAD_TIME_FACTOR: &str = "medium_lead_time_factor";
    pub const LONG_LEAD_TIME_FACTOR: &str = "long_lead_time_factor";

    // 缓冲区: 变异乘数
    pub const LOW_VARIABILITY_FACTOR: &str = "low_variability_factor";
    pub const MEDIUM_VARIABILITY_FACTOR: &str = "medium_variability_factor";
    pub const HIGH_VARIABILITY_FACTOR: &str = "high_variability_factor";

    // 缓冲区: 黄/绿
    pub const REPLENISHMENT_TIME_FACTOR: &str = "replenishment_time_factor";
    pub const GREEN_ZONE_FACTOR: &str = "green_zone_factor";

    // SKU 分类
    pub const CLASSIFICATION_MEDIUM_LEAD_TIME_DAYS: &str = "classification_medium_lead_time_days";
    pub const CLASSIFICATION_LONG_LEAD_TIME_DAYS: &str = "classification_long_lead_time_days";
    pub const CLASSIFICATION_MEDIUM_VARIABILITY: &str = "classification_medium_variability";
    pub const CLASSIFICATION_HIGH_VARIABILITY: &str = "classification_high_variability";
    pub const CLASSIFICATION_WEIGHT_LEAD_TIME: &str = "classification_weight_lead_time";
    pub const CLASSIFICATION_WEIGHT_VARIABILITY: &str = "classification_weight_variability";
    pub const CLASSIFICATION_WEIGHT_CRITICALITY: &str = "classification_weight_criticality";
    pub const CLASSIFICATION_WEIGHT_IMPORTANCE: &str = "classification_weight_importance";

    // 解耦点
    pub const DECOUPLING_BENCHMARKS: &str = "decoupling_benchmarks"; // JSON
    pub const DECOUPLING_THRESHOLD: &str = "decoupling_threshold";
    pub const REVIEW_THRESHOLD: &str = "review_threshold";
    pub const DEMAND_VARIABILITY_THRESHOLD: &str = "demand_variability_threshold";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取某作用域下的全部键值
    fn scope_values(&self, scope: &ConfigScope) -> RepositoryResult<HashMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1")?;
        let rows = stmt.query_map(params![scope.scope_id()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut values = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            values.insert(key, value);
        }
        Ok(values)
    }

    /// 写入配置值 (UPSERT)
    pub fn set_value(&self, scope: &ConfigScope, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3",
            params![scope.scope_id(), key, value],
        )?;
        Ok(())
    }

    /// 加载引擎配置
    ///
    /// 合并顺序: 内置默认值 → global → 指定租户 (租户为 Global 时只合并一层)
    /// 合并后统一校验。
    pub fn load_engine_config(&self, scope: &ConfigScope) -> EngineResult<EngineConfig> {
        let mut config = EngineConfig::default();

        let global = self.scope_values(&ConfigScope::Global)?;
        apply_overrides(&mut config, &global)?;

        if *scope != ConfigScope::Global {
            let scoped = self.scope_values(scope)?;
            apply_overrides(&mut config, &scoped)?;
            tracing::debug!(
                scope_id = %scope.scope_id(),
                global_keys = global.len(),
                scoped_keys = scoped.len(),
                "已加载分层引擎配置"
            );
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_f64(key: &str, raw: &str) -> EngineResult<f64> {
    raw.trim().parse::<f64>().map_err(|_| {
        EngineError::configuration(format!("配置项 {} 的值 '{}' 不是数字", key, raw))
    })
}

/// 将键值覆写到配置上；未知键忽略
fn apply_overrides(config: &mut EngineConfig, values: &HashMap<String, String>) -> EngineResult<()> {
    use config_keys::*;

    for (key, raw) in values {
        match key.as_str() {
            SHORT_LEAD_TIME_THRESHOLD => config.short_lead_time_threshold = parse_f64(key, raw)?,
            MEDIUM_LEAD_TIME_THRESHOLD => config.medium_lead_time_threshold = parse_f64(key, raw)?,
            SHORT_LEAD_TIME_FACTOR => config.short_lead_time_factor = parse_f64(key, raw)?,
            MEDIUM_LEAD_TIME_FACTOR => config.medium_lead_time_factor = parse_f64(key, raw)?,
            LONG_LEAD_TIME_FACTOR => config.long_lead_time_factor = parse_f64(key, raw)?,
            LOW_VARIABILITY_FACTOR => config.low_variability_factor = parse_f64(key, raw)?,
            MEDIUM_VARIABILITY_FACTOR => config.medium_variability_factor = parse_f64(key, raw)?,
            HIGH_VARIABILITY_FACTOR => config.high_variability_factor = parse_f64(key, raw)?,
            REPLENISHMENT_TIME_FACTOR => config.replenishment_time_factor = parse_f64(key, raw)?,
            GREEN_ZONE_FACTOR => config.green_zone_factor = parse_f64(key, raw)?,
            CLASSIFICATION_MEDIUM_LEAD_TIME_DAYS => {
                config.classification_medium_lead_time_days = parse_f64(key, raw)?
            }
            CLASSIFICATION_LONG_LEAD_TIME_DAYS => {
                config.classification_long_lead_time_days = parse_f64(key, raw)?
            }
            CLASSIFICATION_MEDIUM_VARIABILITY => {
                config.classification_medium_variability = parse_f64(key, raw)?
            }
            CLASSIFICATION_HIGH_VARIABILITY => {
                config.classification_high_variability = parse_f64(key, raw)?
            }
            CLASSIFICATION_WEIGHT_LEAD_TIME => {
                config.classification_weights.lead_time = parse_f64(key, raw)?
            }
            CLASSIFICATION_WEIGHT_VARIABILITY => {
                config.classification_weights.variability = parse_f64(key, raw)?
            }
            CLASSIFICATION_WEIGHT_CRITICALITY => {
                config.classification_weights.criticality = parse_f64(key, raw)?
            }
            CLASSIFICATION_WEIGHT_IMPORTANCE => {
                config.classification_weights.importance = parse_f64(key, raw)?
            }
            DECOUPLING_BENCHMARKS => {
                config.decoupling_benchmarks = serde_json::from_str::<DecouplingBenchmarks>(raw)
                    .map_err(|e| {
                        EngineError::configuration(format!("decoupling_benchmarks 解析失败: {}", e))
                    })?
            }
            DECOUPLING_THRESHOLD => config.decoupling_threshold = parse_f64(key, raw)?,
            REVIEW_THRESHOLD => config.review_threshold = parse_f64(key, raw)?,
            DEMAND_VARIABILITY_THRESHOLD => {
                config.demand_variability_threshold = parse_f64(key, raw)?
            }
            other => {
                tracing::debug!(config_key = other, "忽略未知配置项");
            }
        }
    }

    Ok(())
}
