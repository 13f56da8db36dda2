// ==========================================
// 库存缓冲决策引擎 - 配置层
// ==========================================
// 职责: 引擎配置定义、校验与分层加载
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod engine_config;

// 重导出核心配置
pub use config_manager::{config_keys, ConfigManager, ConfigScope};
pub use engine_config::{ClassificationWeights, DecouplingBenchmarks, EngineConfig};
