// ==========================================
// 库存缓冲决策引擎 - 核心库
// ==========================================
// 技术栈: Rust + SQLite (记录存储适配)
// 系统定位: 需求驱动库存决策支持 (计划员最终控制权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 值对象与类型
pub mod domain;

// 记录存储适配层 - 数据访问
pub mod repository;

// 引擎层 - 计算规则
pub mod engine;

// 配置层 - 引擎配置
pub mod config;

// 数据库基础设施（连接初始化/参考 schema）
pub mod db;

// 错误类型
pub mod error;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AdjustmentDirection, BreachType, BufferStatus, Criticality, DecouplingType, DesignationDecision,
    DistributionStatus, LeadTimeCategory, PlanningPriority, VariabilityLevel, ZoneKind,
};

// 领域实体
pub use domain::{
    BufferPenetration, BufferProfile, BufferZones, Classification, ClassificationHistory,
    ClassificationRecord, DecouplingPoint, ForecastCandidate, ItemSnapshot, ModelFitResult,
    NetFlowPosition, ZoneAdjustment,
};

// 引擎
pub use engine::{
    BufferPenetrationClassifier, BufferStatusPipeline, BufferZoneCalculator,
    DecouplingPointPositioner, DecouplingRecommender, ForecastModelSelector,
    NetFlowPositionEngine, ReplenishmentAdvisor, SkuClassificationEngine,
};

// 配置与错误
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "库存缓冲决策引擎";
