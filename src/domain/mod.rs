// ==========================================
// 库存缓冲决策引擎 - 领域模型层
// ==========================================
// 职责: 定义值对象与枚举
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod buffer;
pub mod classification;
pub mod decoupling;
pub mod forecast;
pub mod item;
pub mod types;

// 重导出核心类型
pub use buffer::{BufferPenetration, BufferZones, NetFlowPosition, ReplenishmentSignal, ZoneAdjustment};
pub use classification::{Classification, ClassificationHistory, ClassificationRecord};
pub use decoupling::{
    DecouplingFactor, DecouplingPoint, DecouplingRecommendation, DistributionEntry,
    DistributionReport,
};
pub use forecast::{
    ForecastCandidate, ForecastMetrics, ModelEvaluation, ModelFitResult, ModelParameter,
    OptimizedParameters,
};
pub use item::{BufferProfile, ItemSnapshot};
pub use types::{
    AdjustmentDirection, BreachType, BufferStatus, Criticality, DecouplingType, DesignationDecision,
    DistributionStatus, LeadTimeCategory, PlanningPriority, VariabilityLevel, ZoneKind,
};
