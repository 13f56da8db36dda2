// ==========================================
// 库存缓冲决策引擎 - 引擎层
// ==========================================
// 职责: 确定性计算，不拼 SQL
// 红线: 引擎无内部状态，配置逐次传入; 不加锁
// ==========================================

pub mod buffer_zone;
pub mod classification;
pub mod decoupling;
pub mod demand_analytics;
pub mod forecast_selection;
pub mod net_flow;
pub mod parameter_optimizer;
pub mod penetration;
pub mod pipeline;

// 重导出核心引擎
pub use buffer_zone::{BufferZoneCalculator, ZoneAdjustmentRequest};
pub use classification::{
    CriticalityInputs, CriticalityStrategy, SkuClassificationEngine, WeightedCriticality,
};
pub use decoupling::{DecouplingPointPositioner, DecouplingRecommender, DecouplingRegistry};
pub use demand_analytics::{DemandAnalytics, DynamicAdjustmentFactors};
pub use forecast_selection::{compute_metrics, ForecastModelSelector};
pub use net_flow::NetFlowPositionEngine;
pub use parameter_optimizer::{HeuristicParameterOptimizer, ParameterOptimizer};
pub use penetration::{BufferBreachDetector, BufferPenetrationClassifier, ReplenishmentAdvisor};
pub use pipeline::{
    BatchOutcome, BufferHealthSummary, BufferStatusPipeline, ItemBufferStatus, ItemFailure,
};
