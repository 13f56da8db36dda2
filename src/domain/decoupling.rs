// ==========================================
// 库存缓冲决策引擎 - 解耦点领域模型
// ==========================================
// 约束: 一个库位最多一个有效解耦点
// ==========================================

use crate::domain::types::{DecouplingType, DesignationDecision, DistributionStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// DecouplingPoint - 解耦点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecouplingPoint {
    pub location_id: String,
    pub decoupling_type: DecouplingType,
    pub buffer_profile_id: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ==========================================
// DistributionEntry - 类型分布 (对比基准)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub count: usize,
    pub fraction: f64,   // 当前占比
    pub benchmark: f64,  // 基准占比
    pub status: DistributionStatus,
}

pub type DistributionReport = BTreeMap<DecouplingType, DistributionEntry>;

// ==========================================
// DecouplingFactor - 解耦点评分因子
// ==========================================
// weight: 0..10, score: 0..100
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecouplingFactor {
    pub id: String,
    pub weight: f64,
    pub score: f64,
}

impl DecouplingFactor {
    pub fn new(id: impl Into<String>, weight: f64, score: f64) -> Self {
        Self {
            id: id.into(),
            weight,
            score,
        }
    }
}

// ==========================================
// DecouplingRecommendation - 解耦点推荐
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecouplingRecommendation {
    pub location_id: String,
    pub score: f64,                                   // 0..100
    pub factor_contributions: BTreeMap<String, f64>,  // 因子 → 贡献
    pub recommended_type: Option<DecouplingType>,
    pub confidence: f64,                              // 0..100
    pub decision: DesignationDecision,
    pub high_demand_variability: bool,
}
