// ==========================================
// 库存缓冲决策引擎 - 解耦点定位引擎
// ==========================================
// 职责:
// - 解耦点定位校验 (库位/配置档必填)
// - 类型分布对比基准 (仅提示，不拒绝定位)
// - 有效解耦点登记 (每库位唯一)
// - 多因子评分推荐解耦点类型与指定决策
// ==========================================

use crate::config::{DecouplingBenchmarks, EngineConfig};
use crate::domain::decoupling::{
    DecouplingFactor, DecouplingPoint, DecouplingRecommendation, DistributionEntry, DistributionReport,
};
use crate::domain::types::{DecouplingType, DesignationDecision, DistributionStatus};
use crate::error::{EngineError, EngineResult};
use std::collections::BTreeMap;

// ==========================================
// DecouplingPointPositioner - 解耦点定位
// ==========================================
pub struct DecouplingPointPositioner {}

impl DecouplingPointPositioner {
    pub fn new() -> Self {
        Self {}
    }

    /// 构造一个解耦点
    ///
    /// # 错误
    /// - location_id 或 buffer_profile_id 为空白 → Validation
    pub fn position(
        &self,
        location_id: &str,
        candidate_type: DecouplingType,
        buffer_profile_id: &str,
        description: Option<&str>,
    ) -> EngineResult<DecouplingPoint> {
        let location_id = location_id.trim();
        if location_id.is_empty() {
            return Err(EngineError::validation("解耦点 location_id 不能为空"));
        }
        let buffer_profile_id = buffer_profile_id.trim();
        if buffer_profile_id.is_empty() {
            return Err(EngineError::validation(format!(
                "库位 {} 的解耦点缺少 buffer_profile_id",
                location_id
            )));
        }

        Ok(DecouplingPoint {
            location_id: location_id.to_string(),
            decoupling_type: candidate_type,
            buffer_profile_id: buffer_profile_id.to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        })
    }

    /// 类型分布对比基准
    ///
    /// 四种类型全部输出; 总数为 0 时占比均为 0。
    /// 占比 ≤ 基准 → ok，否则 over。
    ///
    /// # 错误
    /// - 基准缺少类型、超出 [0,1] 或合计 ≠ 1 → Configuration
    pub fn distribution_status(
        &self,
        current_counts: &BTreeMap<DecouplingType, usize>,
        benchmarks: &DecouplingBenchmarks,
    ) -> EngineResult<DistributionReport> {
        benchmarks.validate()?;
        let total: usize = current_counts.values().sum();

        let report = DecouplingType::ALL
            .iter()
            .map(|t| {
                let count = current_counts.get(t).copied().unwrap_or(0);
                let fraction = if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64
                };
                // validate 已保证四类齐全
                let benchmark = benchmarks.get(*t).unwrap_or_default();
                let status = if fraction <= benchmark {
                    DistributionStatus::Ok
                } else {
                    DistributionStatus::Over
                };
                (
                    *t,
                    DistributionEntry {
                        count,
                        fraction,
                        benchmark,
                        status,
                    },
                )
            })
            .collect();
        Ok(report)
    }
}

impl Default for DecouplingPointPositioner {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// DecouplingRegistry - 有效解耦点登记表
// ==========================================
// 内存版唯一性约束; SQLite 版见 DecouplingPointRepository
#[derive(Debug, Clone, Default)]
pub struct DecouplingRegistry {
    points: BTreeMap<String, DecouplingPoint>,
}

impl DecouplingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记解耦点，库位已有有效解耦点时返回 Conflict
    pub fn register(&mut self, point: DecouplingPoint) -> EngineResult<()> {
        if let Some(existing) = self.points.get(&point.location_id) {
            return Err(EngineError::conflict(format!(
                "库位 {} 已存在有效解耦点 ({})",
                point.location_id, existing.decoupling_type
            )));
        }
        self.points.insert(point.location_id.clone(), point);
        Ok(())
    }

    /// 显式覆盖，返回被替换的解耦点
    pub fn replace(&mut self, point: DecouplingPoint) -> Option<DecouplingPoint> {
        self.points.insert(point.location_id.clone(), point)
    }

    /// 停用库位的解耦点
    pub fn deactivate(&mut self, location_id: &str) -> Option<DecouplingPoint> {
        self.points.remove(location_id)
    }

    pub fn get(&self, location_id: &str) -> Option<&DecouplingPoint> {
        self.points.get(location_id)
    }

    pub fn points(&self) -> impl Iterator<Item = &DecouplingPoint> {
        self.points.values()
    }

    /// 按类型计数 (用于分布对比)
    pub fn counts(&self) -> BTreeMap<DecouplingType, usize> {
        let mut counts = BTreeMap::new();
        for point in self.points.values() {
            *counts.entry(point.decoupling_type).or_insert(0) += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ==========================================
// DecouplingRecommender - 解耦点推荐
// ==========================================

/// 评分因子标识
pub mod factor_ids {
    pub const LEAD_TIME: &str = "lead_time";
    pub const DEMAND_VARIABILITY: &str = "demand_variability";
    pub const SUPPLY_RELIABILITY: &str = "supply_reliability";
    pub const INVENTORY_COST: &str = "inventory_cost";
    pub const CUSTOMER_SERVICE: &str = "customer_service";
}

const MAX_FACTOR_WEIGHT: f64 = 10.0;
const MAX_FACTOR_SCORE: f64 = 100.0;

// 类型推荐阈值 (得分 0..100)
const HIGH_SCORE: f64 = 70.0;
const MEDIUM_SCORE: f64 = 40.0;

pub struct DecouplingRecommender {}

impl DecouplingRecommender {
    pub fn new() -> Self {
        Self {}
    }

    /// 对候选库位多因子评分
    ///
    /// # 参数
    /// - `location_id`: 候选库位
    /// - `factors`: 评分因子 (weight 0..10, score 0..100)
    /// - `demand_cv`: 需求变异系数 (可选，用于高需求变异标记)
    /// - `config`: 使用 decoupling_threshold / review_threshold / demand_variability_threshold
    ///
    /// # 规则
    /// - 贡献 = weight × score / 10
    /// - 得分 = round(Σ贡献 / Σweight × 10)
    /// - 得分/100 ≥ decoupling_threshold → 自动指定; ≥ review_threshold → 复核; 否则拒绝
    pub fn recommend(
        &self,
        location_id: &str,
        factors: &[DecouplingFactor],
        demand_cv: Option<f64>,
        config: &EngineConfig,
    ) -> EngineResult<DecouplingRecommendation> {
        config.validate()?;
        let location_id = location_id.trim();
        if location_id.is_empty() {
            return Err(EngineError::validation("推荐解耦点 location_id 不能为空"));
        }
        if factors.is_empty() {
            return Err(EngineError::validation(format!(
                "库位 {} 未提供评分因子",
                location_id
            )));
        }

        let mut contributions = BTreeMap::new();
        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        for factor in factors {
            if !factor.weight.is_finite() || !(0.0..=MAX_FACTOR_WEIGHT).contains(&factor.weight) {
                return Err(EngineError::validation(format!(
                    "因子 {} 权重 {} 不在 [0,{}] 内",
                    factor.id, factor.weight, MAX_FACTOR_WEIGHT
                )));
            }
            if !factor.score.is_finite() || !(0.0..=MAX_FACTOR_SCORE).contains(&factor.score) {
                return Err(EngineError::validation(format!(
                    "因子 {} 得分 {} 不在 [0,{}] 内",
                    factor.id, factor.score, MAX_FACTOR_SCORE
                )));
            }

            let contribution = factor.weight * factor.score / MAX_FACTOR_WEIGHT;
            contributions.insert(factor.id.clone(), contribution);
            weighted += contribution;
            total_weight += factor.weight;
        }

        let score = if total_weight > 0.0 {
            (weighted / total_weight * 10.0).round()
        } else {
            0.0
        };

        let (recommended_type, confidence) = self.recommend_type(score, &contributions);
        let decision = self.designation_decision(score, config);
        let high_demand_variability = demand_cv
            .filter(|cv| cv.is_finite())
            .map(|cv| cv >= config.demand_variability_threshold)
            .unwrap_or(false);

        tracing::debug!(
            location_id = %location_id,
            score,
            recommended_type = ?recommended_type,
            decision = %decision,
            "解耦点推荐"
        );

        Ok(DecouplingRecommendation {
            location_id: location_id.to_string(),
            score,
            factor_contributions: contributions,
            recommended_type,
            confidence,
            decision,
            high_demand_variability,
        })
    }

    /// 得分 → 指定决策 (配置已校验)
    fn designation_decision(&self, score: f64, config: &EngineConfig) -> DesignationDecision {
        let normalized = score / 100.0;
        if normalized >= config.decoupling_threshold {
            DesignationDecision::AutoDesignate
        } else if normalized >= config.review_threshold {
            DesignationDecision::Review
        } else {
            DesignationDecision::Reject
        }
    }

    /// 得分 + 因子贡献 → (推荐类型, 置信度)
    fn recommend_type(
        &self,
        score: f64,
        contributions: &BTreeMap<String, f64>,
    ) -> (Option<DecouplingType>, f64) {
        let contribution = |id: &str| contributions.get(id).copied().unwrap_or(0.0);
        let lead_time = contribution(factor_ids::LEAD_TIME);
        let demand_variability = contribution(factor_ids::DEMAND_VARIABILITY);
        let customer_service = contribution(factor_ids::CUSTOMER_SERVICE);

        if score >= HIGH_SCORE {
            if lead_time > 40.0 && demand_variability > 35.0 {
                (Some(DecouplingType::Strategic), 85.0)
            } else if customer_service > 40.0 && lead_time > 25.0 {
                (Some(DecouplingType::CustomerOrder), 80.0)
            } else {
                (Some(DecouplingType::StockPoint), 75.0)
            }
        } else if score >= MEDIUM_SCORE {
            (Some(DecouplingType::Intermediate), 65.0)
        } else if score > 0.0 {
            (None, 50.0)
        } else {
            (None, 0.0)
        }
    }
}

impl Default for DecouplingRecommender {
    fn default() -> Self {
        Self::new()
    }
}
