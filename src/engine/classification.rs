// ==========================================
// 库存缓冲决策引擎 - SKU 分类引擎
// ==========================================
// 职责: 提前期/变异/关键度三轴分类 + 综合得分
// 输入: ItemSnapshot + 关键度输入 + EngineConfig
// 输出: Classification
// 红线: classify 幂等; 历史只追加 (ClassificationHistory / 分类历史仓储)
// ==========================================

use crate::config::EngineConfig;
use crate::domain::classification::{Classification, ClassificationRecord};
use crate::domain::item::ItemSnapshot;
use crate::domain::types::{Criticality, LeadTimeCategory, VariabilityLevel};
use crate::error::EngineResult;
use chrono::Utc;
use serde::{Deserialize, Serialize};

// 等级 → 轴得分
const LOW_AXIS_SCORE: f64 = 0.0;
const MEDIUM_AXIS_SCORE: f64 = 50.0;
const HIGH_AXIS_SCORE: f64 = 100.0;

// ==========================================
// CriticalityInputs - 关键度输入
// ==========================================
// service_level / network_centrality 均归一化到 0..1，缺失按 0 计
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CriticalityInputs {
    pub decoupling_flag: bool,
    #[serde(default)]
    pub service_level: Option<f64>,
    #[serde(default)]
    pub network_centrality: Option<f64>,
}

impl CriticalityInputs {
    pub fn from_flag(decoupling_flag: bool) -> Self {
        Self {
            decoupling_flag,
            ..Self::default()
        }
    }
}

// ==========================================
// WeightedCriticality - 加权关键度参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedCriticality {
    pub decoupling_weight: f64,
    pub service_level_weight: f64,
    pub centrality_weight: f64,
    pub high_threshold: f64,   // 加权得分 ≥ 即 high
    pub medium_threshold: f64, // 加权得分 ≥ 即 medium
}

impl Default for WeightedCriticality {
    fn default() -> Self {
        Self {
            decoupling_weight: 0.5,
            service_level_weight: 0.3,
            centrality_weight: 0.2,
            high_threshold: 0.7,
            medium_threshold: 0.4,
        }
    }
}

impl WeightedCriticality {
    /// 加权得分 (0..1)，权重之和为 0 时返回 0
    pub fn blended_score(&self, inputs: &CriticalityInputs) -> f64 {
        let total_weight = self.decoupling_weight + self.service_level_weight + self.centrality_weight;
        if !total_weight.is_finite() || total_weight <= 0.0 {
            return 0.0;
        }

        let flag = if inputs.decoupling_flag { 1.0 } else { 0.0 };
        let service = unit_or_zero(inputs.service_level);
        let centrality = unit_or_zero(inputs.network_centrality);

        (self.decoupling_weight * flag + self.service_level_weight * service + self.centrality_weight * centrality)
            / total_weight
    }
}

fn unit_or_zero(value: Option<f64>) -> f64 {
    value
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
        .unwrap_or(0.0)
}

// ==========================================
// CriticalityStrategy - 关键度策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CriticalityStrategy {
    /// 解耦点标记 → high，否则 low
    Simple,
    /// 解耦点标记 + 服务水平 + 网络中心度加权
    Weighted(WeightedCriticality),
}

impl Default for CriticalityStrategy {
    fn default() -> Self {
        CriticalityStrategy::Simple
    }
}

impl CriticalityStrategy {
    pub fn criticality(&self, inputs: &CriticalityInputs) -> Criticality {
        match self {
            CriticalityStrategy::Simple => {
                if inputs.decoupling_flag {
                    Criticality::High
                } else {
                    Criticality::Low
                }
            }
            CriticalityStrategy::Weighted(params) => {
                let score = params.blended_score(inputs);
                if score >= params.high_threshold {
                    Criticality::High
                } else if score >= params.medium_threshold {
                    Criticality::Medium
                } else {
                    Criticality::Low
                }
            }
        }
    }
}

// ==========================================
// SkuClassificationEngine - SKU 分类引擎
// ==========================================
pub struct SkuClassificationEngine {
    strategy: CriticalityStrategy,
}

impl SkuClassificationEngine {
    /// 默认使用 Simple 关键度策略
    pub fn new() -> Self {
        Self::with_strategy(CriticalityStrategy::Simple)
    }

    pub fn with_strategy(strategy: CriticalityStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &CriticalityStrategy {
        &self.strategy
    }

    /// 分类 (仅解耦点标记)
    pub fn classify(
        &self,
        item: &ItemSnapshot,
        decoupling_flag: bool,
        config: &EngineConfig,
    ) -> EngineResult<Classification> {
        self.classify_with(item, &CriticalityInputs::from_flag(decoupling_flag), None, config)
    }

    /// 分类 (完整关键度输入 + 可选外部重要度)
    ///
    /// # 参数
    /// - `importance`: 外部重要度 0..1，None 时不参与综合得分
    ///
    /// # 错误
    /// - 配置未通过校验 (阈值非单调、权重合计为 0 等) → Configuration
    pub fn classify_with(
        &self,
        item: &ItemSnapshot,
        inputs: &CriticalityInputs,
        importance: Option<f64>,
        config: &EngineConfig,
    ) -> EngineResult<Classification> {
        config.validate()?;

        let lead_time_category = self.lead_time_category(item.lead_time_days, config);
        let variability_level = self.variability_level(item.variability_factor, config);
        let criticality = self.strategy.criticality(inputs);

        let score = self.composite_score(
            lead_time_category,
            variability_level,
            criticality,
            importance,
            config,
        );

        Ok(Classification {
            lead_time_category,
            variability_level,
            criticality,
            score,
        })
    }

    /// 生成分类历史记录 (时间戳取当前 UTC)
    pub fn record(&self, sku: &str, classification: Classification) -> ClassificationRecord {
        ClassificationRecord::new(sku, classification, Utc::now().naive_utc())
    }

    // ==========================================
    // 单轴分类
    // ==========================================

    fn lead_time_category(&self, lead_time_days: f64, config: &EngineConfig) -> LeadTimeCategory {
        if lead_time_days > config.classification_long_lead_time_days {
            LeadTimeCategory::Long
        } else if lead_time_days > config.classification_medium_lead_time_days {
            LeadTimeCategory::Medium
        } else {
            LeadTimeCategory::Short
        }
    }

    fn variability_level(&self, variability_factor: f64, config: &EngineConfig) -> VariabilityLevel {
        if variability_factor > config.classification_high_variability {
            VariabilityLevel::High
        } else if variability_factor > config.classification_medium_variability {
            VariabilityLevel::Medium
        } else {
            VariabilityLevel::Low
        }
    }

    // ==========================================
    // 综合得分
    // ==========================================

    fn composite_score(
        &self,
        lead_time: LeadTimeCategory,
        variability: VariabilityLevel,
        criticality: Criticality,
        importance: Option<f64>,
        config: &EngineConfig,
    ) -> f64 {
        let w = &config.classification_weights;

        let lead_time_score = match lead_time {
            LeadTimeCategory::Short => LOW_AXIS_SCORE,
            LeadTimeCategory::Medium => MEDIUM_AXIS_SCORE,
            LeadTimeCategory::Long => HIGH_AXIS_SCORE,
        };
        let variability_score = match variability {
            VariabilityLevel::Low => LOW_AXIS_SCORE,
            VariabilityLevel::Medium => MEDIUM_AXIS_SCORE,
            VariabilityLevel::High => HIGH_AXIS_SCORE,
        };
        let criticality_score = match criticality {
            Criticality::Low => LOW_AXIS_SCORE,
            Criticality::Medium => MEDIUM_AXIS_SCORE,
            Criticality::High => HIGH_AXIS_SCORE,
        };

        let mut weighted = w.lead_time * lead_time_score
            + w.variability * variability_score
            + w.criticality * criticality_score;
        let mut total_weight = w.lead_time + w.variability + w.criticality;

        if let Some(imp) = importance.filter(|v| v.is_finite()) {
            weighted += w.importance * imp.clamp(0.0, 1.0) * 100.0;
            total_weight += w.importance;
        }

        if total_weight <= 0.0 {
            return 0.0;
        }
        (weighted / total_weight).clamp(0.0, 100.0)
    }
}

impl Default for SkuClassificationEngine {
    fn default() -> Self {
        Self::new()
    }
}
